//! API client for the container dashboard server

use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

/// HTTP client for the dashboard API
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    /// Make a POST request without a body
    pub async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // The server answers failures with {"error": "..."}
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            anyhow::bail!("API error ({}): {}", status, message);
        }

        response.json().await.context("Failed to parse response")
    }

    pub async fn containers(&self) -> Result<Vec<Container>> {
        self.get("api/containers").await
    }

    pub async fn idle_containers(&self) -> Result<Vec<IdleContainer>> {
        self.get("api/containers/idle").await
    }

    pub async fn start_container(&self, id: &str) -> Result<MessageResponse> {
        self.post(&format!("api/containers/{}/start", id)).await
    }

    pub async fn stop_container(&self, id: &str) -> Result<MessageResponse> {
        self.post(&format!("api/containers/{}/stop", id)).await
    }

    pub async fn suggestions(&self) -> Result<SuggestionReport> {
        self.get("api/optimization/suggestions").await
    }

    pub async fn health(&self) -> Result<HealthCheck> {
        self.get("api/health").await
    }
}

// API response types

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub id: String,
    pub name: String,
    pub status: String,
    pub cpu: f64,
    pub memory: f64,
    pub created: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdleContainer {
    #[serde(flatten)]
    pub container: Container,
    pub is_idle: bool,
    pub reason: String,
    pub action: String,
    pub priority: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEstimate {
    pub hourly: f64,
    pub daily: f64,
    pub monthly: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub cpu: f64,
    pub memory: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub container_id: String,
    pub container_name: String,
    pub action: String,
    pub reason: String,
    pub priority: String,
    pub estimated_savings: CostEstimate,
    pub current_usage: Usage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionReport {
    pub suggestions: Vec<Suggestion>,
    pub total_estimated_savings: CostEstimate,
    pub currency: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
