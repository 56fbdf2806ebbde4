//! HTTP API for the dashboard frontend, plus health probes and Prometheus metrics

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dashboard_lib::{
    health::{ComponentStatus, HealthRegistry},
    models::to_iso8601,
    observability::{DashboardMetrics, StructuredLogger},
    ContainerSnapshot, IdleContainer, InventoryService, RuntimeError, SuggestionAggregator,
    SuggestionReport,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub inventory: InventoryService,
    pub suggestions: SuggestionAggregator,
    pub health_registry: HealthRegistry,
    pub metrics: DashboardMetrics,
    pub logger: StructuredLogger,
}

impl AppState {
    pub fn new(
        inventory: InventoryService,
        health_registry: HealthRegistry,
        logger: StructuredLogger,
    ) -> Self {
        let inventory = inventory
            .with_health(health_registry.clone())
            .with_logger(logger.clone());
        let suggestions = SuggestionAggregator::new(inventory.clone()).with_logger(logger.clone());

        Self {
            inventory,
            suggestions,
            health_registry,
            metrics: DashboardMetrics::new(),
            logger,
        }
    }
}

/// Error returned to API callers.
///
/// Runtime failures are reported with a generic message; the cause is only logged.
#[derive(Debug)]
pub struct ApiError {
    message: &'static str,
    source: RuntimeError,
}

impl ApiError {
    pub fn new(message: &'static str, source: RuntimeError) -> Self {
        Self { message, source }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.source, "{}", self.message);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub timestamp: String,
}

async fn list_containers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ContainerSnapshot>>, ApiError> {
    state
        .inventory
        .list_containers()
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to fetch containers", e))
}

async fn idle_containers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<IdleContainer>>, ApiError> {
    state
        .inventory
        .idle_containers()
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to fetch idle containers", e))
}

fn action_response(
    state: &AppState,
    id: &str,
    action: &'static str,
    result: Result<(), RuntimeError>,
    success: &'static str,
    failure: &'static str,
) -> Result<Json<MessageResponse>, ApiError> {
    match result {
        Ok(()) => {
            state.metrics.inc_container_action(action, true);
            state.logger.log_container_action(id, action, None);
            Ok(Json(MessageResponse { message: success }))
        }
        Err(e) => {
            state.metrics.inc_container_action(action, false);
            state
                .logger
                .log_container_action(id, action, Some(&e.to_string()));
            Err(ApiError::new(failure, e))
        }
    }
}

async fn start_container(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = state.inventory.runtime().start_container(&id).await;
    action_response(
        &state,
        &id,
        "start",
        result,
        "Container started successfully",
        "Failed to start container",
    )
}

async fn stop_container(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let result = state.inventory.runtime().stop_container(&id).await;
    action_response(
        &state,
        &id,
        "stop",
        result,
        "Container stopped successfully",
        "Failed to stop container",
    )
}

async fn optimization_suggestions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SuggestionReport>, ApiError> {
    state
        .suggestions
        .suggestions()
        .await
        .map(Json)
        .map_err(|e| ApiError::new("Failed to generate optimization suggestions", e))
}

/// Liveness check used by the frontend
async fn api_health() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "OK",
        timestamp: to_iso8601(&chrono::Utc::now()),
    })
}

/// Component health - 200 if healthy or degraded, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .route("/api/containers", get(list_containers))
        .route("/api/containers/idle", get(idle_containers))
        .route("/api/containers/:id/start", post(start_container))
        .route("/api/containers/:id/stop", post(stop_container))
        .route("/api/optimization/suggestions", get(optimization_suggestions))
        .route("/api/health", get(api_health))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        app = app.layer(CorsLayer::permissive());
    }

    app
}

/// Start the API server, stopping when `shutdown` resolves
pub async fn serve(
    addr: &str,
    state: Arc<AppState>,
    enable_cors: bool,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state, enable_cors);

    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
