//! Optimization suggestions and savings totals

use super::InventoryService;
use crate::cost::{CostEstimate, CostRates, CURRENCY};
use crate::models::{serialize_iso8601, ContainerSnapshot, Suggestion};
use crate::observability::{DashboardMetrics, StructuredLogger};
use crate::optimizer::{self, Action, Recommendation};
use crate::runtime::RuntimeResult;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Suggestions for the running containers plus summed savings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionReport {
    pub suggestions: Vec<Suggestion>,
    pub total_estimated_savings: CostEstimate,
    pub currency: String,
    #[serde(serialize_with = "serialize_iso8601")]
    pub last_updated: DateTime<Utc>,
}

impl SuggestionReport {
    /// Build a report from already-sampled snapshots.
    ///
    /// Only containers recommended for stopping get a cost estimate and a
    /// suggestion; monitor/none recommendations contribute nothing.
    pub fn from_snapshots(
        snapshots: &[ContainerSnapshot],
        rates: &CostRates,
        now: DateTime<Utc>,
    ) -> Self {
        let suggestions: Vec<Suggestion> = snapshots
            .iter()
            .filter(|s| s.status.is_running())
            .filter_map(|s| match optimizer::classify(s.cpu, s.memory, &s.status) {
                Recommendation::Optimizable {
                    action: Action::Stop,
                    priority,
                    reason,
                } => Some(Suggestion {
                    container_id: s.id.clone(),
                    container_name: s.name.clone(),
                    action: Action::Stop,
                    reason,
                    priority,
                    estimated_savings: rates.estimate(s.cpu, s.memory, true),
                    current_usage: s.usage(),
                }),
                _ => None,
            })
            .collect();

        let total_estimated_savings =
            CostEstimate::total(suggestions.iter().map(|s| &s.estimated_savings));

        Self {
            suggestions,
            total_estimated_savings,
            currency: CURRENCY.to_string(),
            last_updated: now,
        }
    }
}

/// Runs the inventory over running containers and prices the stop suggestions
#[derive(Clone)]
pub struct SuggestionAggregator {
    inventory: InventoryService,
    rates: CostRates,
    metrics: DashboardMetrics,
    logger: StructuredLogger,
}

impl SuggestionAggregator {
    pub fn new(inventory: InventoryService) -> Self {
        Self {
            inventory,
            rates: CostRates::default(),
            metrics: DashboardMetrics::new(),
            logger: StructuredLogger::new("localhost"),
        }
    }

    pub fn with_rates(mut self, rates: CostRates) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    pub async fn suggestions(&self) -> RuntimeResult<SuggestionReport> {
        let snapshots = self.inventory.running_snapshots().await?;
        let report = SuggestionReport::from_snapshots(&snapshots, &self.rates, Utc::now());

        self.metrics
            .set_potential_monthly_savings(report.total_estimated_savings.monthly);
        self.logger.log_suggestions(
            report.suggestions.len(),
            report.total_estimated_savings.monthly,
            &report.currency,
        );

        Ok(report)
    }
}
