//! Container inventory
//!
//! Turns the runtime's container listing into `ContainerSnapshot`s with live
//! usage. Running containers are sampled; everything else is reported with
//! zero usage straight from the listing. A container whose stats cannot be
//! read is logged and left out rather than failing the whole scan.

mod suggestions;

#[cfg(test)]
mod tests;

pub use suggestions::{SuggestionAggregator, SuggestionReport};

use crate::health::{components, HealthRegistry};
use crate::models::{ContainerInfo, ContainerSnapshot, IdleContainer};
use crate::observability::{DashboardMetrics, StructuredLogger};
use crate::optimizer::{self, Recommendation};
use crate::runtime::{ContainerRuntime, RuntimeResult};
use crate::usage;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

/// Default number of stats queries issued concurrently
pub const DEFAULT_STATS_CONCURRENCY: usize = 4;

/// Builds container snapshots from a `ContainerRuntime`
#[derive(Clone)]
pub struct InventoryService {
    runtime: Arc<dyn ContainerRuntime>,
    stats_concurrency: usize,
    health: Option<HealthRegistry>,
    metrics: DashboardMetrics,
    logger: StructuredLogger,
}

impl InventoryService {
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self {
            runtime,
            stats_concurrency: DEFAULT_STATS_CONCURRENCY,
            health: None,
            metrics: DashboardMetrics::new(),
            logger: StructuredLogger::new("localhost"),
        }
    }

    /// Limit on concurrent stats queries; results keep enumeration order regardless
    pub fn with_stats_concurrency(mut self, concurrency: usize) -> Self {
        self.stats_concurrency = concurrency.max(1);
        self
    }

    /// Report runtime reachability to the given registry
    pub fn with_health(mut self, health: HealthRegistry) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_logger(mut self, logger: StructuredLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn runtime(&self) -> &Arc<dyn ContainerRuntime> {
        &self.runtime
    }

    /// Every container known to the runtime, running or not
    pub async fn list_containers(&self) -> RuntimeResult<Vec<ContainerSnapshot>> {
        let snapshots = self.scan(true).await?;
        self.metrics.set_containers_listed(snapshots.len() as i64);
        Ok(snapshots)
    }

    /// Containers the runtime lists as running
    pub async fn running_snapshots(&self) -> RuntimeResult<Vec<ContainerSnapshot>> {
        self.scan(false).await
    }

    /// Running containers the classifier flags for optimization
    pub async fn idle_containers(&self) -> RuntimeResult<Vec<IdleContainer>> {
        let idle: Vec<IdleContainer> = self
            .running_snapshots()
            .await?
            .into_iter()
            .filter_map(|snapshot| {
                match optimizer::classify(snapshot.cpu, snapshot.memory, &snapshot.status) {
                    Recommendation::Optimizable {
                        action,
                        priority,
                        reason,
                    } => Some(IdleContainer {
                        snapshot,
                        is_idle: true,
                        reason,
                        action,
                        priority,
                    }),
                    Recommendation::NotOptimizable { .. } => None,
                }
            })
            .collect();

        self.metrics.set_idle_containers(idle.len() as i64);
        Ok(idle)
    }

    async fn scan(&self, all: bool) -> RuntimeResult<Vec<ContainerSnapshot>> {
        let started = Instant::now();

        let listing = match self.runtime.list_containers(all).await {
            Ok(listing) => listing,
            Err(e) => {
                if let Some(health) = &self.health {
                    health.set_unhealthy(components::RUNTIME, e.to_string()).await;
                }
                return Err(e);
            }
        };

        let total = listing.len();
        let runtime = self.runtime.clone();
        let results: Vec<(String, RuntimeResult<ContainerSnapshot>)> = stream::iter(listing)
            .map(move |info| {
                let runtime = runtime.clone();
                async move {
                    let id = info.id.clone();
                    (id, snapshot(runtime.as_ref(), info).await)
                }
            })
            .buffered(self.stats_concurrency)
            .collect()
            .await;

        let mut snapshots = Vec::with_capacity(total);
        let mut skipped = 0usize;
        for (id, result) in results {
            match result {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => {
                    skipped += 1;
                    self.metrics.inc_stats_failures();
                    self.logger.log_container_skipped(&id, &e.to_string());
                }
            }
        }

        if let Some(health) = &self.health {
            if skipped == 0 {
                health.set_healthy(components::RUNTIME).await;
            } else {
                health
                    .set_degraded(
                        components::RUNTIME,
                        format!("stats unavailable for {} of {} containers", skipped, total),
                    )
                    .await;
            }
        }

        let elapsed = started.elapsed().as_secs_f64();
        self.metrics.observe_runtime_latency(elapsed);
        debug!(
            all = all,
            listed = total,
            skipped = skipped,
            elapsed_secs = elapsed,
            "Container scan complete"
        );

        Ok(snapshots)
    }
}

async fn snapshot(
    runtime: &dyn ContainerRuntime,
    info: ContainerInfo,
) -> RuntimeResult<ContainerSnapshot> {
    // Counters of a stopped container are meaningless; report it as-is.
    if !info.state.is_running() {
        return Ok(ContainerSnapshot::idle(info));
    }

    let counters = runtime.container_counters(&info.id).await?;
    let details = runtime.inspect_container(&info.id).await?;
    Ok(ContainerSnapshot::new(details, usage::sample(&counters)))
}
