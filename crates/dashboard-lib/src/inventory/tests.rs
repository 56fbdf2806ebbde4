//! Inventory and suggestion tests
//!
//! These run against an in-memory runtime so no Docker daemon is needed.

#[cfg(test)]
mod stub_runtime_tests {
    use crate::cost::{self, CostEstimate, CostRates};
    use crate::health::{components, ComponentStatus, HealthRegistry};
    use crate::inventory::{InventoryService, SuggestionAggregator, SuggestionReport};
    use crate::models::{ContainerInfo, ContainerSnapshot, ContainerState, RawCounters};
    use crate::optimizer::{Action, Priority};
    use crate::runtime::{async_trait, ContainerRuntime, RuntimeError, RuntimeResult};
    use crate::usage::round2;
    use chrono::{DateTime, Utc};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    struct StubContainer {
        info: ContainerInfo,
        counters: Option<RawCounters>,
        delay: Duration,
    }

    #[derive(Default)]
    struct StubRuntime {
        containers: Vec<StubContainer>,
        fail_listing: bool,
        stats_calls: Mutex<Vec<String>>,
    }

    impl StubRuntime {
        fn with(mut self, container: StubContainer) -> Self {
            self.containers.push(container);
            self
        }

        fn stats_calls(&self) -> Vec<String> {
            self.stats_calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContainerRuntime for StubRuntime {
        async fn list_containers(&self, all: bool) -> RuntimeResult<Vec<ContainerInfo>> {
            if self.fail_listing {
                return Err(RuntimeError::Connection("socket closed".to_string()));
            }
            Ok(self
                .containers
                .iter()
                .filter(|c| all || c.info.state.is_running())
                .map(|c| c.info.clone())
                .collect())
        }

        async fn inspect_container(&self, id: &str) -> RuntimeResult<ContainerInfo> {
            self.containers
                .iter()
                .find(|c| c.info.id == id)
                .map(|c| c.info.clone())
                .ok_or_else(|| RuntimeError::NotFound(id.to_string()))
        }

        async fn container_counters(&self, id: &str) -> RuntimeResult<RawCounters> {
            self.stats_calls.lock().unwrap().push(id.to_string());
            let container = self
                .containers
                .iter()
                .find(|c| c.info.id == id)
                .ok_or_else(|| RuntimeError::NotFound(id.to_string()))?;

            tokio::time::sleep(container.delay).await;
            container
                .counters
                .ok_or_else(|| RuntimeError::MissingStats(id.to_string()))
        }

        async fn start_container(&self, _id: &str) -> RuntimeResult<()> {
            Ok(())
        }

        async fn stop_container(&self, _id: &str) -> RuntimeResult<()> {
            Ok(())
        }
    }

    fn created() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    /// Counters that sample to exactly the given percentages
    fn counters_for(cpu: f64, memory: f64) -> RawCounters {
        RawCounters {
            cpu_total_usage: 1_000_000 + (cpu * 100.0).round() as u64,
            previous_cpu_total_usage: 1_000_000,
            system_cpu_usage: 20_000,
            previous_system_cpu_usage: 10_000,
            online_cpus: 1,
            memory_usage: (memory * 100.0).round() as u64,
            memory_limit: 10_000,
        }
    }

    fn running(id: &str, cpu: f64, memory: f64) -> StubContainer {
        StubContainer {
            info: ContainerInfo {
                id: id.to_string(),
                name: format!("{}-name", id),
                image: "app:latest".to_string(),
                state: ContainerState::Running,
                created: created(),
            },
            counters: Some(counters_for(cpu, memory)),
            delay: Duration::ZERO,
        }
    }

    fn stopped(id: &str) -> StubContainer {
        StubContainer {
            info: ContainerInfo {
                id: id.to_string(),
                name: format!("{}-name", id),
                image: "app:latest".to_string(),
                state: ContainerState::Exited,
                created: created(),
            },
            counters: None,
            delay: Duration::ZERO,
        }
    }

    fn broken(id: &str) -> StubContainer {
        StubContainer {
            counters: None,
            ..running(id, 0.0, 0.0)
        }
    }

    fn service(runtime: StubRuntime) -> (InventoryService, Arc<StubRuntime>) {
        let runtime = Arc::new(runtime);
        (InventoryService::new(runtime.clone()), runtime)
    }

    #[tokio::test]
    async fn test_list_containers_keeps_runtime_order() {
        let (inventory, runtime) = service(
            StubRuntime::default()
                .with(running("a", 20.0, 30.0))
                .with(stopped("b"))
                .with(running("c", 3.0, 4.0)),
        );

        let snapshots = assert_ok!(inventory.list_containers().await);
        let ids: Vec<&str> = snapshots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        assert_eq!(snapshots[0].cpu, 20.0);
        assert_eq!(snapshots[0].memory, 30.0);
        assert_eq!(snapshots[2].cpu, 3.0);

        // Stopped containers are reported from the listing without a stats call
        assert_eq!(snapshots[1].status, ContainerState::Exited);
        assert_eq!(snapshots[1].cpu, 0.0);
        assert_eq!(snapshots[1].memory, 0.0);
        assert!(!runtime.stats_calls().contains(&"b".to_string()));
    }

    #[tokio::test]
    async fn test_order_preserved_with_concurrent_sampling() {
        let mut slow = running("slow", 50.0, 50.0);
        slow.delay = Duration::from_millis(50);

        let (inventory, _runtime) = service(
            StubRuntime::default()
                .with(slow)
                .with(running("fast-1", 1.0, 1.0))
                .with(running("fast-2", 2.0, 2.0)),
        );
        let inventory = inventory.with_stats_concurrency(3);

        let ids: Vec<String> = inventory
            .list_containers()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["slow", "fast-1", "fast-2"]);
    }

    #[tokio::test]
    async fn test_stats_failure_skips_only_that_container() {
        let health = HealthRegistry::new();
        let (inventory, _runtime) = service(
            StubRuntime::default()
                .with(running("ok-1", 20.0, 20.0))
                .with(broken("bad"))
                .with(running("ok-2", 40.0, 40.0)),
        );
        let inventory = inventory.with_health(health.clone());

        let snapshots = inventory.list_containers().await.unwrap();
        let ids: Vec<&str> = snapshots.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["ok-1", "ok-2"]);

        let status = health.health().await;
        assert_eq!(
            status.components[components::RUNTIME].status,
            ComponentStatus::Degraded
        );
    }

    #[tokio::test]
    async fn test_listing_failure_is_an_error() {
        let health = HealthRegistry::new();
        let (inventory, _runtime) = service(StubRuntime {
            fail_listing: true,
            ..Default::default()
        });
        let inventory = inventory.with_health(health.clone());

        let err = assert_err!(inventory.list_containers().await);
        assert!(matches!(err, RuntimeError::Connection(_)));
        assert_eq!(health.health().await.status, ComponentStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_successful_scan_marks_runtime_healthy() {
        let health = HealthRegistry::new();
        health.set_unhealthy(components::RUNTIME, "earlier failure").await;

        let (inventory, _runtime) = service(StubRuntime::default().with(running("a", 1.0, 1.0)));
        let inventory = inventory.with_health(health.clone());

        inventory.list_containers().await.unwrap();
        assert_eq!(health.health().await.status, ComponentStatus::Healthy);
    }

    #[tokio::test]
    async fn test_idle_containers_only_flagged_running_ones() {
        let (inventory, _runtime) = service(
            StubRuntime::default()
                .with(running("idle", 3.0, 3.0))
                .with(running("busy", 60.0, 70.0))
                .with(stopped("off"))
                .with(running("watch", 12.0, 12.0)),
        );

        let idle = inventory.idle_containers().await.unwrap();
        assert_eq!(idle.len(), 2);

        assert_eq!(idle[0].snapshot.id, "idle");
        assert!(idle[0].is_idle);
        assert_eq!(idle[0].action, Action::Stop);
        assert_eq!(idle[0].priority, Priority::High);

        assert_eq!(idle[1].snapshot.id, "watch");
        assert_eq!(idle[1].action, Action::Monitor);
        assert_eq!(idle[1].priority, Priority::Low);

        let json = serde_json::to_value(&idle[0]).unwrap();
        assert_eq!(json["id"], "idle");
        assert_eq!(json["isIdle"], true);
        assert_eq!(json["priority"], "high");
        assert!(json["reason"].as_str().unwrap().contains("completely idle"));
    }

    #[tokio::test]
    async fn test_suggestions_only_for_stop_actions() {
        let (inventory, _runtime) = service(
            StubRuntime::default()
                .with(running("idle", 0.0, 0.0))
                .with(running("low", 8.0, 8.0))
                .with(running("watch", 12.0, 12.0))
                .with(running("busy", 50.0, 50.0))
                .with(stopped("off")),
        );

        let report = SuggestionAggregator::new(inventory)
            .suggestions()
            .await
            .unwrap();

        let ids: Vec<&str> = report
            .suggestions
            .iter()
            .map(|s| s.container_id.as_str())
            .collect();
        assert_eq!(ids, vec!["idle", "low"]);
        assert_eq!(report.currency, "INR");

        let idle = &report.suggestions[0];
        assert_eq!(idle.priority, Priority::High);
        assert_eq!(idle.container_name, "idle-name");
        assert_eq!(
            idle.estimated_savings,
            CostEstimate {
                hourly: 3.7,
                daily: 88.8,
                monthly: 2664.0
            }
        );

        let low = &report.suggestions[1];
        assert_eq!(low.priority, Priority::Medium);
        assert_eq!(low.estimated_savings, cost::estimate(8.0, 8.0, true));
        assert_eq!(low.current_usage.cpu, 8.0);
    }

    #[tokio::test]
    async fn test_totals_equal_sum_of_suggestions() {
        let (inventory, _runtime) = service(
            StubRuntime::default()
                .with(running("a", 1.23, 4.56))
                .with(running("b", 7.77, 2.22))
                .with(running("c", 0.01, 9.99)),
        );

        let report = SuggestionAggregator::new(inventory)
            .suggestions()
            .await
            .unwrap();
        assert_eq!(report.suggestions.len(), 3);

        let monthly: f64 = report
            .suggestions
            .iter()
            .map(|s| s.estimated_savings.monthly)
            .sum();
        let hourly: f64 = report
            .suggestions
            .iter()
            .map(|s| s.estimated_savings.hourly)
            .sum();
        assert_eq!(report.total_estimated_savings.monthly, round2(monthly));
        assert_eq!(report.total_estimated_savings.hourly, round2(hourly));
    }

    #[tokio::test]
    async fn test_suggestions_fail_when_runtime_unreachable() {
        let (inventory, _runtime) = service(StubRuntime {
            fail_listing: true,
            ..Default::default()
        });

        assert_err!(SuggestionAggregator::new(inventory).suggestions().await);
    }

    #[test]
    fn test_report_ignores_non_running_snapshots() {
        let snapshot = ContainerSnapshot {
            id: "gone".to_string(),
            name: "gone".to_string(),
            status: ContainerState::Exited,
            cpu: 0.0,
            memory: 0.0,
            created: created(),
            image: "app".to_string(),
        };

        let report = SuggestionReport::from_snapshots(&[snapshot], &CostRates::default(), created());
        assert!(report.suggestions.is_empty());
        assert_eq!(report.total_estimated_savings, CostEstimate::zero());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["lastUpdated"], "2023-11-14T22:13:20.000Z");
        assert_eq!(json["totalEstimatedSavings"]["monthly"], 0.0);
    }
}
