//! Docker Engine implementation of `ContainerRuntime`

use super::{async_trait, ContainerRuntime, RuntimeError, RuntimeResult};
use crate::models::{ContainerInfo, ContainerState, RawCounters};
use bollard::container::{
    InspectContainerOptions, ListContainersOptions, StartContainerOptions, Stats, StatsOptions,
    StopContainerOptions,
};
use bollard::models::{ContainerInspectResponse, ContainerSummary};
use bollard::Docker;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use tracing::{debug, info};

/// Container runtime backed by the local Docker daemon
#[derive(Clone)]
pub struct DockerRuntime {
    docker: Docker,
}

impl DockerRuntime {
    /// Connect using the platform defaults (honours `DOCKER_HOST`)
    pub fn connect() -> RuntimeResult<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| RuntimeError::Connection(e.to_string()))?;
        info!("Connected to Docker daemon");
        Ok(Self { docker })
    }

    pub fn from_client(docker: Docker) -> Self {
        Self { docker }
    }

    /// Check that the daemon answers
    pub async fn ping(&self) -> RuntimeResult<()> {
        self.docker.ping().await.map_err(map_error)?;
        Ok(())
    }
}

fn map_error(err: bollard::errors::Error) -> RuntimeError {
    match err {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            message,
        } => RuntimeError::NotFound(message),
        other => RuntimeError::Request(other.to_string()),
    }
}

fn strip_name(name: &str) -> String {
    name.strip_prefix('/').unwrap_or(name).to_string()
}

fn summary_to_info(summary: ContainerSummary) -> ContainerInfo {
    let name = summary
        .names
        .as_ref()
        .and_then(|names| names.first())
        .map(|n| strip_name(n))
        .unwrap_or_default();

    ContainerInfo {
        id: summary.id.unwrap_or_default(),
        name,
        image: summary.image.unwrap_or_default(),
        state: ContainerState::from(summary.state.as_deref().unwrap_or_default()),
        created: summary
            .created
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_default(),
    }
}

fn inspect_to_info(id: &str, inspect: ContainerInspectResponse) -> ContainerInfo {
    let state = inspect
        .state
        .as_ref()
        .and_then(|s| s.status.as_ref())
        .map(|status| ContainerState::from(status.to_string()))
        .unwrap_or_else(|| ContainerState::Other(String::new()));

    let created = inspect
        .created
        .as_deref()
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default();

    ContainerInfo {
        id: inspect.id.unwrap_or_else(|| id.to_string()),
        name: inspect.name.as_deref().map(strip_name).unwrap_or_default(),
        image: inspect
            .config
            .and_then(|c| c.image)
            .unwrap_or_default(),
        state,
        created,
    }
}

fn stats_to_counters(stats: &Stats) -> RawCounters {
    let online_cpus = stats
        .cpu_stats
        .online_cpus
        .or_else(|| {
            stats
                .cpu_stats
                .cpu_usage
                .percpu_usage
                .as_ref()
                .map(|per_cpu| per_cpu.len() as u64)
        })
        .unwrap_or(1);

    RawCounters {
        cpu_total_usage: stats.cpu_stats.cpu_usage.total_usage,
        previous_cpu_total_usage: stats.precpu_stats.cpu_usage.total_usage,
        system_cpu_usage: stats.cpu_stats.system_cpu_usage.unwrap_or(0),
        previous_system_cpu_usage: stats.precpu_stats.system_cpu_usage.unwrap_or(0),
        online_cpus,
        memory_usage: stats.memory_stats.usage.unwrap_or(0),
        memory_limit: stats.memory_stats.limit.unwrap_or(0),
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list_containers(&self, all: bool) -> RuntimeResult<Vec<ContainerInfo>> {
        let options = Some(ListContainersOptions::<String> {
            all,
            ..Default::default()
        });

        let containers = self
            .docker
            .list_containers(options)
            .await
            .map_err(map_error)?;

        debug!(count = containers.len(), all = all, "Listed containers");
        Ok(containers.into_iter().map(summary_to_info).collect())
    }

    async fn inspect_container(&self, id: &str) -> RuntimeResult<ContainerInfo> {
        let inspect = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .map_err(map_error)?;

        Ok(inspect_to_info(id, inspect))
    }

    async fn container_counters(&self, id: &str) -> RuntimeResult<RawCounters> {
        // one_shot=false lets the daemon take two samples so precpu_stats is populated
        let mut stream = self.docker.stats(
            id,
            Some(StatsOptions {
                stream: false,
                one_shot: false,
            }),
        );

        match stream.next().await {
            Some(Ok(stats)) => Ok(stats_to_counters(&stats)),
            Some(Err(e)) => Err(map_error(e)),
            None => Err(RuntimeError::MissingStats(id.to_string())),
        }
    }

    async fn start_container(&self, id: &str) -> RuntimeResult<()> {
        self.docker
            .start_container(id, None::<StartContainerOptions<String>>)
            .await
            .map_err(map_error)
    }

    async fn stop_container(&self, id: &str) -> RuntimeResult<()> {
        self.docker
            .stop_container(id, None::<StopContainerOptions>)
            .await
            .map_err(map_error)
    }
}
