//! Container runtime access
//!
//! The dashboard never talks to the Docker daemon directly; everything goes
//! through the `ContainerRuntime` trait so handlers and tests can supply
//! their own implementation.

mod docker;

pub use docker::DockerRuntime;

use crate::models::{ContainerInfo, RawCounters};

pub use async_trait::async_trait;

/// Errors reported by a container runtime
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to connect to container runtime: {0}")]
    Connection(String),

    #[error("container not found: {0}")]
    NotFound(String),

    #[error("runtime request failed: {0}")]
    Request(String),

    #[error("runtime returned no stats for container {0}")]
    MissingStats(String),
}

pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

/// Operations the dashboard needs from a container runtime
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// List containers in runtime enumeration order; `all` includes stopped ones
    async fn list_containers(&self, all: bool) -> RuntimeResult<Vec<ContainerInfo>>;

    /// Inspect a single container
    async fn inspect_container(&self, id: &str) -> RuntimeResult<ContainerInfo>;

    /// Fetch a one-shot stats sample for a running container
    async fn container_counters(&self, id: &str) -> RuntimeResult<RawCounters>;

    async fn start_container(&self, id: &str) -> RuntimeResult<()>;

    async fn stop_container(&self, id: &str) -> RuntimeResult<()>;
}
