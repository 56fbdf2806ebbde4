//! Core library for the container dashboard
//!
//! This crate provides the core functionality for:
//! - Sampling CPU/memory usage from runtime counters
//! - Cost estimation and idle-container classification
//! - Container inventory and optimization suggestions
//! - Health checks and observability

pub mod cost;
pub mod health;
pub mod inventory;
pub mod models;
pub mod observability;
pub mod optimizer;
pub mod runtime;
pub mod usage;

pub use cost::{CostEstimate, CostRates};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use inventory::{InventoryService, SuggestionAggregator, SuggestionReport};
pub use models::*;
pub use observability::{DashboardMetrics, StructuredLogger};
pub use optimizer::{Action, Priority, Recommendation};
pub use runtime::{ContainerRuntime, DockerRuntime, RuntimeError};
