//! Idle-container classification
//!
//! Running containers are placed into one of four usage bands, checked in
//! order from most to least idle. Only the first matching band applies.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::models::ContainerState;

/// Upper bounds (exclusive, percent) of the idle bands
const COMPLETELY_IDLE_THRESHOLD: f64 = 5.0;
const VERY_LOW_THRESHOLD: f64 = 10.0;
const LOW_THRESHOLD: f64 = 15.0;

/// Recommended action for a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    None,
    Monitor,
    Stop,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::None => "none",
            Action::Monitor => "monitor",
            Action::Stop => "stop",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of an optimization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one container.
///
/// A priority only exists on the `Optimizable` variant, and the action there
/// is never `Action::None`.
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    NotOptimizable {
        reason: String,
    },
    Optimizable {
        action: Action,
        priority: Priority,
        reason: String,
    },
}

impl Recommendation {
    pub fn should_optimize(&self) -> bool {
        matches!(self, Recommendation::Optimizable { .. })
    }

    pub fn action(&self) -> Action {
        match self {
            Recommendation::NotOptimizable { .. } => Action::None,
            Recommendation::Optimizable { action, .. } => *action,
        }
    }

    pub fn priority(&self) -> Option<Priority> {
        match self {
            Recommendation::NotOptimizable { .. } => None,
            Recommendation::Optimizable { priority, .. } => Some(*priority),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Recommendation::NotOptimizable { reason } => reason,
            Recommendation::Optimizable { reason, .. } => reason,
        }
    }
}

// Wire shape: {shouldOptimize, reason, action, priority?}
impl Serialize for Recommendation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = if self.should_optimize() { 4 } else { 3 };
        let mut state = serializer.serialize_struct("Recommendation", fields)?;
        state.serialize_field("shouldOptimize", &self.should_optimize())?;
        state.serialize_field("reason", self.reason())?;
        state.serialize_field("action", &self.action())?;
        if let Some(priority) = self.priority() {
            state.serialize_field("priority", &priority)?;
        }
        state.end()
    }
}

/// Classify a container by its usage and run state
pub fn classify(cpu_percent: f64, memory_percent: f64, status: &ContainerState) -> Recommendation {
    if !status.is_running() {
        return Recommendation::NotOptimizable {
            reason: "Container is not running".to_string(),
        };
    }

    let below = |threshold: f64| cpu_percent < threshold && memory_percent < threshold;

    if below(COMPLETELY_IDLE_THRESHOLD) {
        Recommendation::Optimizable {
            action: Action::Stop,
            priority: Priority::High,
            reason: format!(
                "Extremely low resource usage: CPU {}%, Memory {}% - Container appears completely idle",
                cpu_percent, memory_percent
            ),
        }
    } else if below(VERY_LOW_THRESHOLD) {
        Recommendation::Optimizable {
            action: Action::Stop,
            priority: Priority::Medium,
            reason: format!(
                "Very low resource usage: CPU {}%, Memory {}% - Consider stopping or consolidating",
                cpu_percent, memory_percent
            ),
        }
    } else if below(LOW_THRESHOLD) {
        Recommendation::Optimizable {
            action: Action::Monitor,
            priority: Priority::Low,
            reason: format!(
                "Low resource usage: CPU {}%, Memory {}% - Monitor for potential optimization",
                cpu_percent, memory_percent
            ),
        }
    } else {
        Recommendation::NotOptimizable {
            reason: format!(
                "Normal resource usage: CPU {}%, Memory {}%",
                cpu_percent, memory_percent
            ),
        }
    }
}
