//! Cost model for running containers
//!
//! Rates are in Indian Rupees per hour. The cost of a container is what
//! stopping it would save.

use serde::{Deserialize, Serialize};

use crate::usage::round2;

/// Currency all estimates are expressed in
pub const CURRENCY: &str = "INR";

/// CPU and memory below this (percent) incur the idle overhead
const IDLE_OVERHEAD_THRESHOLD: f64 = 10.0;

const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_MONTH: f64 = 30.0;

/// Hourly cost rates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostRates {
    /// Base cost per container per hour
    pub base_container_cost: f64,
    /// Cost per CPU percentage point per hour
    pub cpu_cost_per_percent: f64,
    /// Cost per memory percentage point per hour
    pub memory_cost_per_percent: f64,
    /// Extra hourly cost of keeping an idle container around
    pub idle_overhead: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            base_container_cost: 2.5,
            cpu_cost_per_percent: 0.05,
            memory_cost_per_percent: 0.03,
            idle_overhead: 1.2,
        }
    }
}

impl CostRates {
    /// Unrounded hourly rate for a running container
    pub fn hourly_rate(&self, cpu_percent: f64, memory_percent: f64) -> f64 {
        let idle_overhead = if cpu_percent < IDLE_OVERHEAD_THRESHOLD
            && memory_percent < IDLE_OVERHEAD_THRESHOLD
        {
            self.idle_overhead
        } else {
            0.0
        };

        self.base_container_cost
            + cpu_percent * self.cpu_cost_per_percent
            + memory_percent * self.memory_cost_per_percent
            + idle_overhead
    }

    /// Estimate the cost of keeping a container running
    pub fn estimate(&self, cpu_percent: f64, memory_percent: f64, is_running: bool) -> CostEstimate {
        if !is_running {
            return CostEstimate::zero();
        }

        let hourly = self.hourly_rate(cpu_percent, memory_percent);
        let daily = hourly * HOURS_PER_DAY;
        let monthly = daily * DAYS_PER_MONTH;

        // Each figure is rounded from its own unrounded value.
        CostEstimate {
            hourly: round2(hourly),
            daily: round2(daily),
            monthly: round2(monthly),
        }
    }
}

/// Hourly, daily and monthly cost, rounded to 2 decimals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub hourly: f64,
    pub daily: f64,
    pub monthly: f64,
}

impl CostEstimate {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Sum of the given estimates, re-rounded after summation
    pub fn total<'a>(estimates: impl IntoIterator<Item = &'a CostEstimate>) -> Self {
        let sum = estimates
            .into_iter()
            .fold(CostEstimate::zero(), |acc, e| CostEstimate {
                hourly: acc.hourly + e.hourly,
                daily: acc.daily + e.daily,
                monthly: acc.monthly + e.monthly,
            });

        CostEstimate {
            hourly: round2(sum.hourly),
            daily: round2(sum.daily),
            monthly: round2(sum.monthly),
        }
    }
}

/// Estimate with the default rates
pub fn estimate(cpu_percent: f64, memory_percent: f64, is_running: bool) -> CostEstimate {
    CostRates::default().estimate(cpu_percent, memory_percent, is_running)
}
