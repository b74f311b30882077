//! Farm agents competing for the shared reservoir.

use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_yield_a() -> f64 {
    1.0
}

fn default_resilience() -> f64 {
    0.5
}

/// One demand agent. Supplied by the caller and immutable for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FarmAgent {
    /// Unique identifier within a roster.
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub crop_type: String,
    /// Daily water demand before any drought adjustment.
    #[validate(range(min = 0.0))]
    pub base_demand: f64,
    /// Yield coefficient applied to the concave yield curve.
    #[serde(default = "default_yield_a")]
    #[validate(range(min = 0.0))]
    pub yield_a: f64,
    /// Drought demand-reduction sensitivity (0..=1).
    #[serde(default = "default_resilience")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub resilience: f64,
    #[serde(default)]
    pub province: Option<String>,
}

impl FarmAgent {
    pub fn new(id: impl Into<String>, crop_type: impl Into<String>, base_demand: f64) -> Self {
        Self {
            id: id.into(),
            crop_type: crop_type.into(),
            base_demand,
            yield_a: default_yield_a(),
            resilience: default_resilience(),
            province: None,
        }
    }

    pub fn with_yield(mut self, yield_a: f64) -> Self {
        self.yield_a = yield_a;
        self
    }

    pub fn with_resilience(mut self, resilience: f64) -> Self {
        self.resilience = resilience;
        self
    }

    pub fn in_province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    /// Demand for the day after drought adjustment:
    /// `base * (1 - resilience * reduction)` on drought days, `base` otherwise.
    pub fn effective_demand(&self, drought: bool, drought_demand_reduction: f64) -> f64 {
        if !drought || drought_demand_reduction <= 0.0 {
            return self.base_demand;
        }
        let reduction = (self.resilience * drought_demand_reduction).clamp(0.0, 1.0);
        self.base_demand * (1.0 - reduction)
    }
}
