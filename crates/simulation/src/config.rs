//! Simulation configuration and engine tuning.
//!
//! Defaults mirror the reference irrigation model. Field ranges are declared
//! with `validator`; cross-field checks live in [`crate::validation`].

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

// =============================================================================
// Defaults
// =============================================================================

fn default_days() -> u32 {
    30
}
fn default_rainfall_prob() -> f64 {
    0.3
}
fn default_rainfall_mean() -> f64 {
    20.0
}
fn default_rainfall_std() -> f64 {
    5.0
}
fn default_drought_prob() -> f64 {
    0.1
}
fn default_drought_multiplier() -> f64 {
    0.5
}
fn default_drought_demand_reduction() -> f64 {
    0.25
}
fn default_sustainability_threshold() -> f64 {
    0.2
}
fn default_one() -> f64 {
    1.0
}
fn default_fairness_weight() -> f64 {
    0.5
}

/// Environment variable read by the binary to override the run pool size.
pub const MAX_CONCURRENT_RUNS_ENV: &str = "AQUANEXUS_MAX_CONCURRENT_RUNS";

// =============================================================================
// Types
// =============================================================================

/// How `province_quotas` values are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotaMode {
    /// Fraction of the day's available supply.
    #[default]
    Share,
    /// Fixed volume, scaled down when the day's supply cannot cover all quotas.
    Absolute,
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SimulationConfig {
    #[serde(default = "default_days")]
    #[validate(range(min = 1, max = 365))]
    pub days: u32,

    #[validate(range(min = 0.0))]
    pub reservoir_capacity: f64,
    #[validate(range(min = 0.0))]
    pub initial_reservoir: f64,
    /// Maximum release from the reservoir per day (before conveyance loss).
    #[validate(range(min = 0.0))]
    pub max_daily_allocation: f64,

    #[serde(default = "default_rainfall_prob")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub rainfall_prob: f64,
    #[serde(default = "default_rainfall_mean")]
    #[validate(range(min = 0.0))]
    pub rainfall_mean: f64,
    #[serde(default = "default_rainfall_std")]
    #[validate(range(min = 0.0))]
    pub rainfall_std: f64,

    #[serde(default = "default_drought_prob")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub drought_prob: f64,
    /// Rainfall multiplier on drought days.
    #[serde(default = "default_drought_multiplier")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub drought_multiplier: f64,
    #[serde(default = "default_drought_demand_reduction")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub drought_demand_reduction: f64,

    #[serde(default)]
    #[validate(range(min = 0.0, max = 0.95))]
    pub conveyance_loss_rate: f64,

    /// Fraction of reservoir capacity below which depletion risk rises.
    #[serde(default = "default_sustainability_threshold")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub sustainability_threshold: f64,
    /// Weight of total yield in the day score.
    #[serde(default = "default_one")]
    #[validate(range(min = 0.0))]
    pub alpha: f64,
    /// Weight of depletion risk in the day score.
    #[serde(default = "default_one")]
    #[validate(range(min = 0.0))]
    pub beta: f64,
    /// Weight of the Gini penalty in the day score and equity blend of `fair`.
    #[serde(default = "default_fairness_weight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub fairness_weight: f64,

    #[serde(default)]
    pub province_quotas: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    pub quota_mode: QuotaMode,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub groundwater_capacity: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub initial_groundwater: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub max_groundwater_pumping: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub groundwater_recharge: f64,
    /// Day-score penalty per unit of groundwater drawn, relative to capacity.
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub groundwater_penalty_weight: f64,

    /// Observed inflow per day; replaces stochastic rainfall when present.
    #[serde(default)]
    pub external_inflow_series: Option<Vec<f64>>,
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// A config with the required volumes set and every other field defaulted.
    pub fn new(reservoir_capacity: f64, initial_reservoir: f64, max_daily_allocation: f64) -> Self {
        Self {
            days: default_days(),
            reservoir_capacity,
            initial_reservoir,
            max_daily_allocation,
            rainfall_prob: default_rainfall_prob(),
            rainfall_mean: default_rainfall_mean(),
            rainfall_std: default_rainfall_std(),
            drought_prob: default_drought_prob(),
            drought_multiplier: default_drought_multiplier(),
            drought_demand_reduction: default_drought_demand_reduction(),
            conveyance_loss_rate: 0.0,
            sustainability_threshold: default_sustainability_threshold(),
            alpha: default_one(),
            beta: default_one(),
            fairness_weight: default_fairness_weight(),
            province_quotas: None,
            quota_mode: QuotaMode::Share,
            groundwater_capacity: 0.0,
            initial_groundwater: 0.0,
            max_groundwater_pumping: 0.0,
            groundwater_recharge: 0.0,
            groundwater_penalty_weight: 0.0,
            external_inflow_series: None,
            seed: None,
        }
    }

    /// Reservoir volume below which depletion risk is non-zero.
    pub fn threshold_volume(&self) -> f64 {
        self.sustainability_threshold * self.reservoir_capacity
    }

    /// The external series, treating an empty list as absent.
    pub fn external_inflow(&self) -> Option<&[f64]> {
        self.external_inflow_series
            .as_deref()
            .filter(|series| !series.is_empty())
    }

    /// Every float field with its name, for finiteness checks.
    pub(crate) fn float_fields(&self) -> [(&'static str, f64); 20] {
        [
            ("reservoir_capacity", self.reservoir_capacity),
            ("initial_reservoir", self.initial_reservoir),
            ("max_daily_allocation", self.max_daily_allocation),
            ("rainfall_prob", self.rainfall_prob),
            ("rainfall_mean", self.rainfall_mean),
            ("rainfall_std", self.rainfall_std),
            ("drought_prob", self.drought_prob),
            ("drought_multiplier", self.drought_multiplier),
            ("drought_demand_reduction", self.drought_demand_reduction),
            ("conveyance_loss_rate", self.conveyance_loss_rate),
            ("sustainability_threshold", self.sustainability_threshold),
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("fairness_weight", self.fairness_weight),
            ("groundwater_capacity", self.groundwater_capacity),
            ("initial_groundwater", self.initial_groundwater),
            ("max_groundwater_pumping", self.max_groundwater_pumping),
            ("groundwater_recharge", self.groundwater_recharge),
            ("groundwater_penalty_weight", self.groundwater_penalty_weight),
            ("days", f64::from(self.days)),
        ]
    }
}

/// Engine tuning that is not part of a request.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Upper bound on independent runs executing at once.
    pub max_concurrent_runs: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_concurrent_runs: bevy::tasks::available_parallelism().max(1),
        }
    }
}

impl EngineSettings {
    /// Defaults, overridden by `AQUANEXUS_MAX_CONCURRENT_RUNS` when it parses
    /// to a positive integer.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(raw) = std::env::var(MAX_CONCURRENT_RUNS_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => settings.max_concurrent_runs = n,
                _ => warn!(
                    "{}={:?} is not a positive integer; using {}",
                    MAX_CONCURRENT_RUNS_ENV, raw, settings.max_concurrent_runs
                ),
            }
        }
        settings
    }
}
