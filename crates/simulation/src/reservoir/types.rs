use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;

// =============================================================================
// Types
// =============================================================================

/// Warning tier from the closing reservoir level, relative to the
/// sustainability threshold volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservoirWarningTier {
    /// Above 2.5x the threshold volume.
    #[default]
    Normal,
    /// 1.5x to 2.5x the threshold volume.
    Watch,
    /// Threshold to 1.5x the threshold volume.
    Warning,
    /// At or below the threshold volume.
    Critical,
}

impl ReservoirWarningTier {
    pub fn name(self) -> &'static str {
        match self {
            ReservoirWarningTier::Normal => "Normal",
            ReservoirWarningTier::Watch => "Watch",
            ReservoirWarningTier::Warning => "Warning",
            ReservoirWarningTier::Critical => "Critical",
        }
    }
}

/// Determine the warning tier for `level` given the threshold volume.
///
/// With the default 20% threshold the bands are 50% / 30% / 20% of capacity.
/// A zero threshold never warns.
pub fn warning_tier_for_level(level: f64, threshold_volume: f64) -> ReservoirWarningTier {
    if threshold_volume <= 0.0 || level > threshold_volume * 2.5 {
        ReservoirWarningTier::Normal
    } else if level > threshold_volume * 1.5 {
        ReservoirWarningTier::Watch
    } else if level > threshold_volume {
        ReservoirWarningTier::Warning
    } else {
        ReservoirWarningTier::Critical
    }
}

/// Storage carried from one simulated day to the next.
///
/// Owned by exactly one run; never shared across concurrent runs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ReservoirState {
    /// Surface reservoir level.
    pub level: f64,
    /// Groundwater buffer level.
    pub groundwater: f64,
}

impl ReservoirState {
    /// Opening state for a run, clamped into capacity.
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            level: config.initial_reservoir.clamp(0.0, config.reservoir_capacity),
            groundwater: config
                .initial_groundwater
                .clamp(0.0, config.groundwater_capacity),
        }
    }

    /// Fill fraction (0.0 to 1.0). Returns 0.0 if no capacity.
    pub fn fill_pct(&self, capacity: f64) -> f64 {
        if capacity > 0.0 {
            self.level / capacity
        } else {
            0.0
        }
    }
}
