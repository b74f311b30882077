use crate::config::SimulationConfig;

/// Surface water position for one day before allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSupply {
    /// Reservoir contents after rainfall, capped at capacity.
    pub stored: f64,
    /// Rainfall that did not fit in the reservoir.
    pub spill: f64,
    /// Most that may be released today: `min(max_daily_allocation, stored)`.
    pub release_cap: f64,
    /// Water that can reach farms after conveyance loss.
    pub deliverable: f64,
}

impl SurfaceSupply {
    pub fn compute(level_before: f64, rainfall: f64, config: &SimulationConfig) -> Self {
        let capacity = config.reservoir_capacity.max(0.0);
        let inflow_total = level_before.max(0.0) + rainfall.max(0.0);
        let stored = inflow_total.min(capacity);
        let release_cap = config.max_daily_allocation.max(0.0).min(stored);
        let deliverable = release_cap * (1.0 - config.conveyance_loss_rate.clamp(0.0, 1.0));
        Self {
            stored,
            spill: inflow_total - stored,
            release_cap,
            deliverable,
        }
    }
}

/// Volume that must leave the reservoir for `delivered` to arrive.
pub fn release_for_delivery(delivered: f64, conveyance_loss_rate: f64) -> f64 {
    let keep = 1.0 - conveyance_loss_rate.clamp(0.0, 1.0);
    if delivered <= 0.0 || keep <= 0.0 {
        return 0.0;
    }
    delivered / keep
}

/// Risk in `[0, 1]`: 0 at or above the threshold volume, rising linearly to
/// 1 at an empty reservoir. A zero threshold carries no risk.
pub fn depletion_risk(level: f64, threshold_volume: f64) -> f64 {
    if threshold_volume <= 0.0 || level >= threshold_volume {
        return 0.0;
    }
    ((threshold_volume - level.max(0.0)) / threshold_volume).clamp(0.0, 1.0)
}
