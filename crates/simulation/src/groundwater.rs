//! Groundwater buffer: daily recharge and supplemental pumping.

/// Level after the day's recharge, capped at capacity.
pub fn recharge(level: f64, recharge_rate: f64, capacity: f64) -> f64 {
    (level.max(0.0) + recharge_rate.max(0.0)).min(capacity.max(0.0))
}

/// Groundwater offered to cover a surface shortfall.
///
/// Bounded by the pumping limit and what is left in the aquifer; nothing is
/// offered when surface water already covers demand.
pub fn pumping_offer(level: f64, max_pumping: f64, shortfall: f64) -> f64 {
    if shortfall <= 0.0 {
        return 0.0;
    }
    max_pumping.max(0.0).min(level.max(0.0)).min(shortfall)
}

/// Day-score penalty for groundwater use, relative to aquifer size.
pub fn groundwater_penalty(weight: f64, used: f64, capacity: f64) -> f64 {
    if weight <= 0.0 || capacity <= 0.0 {
        return 0.0;
    }
    weight * used.max(0.0) / capacity
}
