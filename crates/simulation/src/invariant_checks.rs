//! Numeric guards for intermediate quantities in the daily step.
//!
//! A negative, non-finite or out-of-bounds value is a programming-invariant
//! violation. It is logged, clamped to a safe value and counted; the run
//! continues so one bad day cannot abort a whole simulation.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Quantity being guarded, for counting and log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedQuantity {
    Demand,
    Supply,
    Allocation,
    Reservoir,
    Groundwater,
}

impl GuardedQuantity {
    pub fn name(self) -> &'static str {
        match self {
            GuardedQuantity::Demand => "demand",
            GuardedQuantity::Supply => "supply",
            GuardedQuantity::Allocation => "allocation",
            GuardedQuantity::Reservoir => "reservoir level",
            GuardedQuantity::Groundwater => "groundwater level",
        }
    }
}

/// Number of clamps applied during a run, per quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClampDiagnostics {
    pub demand: u32,
    pub supply: u32,
    pub allocation: u32,
    pub reservoir: u32,
    pub groundwater: u32,
}

impl ClampDiagnostics {
    pub fn total(&self) -> u32 {
        self.demand + self.supply + self.allocation + self.reservoir + self.groundwater
    }

    /// Add another run's counters into this one.
    pub fn merge(&mut self, other: &ClampDiagnostics) {
        self.demand += other.demand;
        self.supply += other.supply;
        self.allocation += other.allocation;
        self.reservoir += other.reservoir;
        self.groundwater += other.groundwater;
    }

    pub fn record(&mut self, quantity: GuardedQuantity, count: u32) {
        let slot = match quantity {
            GuardedQuantity::Demand => &mut self.demand,
            GuardedQuantity::Supply => &mut self.supply,
            GuardedQuantity::Allocation => &mut self.allocation,
            GuardedQuantity::Reservoir => &mut self.reservoir,
            GuardedQuantity::Groundwater => &mut self.groundwater,
        };
        *slot += count;
    }

    /// Clamp `value` to `>= 0`, mapping NaN/Inf to 0.
    pub fn non_negative(&mut self, quantity: GuardedQuantity, value: f64, day: u32) -> f64 {
        self.within(quantity, value, 0.0, f64::INFINITY, day)
    }

    /// Clamp `value` into `[min, max]`, mapping NaN to `min`.
    pub fn within(
        &mut self,
        quantity: GuardedQuantity,
        value: f64,
        min: f64,
        max: f64,
        day: u32,
    ) -> f64 {
        if value.is_nan() || value == f64::NEG_INFINITY || (value.is_infinite() && max.is_infinite()) {
            warn!(
                "Invariant violation on day {}: {} is {}. Resetting to {}.",
                day,
                quantity.name(),
                value,
                min
            );
            self.record(quantity, 1);
            return min;
        }
        if value < min || value > max {
            let clamped = value.clamp(min, max);
            // Floating-point dust is not worth a warning.
            if (value - clamped).abs() > 1e-9 {
                warn!(
                    "Invariant violation on day {}: {} {} out of [{}, {}]. Clamping.",
                    day,
                    quantity.name(),
                    value,
                    min,
                    max
                );
                self.record(quantity, 1);
            }
            return clamped;
        }
        value
    }
}
