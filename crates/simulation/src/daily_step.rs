//! One simulated day: supply, allocation, yield, fairness, risk and score.
//!
//! Pure given its inputs. The only state carried between days is the
//! [`ReservoirState`] and the [`FairnessLedger`], both owned by the caller.

use serde::{Deserialize, Serialize};

use crate::allocation::{enforce_supply_bound, AllocationRule, FairnessLedger};
use crate::climate::ClimateDay;
use crate::config::SimulationConfig;
use crate::crop_yield::farm_yield;
use crate::fairness::allocation_gini;
use crate::farms::FarmAgent;
use crate::groundwater::{groundwater_penalty, pumping_offer, recharge};
use crate::invariant_checks::{ClampDiagnostics, GuardedQuantity};
use crate::reservoir::{
    depletion_risk, release_for_delivery, warning_tier_for_level, ReservoirState,
    ReservoirWarningTier, SurfaceSupply,
};

/// Outcome of one simulated day. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// 1-based day index.
    pub day: u32,
    pub rainfall: f64,
    pub drought: bool,
    pub reservoir_start: f64,
    pub reservoir_end: f64,
    pub groundwater_end: f64,
    pub total_demand: f64,
    pub total_allocated: f64,
    pub total_yield: f64,
    pub conveyance_loss: f64,
    pub groundwater_used: f64,
    pub gini: f64,
    pub depletion_risk: f64,
    pub score: f64,
    pub warning_tier: ReservoirWarningTier,
}

/// Per-farm result of one day, folded into the run's farm totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FarmDayAllocation {
    pub demand: f64,
    pub allocation: f64,
    pub yield_amount: f64,
}

impl FarmDayAllocation {
    pub fn unmet_demand(&self) -> f64 {
        (self.demand - self.allocation).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayOutcome {
    pub record: DayRecord,
    /// In roster order.
    pub farms: Vec<FarmDayAllocation>,
}

/// Applies one day of weather to the shared water system.
#[derive(Debug, Clone)]
pub struct DailyStepEngine {
    farms: Vec<FarmAgent>,
    config: SimulationConfig,
    rule: AllocationRule,
}

impl DailyStepEngine {
    pub fn new(farms: Vec<FarmAgent>, config: SimulationConfig, rule: AllocationRule) -> Self {
        Self {
            farms,
            config,
            rule,
        }
    }

    pub fn farms(&self) -> &[FarmAgent] {
        &self.farms
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn rule(&self) -> &AllocationRule {
        &self.rule
    }

    /// Advance `state` and `ledger` by one day.
    pub fn step(
        &self,
        day: u32,
        weather: ClimateDay,
        state: &mut ReservoirState,
        ledger: &mut FairnessLedger,
        diagnostics: &mut ClampDiagnostics,
    ) -> DayOutcome {
        let config = &self.config;
        let reservoir_start = state.level;

        // Recharge lands before any pumping.
        let groundwater = recharge(
            state.groundwater,
            config.groundwater_recharge,
            config.groundwater_capacity,
        );

        let supply = SurfaceSupply::compute(state.level, weather.rainfall, config);

        let demands: Vec<f64> = self
            .farms
            .iter()
            .map(|farm| {
                let demand =
                    farm.effective_demand(weather.drought, config.drought_demand_reduction);
                diagnostics.non_negative(GuardedQuantity::Demand, demand, day)
            })
            .collect();
        let total_demand: f64 = demands.iter().sum();

        let groundwater_offer = pumping_offer(
            groundwater,
            config.max_groundwater_pumping,
            total_demand - supply.deliverable,
        );
        let available = diagnostics.non_negative(
            GuardedQuantity::Supply,
            supply.deliverable + groundwater_offer,
            day,
        );

        let mut allocations = self.rule.allocate(&demands, available, ledger);
        let corrections = enforce_supply_bound(&mut allocations, &demands, available);
        if corrections > 0 {
            bevy::log::warn!(
                "Invariant violation on day {}: {} allocation(s) outside [0, demand] or above supply {}. Corrected.",
                day,
                corrections,
                available
            );
            diagnostics.record(GuardedQuantity::Allocation, corrections);
        }
        let total_allocated: f64 = allocations.iter().sum();

        // Surface water is drawn first; groundwater covers the remainder.
        let surface_used = total_allocated.min(supply.deliverable);
        let groundwater_used = (total_allocated - surface_used).clamp(0.0, groundwater_offer);
        let release = release_for_delivery(surface_used, config.conveyance_loss_rate)
            .min(supply.release_cap);
        let conveyance_loss = (release - surface_used).max(0.0);

        let reservoir_end = diagnostics.within(
            GuardedQuantity::Reservoir,
            supply.stored - release,
            0.0,
            config.reservoir_capacity,
            day,
        );
        let groundwater_end = diagnostics.within(
            GuardedQuantity::Groundwater,
            groundwater - groundwater_used,
            0.0,
            config.groundwater_capacity,
            day,
        );

        let farms: Vec<FarmDayAllocation> = self
            .farms
            .iter()
            .zip(demands.iter().zip(&allocations))
            .map(|(farm, (&demand, &allocation))| FarmDayAllocation {
                demand,
                allocation,
                yield_amount: farm_yield(farm.yield_a, allocation, demand),
            })
            .collect();
        let total_yield: f64 = farms.iter().map(|f| f.yield_amount).sum();

        let gini = allocation_gini(&allocations, &demands);
        let threshold_volume = config.threshold_volume();
        let risk = depletion_risk(reservoir_end, threshold_volume);
        let score = config.alpha * total_yield
            - config.beta * risk
            - config.fairness_weight * gini
            - groundwater_penalty(
                config.groundwater_penalty_weight,
                groundwater_used,
                config.groundwater_capacity,
            );

        ledger.record(&demands, &allocations);
        state.level = reservoir_end;
        state.groundwater = groundwater_end;

        bevy::log::trace!(
            "day {}: rain {:.2} drought {} allocated {:.2}/{:.2} reservoir {:.2} -> {:.2}",
            day,
            weather.rainfall,
            weather.drought,
            total_allocated,
            total_demand,
            reservoir_start,
            reservoir_end
        );

        DayOutcome {
            record: DayRecord {
                day,
                rainfall: weather.rainfall,
                drought: weather.drought,
                reservoir_start,
                reservoir_end,
                groundwater_end,
                total_demand,
                total_allocated,
                total_yield,
                conveyance_loss,
                groundwater_used,
                gini,
                depletion_risk: risk,
                score,
                warning_tier: warning_tier_for_level(reservoir_end, threshold_volume),
            },
            farms,
        }
    }
}
