//! Sequential multi-day run and its summary.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::allocation::{AllocationPolicy, AllocationRule, FairnessLedger};
use crate::cancel::CancelToken;
use crate::climate::{ClimateSeries, WeatherSource};
use crate::config::SimulationConfig;
use crate::daily_step::{DailyStepEngine, DayOutcome, DayRecord};
use crate::error::{SimError, SimResult, ValidationError};
use crate::farms::FarmAgent;
use crate::invariant_checks::ClampDiagnostics;
use crate::reservoir::{ReservoirState, ReservoirWarningTier};
use crate::validation::validate_inputs;

// =============================================================================
// Output types
// =============================================================================

/// Aggregate outcome of one run, derived from its day trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub policy: AllocationPolicy,
    pub days: u32,
    pub weather: WeatherSource,
    pub weather_fingerprint: u32,
    pub total_yield: f64,
    pub avg_gini: f64,
    pub avg_depletion_risk: f64,
    pub final_reservoir: f64,
    pub final_groundwater: f64,
    pub min_reservoir: f64,
    /// `1 - avg_depletion_risk`, in `[0, 1]`; higher is safer.
    pub sustainability_score: f64,
    pub total_conveyance_loss: f64,
    pub total_groundwater_used: f64,
    pub average_score: f64,
    /// Days that closed in the critical warning tier.
    pub critical_days: u32,
}

impl RunSummary {
    /// Seed of a stochastic run; `None` for external weather.
    pub fn seed(&self) -> Option<u64> {
        match self.weather {
            WeatherSource::Stochastic { seed } => Some(seed),
            WeatherSource::External => None,
        }
    }
}

/// Per-farm totals over a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmSummary {
    pub id: String,
    pub crop_type: String,
    pub province: Option<String>,
    pub total_allocation: f64,
    pub avg_allocation: f64,
    pub total_yield: f64,
    pub avg_yield: f64,
    pub unmet_demand_total: f64,
}

/// Everything one run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub summary: RunSummary,
    pub daily: Vec<DayRecord>,
    pub farms: Vec<FarmSummary>,
    pub diagnostics: ClampDiagnostics,
}

#[derive(Debug, Clone, Copy, Default)]
struct FarmTotals {
    allocation: f64,
    yield_amount: f64,
    unmet: f64,
}

// =============================================================================
// Runner
// =============================================================================

/// Runs one policy over one weather series, day by day.
///
/// Days are strictly sequential: each opens with the previous day's closing
/// reservoir and groundwater levels.
#[derive(Debug, Clone)]
pub struct SimulationRunner {
    policy: AllocationPolicy,
    engine: DailyStepEngine,
}

impl SimulationRunner {
    /// Validate the inputs and resolve the policy against them.
    pub fn new(
        farms: Vec<FarmAgent>,
        config: SimulationConfig,
        policy: AllocationPolicy,
    ) -> Result<Self, ValidationError> {
        validate_inputs(&farms, &config)?;
        let rule = AllocationRule::prepare(policy, &farms, &config)?;
        Ok(Self {
            policy,
            engine: DailyStepEngine::new(farms, config, rule),
        })
    }

    pub fn policy(&self) -> AllocationPolicy {
        self.policy
    }

    pub fn config(&self) -> &SimulationConfig {
        self.engine.config()
    }

    pub fn farms(&self) -> &[FarmAgent] {
        self.engine.farms()
    }

    /// Simulate every day of `weather`.
    ///
    /// Returns `SimError::Cancelled` if `cancel` is raised before a day starts.
    pub fn run(&self, weather: &ClimateSeries, cancel: &CancelToken) -> SimResult<SimulationResult> {
        let farms = self.engine.farms();
        let mut state = ReservoirState::from_config(self.engine.config());
        let mut ledger = FairnessLedger::new(farms.len());
        let mut diagnostics = ClampDiagnostics::default();
        let mut totals = vec![FarmTotals::default(); farms.len()];
        let mut daily = Vec::with_capacity(weather.len());

        debug!(
            "run start: policy {} weather {:?} days {}",
            self.policy,
            weather.source,
            weather.len()
        );

        for (index, climate) in weather.days.iter().enumerate() {
            let day = index as u32 + 1;
            if cancel.is_cancelled() {
                info!("run cancelled before day {} (policy {})", day, self.policy);
                return Err(SimError::Cancelled { day });
            }
            let DayOutcome { record, farms: farm_days } =
                self.engine
                    .step(day, *climate, &mut state, &mut ledger, &mut diagnostics);
            for (total, farm_day) in totals.iter_mut().zip(&farm_days) {
                total.allocation += farm_day.allocation;
                total.yield_amount += farm_day.yield_amount;
                total.unmet += farm_day.unmet_demand();
            }
            daily.push(record);
        }

        let summary = summarize(self.policy, weather, &daily, &state);
        let farms = farm_summaries(farms, &totals, daily.len());

        if diagnostics.total() > 0 {
            warn!(
                "run with policy {} applied {} numeric clamp(s): {:?}",
                self.policy,
                diagnostics.total(),
                diagnostics
            );
        }
        debug!(
            "run finish: policy {} total yield {:.3} sustainability {:.3}",
            self.policy, summary.total_yield, summary.sustainability_score
        );

        Ok(SimulationResult {
            summary,
            daily,
            farms,
            diagnostics,
        })
    }
}

// =============================================================================
// Aggregation
// =============================================================================

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        values.sum::<f64>() / count as f64
    }
}

fn summarize(
    policy: AllocationPolicy,
    weather: &ClimateSeries,
    daily: &[DayRecord],
    closing: &ReservoirState,
) -> RunSummary {
    let n = daily.len();
    let avg_depletion_risk = mean(daily.iter().map(|d| d.depletion_risk), n);
    let min_reservoir = daily
        .iter()
        .map(|d| d.reservoir_end)
        .fold(closing.level, f64::min);

    RunSummary {
        policy,
        days: n as u32,
        weather: weather.source,
        weather_fingerprint: weather.fingerprint,
        total_yield: daily.iter().map(|d| d.total_yield).sum(),
        avg_gini: mean(daily.iter().map(|d| d.gini), n),
        avg_depletion_risk,
        final_reservoir: closing.level,
        final_groundwater: closing.groundwater,
        min_reservoir,
        sustainability_score: (1.0 - avg_depletion_risk).clamp(0.0, 1.0),
        total_conveyance_loss: daily.iter().map(|d| d.conveyance_loss).sum(),
        total_groundwater_used: daily.iter().map(|d| d.groundwater_used).sum(),
        average_score: mean(daily.iter().map(|d| d.score), n),
        critical_days: daily
            .iter()
            .filter(|d| d.warning_tier == ReservoirWarningTier::Critical)
            .count() as u32,
    }
}

fn farm_summaries(farms: &[FarmAgent], totals: &[FarmTotals], days: usize) -> Vec<FarmSummary> {
    let per_day = |total: f64| if days == 0 { 0.0 } else { total / days as f64 };
    farms
        .iter()
        .zip(totals)
        .map(|(farm, total)| FarmSummary {
            id: farm.id.clone(),
            crop_type: farm.crop_type.clone(),
            province: farm.province.clone(),
            total_allocation: total.allocation,
            avg_allocation: per_day(total.allocation),
            total_yield: total.yield_amount,
            avg_yield: per_day(total.yield_amount),
            unmet_demand_total: total.unmet,
        })
        .collect()
}
