//! Primary run plus same-weather policy comparisons.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cancel::CancelToken;
use crate::climate::resolve_climate_series;
use crate::error::SimResult;
use crate::invariant_checks::ClampDiagnostics;
use crate::request::SimulationRequest;
use crate::run_pool::RunPool;
use crate::runner::{FarmSummary, RunSummary, SimulationResult, SimulationRunner};
use crate::sim_rng::resolve_seed;

/// An alternate policy's outcome over the primary run's weather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub summary: RunSummary,
    pub farms: Vec<FarmSummary>,
    pub diagnostics: ClampDiagnostics,
}

impl From<SimulationResult> for ComparisonResult {
    fn from(result: SimulationResult) -> Self {
        Self {
            summary: result.summary,
            farms: result.farms,
            diagnostics: result.diagnostics,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub primary: SimulationResult,
    /// Empty unless `compare_policies` was set.
    pub comparisons: Vec<ComparisonResult>,
}

impl SimulationResponse {
    /// Clamp counters over the primary and every comparison run.
    pub fn diagnostics(&self) -> ClampDiagnostics {
        let mut total = self.primary.diagnostics;
        for comparison in &self.comparisons {
            total.merge(&comparison.diagnostics);
        }
        total
    }
}

/// Run the requested policy and, when asked, every alternate comparison
/// policy. The weather series is resolved once and shared by all runs.
///
/// Every runner is validated before any day is simulated, so an invalid
/// request never produces partial output.
pub fn simulate(
    request: &SimulationRequest,
    pool: &RunPool,
    cancel: &CancelToken,
) -> SimResult<SimulationResponse> {
    let mut runners = vec![SimulationRunner::new(
        request.farms.clone(),
        request.config.clone(),
        request.policy,
    )?];
    if request.compare_policies {
        for policy in request.policy.alternates() {
            runners.push(SimulationRunner::new(
                request.farms.clone(),
                request.config.clone(),
                policy,
            )?);
        }
    }

    let seed = resolve_seed(request.config.seed);
    let weather = resolve_climate_series(&request.config, seed);
    info!(
        "simulate: policy {} with {} comparison(s), seed {}, {} day(s)",
        request.policy,
        runners.len() - 1,
        seed,
        weather.len()
    );

    let mut results = pool
        .map(&runners, |_, runner| runner.run(&weather, cancel))
        .into_iter()
        .collect::<SimResult<Vec<_>>>()?;
    let comparisons = results
        .split_off(1)
        .into_iter()
        .map(ComparisonResult::from)
        .collect();
    // `runners` always starts with the primary, so exactly one result remains.
    let primary = results.remove(0);

    Ok(SimulationResponse {
        primary,
        comparisons,
    })
}
