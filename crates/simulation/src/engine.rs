//! Bevy hosting for the allocation engine.

use bevy::prelude::*;
use serde::Serialize;

use crate::cancel::CancelToken;
use crate::comparison::{simulate, SimulationResponse};
use crate::config::EngineSettings;
use crate::error::{SimError, SimResult};
use crate::request::{SimulationRequest, StressTestRequest};
use crate::run_pool::RunPool;
use crate::stress_test::{run_stress_test, StressTestResponse};

/// Entry point for both external operations. Owns the run pool.
#[derive(Resource)]
pub struct SimulationEngine {
    settings: EngineSettings,
    pool: RunPool,
}

impl SimulationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            pool: RunPool::new(settings.max_concurrent_runs),
        }
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    pub fn simulate(
        &self,
        request: &SimulationRequest,
        cancel: &CancelToken,
    ) -> SimResult<SimulationResponse> {
        simulate(request, &self.pool, cancel)
    }

    pub fn stress_test(
        &self,
        request: &StressTestRequest,
        cancel: &CancelToken,
    ) -> SimResult<StressTestResponse> {
        run_stress_test(request, &self.pool, cancel)
    }
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

/// Running counters over requests served by this process.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EngineStats {
    pub simulations: u64,
    pub stress_tests: u64,
    pub validation_failures: u64,
    pub cancelled: u64,
    /// Numeric guard clamps across every run served.
    pub clamps: u64,
}

impl EngineStats {
    pub fn record_simulation(&mut self, result: &SimResult<SimulationResponse>) {
        match result {
            Ok(response) => {
                self.simulations += 1;
                self.clamps += u64::from(response.diagnostics().total());
            }
            Err(err) => self.record_error(err),
        }
    }

    pub fn record_stress_test(&mut self, result: &SimResult<StressTestResponse>) {
        match result {
            Ok(response) => {
                self.stress_tests += 1;
                self.clamps += u64::from(response.summary.diagnostics.total());
            }
            Err(err) => self.record_error(err),
        }
    }

    fn record_error(&mut self, err: &SimError) {
        match err {
            SimError::Validation(_) => self.validation_failures += 1,
            SimError::Cancelled { .. } => self.cancelled += 1,
        }
    }
}

/// Inserts [`SimulationEngine`] and [`EngineStats`].
///
/// Uses an [`EngineSettings`] resource when one was inserted beforehand,
/// otherwise the defaults.
pub struct AllocationEnginePlugin;

impl Plugin for AllocationEnginePlugin {
    fn build(&self, app: &mut App) {
        let settings = app
            .world()
            .get_resource::<EngineSettings>()
            .copied()
            .unwrap_or_default();
        info!(
            "allocation engine: up to {} concurrent run(s)",
            settings.max_concurrent_runs
        );
        app.insert_resource(settings)
            .insert_resource(SimulationEngine::new(settings))
            .init_resource::<EngineStats>();
    }
}
