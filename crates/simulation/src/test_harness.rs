//! # TestScenario: fluent builder for engine integration tests
//!
//! Wraps a farm roster, a config and a policy, and runs them through the
//! same entry points the binary uses.

use crate::allocation::AllocationPolicy;
use crate::cancel::CancelToken;
use crate::climate::{resolve_climate_series, ClimateSeries};
use crate::comparison::{simulate, SimulationResponse};
use crate::config::SimulationConfig;
use crate::error::SimResult;
use crate::farms::FarmAgent;
use crate::request::{SimulationRequest, StressTestRequest};
use crate::run_pool::RunPool;
use crate::runner::{SimulationResult, SimulationRunner};
use crate::stress_test::{run_stress_test, StressTestResponse};

/// A scenario under test. Build it up, then call one of the `run*` methods.
#[derive(Debug, Clone)]
pub struct TestScenario {
    farms: Vec<FarmAgent>,
    config: SimulationConfig,
    policy: AllocationPolicy,
    compare: bool,
    threads: usize,
}

impl Default for TestScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl TestScenario {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Empty roster; 1200 capacity, 800 initial, 150 max daily release,
    /// 30 days, seed 42, `fair` policy.
    pub fn new() -> Self {
        let mut config = SimulationConfig::new(1200.0, 800.0, 150.0);
        config.seed = Some(42);
        Self {
            farms: Vec::new(),
            config,
            policy: AllocationPolicy::Fair,
            compare: false,
            threads: 2,
        }
    }

    /// Three unprovinced farms demanding 40, 55 and 30 per day.
    pub fn three_farms() -> Self {
        Self::new()
            .with_farm(FarmAgent::new("farm-1", "wheat", 40.0))
            .with_farm(FarmAgent::new("farm-2", "rice", 55.0))
            .with_farm(FarmAgent::new("farm-3", "maize", 30.0))
    }

    /// One farm per Pakistani province.
    pub fn four_provinces() -> Self {
        Self::new()
            .with_farm(FarmAgent::new("punjab", "wheat", 42.0).in_province("Punjab"))
            .with_farm(FarmAgent::new("sindh", "rice", 58.0).in_province("Sindh"))
            .with_farm(FarmAgent::new("kp", "maize", 34.0).in_province("Khyber Pakhtunkhwa"))
            .with_farm(FarmAgent::new("balochistan", "orchard", 26.0).in_province("Balochistan"))
    }

    // -----------------------------------------------------------------------
    // Builder methods
    // -----------------------------------------------------------------------

    pub fn with_farm(mut self, farm: FarmAgent) -> Self {
        self.farms.push(farm);
        self
    }

    pub fn with_policy(mut self, policy: AllocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn without_seed(mut self) -> Self {
        self.config.seed = None;
        self
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.config.days = days;
        self
    }

    pub fn with_comparisons(mut self) -> Self {
        self.compare = true;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Edit the config in place.
    pub fn configure(mut self, f: impl FnOnce(&mut SimulationConfig)) -> Self {
        f(&mut self.config);
        self
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn farms(&self) -> &[FarmAgent] {
        &self.farms
    }

    pub fn request(&self) -> SimulationRequest {
        SimulationRequest {
            farms: self.farms.clone(),
            config: self.config.clone(),
            policy: self.policy,
            compare_policies: self.compare,
        }
    }

    pub fn stress_request(&self, runs: u32) -> StressTestRequest {
        StressTestRequest {
            farms: self.farms.clone(),
            config: self.config.clone(),
            policy: self.policy,
            runs,
        }
    }

    pub fn weather(&self) -> ClimateSeries {
        resolve_climate_series(&self.config, self.config.seed.unwrap_or_default())
    }

    // -----------------------------------------------------------------------
    // Running
    // -----------------------------------------------------------------------

    /// Full `simulate` operation, including comparisons when enabled.
    pub fn try_simulate(&self) -> SimResult<SimulationResponse> {
        simulate(&self.request(), &RunPool::new(self.threads), &CancelToken::new())
    }

    /// `try_simulate`, panicking on error.
    pub fn simulate(&self) -> SimulationResponse {
        self.try_simulate()
            .unwrap_or_else(|e| panic!("scenario failed to simulate: {e}"))
    }

    /// Primary run only, over `self.weather()`.
    pub fn run(&self) -> SimulationResult {
        let runner = SimulationRunner::new(self.farms.clone(), self.config.clone(), self.policy)
            .unwrap_or_else(|e| panic!("scenario rejected: {e}"));
        runner
            .run(&self.weather(), &CancelToken::new())
            .unwrap_or_else(|e| panic!("scenario failed to run: {e}"))
    }

    pub fn try_stress(&self, runs: u32) -> SimResult<StressTestResponse> {
        run_stress_test(
            &self.stress_request(runs),
            &RunPool::new(self.threads),
            &CancelToken::new(),
        )
    }

    pub fn stress(&self, runs: u32) -> StressTestResponse {
        self.try_stress(runs)
            .unwrap_or_else(|e| panic!("scenario failed to stress test: {e}"))
    }

    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    /// Assert the per-day physical bounds of a trace.
    pub fn assert_trace_bounds(&self, result: &SimulationResult) {
        let capacity = self.config.reservoir_capacity;
        let gw_capacity = self.config.groundwater_capacity;
        for day in &result.daily {
            assert!(
                (0.0..=capacity).contains(&day.reservoir_end),
                "day {}: reservoir {} outside [0, {capacity}]",
                day.day,
                day.reservoir_end
            );
            assert!(
                (0.0..=gw_capacity).contains(&day.groundwater_end),
                "day {}: groundwater {} outside [0, {gw_capacity}]",
                day.day,
                day.groundwater_end
            );
            assert!(
                day.total_allocated <= day.total_demand + 1e-9,
                "day {}: allocated {} above demand {}",
                day.day,
                day.total_allocated,
                day.total_demand
            );
            assert!(
                (0.0..=1.0).contains(&day.gini),
                "day {}: gini {} out of range",
                day.day,
                day.gini
            );
            assert!(
                (0.0..=1.0).contains(&day.depletion_risk),
                "day {}: risk {} out of range",
                day.day,
                day.depletion_risk
            );
        }
    }
}
