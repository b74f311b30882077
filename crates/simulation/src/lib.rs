//! Day-by-day water allocation engine for farms sharing a reservoir.
//!
//! A request (farm roster, config, policy) is validated, its weather series
//! resolved once, and then simulated day by day. Comparison mode reruns the
//! alternate policies on the same weather; stress tests sweep many seeds.

pub mod agent_protocol;
pub mod allocation;
pub mod cancel;
pub mod climate;
pub mod comparison;
pub mod config;
pub mod crop_yield;
pub mod daily_step;
pub mod engine;
pub mod error;
pub mod fairness;
pub mod farms;
pub mod groundwater;
pub mod invariant_checks;
pub mod presets;
pub mod request;
pub mod reservoir;
pub mod run_pool;
pub mod runner;
pub mod sim_rng;
pub mod validation;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

pub use allocation::AllocationPolicy;
pub use cancel::CancelToken;
pub use comparison::{simulate, ComparisonResult, SimulationResponse};
pub use config::{EngineSettings, QuotaMode, SimulationConfig};
pub use daily_step::DayRecord;
pub use engine::{AllocationEnginePlugin, EngineStats, SimulationEngine};
pub use error::{SimError, SimResult, ValidationError};
pub use farms::FarmAgent;
pub use request::{SimulationRequest, StressTestRequest};
pub use run_pool::RunPool;
pub use runner::{FarmSummary, RunSummary, SimulationResult, SimulationRunner};
pub use stress_test::{run_stress_test, StressMetric, StressTestResponse, StressTestSummary};
