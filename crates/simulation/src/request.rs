//! Request envelopes for the two external operations.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::allocation::AllocationPolicy;
use crate::config::SimulationConfig;
use crate::farms::FarmAgent;

fn default_true() -> bool {
    true
}

fn default_runs() -> u32 {
    50
}

/// A single simulation, optionally compared against the other policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub farms: Vec<FarmAgent>,
    pub config: SimulationConfig,
    #[serde(default)]
    pub policy: AllocationPolicy,
    #[serde(default = "default_true")]
    pub compare_policies: bool,
}

/// Monte-Carlo sweep of one policy over many weather seeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StressTestRequest {
    pub farms: Vec<FarmAgent>,
    pub config: SimulationConfig,
    #[serde(default)]
    pub policy: AllocationPolicy,
    #[serde(default = "default_runs")]
    #[validate(range(min = 1, max = 500))]
    pub runs: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str =
        r#"{"reservoir_capacity":1200,"initial_reservoir":800,"max_daily_allocation":150}"#;

    #[test]
    fn test_simulation_request_defaults() {
        let json = format!(
            r#"{{"farms":[{{"id":"a","crop_type":"wheat","base_demand":40}}],"config":{CONFIG}}}"#
        );
        let request: SimulationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.policy, AllocationPolicy::Fair);
        assert!(request.compare_policies);
    }

    #[test]
    fn test_policy_kebab_case() {
        let json = format!(r#"{{"farms":[],"config":{CONFIG},"policy":"pakistan-quota"}}"#);
        let request: SimulationRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.policy, AllocationPolicy::PakistanQuota);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let json = format!(r#"{{"farms":[],"config":{CONFIG},"policy":"lottery"}}"#);
        assert!(serde_json::from_str::<SimulationRequest>(&json).is_err());
    }

    #[test]
    fn test_stress_runs_default_and_range() {
        let json = format!(r#"{{"farms":[],"config":{CONFIG}}}"#);
        let mut request: StressTestRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.runs, 50);
        assert!(request.validate().is_ok());
        request.runs = 0;
        assert!(request.validate().is_err());
        request.runs = 501;
        assert!(request.validate().is_err());
    }
}
