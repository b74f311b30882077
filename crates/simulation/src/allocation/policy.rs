use serde::{Deserialize, Serialize};

use super::calculations::{equal_shares, fair_shares, proportional_shares};
use super::ledger::FairnessLedger;
use super::quota::QuotaPlan;
use crate::config::SimulationConfig;
use crate::error::ValidationError;
use crate::farms::FarmAgent;

/// Allocation policy selected by the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AllocationPolicy {
    #[default]
    Fair,
    Equal,
    Proportional,
    Quota,
    PakistanQuota,
}

/// Policies rerun against the primary's weather in comparison mode.
pub const COMPARISON_POLICIES: [AllocationPolicy; 3] = [
    AllocationPolicy::Equal,
    AllocationPolicy::Proportional,
    AllocationPolicy::Fair,
];

impl AllocationPolicy {
    pub fn name(self) -> &'static str {
        match self {
            AllocationPolicy::Fair => "fair",
            AllocationPolicy::Equal => "equal",
            AllocationPolicy::Proportional => "proportional",
            AllocationPolicy::Quota => "quota",
            AllocationPolicy::PakistanQuota => "pakistan-quota",
        }
    }

    /// Comparison policies other than this one.
    pub fn alternates(self) -> impl Iterator<Item = AllocationPolicy> {
        COMPARISON_POLICIES.into_iter().filter(move |p| *p != self)
    }
}

impl std::fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A policy with everything it needs from the roster and config resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationRule {
    Equal,
    Proportional,
    Fair { fairness_weight: f64 },
    Quota(QuotaPlan),
}

impl AllocationRule {
    /// Resolve `policy` against the roster and config.
    ///
    /// Fails when a quota policy is missing provinces or quotas.
    pub fn prepare(
        policy: AllocationPolicy,
        farms: &[FarmAgent],
        config: &SimulationConfig,
    ) -> Result<Self, ValidationError> {
        Ok(match policy {
            AllocationPolicy::Equal => AllocationRule::Equal,
            AllocationPolicy::Proportional => AllocationRule::Proportional,
            AllocationPolicy::Fair => AllocationRule::Fair {
                fairness_weight: config.fairness_weight,
            },
            AllocationPolicy::Quota => AllocationRule::Quota(QuotaPlan::from_config(farms, config)?),
            AllocationPolicy::PakistanQuota => {
                AllocationRule::Quota(QuotaPlan::pakistan(farms, config)?)
            }
        })
    }

    /// Divide `available` among agents with the given drought-adjusted demands.
    ///
    /// Every rule keeps `allocation[i] <= demands[i]` and
    /// `sum(allocation) <= available`.
    pub fn allocate(&self, demands: &[f64], available: f64, ledger: &FairnessLedger) -> Vec<f64> {
        match self {
            AllocationRule::Equal => equal_shares(demands, available),
            AllocationRule::Proportional => proportional_shares(demands, available),
            AllocationRule::Fair { fairness_weight } => {
                fair_shares(demands, available, *fairness_weight, ledger)
            }
            AllocationRule::Quota(plan) => plan.allocate(demands, available),
        }
    }
}
