//! Built-in example requests.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::allocation::AllocationPolicy;
use crate::config::{QuotaMode, SimulationConfig};
use crate::farms::FarmAgent;
use crate::request::SimulationRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub request: SimulationRequest,
}

fn irrigation_mix_request() -> SimulationRequest {
    let farms = vec![
        FarmAgent::new("pk-wheat", "wheat", 42.0)
            .with_yield(7.5)
            .with_resilience(0.55)
            .in_province("Punjab"),
        FarmAgent::new("pk-rice", "rice", 58.0)
            .with_yield(9.5)
            .with_resilience(0.35)
            .in_province("Sindh"),
        FarmAgent::new("pk-maize-kp", "maize", 34.0)
            .with_yield(7.8)
            .with_resilience(0.5)
            .in_province("Khyber Pakhtunkhwa"),
        FarmAgent::new("pk-orchard-balochistan", "orchard", 26.0)
            .with_yield(6.8)
            .with_resilience(0.62)
            .in_province("Balochistan"),
    ];

    let mut config = SimulationConfig::new(1200.0, 800.0, 150.0);
    config.days = 30;
    config.rainfall_prob = 0.35;
    config.rainfall_mean = 18.0;
    config.rainfall_std = 6.0;
    config.drought_prob = 0.15;
    config.drought_multiplier = 0.5;
    config.drought_demand_reduction = 0.3;
    config.conveyance_loss_rate = 0.25;
    config.fairness_weight = 0.6;
    config.province_quotas = Some(BTreeMap::from([
        ("Punjab".to_string(), 0.48),
        ("Sindh".to_string(), 0.38),
        ("Khyber Pakhtunkhwa".to_string(), 0.09),
        ("Balochistan".to_string(), 0.05),
    ]));
    config.quota_mode = QuotaMode::Share;
    config.groundwater_capacity = 300.0;
    config.initial_groundwater = 200.0;
    config.max_groundwater_pumping = 20.0;
    config.groundwater_recharge = 3.0;
    config.groundwater_penalty_weight = 0.5;
    config.seed = Some(42);

    SimulationRequest {
        farms,
        config,
        policy: AllocationPolicy::Quota,
        compare_policies: true,
    }
}

pub fn list_presets() -> Vec<Preset> {
    let quota = irrigation_mix_request();

    let mut auto_quota = quota.clone();
    auto_quota.policy = AllocationPolicy::PakistanQuota;
    auto_quota.config.province_quotas = None;

    vec![
        Preset {
            id: "pk-irrigation-demo".to_string(),
            name: "Pakistan Irrigation Mix (Demo)".to_string(),
            description: "Four-province crop mix with illustrative quota shares. \
                Quota values are demo-only and should be tuned with local data."
                .to_string(),
            request: quota,
        },
        Preset {
            id: "pk-irrigation-auto-quota".to_string(),
            name: "Pakistan Irrigation (Auto Quota)".to_string(),
            description: "Inter-provincial quotas derived automatically from farm provinces."
                .to_string(),
            request: auto_quota,
        },
    ]
}
