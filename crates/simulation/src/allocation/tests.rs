use std::collections::BTreeMap;

use super::*;
use crate::config::{QuotaMode, SimulationConfig};
use crate::error::ValidationError;
use crate::farms::FarmAgent;

fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn quota_config(quotas: &[(&str, f64)], mode: QuotaMode) -> SimulationConfig {
    let mut config = SimulationConfig::new(1000.0, 500.0, 100.0);
    config.province_quotas = Some(
        quotas
            .iter()
            .map(|(k, v)| ((*k).to_string(), *v))
            .collect::<BTreeMap<_, _>>(),
    );
    config.quota_mode = mode;
    config
}

fn farm(id: &str, demand: f64, province: &str) -> FarmAgent {
    FarmAgent::new(id, "wheat", demand).in_province(province)
}

// =========================================================================
// equal
// =========================================================================

#[test]
fn test_equal_share_then_cap_without_redistribution() {
    let alloc = equal_shares(&[10.0, 100.0], 40.0);
    assert_eq!(alloc, vec![10.0, 20.0]);
    // 10 units stay unallocated even though farm 2 is short by 80.
    assert_close(sum(&alloc), 30.0);
}

#[test]
fn test_equal_no_supply() {
    assert_eq!(equal_shares(&[10.0, 20.0], 0.0), vec![0.0, 0.0]);
}

#[test]
fn test_equal_empty_roster() {
    assert!(equal_shares(&[], 50.0).is_empty());
}

// =========================================================================
// proportional
// =========================================================================

#[test]
fn test_proportional_split() {
    let alloc = proportional_shares(&[10.0, 30.0], 20.0);
    assert_close(alloc[0], 5.0);
    assert_close(alloc[1], 15.0);
}

#[test]
fn test_proportional_surplus_meets_demand() {
    assert_eq!(proportional_shares(&[10.0, 30.0], 100.0), vec![10.0, 30.0]);
}

#[test]
fn test_proportional_zero_demand() {
    assert_eq!(proportional_shares(&[0.0, 0.0], 100.0), vec![0.0, 0.0]);
}

// =========================================================================
// fair
// =========================================================================

#[test]
fn test_fair_weight_zero_is_proportional() {
    let ledger = FairnessLedger::new(2);
    let alloc = fair_shares(&[10.0, 30.0], 20.0, 0.0, &ledger);
    assert_close(alloc[0], 5.0);
    assert_close(alloc[1], 15.0);
}

#[test]
fn test_fair_weight_one_without_history_is_equal_with_redistribution() {
    let ledger = FairnessLedger::new(2);
    // equal share 20 each, farm 1 capped at 10, leftover 10 goes to farm 2
    let alloc = fair_shares(&[10.0, 100.0], 40.0, 1.0, &ledger);
    assert_close(alloc[0], 10.0);
    assert_close(alloc[1], 30.0);
}

#[test]
fn test_fair_boosts_historically_short_farm() {
    let mut ledger = FairnessLedger::new(2);
    ledger.record(&[10.0, 10.0], &[10.0, 0.0]);
    let alloc = fair_shares(&[10.0, 10.0], 9.0, 1.0, &ledger);
    // weights 1 and 2
    assert_close(alloc[0], 3.0);
    assert_close(alloc[1], 6.0);
}

#[test]
fn test_fair_uses_all_supply_when_demand_exceeds_it() {
    let ledger = FairnessLedger::new(3);
    let alloc = fair_shares(&[40.0, 55.0, 30.0], 60.0, 0.6, &ledger);
    assert_close(sum(&alloc), 60.0);
    for (a, d) in alloc.iter().zip([40.0, 55.0, 30.0]) {
        assert!(*a <= d + 1e-9);
    }
}

#[test]
fn test_fair_surplus_meets_all_demand() {
    let ledger = FairnessLedger::new(2);
    let alloc = fair_shares(&[10.0, 20.0], 100.0, 0.5, &ledger);
    assert_close(alloc[0], 10.0);
    assert_close(alloc[1], 20.0);
}

// =========================================================================
// ledger
// =========================================================================

#[test]
fn test_ledger_ratio_defaults_to_one() {
    let ledger = FairnessLedger::new(2);
    assert_eq!(ledger.ratio(0), 1.0);
    assert_eq!(ledger.ratio(5), 1.0);
}

#[test]
fn test_ledger_accumulates() {
    let mut ledger = FairnessLedger::new(1);
    ledger.record(&[10.0], &[5.0]);
    ledger.record(&[10.0], &[10.0]);
    assert_close(ledger.ratio(0), 0.75);
}

// =========================================================================
// redistribution and guards
// =========================================================================

#[test]
fn test_redistribute_fills_unmet_agents() {
    let mut alloc = vec![5.0, 5.0, 5.0];
    redistribute_leftover(&mut alloc, &[5.0, 20.0, 8.0], 25.0);
    assert_close(alloc[0], 5.0);
    assert_close(alloc[2], 8.0);
    assert_close(alloc[1], 12.0);
}

#[test]
fn test_enforce_supply_bound_clamps_and_scales() {
    let mut alloc = vec![-1.0, f64::NAN, 50.0, 30.0];
    let fixes = enforce_supply_bound(&mut alloc, &[10.0, 10.0, 40.0, 40.0], 35.0);
    assert!(fixes >= 3);
    assert_eq!(alloc[0], 0.0);
    assert_eq!(alloc[1], 0.0);
    assert!(sum(&alloc) <= 35.0 + 1e-9);
}

#[test]
fn test_enforce_supply_bound_noop_for_valid_input() {
    let mut alloc = vec![5.0, 5.0];
    assert_eq!(enforce_supply_bound(&mut alloc, &[10.0, 10.0], 10.0), 0);
    assert_eq!(alloc, vec![5.0, 5.0]);
}

// =========================================================================
// quota
// =========================================================================

#[test]
fn test_quota_share_caps_provinces() {
    let farms = vec![farm("a1", 50.0, "A"), farm("a2", 30.0, "A"), farm("b1", 60.0, "B")];
    let config = quota_config(&[("A", 0.6), ("B", 0.4)], QuotaMode::Share);
    let rule = AllocationRule::prepare(AllocationPolicy::Quota, &farms, &config).unwrap();
    let alloc = rule.allocate(&[50.0, 30.0, 60.0], 100.0, &FairnessLedger::new(3));

    let province_a = alloc[0] + alloc[1];
    assert!(province_a <= 60.0 + 1e-9);
    assert!(alloc[2] <= 40.0 + 1e-9);
    // within A, split 50:30 of 60
    assert_close(alloc[0], 37.5);
    assert_close(alloc[1], 22.5);
    assert_close(alloc[2], 40.0);
}

#[test]
fn test_quota_leftover_not_moved_across_provinces() {
    let farms = vec![farm("a", 100.0, "A"), farm("b", 10.0, "B")];
    let config = quota_config(&[("A", 0.6), ("B", 0.4)], QuotaMode::Share);
    let rule = AllocationRule::prepare(AllocationPolicy::Quota, &farms, &config).unwrap();
    let alloc = rule.allocate(&[100.0, 10.0], 100.0, &FairnessLedger::new(2));
    assert_close(alloc[0], 60.0);
    assert_close(alloc[1], 10.0);
}

#[test]
fn test_quota_share_normalises_values() {
    let farms = vec![farm("a", 100.0, "A"), farm("b", 100.0, "B")];
    let config = quota_config(&[("A", 3.0), ("B", 1.0)], QuotaMode::Share);
    let rule = AllocationRule::prepare(AllocationPolicy::Quota, &farms, &config).unwrap();
    let alloc = rule.allocate(&[100.0, 100.0], 40.0, &FairnessLedger::new(2));
    assert_close(alloc[0], 30.0);
    assert_close(alloc[1], 10.0);
}

#[test]
fn test_quota_absolute_within_supply() {
    let farms = vec![farm("a", 100.0, "A"), farm("b", 100.0, "B")];
    let config = quota_config(&[("A", 30.0), ("B", 20.0)], QuotaMode::Absolute);
    let rule = AllocationRule::prepare(AllocationPolicy::Quota, &farms, &config).unwrap();
    let alloc = rule.allocate(&[100.0, 100.0], 80.0, &FairnessLedger::new(2));
    assert_close(alloc[0], 30.0);
    assert_close(alloc[1], 20.0);
}

#[test]
fn test_quota_absolute_scaled_by_supply() {
    let farms = vec![farm("a", 100.0, "A"), farm("b", 100.0, "B")];
    let config = quota_config(&[("A", 30.0), ("B", 20.0)], QuotaMode::Absolute);
    let rule = AllocationRule::prepare(AllocationPolicy::Quota, &farms, &config).unwrap();
    let alloc = rule.allocate(&[100.0, 100.0], 25.0, &FairnessLedger::new(2));
    assert_close(alloc[0], 15.0);
    assert_close(alloc[1], 10.0);
}

#[test]
fn test_quota_province_without_entry_gets_nothing() {
    let farms = vec![farm("a", 10.0, "A"), farm("c", 10.0, "C")];
    let config = quota_config(&[("A", 1.0)], QuotaMode::Share);
    let rule = AllocationRule::prepare(AllocationPolicy::Quota, &farms, &config).unwrap();
    let alloc = rule.allocate(&[10.0, 10.0], 100.0, &FairnessLedger::new(2));
    assert_close(alloc[0], 10.0);
    assert_eq!(alloc[1], 0.0);
}

#[test]
fn test_quota_requires_quotas() {
    let farms = vec![farm("a", 10.0, "A")];
    let config = SimulationConfig::new(100.0, 50.0, 10.0);
    let err = AllocationRule::prepare(AllocationPolicy::Quota, &farms, &config).unwrap_err();
    assert!(matches!(err, ValidationError::MissingQuotas));
}

#[test]
fn test_quota_requires_province_on_every_farm() {
    let farms = vec![farm("a", 10.0, "A"), FarmAgent::new("x", "rice", 5.0)];
    let config = quota_config(&[("A", 1.0)], QuotaMode::Share);
    let err = AllocationRule::prepare(AllocationPolicy::Quota, &farms, &config).unwrap_err();
    assert!(matches!(err, ValidationError::MissingProvince { ref farm_id, .. } if farm_id == "x"));
}

#[test]
fn test_quota_rejects_non_positive_total() {
    let farms = vec![farm("a", 10.0, "A")];
    let config = quota_config(&[("A", 0.0), ("B", -1.0)], QuotaMode::Share);
    let err = AllocationRule::prepare(AllocationPolicy::Quota, &farms, &config).unwrap_err();
    assert!(matches!(err, ValidationError::NonPositiveQuotas));
}

// =========================================================================
// pakistan-quota
// =========================================================================

#[test]
fn test_pakistan_quota_derives_equal_shares() {
    let farms = vec![
        farm("p1", 40.0, "Punjab"),
        farm("p2", 40.0, "Punjab"),
        farm("s1", 100.0, "Sindh"),
    ];
    let config = SimulationConfig::new(1000.0, 500.0, 100.0);
    let rule = AllocationRule::prepare(AllocationPolicy::PakistanQuota, &farms, &config).unwrap();
    let AllocationRule::Quota(plan) = &rule else {
        panic!("expected quota rule");
    };
    assert_eq!(plan.provinces(), ["Punjab".to_string(), "Sindh".to_string()]);
    assert_eq!(plan.mode(), QuotaMode::Share);

    let alloc = rule.allocate(&[40.0, 40.0, 100.0], 60.0, &FairnessLedger::new(3));
    assert_close(alloc[0] + alloc[1], 30.0);
    assert_close(alloc[2], 30.0);
}

#[test]
fn test_pakistan_quota_uses_supplied_quotas() {
    let farms = vec![farm("p", 100.0, "Punjab"), farm("s", 100.0, "Sindh")];
    let config = quota_config(&[("Punjab", 0.75), ("Sindh", 0.25)], QuotaMode::Share);
    let rule = AllocationRule::prepare(AllocationPolicy::PakistanQuota, &farms, &config).unwrap();
    let alloc = rule.allocate(&[100.0, 100.0], 100.0, &FairnessLedger::new(2));
    assert_close(alloc[0], 75.0);
    assert_close(alloc[1], 25.0);
}

#[test]
fn test_pakistan_quota_rejects_other_provinces() {
    let farms = vec![farm("p", 10.0, "Punjab"), farm("x", 10.0, "Ontario")];
    let config = SimulationConfig::new(1000.0, 500.0, 100.0);
    let err =
        AllocationRule::prepare(AllocationPolicy::PakistanQuota, &farms, &config).unwrap_err();
    assert!(
        matches!(err, ValidationError::UnsupportedProvinces { ref provinces } if provinces == &["Ontario".to_string()])
    );
}

#[test]
fn test_pakistan_quota_rejects_foreign_quota_keys() {
    let farms = vec![farm("p", 10.0, "Punjab")];
    let config = quota_config(&[("Punjab", 0.5), ("Texas", 0.5)], QuotaMode::Share);
    assert!(AllocationRule::prepare(AllocationPolicy::PakistanQuota, &farms, &config).is_err());
}

#[test]
fn test_pakistan_quota_requires_provinces() {
    let farms = vec![FarmAgent::new("x", "rice", 5.0)];
    let config = SimulationConfig::new(1000.0, 500.0, 100.0);
    let err =
        AllocationRule::prepare(AllocationPolicy::PakistanQuota, &farms, &config).unwrap_err();
    assert!(matches!(err, ValidationError::MissingProvince { .. }));
}

// =========================================================================
// policy names
// =========================================================================

#[test]
fn test_policy_serde_names() {
    let policy: AllocationPolicy = serde_json::from_str(r#""pakistan-quota""#).unwrap();
    assert_eq!(policy, AllocationPolicy::PakistanQuota);
    assert_eq!(
        serde_json::to_string(&AllocationPolicy::Proportional).unwrap(),
        r#""proportional""#
    );
    assert_eq!(AllocationPolicy::default(), AllocationPolicy::Fair);
}

#[test]
fn test_alternates_skip_primary() {
    let alts: Vec<_> = AllocationPolicy::Fair.alternates().collect();
    assert_eq!(alts, vec![AllocationPolicy::Equal, AllocationPolicy::Proportional]);
    let alts: Vec<_> = AllocationPolicy::Quota.alternates().collect();
    assert_eq!(alts.len(), 3);
}

#[test]
fn test_every_rule_respects_supply_and_demand() {
    let farms = vec![farm("a", 12.0, "A"), farm("b", 70.0, "B"), farm("c", 33.0, "A")];
    let demands = [12.0, 70.0, 33.0];
    let config = quota_config(&[("A", 0.5), ("B", 0.5)], QuotaMode::Share);
    let mut ledger = FairnessLedger::new(3);
    ledger.record(&demands, &[12.0, 10.0, 20.0]);
    for policy in [
        AllocationPolicy::Equal,
        AllocationPolicy::Proportional,
        AllocationPolicy::Fair,
        AllocationPolicy::Quota,
    ] {
        let rule = AllocationRule::prepare(policy, &farms, &config).unwrap();
        for available in [0.0, 7.5, 50.0, 115.0, 500.0] {
            let alloc = rule.allocate(&demands, available, &ledger);
            assert!(sum(&alloc) <= available + 1e-9, "{policy} over supply");
            for (a, d) in alloc.iter().zip(demands) {
                assert!(*a >= 0.0 && *a <= d + 1e-9, "{policy} over demand");
            }
        }
    }
}
