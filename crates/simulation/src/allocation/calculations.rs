use super::ledger::FairnessLedger;

/// Leftover below this volume is treated as exhausted.
const LEFTOVER_EPSILON: f64 = 1e-9;

fn total_positive(values: &[f64]) -> f64 {
    values.iter().map(|v| v.max(0.0)).sum()
}

// =============================================================================
// Policy shares
// =============================================================================

/// Even split of `available`, each share capped at the agent's demand.
///
/// Water freed by capped agents is not handed to the others, so under
/// heterogeneous demand some supply stays unallocated while larger farms go
/// short.
pub fn equal_shares(demands: &[f64], available: f64) -> Vec<f64> {
    let n = demands.len();
    if n == 0 || available <= 0.0 {
        return vec![0.0; n];
    }
    let share = available / n as f64;
    demands.iter().map(|d| share.min(d.max(0.0))).collect()
}

/// Split of `available` in proportion to demand, capped at demand.
pub fn proportional_shares(demands: &[f64], available: f64) -> Vec<f64> {
    let n = demands.len();
    let total_demand = total_positive(demands);
    if n == 0 || available <= 0.0 || total_demand <= 0.0 {
        return vec![0.0; n];
    }
    demands
        .iter()
        .map(|d| {
            let d = d.max(0.0);
            (available * d / total_demand).min(d)
        })
        .collect()
}

/// Blend of the proportional share with an equity share, then leftover
/// redistribution.
///
/// The equity share weights each agent by `2 - r`, where `r` is its cumulative
/// met-demand ratio from the ledger: agents that have historically been short
/// are boosted, agents fully served so far get the plain equal weight.
/// `fairness_weight` moves the blend from pure proportional (0) to pure equity
/// (1).
pub fn fair_shares(
    demands: &[f64],
    available: f64,
    fairness_weight: f64,
    ledger: &FairnessLedger,
) -> Vec<f64> {
    let n = demands.len();
    let total_demand = total_positive(demands);
    if n == 0 || available <= 0.0 || total_demand <= 0.0 {
        return vec![0.0; n];
    }

    let weight = fairness_weight.clamp(0.0, 1.0);
    let equity_weights: Vec<f64> = demands
        .iter()
        .enumerate()
        .map(|(i, d)| if *d > 0.0 { 2.0 - ledger.ratio(i) } else { 0.0 })
        .collect();
    let total_equity = equity_weights.iter().sum::<f64>();

    let mut allocations: Vec<f64> = demands
        .iter()
        .zip(&equity_weights)
        .map(|(d, h)| {
            let d = d.max(0.0);
            let proportional = available * d / total_demand;
            let equity = if total_equity > 0.0 {
                available * h / total_equity
            } else {
                0.0
            };
            ((1.0 - weight) * proportional + weight * equity).min(d)
        })
        .collect();

    redistribute_leftover(&mut allocations, demands, available);
    allocations
}

// =============================================================================
// Redistribution and guards
// =============================================================================

/// Hand unallocated supply to agents still below demand, in equal slices,
/// until the supply is gone or every agent is satisfied.
pub fn redistribute_leftover(allocations: &mut [f64], demands: &[f64], available: f64) {
    let mut leftover = available - allocations.iter().sum::<f64>();
    // Each pass either exhausts the leftover or fully satisfies one more agent.
    for _ in 0..=allocations.len() {
        if leftover <= LEFTOVER_EPSILON {
            break;
        }
        let unmet: Vec<usize> = (0..allocations.len())
            .filter(|&i| allocations[i] + LEFTOVER_EPSILON < demands[i])
            .collect();
        if unmet.is_empty() {
            break;
        }
        let slice = leftover / unmet.len() as f64;
        let mut used = 0.0;
        for i in unmet {
            let add = slice.min(demands[i] - allocations[i]);
            allocations[i] += add;
            used += add;
        }
        if used <= LEFTOVER_EPSILON {
            break;
        }
        leftover -= used;
    }
}

/// Clamp each allocation into `[0, demand]` and scale the vector down if the
/// total exceeds `available`. Returns the number of corrections made;
/// rounding dust is fixed without being counted.
pub fn enforce_supply_bound(allocations: &mut [f64], demands: &[f64], available: f64) -> u32 {
    let mut corrections = 0;
    for (alloc, demand) in allocations.iter_mut().zip(demands) {
        let cap = demand.max(0.0);
        if !alloc.is_finite() || *alloc < 0.0 {
            *alloc = 0.0;
            corrections += 1;
        } else if *alloc > cap {
            if *alloc - cap > LEFTOVER_EPSILON {
                corrections += 1;
            }
            *alloc = cap;
        }
    }

    let available = available.max(0.0);
    let total = allocations.iter().sum::<f64>();
    if total > available {
        let scale = if total > 0.0 { available / total } else { 0.0 };
        for alloc in allocations.iter_mut() {
            *alloc *= scale;
        }
        if total - available > LEFTOVER_EPSILON {
            corrections += 1;
        }
    }
    corrections
}
