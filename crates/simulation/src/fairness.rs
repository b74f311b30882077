//! Gini inequality over per-farm allocation/demand ratios.

/// Met-demand ratio of each farm with positive demand.
///
/// Farms with no demand for the day are left out: they carry no claim that
/// could be treated unequally.
pub fn allocation_ratios(allocations: &[f64], demands: &[f64]) -> Vec<f64> {
    allocations
        .iter()
        .zip(demands)
        .filter(|(_, d)| **d > 0.0)
        .map(|(a, d)| (a / d).clamp(0.0, 1.0))
        .collect()
}

/// Gini coefficient of `values` in `[0, 1]`.
///
/// 0 when every value is equal; `(n - 1) / n` when one value holds
/// everything. Fewer than two values, or a non-positive total, yields 0.
pub fn gini_coefficient(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let total: f64 = values.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, v)| (i + 1) as f64 * v)
        .sum();
    let n = n as f64;
    let gini = (2.0 * weighted) / (n * total) - (n + 1.0) / n;
    gini.clamp(0.0, 1.0)
}

/// Gini over the day's met-demand ratios.
pub fn allocation_gini(allocations: &[f64], demands: &[f64]) -> f64 {
    gini_coefficient(&allocation_ratios(allocations, demands))
}
