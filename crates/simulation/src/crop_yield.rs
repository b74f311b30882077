//! Concave crop yield response to delivered water.

/// Yield for one farm-day: `yield_a * ln(1 + allocation)`.
///
/// Monotone non-decreasing with diminishing returns. Allocation is capped at
/// demand first, so water beyond full satisfaction adds nothing.
pub fn farm_yield(yield_a: f64, allocation: f64, demand: f64) -> f64 {
    let effective = allocation.clamp(0.0, demand.max(0.0));
    yield_a.max(0.0) * effective.ln_1p()
}
