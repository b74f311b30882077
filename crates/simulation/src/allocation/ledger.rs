/// Running per-farm totals of water demanded and received.
///
/// The `fair` policy reads the cumulative met-demand ratio from here; the
/// daily step records each day's outcome after allocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FairnessLedger {
    allocated: Vec<f64>,
    demanded: Vec<f64>,
}

impl FairnessLedger {
    pub fn new(farm_count: usize) -> Self {
        Self {
            allocated: vec![0.0; farm_count],
            demanded: vec![0.0; farm_count],
        }
    }

    /// Cumulative `allocated / demanded` for farm `i`, in `[0, 1]`.
    /// A farm with no recorded demand counts as fully served.
    pub fn ratio(&self, i: usize) -> f64 {
        match (self.allocated.get(i), self.demanded.get(i)) {
            (Some(&allocated), Some(&demanded)) if demanded > 0.0 => {
                (allocated / demanded).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    pub fn record(&mut self, demands: &[f64], allocations: &[f64]) {
        for (i, (demand, alloc)) in demands.iter().zip(allocations).enumerate() {
            if let (Some(d), Some(a)) = (self.demanded.get_mut(i), self.allocated.get_mut(i)) {
                *d += demand.max(0.0);
                *a += alloc.max(0.0);
            }
        }
    }
}
