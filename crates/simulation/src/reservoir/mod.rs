//! Reservoir storage: state carried between days, surface release, warning
//! tiers and depletion risk.

pub mod calculations;
pub mod types;


pub use calculations::{depletion_risk, release_for_delivery, SurfaceSupply};
pub use types::{warning_tier_for_level, ReservoirState, ReservoirWarningTier};
