//! Policy-driven division of the day's available water among farms.
//!
//! A policy name from the request is prepared once into an [`AllocationRule`]
//! (quota tables resolved, provinces indexed). The prepared rule is then a pure
//! function of the day's demands, available supply and fairness history.

mod calculations;
mod ledger;
mod policy;
mod quota;

#[cfg(test)]
mod tests;

pub use calculations::{
    enforce_supply_bound, equal_shares, fair_shares, proportional_shares, redistribute_leftover,
};
pub use ledger::FairnessLedger;
pub use policy::{AllocationPolicy, AllocationRule, COMPARISON_POLICIES};
pub use quota::{QuotaPlan, PAKISTAN_PROVINCES};
