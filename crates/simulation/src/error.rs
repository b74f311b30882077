//! Error types for the allocation engine.
//!
//! Caller mistakes surface as [`ValidationError`] before any day is simulated.
//! Numeric guard clamps are not errors; see [`crate::invariant_checks`].

use thiserror::Error;

/// Result alias used by every public engine operation.
pub type SimResult<T> = Result<T, SimError>;

/// Caller-supplied data that is insufficient or inconsistent.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("At least one farm is required")]
    NoFarms,

    #[error("Farm IDs must be unique. Duplicate IDs: {}", .ids.join(", "))]
    DuplicateFarmIds { ids: Vec<String> },

    #[error("initial_reservoir ({initial}) cannot exceed reservoir_capacity ({capacity})")]
    ReservoirOverCapacity { initial: f64, capacity: f64 },

    #[error("initial_groundwater ({initial}) cannot exceed groundwater_capacity ({capacity})")]
    GroundwaterOverCapacity { initial: f64, capacity: f64 },

    #[error("All farms must include a province for the {policy} policy (missing on '{farm_id}')")]
    MissingProvince { policy: String, farm_id: String },

    #[error("province_quotas must be provided for the quota policy")]
    MissingQuotas,

    #[error("province_quotas must contain positive values")]
    NonPositiveQuotas,

    #[error("pakistan-quota policy only supports Punjab, Sindh, Khyber Pakhtunkhwa and Balochistan. Invalid province(s): {}", .provinces.join(", "))]
    UnsupportedProvinces { provinces: Vec<String> },

    #[error("external_inflow_series values must be non-negative (day {day} is {value})")]
    NegativeInflow { day: usize, value: f64 },

    #[error("{field} must be finite")]
    NonFinite { field: String },

    #[error("Field validation failed: {0}")]
    Fields(#[from] validator::ValidationErrors),
}

/// Top-level error for simulate / stress-test operations.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Run cancelled before day {day}")]
    Cancelled { day: u32 },
}

impl SimError {
    /// `true` when the caller's input was rejected before any simulation.
    pub fn is_validation(&self) -> bool {
        matches!(self, SimError::Validation(_))
    }
}

impl From<validator::ValidationErrors> for SimError {
    fn from(errors: validator::ValidationErrors) -> Self {
        SimError::Validation(ValidationError::Fields(errors))
    }
}
