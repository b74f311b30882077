//! Request validation performed before any day is simulated.

use std::collections::BTreeSet;

use validator::Validate;

use crate::config::SimulationConfig;
use crate::error::ValidationError;
use crate::farms::FarmAgent;

/// Check the roster and config for everything that does not depend on the
/// chosen policy. Policy-specific checks happen in `AllocationRule::prepare`.
pub fn validate_inputs(farms: &[FarmAgent], config: &SimulationConfig) -> Result<(), ValidationError> {
    if farms.is_empty() {
        return Err(ValidationError::NoFarms);
    }

    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for farm in farms {
        if !seen.insert(farm.id.as_str()) {
            duplicates.insert(farm.id.clone());
        }
    }
    if !duplicates.is_empty() {
        return Err(ValidationError::DuplicateFarmIds {
            ids: duplicates.into_iter().collect(),
        });
    }

    for farm in farms {
        for (field, value) in [
            ("base_demand", farm.base_demand),
            ("yield_a", farm.yield_a),
            ("resilience", farm.resilience),
        ] {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite {
                    field: format!("farms[{}].{}", farm.id, field),
                });
            }
        }
        farm.validate()?;
    }

    for (field, value) in config.float_fields() {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite {
                field: field.to_string(),
            });
        }
    }
    config.validate()?;

    if config.initial_reservoir > config.reservoir_capacity {
        return Err(ValidationError::ReservoirOverCapacity {
            initial: config.initial_reservoir,
            capacity: config.reservoir_capacity,
        });
    }
    if config.initial_groundwater > config.groundwater_capacity {
        return Err(ValidationError::GroundwaterOverCapacity {
            initial: config.initial_groundwater,
            capacity: config.groundwater_capacity,
        });
    }

    if let Some(series) = &config.external_inflow_series {
        for (day, &value) in series.iter().enumerate() {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite {
                    field: format!("external_inflow_series[{day}]"),
                });
            }
            if value < 0.0 {
                return Err(ValidationError::NegativeInflow { day, value });
            }
        }
    }

    if let Some(quotas) = &config.province_quotas {
        if quotas.values().any(|q| !q.is_finite()) {
            return Err(ValidationError::NonFinite {
                field: "province_quotas".to_string(),
            });
        }
    }

    Ok(())
}
