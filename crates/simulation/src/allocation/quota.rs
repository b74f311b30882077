use std::collections::{BTreeMap, BTreeSet};

use super::calculations::proportional_shares;
use crate::config::{QuotaMode, SimulationConfig};
use crate::error::ValidationError;
use crate::farms::FarmAgent;

/// Provinces accepted by the `pakistan-quota` policy.
pub const PAKISTAN_PROVINCES: [&str; 4] = ["Punjab", "Sindh", "Khyber Pakhtunkhwa", "Balochistan"];

/// Province quota table indexed against a farm roster.
#[derive(Debug, Clone, PartialEq)]
pub struct QuotaPlan {
    /// Index into `provinces` for each farm, in roster order.
    farm_province: Vec<usize>,
    /// Distinct provinces present in the roster, sorted.
    provinces: Vec<String>,
    /// Non-negative quota per entry of `provinces` (0 when absent from the map).
    quotas: Vec<f64>,
    /// Sum of positive quotas over the whole map, roster or not.
    total_quota: f64,
    mode: QuotaMode,
}

impl QuotaPlan {
    /// Plan for the plain `quota` policy: quotas must be supplied.
    pub fn from_config(farms: &[FarmAgent], config: &SimulationConfig) -> Result<Self, ValidationError> {
        let provinces = farm_provinces(farms, "quota")?;
        let quotas = config
            .province_quotas
            .as_ref()
            .ok_or(ValidationError::MissingQuotas)?;
        Self::build(&provinces, quotas, config.quota_mode)
    }

    /// Plan for `pakistan-quota`: provinces are restricted to the four
    /// Pakistani provinces and quotas default to equal shares across the
    /// provinces present in the roster.
    pub fn pakistan(farms: &[FarmAgent], config: &SimulationConfig) -> Result<Self, ValidationError> {
        let provinces = farm_provinces(farms, "pakistan-quota")?;
        let unique: BTreeSet<&str> = provinces.iter().map(String::as_str).collect();
        reject_unsupported(unique.iter().copied())?;

        match &config.province_quotas {
            Some(quotas) => {
                reject_unsupported(quotas.keys().map(String::as_str))?;
                Self::build(&provinces, quotas, config.quota_mode)
            }
            None => {
                let share = 1.0 / unique.len().max(1) as f64;
                let derived: BTreeMap<String, f64> =
                    unique.iter().map(|p| ((*p).to_string(), share)).collect();
                Self::build(&provinces, &derived, QuotaMode::Share)
            }
        }
    }

    fn build(
        farm_provinces: &[String],
        quotas: &BTreeMap<String, f64>,
        mode: QuotaMode,
    ) -> Result<Self, ValidationError> {
        if let Some((name, _)) = quotas.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValidationError::NonFinite {
                field: format!("province_quotas[{name}]"),
            });
        }
        let total_quota: f64 = quotas.values().map(|v| v.max(0.0)).sum();
        if total_quota <= 0.0 {
            return Err(ValidationError::NonPositiveQuotas);
        }

        let provinces: Vec<String> = farm_provinces
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let farm_province = farm_provinces
            .iter()
            .map(|p| provinces.binary_search(p).unwrap_or_default())
            .collect();
        let quotas = provinces
            .iter()
            .map(|p| quotas.get(p).copied().unwrap_or(0.0).max(0.0))
            .collect();

        Ok(Self {
            farm_province,
            provinces,
            quotas,
            total_quota,
            mode,
        })
    }

    pub fn provinces(&self) -> &[String] {
        &self.provinces
    }

    pub fn mode(&self) -> QuotaMode {
        self.mode
    }

    /// Volume each province may draw from `available`, aligned with
    /// [`Self::provinces`]. The caps never sum above `available`.
    pub fn province_caps(&self, available: f64) -> Vec<f64> {
        let available = available.max(0.0);
        match self.mode {
            QuotaMode::Share => self
                .quotas
                .iter()
                .map(|q| available * q / self.total_quota)
                .collect(),
            QuotaMode::Absolute => {
                let scale = (available / self.total_quota).min(1.0);
                self.quotas.iter().map(|q| q * scale).collect()
            }
        }
    }

    /// Split each province's cap among its farms in proportion to demand.
    /// Unused province water is not moved to other provinces.
    pub fn allocate(&self, demands: &[f64], available: f64) -> Vec<f64> {
        let caps = self.province_caps(available);
        let mut allocations = vec![0.0; demands.len()];

        for (p, cap) in caps.iter().enumerate() {
            let members: Vec<usize> = self
                .farm_province
                .iter()
                .enumerate()
                .filter(|(_, fp)| **fp == p)
                .map(|(i, _)| i)
                .collect();
            let member_demands: Vec<f64> = members
                .iter()
                .map(|&i| demands.get(i).copied().unwrap_or(0.0))
                .collect();
            for (&i, share) in members.iter().zip(proportional_shares(&member_demands, *cap)) {
                if let Some(slot) = allocations.get_mut(i) {
                    *slot = share;
                }
            }
        }
        allocations
    }
}

fn farm_provinces(farms: &[FarmAgent], policy: &str) -> Result<Vec<String>, ValidationError> {
    farms
        .iter()
        .map(|farm| match farm.province.as_deref() {
            Some(p) if !p.trim().is_empty() => Ok(p.to_string()),
            _ => Err(ValidationError::MissingProvince {
                policy: policy.to_string(),
                farm_id: farm.id.clone(),
            }),
        })
        .collect()
}

fn reject_unsupported<'a>(provinces: impl Iterator<Item = &'a str>) -> Result<(), ValidationError> {
    let invalid: Vec<String> = provinces
        .filter(|p| !PAKISTAN_PROVINCES.contains(p))
        .map(str::to_string)
        .collect();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedProvinces { provinces: invalid })
    }
}
