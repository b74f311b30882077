use bevy::prelude::*;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh32::xxh32;

use crate::config::SimulationConfig;
use crate::sim_rng::SimRng;

/// Seed for the weather fingerprint hash.
const FINGERPRINT_SEED: u32 = 0x5EED_FA11;

/// One simulated day of weather.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClimateDay {
    /// Inflow into the reservoir for the day (after drought scaling).
    pub rainfall: f64,
    pub drought: bool,
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeatherSource {
    Stochastic { seed: u64 },
    External,
}

/// A resolved weather series for a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimateSeries {
    pub days: Vec<ClimateDay>,
    pub source: WeatherSource,
    pub fingerprint: u32,
}

impl ClimateSeries {
    fn new(days: Vec<ClimateDay>, source: WeatherSource) -> Self {
        let fingerprint = weather_fingerprint(&days);
        Self {
            days,
            source,
            fingerprint,
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

// =============================================================================
// Stochastic generation
// =============================================================================

/// Draw `config.days` of weather from `seed`.
///
/// Per day, in order: a Bernoulli rain gate (`rainfall_prob`), a normal
/// magnitude clamped to >= 0 when it rains, then an independent drought gate
/// (`drought_prob`). Drought days scale rainfall by `drought_multiplier`.
pub fn generate_climate_series(config: &SimulationConfig, seed: u64) -> Vec<ClimateDay> {
    let mut rng = SimRng::from_seed_u64(seed);
    let magnitude = Normal::new(config.rainfall_mean, config.rainfall_std).ok();

    (0..config.days)
        .map(|_| {
            let mut rainfall = 0.0;
            if rng.0.gen::<f64>() < config.rainfall_prob {
                let drawn = match &magnitude {
                    Some(normal) => normal.sample(&mut rng.0),
                    None => config.rainfall_mean,
                };
                rainfall = drawn.max(0.0);
            }
            let drought = rng.0.gen::<f64>() < config.drought_prob;
            if drought {
                rainfall *= config.drought_multiplier;
            }
            ClimateDay { rainfall, drought }
        })
        .collect()
}

// =============================================================================
// External series
// =============================================================================

/// Build the run's weather from an observed inflow series.
///
/// Short series repeat their last value. A day is a drought day when its
/// inflow is below `mean * drought_multiplier`; a zero mean marks every day
/// as drought.
pub fn external_climate_series(inflow: &[f64], config: &SimulationConfig) -> Vec<ClimateDay> {
    let days = config.days as usize;
    let Some(&last) = inflow.last() else {
        return Vec::new();
    };
    if inflow.len() < days {
        debug!(
            "external inflow covers {} of {} days; repeating last value {}",
            inflow.len(),
            days,
            last
        );
    }

    let values: Vec<f64> = (0..days)
        .map(|i| inflow.get(i).copied().unwrap_or(last).max(0.0))
        .collect();
    let baseline = values.iter().sum::<f64>() / values.len().max(1) as f64;
    let drought_threshold = baseline * config.drought_multiplier;

    values
        .into_iter()
        .map(|rainfall| ClimateDay {
            rainfall,
            drought: baseline <= 0.0 || rainfall < drought_threshold,
        })
        .collect()
}

/// Resolve the weather for a run: the external series when configured,
/// otherwise the stochastic series for `seed`.
pub fn resolve_climate_series(config: &SimulationConfig, seed: u64) -> ClimateSeries {
    match config.external_inflow() {
        Some(inflow) => {
            ClimateSeries::new(external_climate_series(inflow, config), WeatherSource::External)
        }
        None => ClimateSeries::new(
            generate_climate_series(config, seed),
            WeatherSource::Stochastic { seed },
        ),
    }
}

/// xxh32 over the little-endian bytes of each day's rainfall and drought flag.
pub fn weather_fingerprint(days: &[ClimateDay]) -> u32 {
    let mut bytes = Vec::with_capacity(days.len() * 9);
    for day in days {
        bytes.extend_from_slice(&day.rainfall.to_le_bytes());
        bytes.push(u8::from(day.drought));
    }
    xxh32(&bytes, FINGERPRINT_SEED)
}
