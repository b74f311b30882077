//! Daily weather sequence: rainfall amounts and drought flags.
//!
//! A series is fully determined by the config and a seed, and is resolved
//! once per request so every policy in a comparison sees identical weather.

mod series;
#[cfg(test)]
mod tests;

pub use series::{
    external_climate_series, generate_climate_series, resolve_climate_series,
    weather_fingerprint, ClimateDay, ClimateSeries, WeatherSource,
};
