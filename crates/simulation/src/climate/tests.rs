use super::*;
use crate::config::SimulationConfig;

fn config(days: u32) -> SimulationConfig {
    let mut config = SimulationConfig::new(1000.0, 500.0, 100.0);
    config.days = days;
    config
}

#[test]
fn test_same_seed_same_series() {
    let cfg = config(60);
    assert_eq!(generate_climate_series(&cfg, 42), generate_climate_series(&cfg, 42));
}

#[test]
fn test_different_seeds_differ() {
    let cfg = config(60);
    assert_ne!(generate_climate_series(&cfg, 1), generate_climate_series(&cfg, 2));
}

#[test]
fn test_series_length_matches_days() {
    assert_eq!(generate_climate_series(&config(17), 5).len(), 17);
}

#[test]
fn test_rainfall_never_negative() {
    let mut cfg = config(365);
    cfg.rainfall_prob = 1.0;
    cfg.rainfall_mean = 1.0;
    cfg.rainfall_std = 50.0;
    for day in generate_climate_series(&cfg, 9) {
        assert!(day.rainfall >= 0.0);
    }
}

#[test]
fn test_no_rain_when_probability_zero() {
    let mut cfg = config(100);
    cfg.rainfall_prob = 0.0;
    assert!(generate_climate_series(&cfg, 3)
        .iter()
        .all(|d| d.rainfall == 0.0));
}

#[test]
fn test_drought_always_and_never() {
    let mut cfg = config(50);
    cfg.drought_prob = 1.0;
    assert!(generate_climate_series(&cfg, 3).iter().all(|d| d.drought));
    cfg.drought_prob = 0.0;
    assert!(generate_climate_series(&cfg, 3).iter().all(|d| !d.drought));
}

#[test]
fn test_drought_scales_rainfall() {
    let mut cfg = config(20);
    cfg.rainfall_prob = 1.0;
    cfg.rainfall_std = 0.0;
    cfg.rainfall_mean = 10.0;
    cfg.drought_prob = 1.0;
    cfg.drought_multiplier = 0.25;
    for day in generate_climate_series(&cfg, 11) {
        assert!((day.rainfall - 2.5).abs() < 1e-12);
    }
}

#[test]
fn test_zero_std_yields_mean() {
    let mut cfg = config(10);
    cfg.rainfall_prob = 1.0;
    cfg.rainfall_std = 0.0;
    cfg.rainfall_mean = 7.0;
    cfg.drought_prob = 0.0;
    for day in generate_climate_series(&cfg, 1) {
        assert_eq!(day.rainfall, 7.0);
    }
}

#[test]
fn test_external_series_overrides_entry_for_entry() {
    let mut cfg = config(4);
    cfg.drought_multiplier = 0.5;
    cfg.external_inflow_series = Some(vec![10.0, 2.0, 12.0, 8.0]);
    let series = resolve_climate_series(&cfg, 42);
    assert_eq!(series.source, WeatherSource::External);
    let rain: Vec<f64> = series.days.iter().map(|d| d.rainfall).collect();
    assert_eq!(rain, vec![10.0, 2.0, 12.0, 8.0]);
    // mean 8, threshold 4: only the 2.0 day is a drought day
    let drought: Vec<bool> = series.days.iter().map(|d| d.drought).collect();
    assert_eq!(drought, vec![false, true, false, false]);
}

#[test]
fn test_external_series_repeats_last_value() {
    let mut cfg = config(5);
    cfg.external_inflow_series = Some(vec![3.0, 6.0]);
    let series = resolve_climate_series(&cfg, 0);
    let rain: Vec<f64> = series.days.iter().map(|d| d.rainfall).collect();
    assert_eq!(rain, vec![3.0, 6.0, 6.0, 6.0, 6.0]);
}

#[test]
fn test_external_series_truncates_to_days() {
    let mut cfg = config(2);
    cfg.external_inflow_series = Some(vec![1.0, 2.0, 3.0]);
    assert_eq!(resolve_climate_series(&cfg, 0).len(), 2);
}

#[test]
fn test_external_all_zero_is_drought() {
    let mut cfg = config(3);
    cfg.external_inflow_series = Some(vec![0.0, 0.0, 0.0]);
    assert!(resolve_climate_series(&cfg, 0).days.iter().all(|d| d.drought));
}

#[test]
fn test_external_series_ignores_seed() {
    let mut cfg = config(3);
    cfg.external_inflow_series = Some(vec![4.0, 5.0, 6.0]);
    assert_eq!(
        resolve_climate_series(&cfg, 1).fingerprint,
        resolve_climate_series(&cfg, 2).fingerprint
    );
}

#[test]
fn test_fingerprint_detects_change() {
    let a = vec![ClimateDay { rainfall: 1.0, drought: false }];
    let b = vec![ClimateDay { rainfall: 1.0, drought: true }];
    assert_eq!(weather_fingerprint(&a), weather_fingerprint(&a.clone()));
    assert_ne!(weather_fingerprint(&a), weather_fingerprint(&b));
}

#[test]
fn test_stochastic_source_records_seed() {
    let series = resolve_climate_series(&config(3), 77);
    assert_eq!(series.source, WeatherSource::Stochastic { seed: 77 });
}
