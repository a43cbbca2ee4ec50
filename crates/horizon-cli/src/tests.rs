//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::Path;

use horizon_core::test_utils::sample_store;
use horizon_core::{ExportFormat, ForecastConfig, Settings};

use crate::commands::{self, truncate};

const UNIFIED: &str = include_str!("../../../data/unified.csv");
const IMPACTS: &str = include_str!("../../../data/impact_links.csv");
const MAPPING: &str = include_str!("../../../data/target_mapping.csv");

/// Temp data directory populated with the bundled sample files
fn setup_data_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("unified.csv"), UNIFIED).unwrap();
    fs::write(dir.path().join("impact_links.csv"), IMPACTS).unwrap();
    fs::write(dir.path().join("target_mapping.csv"), MAPPING).unwrap();
    dir
}

fn settings() -> Settings {
    Settings::embedded().unwrap()
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_years_range() {
    assert_eq!(
        commands::parse_years("2025-2028").unwrap(),
        vec![2025, 2026, 2027, 2028]
    );
    assert_eq!(commands::parse_years(" 2030 - 2030 ").unwrap(), vec![2030]);
}

#[test]
fn test_parse_years_list() {
    assert_eq!(
        commands::parse_years("2027,2025, 2025").unwrap(),
        vec![2025, 2027]
    );
    assert_eq!(commands::parse_years("2026").unwrap(), vec![2026]);
}

#[test]
fn test_parse_years_invalid() {
    assert!(commands::parse_years("").is_err());
    assert!(commands::parse_years("2028-2025").is_err());
    assert!(commands::parse_years("next year").is_err());
    assert!(commands::parse_years("2025,abc").is_err());
}

#[test]
fn test_parse_format() {
    assert_eq!(commands::parse_format("json").unwrap(), ExportFormat::Json);
    assert!(commands::parse_format("parquet").is_err());
}

#[test]
fn test_apply_overrides() {
    let config =
        commands::apply_overrides(ForecastConfig::default(), Some(1.5), None, Some(0.9)).unwrap();
    assert_eq!(config.optimism_factor, 1.5);
    assert_eq!(config.pessimism_factor, 0.7);
    assert_eq!(config.confidence_level, 0.9);

    assert!(commands::apply_overrides(ForecastConfig::default(), None, None, Some(1.5)).is_err());
    assert!(commands::apply_overrides(ForecastConfig::default(), None, Some(-1.0), None).is_err());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("EthSwitch Interoperability", 12), "EthSwitch...");
    assert_eq!(truncate("Télébirr Launch", 8), "Téléb...");
}

// ========== Settings and Store Tests ==========

#[test]
fn test_load_settings_explicit_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("forecast.toml");
    fs::write(&path, "[scenarios]\noptimism_factor = 1.6\n").unwrap();

    let settings = commands::load_settings(Some(path.as_path())).unwrap();
    assert_eq!(settings.forecast.optimism_factor, 1.6);
}

#[test]
fn test_load_settings_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(commands::load_settings(Some(dir.path().join("missing.toml").as_path())).is_err());
}

#[test]
fn test_open_store_bundled_data() {
    let dir = setup_data_dir();
    let store = commands::open_store(dir.path(), &settings()).unwrap();

    assert_eq!(store.indicators().len(), 4);
    assert_eq!(store.events().len(), 5);
    assert_eq!(store.impact_links().len(), 8);
    assert_eq!(store.targets().len(), 2);
    assert_eq!(store.target_mappings().len(), 2);
}

#[test]
fn test_bundled_data_matches_fixture() {
    let dir = setup_data_dir();
    let loaded = commands::open_store(dir.path(), &settings()).unwrap();
    let fixture = sample_store();

    for code in fixture.indicators() {
        let a: Vec<f64> = loaded.series(&code).iter().map(|o| o.value).collect();
        let b: Vec<f64> = fixture.series(&code).iter().map(|o| o.value).collect();
        assert_eq!(a, b, "{}", code);
    }
}

#[test]
fn test_open_store_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    assert!(commands::open_store(&dir.path().join("nope"), &settings()).is_err());
}

#[test]
fn test_add_future_events() {
    let store = commands::add_future_events(sample_store(), &[2027, 2025]).unwrap();
    assert_eq!(store.events().len(), 8);
    assert_eq!(
        store.event("EVT_FUT_001").map(|e| e.date.to_string()),
        Some("2025-06-01".to_string())
    );

    assert!(commands::add_future_events(sample_store(), &[]).is_err());
}

// ========== Forecast Command Tests ==========

#[test]
fn test_cmd_forecast_prints() {
    let store = sample_store();
    let result = commands::cmd_forecast(
        &store,
        ForecastConfig::default(),
        &[2025, 2026],
        None,
        ExportFormat::Csv,
    );
    assert!(result.is_ok());
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_cmd_forecast_writes_csv() {
    let store = sample_store();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("forecast.csv");

    commands::cmd_forecast(
        &store,
        ForecastConfig::default(),
        &[2025, 2026, 2027, 2028],
        Some(out.as_path()),
        ExportFormat::Csv,
    )
    .unwrap();

    let lines = read_lines(&out);
    assert_eq!(lines[0], "indicator,date,scenario,value,lower,upper");
    assert_eq!(lines.len(), 1 + 64);
}

#[test]
fn test_cmd_forecast_writes_json() {
    let store = sample_store();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("forecast.json");

    commands::cmd_forecast(
        &store,
        ForecastConfig::default(),
        &[2025],
        Some(out.as_path()),
        ExportFormat::Json,
    )
    .unwrap();

    let export = horizon_core::export::read_json(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(export.metadata.years, vec![2025]);
    assert_eq!(export.rows.len(), 16);
    assert!(export.skipped.is_empty());
}

#[test]
fn test_cmd_forecast_bad_output_path() {
    let store = sample_store();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("missing").join("forecast.csv");

    let result = commands::cmd_forecast(
        &store,
        ForecastConfig::default(),
        &[2025],
        Some(out.as_path()),
        ExportFormat::Csv,
    );
    assert!(result.is_err());
}

// ========== Impact / Target / Status Command Tests ==========

#[test]
fn test_cmd_impacts_list_and_matrix() {
    let store = sample_store();
    assert!(commands::cmd_impacts_list(&store).is_ok());
    assert!(commands::cmd_impacts_matrix(&store).is_ok());
}

#[test]
fn test_cmd_impact_check() {
    let store = sample_store();
    assert!(commands::cmd_impact_check(&store, "EVT_001", "ACC_MM_ACCOUNT").is_ok());
    assert!(commands::cmd_impact_check(&store, "EVT_001", "ACC_OWNERSHIP").is_err());
}

#[test]
fn test_cmd_targets() {
    let store = sample_store();
    assert!(commands::cmd_targets(&store, &ForecastConfig::default()).is_ok());
}

#[test]
fn test_cmd_status() {
    let dir = setup_data_dir();
    assert!(commands::cmd_status(dir.path(), &settings()).is_ok());

    // Missing data is reported, not an error
    let empty = tempfile::tempdir().unwrap();
    assert!(commands::cmd_status(empty.path(), &settings()).is_ok());
}

#[test]
fn test_cmd_config() {
    assert!(commands::cmd_config(&settings()).is_ok());
}
