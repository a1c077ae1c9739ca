//! Sessions built from a railstats.toml file.

#[path = "../common/mod.rs"]
mod common;

use common::Fixture;
use railstats::config::{Settings, SettingsError};
use railstats::dataset::Dataset;
use railstats::{Analyzer, AnalyzerError, Mode, SortDir};
use std::fs;

fn write_config(fixture: &Fixture, body: &str) -> std::path::PathBuf {
    let path = fixture.dir.path().join("railstats.toml");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_local_session_from_config_file() {
    let fixture = Fixture::new();
    std::env::set_var("RAILSTATS_TEST_FIXTURES", fixture.dir.path());

    let path = write_config(
        &fixture,
        r#"
mode = "local"

[datasets.services]
local_path = "${RAILSTATS_TEST_FIXTURES}/services.csv"
remote_url = "https://example.org/services.csv"

[datasets.stations]
local_path = "${RAILSTATS_TEST_FIXTURES}/stations.csv"
remote_url = "https://example.org/stations.csv"

[datasets.distances]
local_path = "${RAILSTATS_TEST_FIXTURES}/distances.csv"
remote_url = "https://example.org/distances.csv"

[analyze]
pairs_order = "asc"
pairs_limit = 2
"#,
    );

    let settings = Settings::from_file(&path).unwrap();
    let catalog = settings.catalog().unwrap();
    assert_eq!(
        catalog.resolve(Dataset::Stations, Mode::Remote),
        "https://example.org/stations.csv"
    );

    let analyzer = Analyzer::open(settings.mode, &catalog).unwrap();
    let pairs = analyzer
        .station_pairs(settings.analyze.pairs_order, settings.analyze.pairs_limit)
        .unwrap();
    assert_eq!(settings.analyze.pairs_order, SortDir::Asc);
    assert_eq!(pairs.column_values("distance"), ["35", "50"]);

    analyzer.close().unwrap();
    std::env::remove_var("RAILSTATS_TEST_FIXTURES");
}

#[test]
fn test_unset_variable_is_reported() {
    let fixture = Fixture::new();
    let path = write_config(
        &fixture,
        r#"
[datasets.stations]
local_path = "${RAILSTATS_TEST_UNSET_DIR}/stations.csv"
remote_url = "https://example.org/stations.csv"
"#,
    );

    let settings = Settings::from_file(&path).unwrap();
    let err: AnalyzerError = settings.catalog().unwrap_err().into();
    assert!(matches!(
        err,
        AnalyzerError::Settings(SettingsError::MissingEnvVar(ref name)) if name == "RAILSTATS_TEST_UNSET_DIR"
    ));
}

#[test]
fn test_invalid_month_range_is_rejected() {
    let fixture = Fixture::new();
    let path = write_config(&fixture, "[analyze]\ntop_start = 8\ntop_end = 6\n");

    assert!(matches!(
        Settings::from_file(&path),
        Err(SettingsError::InvalidConfig(_))
    ));
}
