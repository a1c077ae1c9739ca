//! Remote-mode sessions: nothing is created up front and every report
//! carries its own `WITH` prelude.

#[path = "../common/mod.rs"]
mod common;

use common::{table_count, Fixture};
use railstats::report::{DistanceListing, StationListing, StationPairs};
use railstats::{Mode, Report, SortDir};

#[test]
fn test_open_creates_no_tables() {
    let fixture = Fixture::new();
    let analyzer = fixture.remote();

    assert_eq!(analyzer.mode(), Mode::Remote);
    assert_eq!(analyzer.composer().strategy_name(), "lazy");
    assert_eq!(table_count(&analyzer), "0");

    analyzer.close().unwrap();
}

#[test]
fn test_prelude_precedes_report_body() {
    let fixture = Fixture::new();
    let analyzer = fixture.remote();

    let report = StationListing { limit: 5 };
    let query = analyzer.compose(&report).unwrap();

    assert!(query.sql.starts_with("WITH stations AS (\nFROM '"));
    assert!(query.sql.ends_with(&report.body()));
}

#[test]
fn test_long_distances_bring_their_wide_source() {
    let fixture = Fixture::new();
    let analyzer = fixture.remote();

    let sql = analyzer.compose(&DistanceListing::default()).unwrap().sql;
    let wide = sql.find("WITH distances AS (").unwrap();
    let long = sql.find("distances_long AS (").unwrap();
    assert!(wide < long);

    let pairs = analyzer.compose(&StationPairs::default()).unwrap().sql;
    assert_eq!(pairs.matches("distances AS (").count(), 1);
    assert_eq!(pairs.matches("WITH").count(), 1);
    assert!(pairs.contains("stations AS ("));
}

#[test]
fn test_reports_leave_no_tables_behind() {
    let fixture = Fixture::new();
    let analyzer = fixture.remote();

    analyzer.stations(5).unwrap();
    analyzer.distances(5).unwrap();
    analyzer.busiest_by_month(6).unwrap();
    analyzer.station_pairs(SortDir::Desc, 3).unwrap();

    assert_eq!(table_count(&analyzer), "0");
}

#[test]
fn test_modes_agree() {
    let fixture = Fixture::new();
    let local = fixture.local();
    let remote = fixture.remote();

    assert_eq!(
        local.station_pairs(SortDir::Desc, 3).unwrap(),
        remote.station_pairs(SortDir::Desc, 3).unwrap()
    );
    assert_eq!(
        local.distances(100).unwrap().row_count(),
        remote.distances(100).unwrap().row_count()
    );
    assert_eq!(local.row_counts().unwrap(), remote.row_counts().unwrap());

    let local_busiest = local.busiest_by_month(6).unwrap();
    let remote_busiest = remote.busiest_by_month(6).unwrap();
    assert_eq!(
        local_busiest.column_values("month"),
        remote_busiest.column_values("month")
    );
    assert_eq!(
        local_busiest.column_values("num_services"),
        remote_busiest.column_values("num_services")
    );

    local.close().unwrap();
    remote.close().unwrap();
}

#[test]
fn test_zero_rows_is_empty_result() {
    let fixture = Fixture::new();
    let analyzer = fixture.remote();

    assert!(analyzer.busiest_by_month(0).unwrap_err().is_empty_result());
}
