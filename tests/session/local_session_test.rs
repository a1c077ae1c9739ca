//! Local-mode sessions over fixture files on a real in-memory DuckDB.

#[path = "../common/mod.rs"]
mod common;

use common::{table_count, Fixture, SERVICES_ROWS};
use railstats::engine::{DuckDbEngine, Engine};
use railstats::report::StationPairs;
use railstats::sql::quote_literal;
use railstats::tables::{TableDefinition, TableRegistry, DISTANCES_LONG, SERVICES_PER_MONTH, STATIONS};
use railstats::{Analyzer, AnalyzerError, Mode, SortDir};

#[test]
fn test_open_materializes_every_table() {
    let fixture = Fixture::new();
    let analyzer = fixture.local();

    assert_eq!(analyzer.mode(), Mode::Local);
    assert_eq!(analyzer.composer().strategy_name(), "eager");
    assert_eq!(table_count(&analyzer), "5");

    let rows = analyzer
        .engine()
        .query(&format!("SELECT count(*) FROM {}", SERVICES_PER_MONTH), &[])
        .unwrap();
    // (month, station) groups in the services fixture
    assert_eq!(rows[0][0].to_string(), "11");

    analyzer.close().unwrap();
}

#[test]
fn test_composed_query_references_tables_by_name() {
    let fixture = Fixture::new();
    let analyzer = fixture.local();

    let query = analyzer.compose(&StationPairs::default()).unwrap();
    assert!(!query.sql.contains("WITH"));
    assert!(query.sql.contains(&format!("FROM {}", DISTANCES_LONG)));
    assert!(query.sql.contains(&format!("JOIN {} s1", STATIONS)));
}

#[test]
fn test_stations_listing() {
    let fixture = Fixture::new();
    let analyzer = fixture.local();

    let table = analyzer.stations(2).unwrap();
    assert_eq!(table.title(), "Stations");
    assert_eq!(
        table.columns(),
        ["id", "name_short", "name_long", "country", "latitude", "longitude"]
    );
    assert_eq!(table.row_count(), 2);

    let utrecht = table
        .rows()
        .iter()
        .find(|row| row[2] == "Utrecht Centraal")
        .expect("Utrecht Centraal is among the first stations");
    assert_eq!(utrecht[1], "Utrecht");
    assert_eq!(utrecht[4], "52.09");
    assert_eq!(utrecht[5], "5.11");
}

#[test]
fn test_distances_listing_is_long_form_without_self_pairs() {
    let fixture = Fixture::new();
    let analyzer = fixture.local();

    let table = analyzer.distances(100).unwrap();
    assert_eq!(table.columns(), ["station", "other_station", "distance"]);
    // 4 x 4 grid minus the 4 diagonal nulls
    assert_eq!(table.row_count(), 12);
    for row in table.rows() {
        assert_ne!(row[0], row[1]);
    }
}

#[test]
fn test_furthest_and_shortest_domestic_pairs() {
    let fixture = Fixture::new();
    let analyzer = fixture.local();

    let furthest = analyzer.station_pairs(SortDir::Desc, 3).unwrap();
    assert_eq!(furthest.title(), "Furthest Station Distances");
    assert_eq!(furthest.columns(), ["station1", "station2", "distance"]);
    assert_eq!(
        furthest.rows(),
        [
            vec!["Amsterdam Centraal", "Rotterdam Centraal", "57"],
            vec!["Rotterdam Centraal", "Utrecht Centraal", "50"],
            vec!["Amsterdam Centraal", "Utrecht Centraal", "35"],
        ]
    );

    let shortest = analyzer.station_pairs(SortDir::Asc, 1).unwrap();
    assert_eq!(shortest.title(), "Shortest Station Distances");
    assert_eq!(
        shortest.rows(),
        [vec!["Amsterdam Centraal", "Utrecht Centraal", "35"]]
    );
}

#[test]
fn test_busiest_by_month() {
    let fixture = Fixture::new();
    let analyzer = fixture.local();

    let table = analyzer.busiest_by_month(7).unwrap();
    assert_eq!(table.columns(), ["month", "station", "num_services"]);
    assert_eq!(table.column_values("month"), ["1", "6", "7"]);

    assert_eq!(table.cell(0, "station"), Some("Rotterdam Centraal"));
    assert_eq!(table.cell(0, "num_services"), Some("1"));

    // three stations tie in June; any of them may be picked
    let june = table.cell(1, "station").unwrap();
    assert!(["Utrecht Centraal", "Amsterdam Centraal", "Rotterdam Centraal"].contains(&june));
    assert_eq!(table.cell(1, "num_services"), Some("2"));

    assert_eq!(table.cell(2, "station"), Some("Utrecht Centraal"));
    assert_eq!(table.cell(2, "num_services"), Some("3"));
}

#[test]
fn test_row_counts_read_sources() {
    let fixture = Fixture::new();
    let analyzer = fixture.local();

    let table = analyzer.row_counts().unwrap();
    assert_eq!(table.columns(), ["dataset", "num_rows"]);
    assert_eq!(table.column_values("dataset"), ["services", "stations", "distances"]);
    assert_eq!(
        table.column_values("num_rows"),
        [SERVICES_ROWS.to_string().as_str(), "5", "4"]
    );
}

#[test]
fn test_zero_rows_is_empty_result() {
    let fixture = Fixture::new();
    let analyzer = fixture.local();

    let err = analyzer.busiest_by_month(0).unwrap_err();
    assert!(matches!(err, AnalyzerError::EmptyResult { ref report } if report == "busiest-by-month"));

    let err = analyzer.top_stations_in_period(2, 10, 12).unwrap_err();
    assert!(err.is_empty_result());

    // the session stays usable after a failed report
    assert_eq!(analyzer.stations(1).unwrap().row_count(), 1);
}

#[test]
fn test_missing_source_fails_open() {
    let fixture = Fixture::new();
    std::fs::remove_file(fixture.dir.path().join("stations.csv")).unwrap();

    let result = Analyzer::open(Mode::Local, &fixture.catalog);
    assert!(matches!(result, Err(AnalyzerError::Engine(_))));
}

#[test]
fn test_eager_table_over_on_demand_input() {
    let fixture = Fixture::new();
    let sources = fixture.catalog.resolve_all(Mode::Local);

    let mut registry = TableRegistry::new();
    registry
        .register(
            TableDefinition::new("raw_stations", format!("FROM {}", quote_literal(&sources.stations)))
                .on_demand(),
        )
        .unwrap();
    registry
        .register(
            TableDefinition::new("dutch_stations", "SELECT code FROM raw_stations WHERE country = 'NL'")
                .depends_on("raw_stations"),
        )
        .unwrap();

    let analyzer =
        Analyzer::with_registry(DuckDbEngine::open_in_memory().unwrap(), sources, registry).unwrap();

    // only the eager table exists; its on-demand input was inlined
    assert_eq!(table_count(&analyzer), "1");
    let rows = analyzer
        .engine()
        .query("SELECT count(*) FROM dutch_stations", &[])
        .unwrap();
    assert_eq!(rows[0][0].to_string(), "4");
}

#[test]
fn test_row_counts_use_thousands_separators() {
    let mut services = String::from("\"Service:Date\",\"Stop:station name\"\n");
    for i in 0..1_000 {
        services.push_str(&format!("2023-05-{:02},Utrecht Centraal\n", i % 28 + 1));
    }
    let fixture = Fixture::with_services(&services);
    let analyzer = fixture.local();

    let table = analyzer.row_counts().unwrap();
    assert_eq!(table.cell(0, "dataset"), Some("services"));
    assert_eq!(table.cell(0, "num_rows"), Some("1,000"));
    assert_eq!(table.cell(1, "num_rows"), Some("5"));
}
