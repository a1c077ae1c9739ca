//! Shared fixtures: small railway datasets written to a temp directory.

#![allow(dead_code)]

use railstats::dataset::{Dataset, DatasetCatalog, DatasetDescriptor};
use railstats::engine::{DuckDbEngine, Engine, EngineResult, Row, SqlParam};
use railstats::{Analyzer, Mode};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Services per (date, station). Month 6 has three stations tied on two
/// services each, with Zwolle trailing on one.
pub const SERVICES_CSV: &str = "\"Service:Date\",\"Stop:station name\"
2023-01-10,Rotterdam Centraal
2023-06-01,Utrecht Centraal
2023-06-02,Utrecht Centraal
2023-06-01,Amsterdam Centraal
2023-06-03,Amsterdam Centraal
2023-06-02,Rotterdam Centraal
2023-06-04,Rotterdam Centraal
2023-06-05,Zwolle
2023-07-01,Utrecht Centraal
2023-07-02,Utrecht Centraal
2023-07-03,Utrecht Centraal
2023-07-01,Amsterdam Centraal
2023-07-02,Amsterdam Centraal
2023-07-04,Zwolle
2023-08-01,Amsterdam Centraal
2023-08-02,Amsterdam Centraal
2023-08-03,Rotterdam Centraal
2023-09-01,Utrecht Centraal
";

pub const SERVICES_ROWS: usize = 18;

pub const STATIONS_CSV: &str = "id,code,name_short,name_long,country,geo_lat,geo_lng
1,UT,Utrecht,Utrecht Centraal,NL,52.089444,5.110278
2,ASD,Amsterdam,Amsterdam Centraal,NL,52.378889,4.900278
3,RTD,Rotterdam,Rotterdam Centraal,NL,51.925,4.468889
4,BRUZ,Brussel-Zuid,Brussel-Zuid/Midi,B,50.835556,4.336111
5,ZL,Zwolle,Zwolle,NL,52.504722,6.091944
";

/// Wide tariff distances; `XXX` marks a station paired with itself.
pub const DISTANCES_CSV: &str = "station,ASD,BRUZ,RTD,UT
ASD,XXX,200,57,35
BRUZ,200,XXX,150,180
RTD,57,150,XXX,50
UT,35,180,50,XXX
";

/// Datasets on disk plus a catalog pointing both modes at them.
pub struct Fixture {
    pub dir: TempDir,
    pub catalog: DatasetCatalog,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_services(SERVICES_CSV)
    }

    pub fn with_services(services: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let services = write(dir.path(), "services.csv", services);
        let stations = write(dir.path(), "stations.csv", STATIONS_CSV);
        let distances = write(dir.path(), "distances.csv", DISTANCES_CSV);

        let catalog = DatasetCatalog::new(
            descriptor(Dataset::Services, &services),
            descriptor(Dataset::Stations, &stations),
            descriptor(Dataset::Distances, &distances),
        )
        .unwrap();

        Self { dir, catalog }
    }

    pub fn local(&self) -> Analyzer {
        Analyzer::open(Mode::Local, &self.catalog).unwrap()
    }

    /// A remote-mode session whose "remote" sources are the fixture files.
    pub fn remote(&self) -> Analyzer<OfflineEngine> {
        Analyzer::with_engine(OfflineEngine::new(), Mode::Remote, &self.catalog).unwrap()
    }
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn descriptor(dataset: Dataset, path: &Path) -> DatasetDescriptor {
    let path = path.to_string_lossy().to_string();
    DatasetDescriptor::new(dataset, path.clone(), path).unwrap()
}

/// DuckDB without the httpfs install, for remote mode over local files.
pub struct OfflineEngine(DuckDbEngine);

impl OfflineEngine {
    pub fn new() -> Self {
        Self(DuckDbEngine::open_in_memory().unwrap())
    }
}

impl Engine for OfflineEngine {
    fn name(&self) -> &'static str {
        "duckdb-offline"
    }

    fn execute_batch(&self, sql: &str) -> EngineResult<()> {
        self.0.execute_batch(sql)
    }

    fn query(&self, sql: &str, params: &[SqlParam]) -> EngineResult<Vec<Row>> {
        self.0.query(sql, params)
    }

    fn close(self) -> EngineResult<()> {
        self.0.close()
    }
}

/// Items of a rendered list cell such as `[a, b]`.
pub fn list_items(cell: &str) -> Vec<String> {
    let mut items: Vec<String> = cell
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(", ")
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    items.sort();
    items
}

/// Number of user tables in the engine's catalog.
pub fn table_count<E: Engine>(analyzer: &Analyzer<E>) -> String {
    let rows = analyzer
        .engine()
        .query("SELECT count(*) FROM duckdb_tables()", &[])
        .unwrap();
    rows[0][0].to_string()
}
