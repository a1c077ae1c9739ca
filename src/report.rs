//! Report catalog.
//!
//! Each report is a fixed SQL body over logical tables plus the values bound
//! to its placeholders. Bodies never contain data values; the only text
//! spliced in is a sort keyword chosen from [`SortDir`] and, for
//! [`DatasetRowCounts`], the session's resolved dataset sources.

use crate::dataset::ResolvedSources;
use crate::engine::SqlParam;
use crate::sql::{quote_literal, SortDir};
use crate::tables::{DISTANCES_LONG, SERVICES_PER_MONTH, STATIONS};

/// Year the service dataset covers; month names are derived from it.
pub const SERVICE_YEAR: i32 = 2023;

/// A named, fixed report.
pub trait Report {
    /// Stable identifier (used on the command line).
    fn name(&self) -> &'static str;

    /// Title of the rendered table.
    fn title(&self) -> String;

    /// Output columns, in projection order.
    fn columns(&self) -> &'static [&'static str];

    /// Logical tables the body reads.
    fn required_tables(&self) -> &'static [&'static str];

    /// SQL body with `$n` placeholders.
    fn body(&self) -> String;

    /// Values for the placeholders, in order.
    fn params(&self) -> Vec<SqlParam>;
}

// ============================================================================
// Busiest station per month
// ============================================================================

/// The station with the most services in each month up to a cutoff.
///
/// When several stations tie for the maximum in a month, which one
/// `arg_max` returns is up to the engine and is not stable across engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusiestByMonth {
    pub month_cutoff: u32,
}

impl Default for BusiestByMonth {
    fn default() -> Self {
        Self { month_cutoff: 6 }
    }
}

impl Report for BusiestByMonth {
    fn name(&self) -> &'static str {
        "busiest-by-month"
    }

    fn title(&self) -> String {
        "Busiest Station by Month".to_string()
    }

    fn columns(&self) -> &'static [&'static str] {
        &["month", "station", "num_services"]
    }

    fn required_tables(&self) -> &'static [&'static str] {
        &[SERVICES_PER_MONTH]
    }

    fn body(&self) -> String {
        format!(
            "SELECT
    month,
    arg_max(station, num_services) AS station,
    max(num_services) AS num_services
FROM {SERVICES_PER_MONTH}
WHERE month <= $1
GROUP BY ALL
ORDER BY month"
        )
    }

    fn params(&self) -> Vec<SqlParam> {
        vec![self.month_cutoff.into()]
    }
}

// ============================================================================
// Top N stations per month
// ============================================================================

/// The top `n` stations by service count for each month in `start..=end`.
///
/// Ranking uses `RANK()`: tied stations share a rank, so a month can list
/// more than `n` stations, and every station ranked above `n` is left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopStationsInPeriod {
    pub n: u32,
    pub start: u32,
    pub end: u32,
}

impl Default for TopStationsInPeriod {
    fn default() -> Self {
        Self {
            n: 3,
            start: 1,
            end: 12,
        }
    }
}

impl Report for TopStationsInPeriod {
    fn name(&self) -> &'static str {
        "top-stations"
    }

    fn title(&self) -> String {
        format!("Top {} Stations in Months {}-{}", self.n, self.start, self.end)
    }

    fn columns(&self) -> &'static [&'static str] {
        &["month", "month_name", "top_stations"]
    }

    fn required_tables(&self) -> &'static [&'static str] {
        &[SERVICES_PER_MONTH]
    }

    fn body(&self) -> String {
        format!(
            "SELECT month, month_name, array_agg(station) AS top_stations
FROM (
    SELECT
        month,
        strftime(make_date({SERVICE_YEAR}, month, 1), '%B') AS month_name,
        rank() OVER (PARTITION BY month ORDER BY num_services DESC) AS rank,
        station,
        num_services
    FROM {SERVICES_PER_MONTH}
    WHERE month BETWEEN $1 AND $2
)
WHERE rank <= $3
GROUP BY ALL
ORDER BY month"
        )
    }

    fn params(&self) -> Vec<SqlParam> {
        vec![self.start.into(), self.end.into(), self.n.into()]
    }
}

// ============================================================================
// Listings
// ============================================================================

/// The first `limit` stations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationListing {
    pub limit: u32,
}

impl Default for StationListing {
    fn default() -> Self {
        Self { limit: 5 }
    }
}

impl Report for StationListing {
    fn name(&self) -> &'static str {
        "stations"
    }

    fn title(&self) -> String {
        "Stations".to_string()
    }

    fn columns(&self) -> &'static [&'static str] {
        &["id", "name_short", "name_long", "country", "latitude", "longitude"]
    }

    fn required_tables(&self) -> &'static [&'static str] {
        &[STATIONS]
    }

    fn body(&self) -> String {
        format!(
            "SELECT
    id,
    name_short,
    name_long,
    country,
    printf('%.2f', geo_lat) AS latitude,
    printf('%.2f', geo_lng) AS longitude
FROM {STATIONS}
LIMIT $1"
        )
    }

    fn params(&self) -> Vec<SqlParam> {
        vec![self.limit.into()]
    }
}

/// The first `limit` station-pair distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceListing {
    pub limit: u32,
}

impl Default for DistanceListing {
    fn default() -> Self {
        Self { limit: 5 }
    }
}

impl Report for DistanceListing {
    fn name(&self) -> &'static str {
        "distances"
    }

    fn title(&self) -> String {
        "Station Pair Distances".to_string()
    }

    fn columns(&self) -> &'static [&'static str] {
        &["station", "other_station", "distance"]
    }

    fn required_tables(&self) -> &'static [&'static str] {
        &[DISTANCES_LONG]
    }

    fn body(&self) -> String {
        format!(
            "SELECT station, other_station, distance
FROM {DISTANCES_LONG}
LIMIT $1"
        )
    }

    fn params(&self) -> Vec<SqlParam> {
        vec![self.limit.into()]
    }
}

// ============================================================================
// Station pairs
// ============================================================================

/// Domestic station pairs ordered by tariff distance.
///
/// Each unordered pair appears once (`station < other_station`) and a
/// station is never paired with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationPairs {
    pub order: SortDir,
    pub limit: u32,
}

impl Default for StationPairs {
    fn default() -> Self {
        Self {
            order: SortDir::Desc,
            limit: 3,
        }
    }
}

impl Report for StationPairs {
    fn name(&self) -> &'static str {
        "station-pairs"
    }

    fn title(&self) -> String {
        match self.order {
            SortDir::Desc => "Furthest Station Distances".to_string(),
            SortDir::Asc => "Shortest Station Distances".to_string(),
        }
    }

    fn columns(&self) -> &'static [&'static str] {
        &["station1", "station2", "distance"]
    }

    fn required_tables(&self) -> &'static [&'static str] {
        &[DISTANCES_LONG, STATIONS]
    }

    fn body(&self) -> String {
        format!(
            "SELECT
    s1.name_long AS station1,
    s2.name_long AS station2,
    {DISTANCES_LONG}.distance
FROM {DISTANCES_LONG}
JOIN {STATIONS} s1 ON {DISTANCES_LONG}.station = s1.code
JOIN {STATIONS} s2 ON {DISTANCES_LONG}.other_station = s2.code
WHERE
    s1.country = $2
    AND s2.country = $2
    AND {DISTANCES_LONG}.station < {DISTANCES_LONG}.other_station
ORDER BY {DISTANCES_LONG}.distance {order}
LIMIT $1",
            order = self.order.keyword(),
        )
    }

    fn params(&self) -> Vec<SqlParam> {
        vec![self.limit.into(), DOMESTIC_COUNTRY.into()]
    }
}

/// Country code of domestic stations.
pub const DOMESTIC_COUNTRY: &str = "NL";

// ============================================================================
// Dataset row counts
// ============================================================================

/// Row count of each dataset's resolved source.
///
/// Reads the sources directly rather than any logical table, so the count
/// reflects the file or URL itself in both modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRowCounts {
    pub sources: ResolvedSources,
}

impl DatasetRowCounts {
    pub fn new(sources: ResolvedSources) -> Self {
        Self { sources }
    }
}

impl Report for DatasetRowCounts {
    fn name(&self) -> &'static str {
        "row-counts"
    }

    fn title(&self) -> String {
        "Dataset Row Counts".to_string()
    }

    fn columns(&self) -> &'static [&'static str] {
        &["dataset", "num_rows"]
    }

    fn required_tables(&self) -> &'static [&'static str] {
        &[]
    }

    fn body(&self) -> String {
        let selects: Vec<String> = self
            .sources
            .iter()
            .map(|(dataset, source)| {
                format!(
                    "SELECT {} AS dataset, format('{{:,}}', count(*)) AS num_rows FROM {}",
                    quote_literal(dataset.name()),
                    quote_literal(source)
                )
            })
            .collect();
        selects.join("\nUNION ALL\n")
    }

    fn params(&self) -> Vec<SqlParam> {
        Vec::new()
    }
}

/// The fixed catalog, with default parameters.
pub fn catalog(sources: &ResolvedSources) -> Vec<Box<dyn Report>> {
    vec![
        Box::new(DatasetRowCounts::new(sources.clone())),
        Box::new(StationListing::default()),
        Box::new(DistanceListing::default()),
        Box::new(BusiestByMonth::default()),
        Box::new(TopStationsInPeriod::default()),
        Box::new(StationPairs::default()),
    ]
}
