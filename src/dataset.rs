//! Dataset registry and mode-aware source resolution.
//!
//! Three datasets feed every report: service events, station metadata and
//! tariff distances. Each has a local file path and a remote URL; the
//! session [`Mode`] decides which one the engine reads.

use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, AnalyzerResult};

/// Default local path of the 2023 service events.
pub const SERVICES_LOCAL_PATH: &str = "data/services-2023.csv.gz";
/// Default remote URL of the 2023 service events.
pub const SERVICES_REMOTE_URL: &str = "https://blobs.duckdb.org/nl-railway/services-2023.csv.gz";

/// Default local path of the station metadata.
pub const STATIONS_LOCAL_PATH: &str = "data/stations-2022-01.csv";
/// Default remote URL of the station metadata.
pub const STATIONS_REMOTE_URL: &str = "https://blobs.duckdb.org/data/stations-2022-01.csv";

/// Default local path of the tariff distances.
pub const DISTANCES_LOCAL_PATH: &str = "data/tariff-distances-2022-01.csv";
/// Default remote URL of the tariff distances.
pub const DISTANCES_REMOTE_URL: &str = "https://blobs.duckdb.org/data/tariff-distances-2022-01.csv";

// ============================================================================
// Mode
// ============================================================================

/// Where dataset sources are read from, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Read local files and materialize every table up front.
    Local,
    /// Read remote URLs and derive tables per query.
    #[default]
    Remote,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Local => "local",
            Mode::Remote => "remote",
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Mode::Remote)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Datasets
// ============================================================================

/// The closed set of logical datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Services,
    Stations,
    Distances,
}

impl Dataset {
    /// All datasets in reporting order.
    pub const ALL: [Dataset; 3] = [Dataset::Services, Dataset::Stations, Dataset::Distances];

    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Services => "services",
            Dataset::Stations => "stations",
            Dataset::Distances => "distances",
        }
    }

    /// Look up a dataset by its logical name.
    ///
    /// An unknown name is a defect in the caller, reported as a
    /// configuration error.
    pub fn from_name(name: &str) -> AnalyzerResult<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| AnalyzerError::configuration(format!("unknown dataset '{}'", name)))
    }
}

impl std::fmt::Display for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A dataset's two possible locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetDescriptor {
    pub dataset: Dataset,
    pub local_path: String,
    pub remote_url: String,
}

impl DatasetDescriptor {
    /// Create a descriptor; both locations must be non-empty.
    pub fn new(
        dataset: Dataset,
        local_path: impl Into<String>,
        remote_url: impl Into<String>,
    ) -> AnalyzerResult<Self> {
        let local_path = local_path.into();
        let remote_url = remote_url.into();
        if local_path.trim().is_empty() {
            return Err(AnalyzerError::configuration(format!(
                "dataset '{}' has an empty local path",
                dataset
            )));
        }
        if remote_url.trim().is_empty() {
            return Err(AnalyzerError::configuration(format!(
                "dataset '{}' has an empty remote URL",
                dataset
            )));
        }
        Ok(Self {
            dataset,
            local_path,
            remote_url,
        })
    }

    /// The location active in `mode`.
    pub fn source(&self, mode: Mode) -> &str {
        match mode {
            Mode::Local => &self.local_path,
            Mode::Remote => &self.remote_url,
        }
    }
}

// ============================================================================
// Catalog / Resolver
// ============================================================================

/// Static mapping from each dataset to its locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetCatalog {
    services: DatasetDescriptor,
    stations: DatasetDescriptor,
    distances: DatasetDescriptor,
}

impl DatasetCatalog {
    /// Build a catalog from one descriptor per dataset.
    pub fn new(
        services: DatasetDescriptor,
        stations: DatasetDescriptor,
        distances: DatasetDescriptor,
    ) -> AnalyzerResult<Self> {
        for (expected, descriptor) in [
            (Dataset::Services, &services),
            (Dataset::Stations, &stations),
            (Dataset::Distances, &distances),
        ] {
            if descriptor.dataset != expected {
                return Err(AnalyzerError::configuration(format!(
                    "descriptor for '{}' registered as '{}'",
                    descriptor.dataset, expected
                )));
            }
        }
        Ok(Self {
            services,
            stations,
            distances,
        })
    }

    /// The descriptor for `dataset`.
    pub fn descriptor(&self, dataset: Dataset) -> &DatasetDescriptor {
        match dataset {
            Dataset::Services => &self.services,
            Dataset::Stations => &self.stations,
            Dataset::Distances => &self.distances,
        }
    }

    /// Resolve a dataset to the file path or URL the engine should read.
    ///
    /// Pure: no I/O, same answer for the same arguments.
    pub fn resolve(&self, dataset: Dataset, mode: Mode) -> &str {
        self.descriptor(dataset).source(mode)
    }

    /// Resolve a dataset by logical name.
    pub fn resolve_name(&self, name: &str, mode: Mode) -> AnalyzerResult<&str> {
        Ok(self.resolve(Dataset::from_name(name)?, mode))
    }

    /// Fix every dataset's source for one session.
    pub fn resolve_all(&self, mode: Mode) -> ResolvedSources {
        ResolvedSources {
            mode,
            services: self.resolve(Dataset::Services, mode).to_string(),
            stations: self.resolve(Dataset::Stations, mode).to_string(),
            distances: self.resolve(Dataset::Distances, mode).to_string(),
        }
    }
}

impl Default for DatasetCatalog {
    fn default() -> Self {
        let descriptor = |dataset, local: &str, remote: &str| DatasetDescriptor {
            dataset,
            local_path: local.to_string(),
            remote_url: remote.to_string(),
        };
        Self {
            services: descriptor(Dataset::Services, SERVICES_LOCAL_PATH, SERVICES_REMOTE_URL),
            stations: descriptor(Dataset::Stations, STATIONS_LOCAL_PATH, STATIONS_REMOTE_URL),
            distances: descriptor(Dataset::Distances, DISTANCES_LOCAL_PATH, DISTANCES_REMOTE_URL),
        }
    }
}

/// Dataset sources fixed for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSources {
    pub mode: Mode,
    pub services: String,
    pub stations: String,
    pub distances: String,
}

impl ResolvedSources {
    pub fn get(&self, dataset: Dataset) -> &str {
        match dataset {
            Dataset::Services => &self.services,
            Dataset::Stations => &self.stations,
            Dataset::Distances => &self.distances,
        }
    }

    /// `(dataset, source)` pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Dataset, &str)> {
        Dataset::ALL.into_iter().map(move |d| (d, self.get(d)))
    }
}
