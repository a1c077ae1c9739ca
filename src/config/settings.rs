//! TOML-based configuration for railstats.
//!
//! Supports a config file (railstats.toml) with environment variable
//! expansion in dataset locations.
//!
//! Example configuration:
//! ```toml
//! mode = "local"
//!
//! [datasets.services]
//! local_path = "${RAILSTATS_DATA}/services-2023.csv.gz"
//! remote_url = "https://blobs.duckdb.org/nl-railway/services-2023.csv.gz"
//!
//! [analyze]
//! top_n = 2
//! top_start = 6
//! top_end = 8
//! pairs_order = "desc"
//! ```

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::dataset::{
    Dataset, DatasetCatalog, DatasetDescriptor, Mode, DISTANCES_LOCAL_PATH, DISTANCES_REMOTE_URL,
    SERVICES_LOCAL_PATH, SERVICES_REMOTE_URL, STATIONS_LOCAL_PATH, STATIONS_REMOTE_URL,
};
use crate::sql::SortDir;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "RAILSTATS_CONFIG";

static ENV_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)").unwrap());

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Where datasets are read from.
    pub mode: Mode,

    /// Dataset locations.
    pub datasets: DatasetSettings,

    /// Parameters of the full analysis run.
    pub analyze: AnalyzeSettings,
}

/// Locations of the three datasets.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub services: DatasetEntry,
    pub stations: DatasetEntry,
    pub distances: DatasetEntry,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            services: DatasetEntry::new(SERVICES_LOCAL_PATH, SERVICES_REMOTE_URL),
            stations: DatasetEntry::new(STATIONS_LOCAL_PATH, STATIONS_REMOTE_URL),
            distances: DatasetEntry::new(DISTANCES_LOCAL_PATH, DISTANCES_REMOTE_URL),
        }
    }
}

/// One dataset's local path and remote URL (both support `${VAR}`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DatasetEntry {
    pub local_path: String,
    pub remote_url: String,
}

impl DatasetEntry {
    pub fn new(local_path: impl Into<String>, remote_url: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            remote_url: remote_url.into(),
        }
    }

    fn descriptor(&self, dataset: Dataset) -> Result<DatasetDescriptor, SettingsError> {
        DatasetDescriptor::new(
            dataset,
            expand_env_vars(&self.local_path)?,
            expand_env_vars(&self.remote_url)?,
        )
        .map_err(|e| SettingsError::InvalidConfig(e.to_string()))
    }
}

/// Parameters of the full analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyzeSettings {
    /// Stations listed.
    pub stations_limit: u32,

    /// Distances listed.
    pub distances_limit: u32,

    /// Last month of the busiest-station report.
    pub month_cutoff: u32,

    /// Stations per month in the top-N report.
    pub top_n: u32,

    /// First month of the top-N report.
    pub top_start: u32,

    /// Last month of the top-N report.
    pub top_end: u32,

    /// "desc" for furthest pairs, "asc" for shortest.
    pub pairs_order: SortDir,

    /// Station pairs listed.
    pub pairs_limit: u32,
}

impl Default for AnalyzeSettings {
    fn default() -> Self {
        Self {
            stations_limit: 5,
            distances_limit: 5,
            month_cutoff: 6,
            top_n: 2,
            top_start: 6,
            top_end: 8,
            pairs_order: SortDir::Desc,
            pairs_limit: 3,
        }
    }
}

impl AnalyzeSettings {
    /// Check limits and month ranges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |msg: String| Err(SettingsError::InvalidConfig(msg));

        for (name, value) in [
            ("stations_limit", self.stations_limit),
            ("distances_limit", self.distances_limit),
            ("pairs_limit", self.pairs_limit),
            ("top_n", self.top_n),
        ] {
            if value == 0 {
                return invalid(format!("analyze.{} must be at least 1", name));
            }
        }
        for (name, value) in [
            ("month_cutoff", self.month_cutoff),
            ("top_start", self.top_start),
            ("top_end", self.top_end),
        ] {
            if !(1..=12).contains(&value) {
                return invalid(format!("analyze.{} must be a month (1-12), got {}", name, value));
            }
        }
        if self.top_start > self.top_end {
            return invalid(format!(
                "analyze.top_start ({}) is after analyze.top_end ({})",
                self.top_start, self.top_end
            ));
        }
        Ok(())
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.analyze.validate()?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `RAILSTATS_CONFIG`
    /// 2. `./railstats.toml`
    /// 3. `~/.config/railstats/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("railstats.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("railstats").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        Ok(Settings::default())
    }

    /// Build the dataset catalog, expanding environment variables.
    pub fn catalog(&self) -> Result<DatasetCatalog, SettingsError> {
        DatasetCatalog::new(
            self.datasets.services.descriptor(Dataset::Services)?,
            self.datasets.stations.descriptor(Dataset::Stations)?,
            self.datasets.distances.descriptor(Dataset::Distances)?,
        )
        .map_err(|e| SettingsError::InvalidConfig(e.to_string()))
    }
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax; a `$` not followed by a name is
/// kept as-is.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut last = 0;

    for caps in ENV_REF.captures_iter(s) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        let name = var_name(&caps);
        let value = env::var(name).map_err(|_| SettingsError::MissingEnvVar(name.to_string()))?;

        result.push_str(&s[last..whole.start]);
        result.push_str(&value);
        last = whole.end;
    }
    result.push_str(&s[last..]);

    Ok(result)
}

fn var_name<'h>(caps: &Captures<'h>) -> &'h str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str())
}
