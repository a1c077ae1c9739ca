//! Configuration module for railstats.
//!
//! Handles the TOML settings file, environment variable expansion and the
//! analysis run parameters.

mod settings;

pub use settings::{
    expand_env_vars, AnalyzeSettings, DatasetEntry, DatasetSettings, Settings, SettingsError,
};
