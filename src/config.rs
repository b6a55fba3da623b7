//! Runtime settings: optional `timetable.yaml`, then `TIMETABLE_*` environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::schedule::ingest::DEFAULT_PREVIEW_PATH;

pub const DEFAULT_CONFIG_PATH: &str = "timetable.yaml";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = "data/schedules";
pub const DEFAULT_FRONTEND_DIR: &str = "frontend/dist";

pub const CONFIG_PATH_ENV: &str = "TIMETABLE_CONFIG";
pub const BIND_ENV: &str = "TIMETABLE_BIND";
pub const DATA_DIR_ENV: &str = "TIMETABLE_DATA_DIR";
pub const PREVIEW_PATH_ENV: &str = "TIMETABLE_PREVIEW_PATH";
pub const FRONTEND_DIR_ENV: &str = "TIMETABLE_FRONTEND_DIR";
pub const ADMIN_TOKEN_ENV: &str = "TIMETABLE_ADMIN_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind_addr: String,
    /// Uploaded workbooks land here; the newest `*.xlsx` is loaded at startup.
    pub data_dir: PathBuf,
    /// Where the sheet preview goes when no layout is recognized.
    pub preview_path: PathBuf,
    pub frontend_dir: PathBuf,
    /// Required in `x-admin-token` for upload and reload when set.
    pub admin_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            preview_path: PathBuf::from(DEFAULT_PREVIEW_PATH),
            frontend_dir: PathBuf::from(DEFAULT_FRONTEND_DIR),
            admin_token: None,
        }
    }
}

impl Config {
    /// Config file (when present) plus process environment.
    ///
    /// A missing default `timetable.yaml` is fine; a missing file named by
    /// `TIMETABLE_CONFIG` is an error.
    pub fn load() -> Result<Config, ConfigError> {
        let explicit = std::env::var(CONFIG_PATH_ENV).ok().filter(|v| !v.trim().is_empty());
        let mut config = match explicit {
            Some(path) => Config::from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                Config::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Config::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Config::from_yaml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Config, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Apply `TIMETABLE_*` values from `lookup`; blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(bind) = get(BIND_ENV) {
            self.bind_addr = bind;
        }
        if let Some(dir) = get(DATA_DIR_ENV) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(path) = get(PREVIEW_PATH_ENV) {
            self.preview_path = PathBuf::from(path);
        }
        if let Some(dir) = get(FRONTEND_DIR_ENV) {
            self.frontend_dir = PathBuf::from(dir);
        }
        if let Some(token) = get(ADMIN_TOKEN_ENV) {
            self.admin_token = Some(token);
        }
    }
}
