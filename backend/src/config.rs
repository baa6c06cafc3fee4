//! Service configuration file support.
//!
//! Reads `forecast.toml` and applies environment overrides. Every setting has
//! a default, so an empty file (or no file at all) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ForecastError, ForecastResult};
use crate::preprocessing::DEFAULT_MIN_RECORDS;

/// Environment variable overriding `data.csv_path`.
pub const ENV_DATA_PATH: &str = "OUTBREAK_DATA_PATH";
/// Environment variable overriding `server.host`.
pub const ENV_HOST: &str = "HOST";
/// Environment variable overriding `server.port`.
pub const ENV_PORT: &str = "PORT";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub prediction: PredictionSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

/// Source table settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSettings {
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
    #[serde(default = "default_min_records")]
    pub min_records: usize,
}

/// Per-request behaviour of the prediction service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSettings {
    /// Reload the source table before every prediction.
    #[serde(default = "default_true")]
    pub refresh_on_predict: bool,
    /// Clear the prediction cache before every prediction.
    #[serde(default = "default_true")]
    pub clear_cache_on_predict: bool,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("data/wahis_outbreak_details.csv")
}

fn default_min_records() -> usize {
    DEFAULT_MIN_RECORDS
}

fn default_true() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
            min_records: default_min_records(),
        }
    }
}

impl Default for PredictionSettings {
    fn default() -> Self {
        Self {
            refresh_on_predict: true,
            clear_cache_on_predict: true,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ForecastConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// `Configuration` if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> ForecastResult<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ForecastError::Configuration(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| ForecastError::Configuration(format!("Failed to parse config file: {}", e)))
    }

    /// First `forecast.toml` found in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn default_location() -> Option<PathBuf> {
        [
            PathBuf::from("forecast.toml"),
            PathBuf::from("backend/forecast.toml"),
            PathBuf::from("../forecast.toml"),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load configuration from [`default_location`](Self::default_location).
    pub fn from_default_location() -> ForecastResult<Self> {
        let path = Self::default_location().ok_or_else(|| {
            ForecastError::Configuration("No forecast.toml found in standard locations".to_string())
        })?;
        log::info!("Loading configuration from {}", path.display());
        Self::from_file(&path)
    }

    /// Default-location file if present, otherwise defaults; then environment
    /// overrides.
    ///
    /// A file that exists but does not parse is still an error.
    pub fn load() -> ForecastResult<Self> {
        let mut config = if Self::default_location().is_some() {
            Self::from_default_location()?
        } else {
            log::info!("No forecast.toml found, using defaults");
            Self::default()
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `OUTBREAK_DATA_PATH`, `HOST` and `PORT` from the process environment.
    pub fn apply_env_overrides(&mut self) -> ForecastResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ForecastResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = get(ENV_DATA_PATH) {
            self.data.csv_path = PathBuf::from(path);
        }
        if let Some(host) = get(ENV_HOST) {
            self.server.host = host;
        }
        if let Some(port) = get(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| ForecastError::Configuration(format!("Invalid {} '{}': {}", ENV_PORT, port, e)))?;
        }
        Ok(())
    }

    /// `host:port` for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
