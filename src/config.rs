use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::Exercise;
use crate::app_dirs::AppDirs;
use crate::error::{ConfigError, PeckError};
use crate::session::SessionConfig;

/// Persisted defaults. Missing keys fall back to `Config::default()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub exercise: Exercise,
    pub interval_secs: f64,
    pub session_secs: u64,
    pub tick_rate_ms: u64,
    pub chart_max_responses: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exercise: Exercise::FixedInterval,
            interval_secs: 8.0,
            session_secs: 90,
            tick_rate_ms: 100,
            chart_max_responses: 250,
        }
    }
}

/// Validated settings the app runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub exercise: Exercise,
    pub session: SessionConfig,
    pub tick_rate: Duration,
    pub chart_max_responses: u32,
    pub export_path: Option<PathBuf>,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        // Config::default() is known to validate
        Self {
            exercise: Exercise::FixedInterval,
            session: SessionConfig::default(),
            tick_rate: Duration::from_millis(100),
            chart_max_responses: 250,
            export_path: None,
        }
    }
}

impl TryFrom<&Config> for RuntimeSettings {
    type Error = ConfigError;

    fn try_from(cfg: &Config) -> Result<Self, Self::Error> {
        if !cfg.interval_secs.is_finite() || cfg.interval_secs <= 0.0 {
            return Err(ConfigError::InvalidInterval(cfg.interval_secs));
        }
        if cfg.session_secs == 0 {
            return Err(ConfigError::ZeroSessionLength);
        }
        if cfg.tick_rate_ms == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        Ok(Self {
            exercise: cfg.exercise,
            session: SessionConfig {
                interval_secs: cfg.interval_secs,
                duration_secs: cfg.session_secs as f64,
            },
            tick_rate: Duration::from_millis(cfg.tick_rate_ms),
            chart_max_responses: cfg.chart_max_responses,
            export_path: None,
        })
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), PeckError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> Result<(), PeckError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        tracing::info!(path = %self.path.display(), "config saved");
        Ok(())
    }
}
