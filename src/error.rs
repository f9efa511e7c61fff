use thiserror::Error;

#[derive(Error, Debug)]
pub enum PeckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging could not be initialised: {0}")]
    Logging(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f64),

    #[error("session length must be at least one second")]
    ZeroSessionLength,

    #[error("tick rate must be at least one millisecond")]
    ZeroTickRate,
}

pub type Result<T> = std::result::Result<T, PeckError>;
