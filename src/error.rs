use thiserror::Error;

/// Errors that can occur when drawing mentions from a source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source has no more mentions")]
    Exhausted,

    #[error("Failed to parse mention: {0}")]
    Parse(String),

    #[error("Invalid mention: {0}")]
    InvalidMention(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while starting or stopping monitoring
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Failed to spawn ticker thread: {0}")]
    ThreadSpawn(String),

    #[error("Failed to join ticker thread: {0}")]
    ThreadJoin(String),
}

/// Errors that can occur during configuration loading
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config: {0}")]
    ParseError(String),

    #[error("Invalid configuration value: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}
