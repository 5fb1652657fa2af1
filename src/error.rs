use thiserror::Error;

#[derive(Error, Debug)]
pub enum QwopEvolveError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Observer error: {0}")]
    Observer(String),

    #[error("Evolution error: {0}")]
    Evolution(String),

    #[error("Interrupted")]
    Interrupted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] config::ConfigError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, QwopEvolveError>;
