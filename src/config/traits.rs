use crate::error::QwopEvolveError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), QwopEvolveError>;
}

/// Build a configuration error prefixed with the section it came from.
pub(crate) fn invalid<S: ConfigSection>(message: &str) -> QwopEvolveError {
    QwopEvolveError::Configuration(format!("[{}] {}", S::section_name(), message))
}
