use super::traits::{invalid, ConfigSection};
use crate::error::QwopEvolveError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Score observer cadence and stall/regression policy.
///
/// The reference values are tuned to one game's physics (a runner has to
/// cover 0.8 m every 5 s); retargeting means retuning them here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub startup_delay_ms: u64,
    pub poll_interval_ms: u64,
    /// Minimum score movement per polling interval before a trial counts as stalled.
    pub progress_threshold: f64,
    /// Unit word that follows every score token, e.g. `12.3 met`.
    pub unit_keyword: String,
    /// Case-insensitive words that mean the trial is over.
    pub termination_keywords: Vec<String>,
    /// How long a stop request may take before the worker is abandoned.
    pub shutdown_timeout_ms: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            startup_delay_ms: 3000,
            poll_interval_ms: 5000,
            progress_threshold: 0.8,
            unit_keyword: "met".to_string(),
            termination_keywords: vec!["participant".to_string(), "national".to_string()],
            shutdown_timeout_ms: 5000,
        }
    }
}

impl ObserverConfig {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }
}

impl ConfigSection for ObserverConfig {
    fn section_name() -> &'static str {
        "observer"
    }

    fn validate(&self) -> Result<(), QwopEvolveError> {
        if self.poll_interval_ms == 0 {
            return Err(invalid::<Self>("poll_interval_ms must be positive"));
        }
        if self.progress_threshold.is_nan() || self.progress_threshold <= 0.0 {
            return Err(invalid::<Self>("progress_threshold must be positive"));
        }
        if self.unit_keyword.trim().is_empty() {
            return Err(invalid::<Self>("unit_keyword must not be empty"));
        }
        if self.termination_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(invalid::<Self>("termination_keywords must not contain blanks"));
        }
        Ok(())
    }
}
