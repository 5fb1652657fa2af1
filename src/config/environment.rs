use super::traits::{invalid, ConfigSection};
use crate::error::QwopEvolveError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and key bindings used by the action executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub entry_url: String,
    pub startup_settle_ms: u64,
    /// Offset of the click that focuses the game canvas after loading.
    pub center_offset: (i32, i32),
    pub key_hold_ms: u64,
    pub reset_key: char,
    pub reset_settle_ms: u64,
    /// Keys held together to drive the runner into a fall.
    pub force_kill_keys: Vec<char>,
    pub force_kill_hold_ms: u64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            entry_url: "https://www.foddy.net/Athletics.html".to_string(),
            startup_settle_ms: 3000,
            center_offset: (100, 100),
            key_hold_ms: 50,
            reset_key: 'r',
            reset_settle_ms: 500,
            force_kill_keys: vec!['o', 'p'],
            force_kill_hold_ms: 2000,
        }
    }
}

impl EnvironmentConfig {
    pub fn startup_settle(&self) -> Duration {
        Duration::from_millis(self.startup_settle_ms)
    }

    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }

    pub fn reset_settle(&self) -> Duration {
        Duration::from_millis(self.reset_settle_ms)
    }

    pub fn force_kill_hold(&self) -> Duration {
        Duration::from_millis(self.force_kill_hold_ms)
    }
}

impl ConfigSection for EnvironmentConfig {
    fn section_name() -> &'static str {
        "environment"
    }

    fn validate(&self) -> Result<(), QwopEvolveError> {
        if self.entry_url.trim().is_empty() {
            return Err(invalid::<Self>("entry_url must not be empty"));
        }
        if self.force_kill_keys.is_empty() {
            return Err(invalid::<Self>("force_kill_keys must name at least one key"));
        }
        Ok(())
    }
}
