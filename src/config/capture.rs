use super::traits::{invalid, ConfigSection};
use crate::error::QwopEvolveError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where captures land. The live path is shared by the archiver and the observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub live_path: PathBuf,
    pub archive_dir: PathBuf,
    /// Archive a capture on every n-th symbol of a pass.
    pub archive_every: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            live_path: PathBuf::from("screenshot.png"),
            archive_dir: PathBuf::from("timelapse"),
            archive_every: 60,
        }
    }
}

impl ConfigSection for CaptureConfig {
    fn section_name() -> &'static str {
        "capture"
    }

    fn validate(&self) -> Result<(), QwopEvolveError> {
        if self.archive_every == 0 {
            return Err(invalid::<Self>("archive_every must be at least 1"));
        }
        if self.live_path.as_os_str().is_empty() {
            return Err(invalid::<Self>("live_path must not be empty"));
        }
        Ok(())
    }
}
