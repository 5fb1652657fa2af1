//! Seams to the outside world: the game, its screenshots, and OCR.

use crate::error::Result;
use std::path::Path;

/// Produces a screenshot of the environment at a well-known path.
pub trait CaptureSource {
    fn capture(&mut self, target: &Path) -> Result<()>;
}

/// Keyboard/mouse control over the running game.
pub trait EnvironmentDriver: CaptureSource {
    /// Navigate to the game's entry point.
    fn open(&mut self, url: &str) -> Result<()>;
    fn click(&mut self, x: i32, y: i32) -> Result<()>;
    fn key_down(&mut self, key: char) -> Result<()>;
    fn key_up(&mut self, key: char) -> Result<()>;
    /// Release the driver and anything it launched.
    fn close(&mut self) -> Result<()>;
}

/// Turns an image on disk into text. Shared with the observer thread.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, image: &Path) -> Result<String>;
}
