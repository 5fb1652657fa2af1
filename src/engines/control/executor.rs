use super::driver::EnvironmentDriver;
use crate::config::{CaptureConfig, EnvironmentConfig};
use crate::engines::observation::ObservationReader;
use crate::error::Result;
use crate::types::{round2, Action};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

/// Local view of the observer's slots, as of the last poll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    pub score: f64,
    pub terminated: bool,
}

/// Issues timed inputs to the game. Single-threaded; calls never interleave.
pub struct ActionExecutor<D: EnvironmentDriver> {
    driver: D,
    environment: EnvironmentConfig,
    capture: CaptureConfig,
    reading: Reading,
}

impl<D: EnvironmentDriver> ActionExecutor<D> {
    pub fn new(driver: D, environment: EnvironmentConfig, capture: CaptureConfig) -> Result<Self> {
        fs::create_dir_all(&capture.archive_dir)?;
        Ok(Self {
            driver,
            environment,
            capture,
            reading: Reading::default(),
        })
    }

    /// Load the game and focus its canvas.
    pub fn open(&mut self) -> Result<()> {
        self.driver.open(&self.environment.entry_url)?;
        thread::sleep(self.environment.startup_settle());
        let (x, y) = self.environment.center_offset;
        self.driver.click(x, y)
    }

    pub fn key_down(&mut self, action: Action) -> Result<()> {
        self.driver.key_down(action.key())
    }

    pub fn key_up(&mut self, action: Action) -> Result<()> {
        self.driver.key_up(action.key())
    }

    /// Key down, hold for the configured duration, key up.
    pub fn press(&mut self, action: Action) -> Result<()> {
        self.key_down(action)?;
        thread::sleep(self.environment.key_hold());
        self.key_up(action)
    }

    /// Restart the race and clear the local reading.
    pub fn reset(&mut self) -> Result<()> {
        let key = self.environment.reset_key;
        self.driver.key_down(key)?;
        self.driver.key_up(key)?;
        thread::sleep(self.environment.reset_settle());
        self.reading = Reading::default();
        Ok(())
    }

    /// Hold the kill keys until the runner falls, so the next trial starts clean.
    pub fn force_kill(&mut self) -> Result<()> {
        debug!("Forcing a fall with {:?}", self.environment.force_kill_keys);
        for &key in &self.environment.force_kill_keys {
            self.driver.key_down(key)?;
        }
        thread::sleep(self.environment.force_kill_hold());
        for &key in &self.environment.force_kill_keys {
            self.driver.key_up(key)?;
        }
        Ok(())
    }

    /// Refresh the live capture and keep a timestamped copy of it.
    pub fn capture_archive(&mut self) -> Result<PathBuf> {
        self.driver.capture(&self.capture.live_path)?;

        let now = chrono::Utc::now();
        let name = format!(
            "screenshot_{}.{:06}.png",
            now.timestamp(),
            now.timestamp_subsec_micros()
        );
        let archived = self.capture.archive_dir.join(name);
        fs::copy(&self.capture.live_path, &archived)?;
        Ok(archived)
    }

    /// Pull the latest published values into the local reading.
    pub fn observe(&mut self, reader: &ObservationReader) -> Reading {
        self.reading = Reading {
            score: round2(reader.score()),
            terminated: reader.is_terminated(),
        };
        self.reading
    }

    pub fn reading(&self) -> Reading {
        self.reading
    }

    pub fn live_capture_path(&self) -> &Path {
        &self.capture.live_path
    }

    pub fn archive_every(&self) -> usize {
        self.capture.archive_every
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn release(&mut self) -> Result<()> {
        self.driver.close()
    }
}
