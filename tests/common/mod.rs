#![allow(dead_code)]

use qwopevolve::config::{CaptureConfig, EnvironmentConfig, EvolutionConfig, ObserverConfig};
use qwopevolve::engines::control::{CaptureSource, EnvironmentDriver, TextExtractor};
use qwopevolve::{QwopEvolveError, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Open(String),
    Click(i32, i32),
    Down(char),
    Up(char),
    Capture,
    Close,
}

/// In-memory stand-in for the game.
///
/// Every `q`/`w` key-up moves the runner forward by `step`; `r` resets the
/// race. Captures are plain text files shaped like OCR output.
#[derive(Debug, Default)]
pub struct SimState {
    pub distance: f64,
    pub step: f64,
    /// Distance at which the runner falls and the game-over banner shows.
    pub fall_at: Option<f64>,
    pub events: Vec<Event>,
    /// Fail every key press after this many presses.
    pub fail_after_presses: Option<usize>,
    pub presses: usize,
}

impl SimState {
    pub fn fallen(&self) -> bool {
        self.fall_at.map_or(false, |limit| self.distance >= limit)
    }

    pub fn count(&self, wanted: &Event) -> usize {
        self.events.iter().filter(|e| *e == wanted).count()
    }
}

#[derive(Clone)]
pub struct SimulatedDriver {
    pub state: Arc<Mutex<SimState>>,
    /// Raised after the given number of key presses, to emulate Ctrl-C mid-trial.
    pub interrupt_after: Option<(usize, Arc<AtomicBool>)>,
}

impl SimulatedDriver {
    pub fn new(step: f64, fall_at: Option<f64>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SimState {
                step,
                fall_at,
                ..Default::default()
            })),
            interrupt_after: None,
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }
}

impl CaptureSource for SimulatedDriver {
    fn capture(&mut self, target: &Path) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Capture);
        let mut text = format!("{:.1} met\n", state.distance);
        if state.fallen() {
            text.push_str("PARTICIPANT\n");
        }
        std::fs::write(target, text)?;
        Ok(())
    }
}

impl EnvironmentDriver for SimulatedDriver {
    fn open(&mut self, url: &str) -> Result<()> {
        self.state.lock().unwrap().events.push(Event::Open(url.to_string()));
        Ok(())
    }

    fn click(&mut self, x: i32, y: i32) -> Result<()> {
        self.state.lock().unwrap().events.push(Event::Click(x, y));
        Ok(())
    }

    fn key_down(&mut self, key: char) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if let Some(limit) = state.fail_after_presses {
            if state.presses >= limit {
                return Err(QwopEvolveError::Driver("browser went away".to_string()));
            }
        }
        state.presses += 1;
        state.events.push(Event::Down(key));

        if let Some((after, flag)) = &self.interrupt_after {
            if state.presses >= *after {
                flag.store(true, Ordering::SeqCst);
            }
        }
        Ok(())
    }

    fn key_up(&mut self, key: char) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Up(key));
        match key {
            'r' => state.distance = 0.0,
            'q' | 'w' if !state.fallen() => state.distance += state.step,
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.state.lock().unwrap().events.push(Event::Close);
        Ok(())
    }
}

/// Reads a capture file as if OCR had produced its contents.
#[derive(Default)]
pub struct FileTextExtractor {
    pub calls: AtomicUsize,
}

impl TextExtractor for FileTextExtractor {
    fn extract_text(&self, image: &Path) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::fs::read_to_string(image).map_err(|e| QwopEvolveError::Extraction(e.to_string()))
    }
}

/// Extractor that parks for a long time once entered, to test abandonment.
pub struct StuckExtractor {
    pub entered: AtomicBool,
    pub hold: Duration,
}

impl TextExtractor for StuckExtractor {
    fn extract_text(&self, _image: &Path) -> Result<String> {
        self.entered.store(true, Ordering::SeqCst);
        std::thread::sleep(self.hold);
        Ok(String::new())
    }
}

pub fn fast_observer(poll_interval_ms: u64) -> ObserverConfig {
    ObserverConfig {
        startup_delay_ms: 0,
        poll_interval_ms,
        shutdown_timeout_ms: 2000,
        ..Default::default()
    }
}

pub fn fast_environment() -> EnvironmentConfig {
    EnvironmentConfig {
        startup_settle_ms: 0,
        key_hold_ms: 1,
        reset_settle_ms: 0,
        force_kill_hold_ms: 1,
        ..Default::default()
    }
}

pub fn capture_in(dir: &Path, archive_every: usize) -> CaptureConfig {
    CaptureConfig {
        live_path: dir.join("screenshot.png"),
        archive_dir: dir.join("timelapse"),
        archive_every,
    }
}

pub fn small_evolution(seed: u64) -> EvolutionConfig {
    EvolutionConfig {
        start_population: 3,
        min_length: 4,
        max_length: 8,
        keep_best_n: 2,
        evolve_n: 2,
        add_new_n: 1,
        repeat_pattern_for: 3,
        reset_every_repeat: false,
        max_generations: None,
        seed: Some(seed),
    }
}

pub fn archived_files(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir.join("timelapse")) {
        Ok(entries) => entries.filter_map(|e| e.ok().map(|e| e.path())).collect(),
        Err(_) => Vec::new(),
    }
}
