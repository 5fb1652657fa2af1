use super::score::{ScoreReader, TerminationReason};
use super::shared::ObservationWriter;
use crate::config::ObserverConfig;
use crate::engines::control::TextExtractor;
use crate::error::{QwopEvolveError, Result};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const JOIN_POLL: Duration = Duration::from_millis(10);

/// Result of one sampling tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Nothing usable in this sample; slots untouched.
    Skipped(String),
    Published(f64),
    Terminated(TerminationReason),
}

/// Why the worker loop returned.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverExit {
    Stopped,
    Terminated(TerminationReason),
}

#[derive(Debug, Clone, PartialEq)]
pub enum StopOutcome {
    Joined(ObserverExit),
    /// The worker ignored the stop request past the shutdown timeout and was detached.
    Abandoned,
    Panicked,
}

/// Background worker that samples the live capture and publishes score/termination.
pub struct ScoreObserver {
    reader: ScoreReader,
    extractor: Arc<dyn TextExtractor>,
    capture_path: PathBuf,
    writer: ObservationWriter,
    startup_delay: Duration,
    poll_interval: Duration,
}

impl ScoreObserver {
    pub fn new(
        config: &ObserverConfig,
        capture_path: PathBuf,
        extractor: Arc<dyn TextExtractor>,
        writer: ObservationWriter,
    ) -> Result<Self> {
        Ok(Self {
            reader: ScoreReader::new(config)?,
            extractor,
            capture_path,
            writer,
            startup_delay: config.startup_delay(),
            poll_interval: config.poll_interval(),
        })
    }

    /// Sample the latest capture once and update the slots.
    pub fn tick(&self) -> TickOutcome {
        let text = match self.extractor.extract_text(&self.capture_path) {
            Ok(text) => text,
            Err(e) => return TickOutcome::Skipped(e.to_string()),
        };

        let assessment = self.reader.assess(self.writer.published_score(), &text);
        if let Some(score) = assessment.score {
            self.writer.publish_score(score);
        }

        match (assessment.termination, assessment.score) {
            (Some(reason), _) => {
                self.writer.signal_termination();
                TickOutcome::Terminated(reason)
            }
            (None, Some(score)) => TickOutcome::Published(score),
            (None, None) => TickOutcome::Skipped("no score in capture".to_string()),
        }
    }

    /// Start the worker on its own thread.
    pub fn spawn(self, shutdown_timeout: Duration) -> Result<ObserverHandle> {
        let (stop_tx, stop_rx) = channel();

        let handle = thread::Builder::new()
            .name("score-observer".to_string())
            .spawn(move || self.run(stop_rx))
            .map_err(|e| QwopEvolveError::Observer(format!("Failed to spawn observer: {}", e)))?;

        Ok(ObserverHandle {
            handle: Some(handle),
            stop_tx: Some(stop_tx),
            shutdown_timeout,
        })
    }

    fn run(self, stop_rx: Receiver<()>) -> ObserverExit {
        if stop_requested(&stop_rx, self.startup_delay) {
            return ObserverExit::Stopped;
        }

        loop {
            if stop_requested(&stop_rx, self.poll_interval) {
                return ObserverExit::Stopped;
            }

            match self.tick() {
                TickOutcome::Skipped(reason) => debug!("Observer tick skipped: {}", reason),
                TickOutcome::Published(score) => debug!("Observer published {}", score),
                TickOutcome::Terminated(reason) => {
                    info!("Observer ending trial: {:?}", reason);
                    return ObserverExit::Terminated(reason);
                }
            }
        }
    }
}

/// Sleep for `wait` unless a stop arrives first. A dropped sender counts as a stop.
fn stop_requested(stop_rx: &Receiver<()>, wait: Duration) -> bool {
    !matches!(stop_rx.recv_timeout(wait), Err(RecvTimeoutError::Timeout))
}

/// Scoped handle to a running observer. Dropping it stops the worker.
pub struct ObserverHandle {
    handle: Option<JoinHandle<ObserverExit>>,
    stop_tx: Option<Sender<()>>,
    shutdown_timeout: Duration,
}

impl ObserverHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Request a stop, wait up to the shutdown timeout, then detach.
    pub fn stop(mut self) -> StopOutcome {
        self.shutdown()
    }

    fn shutdown(&mut self) -> StopOutcome {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }

        let Some(handle) = self.handle.take() else {
            return StopOutcome::Joined(ObserverExit::Stopped);
        };

        let deadline = Instant::now() + self.shutdown_timeout;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                warn!(
                    "Observer did not stop within {:?}; abandoning it",
                    self.shutdown_timeout
                );
                return StopOutcome::Abandoned;
            }
            thread::sleep(JOIN_POLL);
        }

        match handle.join() {
            Ok(exit) => StopOutcome::Joined(exit),
            Err(_) => {
                warn!("Observer thread panicked");
                StopOutcome::Panicked
            }
        }
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.shutdown();
        }
    }
}
