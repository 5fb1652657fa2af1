use super::evolution_engine::SequenceEvaluator;
use crate::config::{EvolutionConfig, ObserverConfig};
use crate::engines::control::{ActionExecutor, EnvironmentDriver, Reading, TextExtractor};
use crate::engines::observation::{
    observation_slots, ObservationReader, ScoreObserver, StopOutcome,
};
use crate::error::{QwopEvolveError, Result};
use crate::types::{Action, EvaluationResult};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Plays one sequence end to end while a fresh observer watches the score.
pub struct GenerationRunner<D: EnvironmentDriver> {
    executor: ActionExecutor<D>,
    extractor: Arc<dyn TextExtractor>,
    observer: ObserverConfig,
    repeat_pattern_for: usize,
    reset_every_repeat: bool,
    interrupt: Arc<AtomicBool>,
}

impl<D: EnvironmentDriver> GenerationRunner<D> {
    pub fn new(
        executor: ActionExecutor<D>,
        extractor: Arc<dyn TextExtractor>,
        observer: ObserverConfig,
        evolution: &EvolutionConfig,
        interrupt: Arc<AtomicBool>,
    ) -> Self {
        Self {
            executor,
            extractor,
            observer,
            repeat_pattern_for: evolution.repeat_pattern_for,
            reset_every_repeat: evolution.reset_every_repeat,
            interrupt,
        }
    }

    pub fn executor(&self) -> &ActionExecutor<D> {
        &self.executor
    }

    fn check_interrupt(&self) -> Result<()> {
        if self.interrupt.load(Ordering::SeqCst) {
            return Err(QwopEvolveError::Interrupted);
        }
        Ok(())
    }

    /// Repeat the sequence until the observer ends the trial or the budget runs out.
    fn run_repetitions(&mut self, sequence: &[Action], reader: &ObservationReader) -> Result<f64> {
        let mut reading = Reading::default();

        for run in 0..self.repeat_pattern_for {
            if run == 0 || self.reset_every_repeat {
                self.executor.reset()?;
            }
            debug!("Run {}/{}", run + 1, self.repeat_pattern_for);

            self.execute_pattern(sequence, reader)?;
            reading = self.executor.observe(reader);
            if reading.terminated {
                break;
            }
        }

        Ok(reading.score)
    }

    /// Press every symbol once, archiving a capture every `archive_every` symbols.
    fn execute_pattern(&mut self, sequence: &[Action], reader: &ObservationReader) -> Result<()> {
        let archive_every = self.executor.archive_every();

        for (index, &action) in sequence.iter().enumerate() {
            self.check_interrupt()?;
            if self.executor.observe(reader).terminated {
                break;
            }

            self.executor.press(action)?;

            if index % archive_every == 0 {
                self.executor.capture_archive()?;
            }
        }
        Ok(())
    }
}

impl<D: EnvironmentDriver> SequenceEvaluator for GenerationRunner<D> {
    fn prepare(&mut self) -> Result<()> {
        self.executor.open()
    }

    fn evaluate(&mut self, sequence: &[Action]) -> Result<EvaluationResult> {
        self.check_interrupt()?;

        let (writer, reader) = observation_slots();
        let observer = ScoreObserver::new(
            &self.observer,
            self.executor.live_capture_path().to_path_buf(),
            Arc::clone(&self.extractor),
            writer,
        )?
        .spawn(self.observer.shutdown_timeout())?;

        let started = Instant::now();
        // `observer` is dropped (stopped) on every early return below
        let raw_score = self.run_repetitions(sequence, &reader)?;
        self.executor.force_kill()?;

        if let StopOutcome::Joined(exit) = observer.stop() {
            debug!("Observer finished: {:?}", exit);
        }

        Ok(EvaluationResult::from_trial(
            sequence.to_vec(),
            raw_score,
            started.elapsed(),
        ))
    }

    fn release(&mut self) -> Result<()> {
        self.executor.release()
    }
}
