use crate::engines::generation::{BestLog, EvolutionEngine, ProgressCallback, SequenceEvaluator};
use crate::error::{QwopEvolveError, Result};
use crate::types::EvaluationResult;
use log::{error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub generations: usize,
    /// Highest composite fitness seen across all completed generations.
    pub best: Option<EvaluationResult>,
    pub interrupted: bool,
}

/// Runs generations until interrupted and always releases the environment.
pub struct Orchestrator<E: SequenceEvaluator, C: ProgressCallback> {
    engine: EvolutionEngine,
    evaluator: E,
    best_log: BestLog,
    callback: C,
    interrupt: Arc<AtomicBool>,
}

impl<E: SequenceEvaluator, C: ProgressCallback> Orchestrator<E, C> {
    pub fn new(
        engine: EvolutionEngine,
        evaluator: E,
        best_log: BestLog,
        callback: C,
        interrupt: Arc<AtomicBool>,
    ) -> Self {
        Self {
            engine,
            evaluator,
            best_log,
            callback,
            interrupt,
        }
    }

    /// Flag that stops the run at the next symbol or evaluation boundary.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    pub fn engine(&self) -> &EvolutionEngine {
        &self.engine
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Drive generations until interrupted or `max_generations` complete.
    ///
    /// An interrupt ends the run cleanly; the generation in flight is discarded.
    pub fn run(&mut self, max_generations: Option<usize>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        let outcome = self
            .evaluator
            .prepare()
            .and_then(|()| self.run_generations(max_generations, &mut summary));
        let released = self.evaluator.release();

        match outcome {
            Ok(()) => {}
            Err(QwopEvolveError::Interrupted) => {
                info!("Evolution stopped by user");
                summary.interrupted = true;
            }
            // a terminal SIGINT also reaches driver child processes
            Err(e) if self.interrupt.load(Ordering::SeqCst) => {
                info!("Evolution stopped by user ({})", e);
                summary.interrupted = true;
            }
            Err(e) => {
                error!("Evolution failed: {}", e);
                if let Err(release_err) = released {
                    warn!("Failed to release environment: {}", release_err);
                }
                return Err(e);
            }
        }

        released?;
        Ok(summary)
    }

    fn run_generations(
        &mut self,
        max_generations: Option<usize>,
        summary: &mut RunSummary,
    ) -> Result<()> {
        while max_generations.map_or(true, |max| summary.generations < max) {
            if self.interrupt.load(Ordering::SeqCst) {
                return Err(QwopEvolveError::Interrupted);
            }

            let best = self.engine.evolve_generation(
                &mut self.evaluator,
                &self.best_log,
                &mut self.callback,
            )?;
            summary.generations += 1;

            if let Some(top) = best.into_iter().next() {
                let improved = summary
                    .best
                    .as_ref()
                    .map_or(true, |b| top.composite_fitness > b.composite_fitness);
                if improved {
                    summary.best = Some(top);
                }
            }
        }
        Ok(())
    }
}
