use super::evolution_engine::ProgressCallback;
use crate::types::EvaluationResult;
use log::info;

/// Reports progress through the `log` facade.
pub struct LogProgressCallback;

impl ProgressCallback for LogProgressCallback {
    fn on_generation_start(&mut self, generation: usize, population: usize) {
        info!("=== Generation {} ({} sequences) ===", generation + 1, population);
    }

    fn on_sequence_evaluated(&mut self, index: usize, total: usize, result: &EvaluationResult) {
        info!(
            "Sequence {}/{} distance: {}, final score: {:.4}",
            index + 1,
            total,
            result.raw_score,
            result.composite_fitness
        );
    }

    fn on_generation_complete(&mut self, generation: usize, best: &[EvaluationResult]) {
        match best.first() {
            Some(top) => info!(
                "Generation {} complete. Best final score: {:.4}",
                generation + 1,
                top.composite_fitness
            ),
            None => info!("Generation {} complete with no results", generation + 1),
        }
    }
}

/// Forwards nothing; handy when the caller only wants the returned results.
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_start(&mut self, _generation: usize, _population: usize) {}
    fn on_sequence_evaluated(&mut self, _index: usize, _total: usize, _result: &EvaluationResult) {}
    fn on_generation_complete(&mut self, _generation: usize, _best: &[EvaluationResult]) {}
}
