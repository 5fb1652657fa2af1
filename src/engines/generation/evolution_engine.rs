use crate::config::EvolutionConfig;
use crate::engines::generation::{
    best_log::BestLog,
    operators::{evolve_n, random_sequences, select_best},
};
use crate::error::{QwopEvolveError, Result};
use crate::types::{Action, ActionSequence, EvaluationResult};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Runs one trial of a sequence against the environment.
pub trait SequenceEvaluator {
    /// Bring the environment up before the first trial.
    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    fn evaluate(&mut self, sequence: &[Action]) -> Result<EvaluationResult>;

    /// Tear the environment down. Called on every exit path.
    fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize, population: usize);
    fn on_sequence_evaluated(&mut self, index: usize, total: usize, result: &EvaluationResult);
    fn on_generation_complete(&mut self, generation: usize, best: &[EvaluationResult]);
}

/// Population state machine: evaluate, keep the best, mutate, inject fresh blood.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    population: Vec<ActionSequence>,
    generation: usize,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let population = random_sequences(
            config.start_population,
            config.min_length,
            config.max_length,
            &mut rng,
        );

        Self {
            config,
            population,
            generation: 0,
            rng,
        }
    }

    /// Start from a given population instead of a random one.
    pub fn with_population(mut self, population: Vec<ActionSequence>) -> Self {
        self.population = population;
        self
    }

    pub fn population(&self) -> &[ActionSequence] {
        &self.population
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Run one full evaluate-select-mutate-inject cycle.
    ///
    /// Returns the retained results, best first. If evaluation fails part way
    /// the population is left as it was and the partial results are dropped.
    pub fn evolve_generation<E, C>(
        &mut self,
        evaluator: &mut E,
        best_log: &BestLog,
        callback: &mut C,
    ) -> Result<Vec<EvaluationResult>>
    where
        E: SequenceEvaluator,
        C: ProgressCallback,
    {
        if self.population.is_empty() {
            return Err(QwopEvolveError::Evolution("Population is empty".to_string()));
        }

        callback.on_generation_start(self.generation, self.population.len());

        let results = self.evaluate_population(evaluator, callback)?;
        let best = select_best(results, self.config.keep_best_n);
        best_log.append(&best)?;

        self.population = self.next_population(&best);
        callback.on_generation_complete(self.generation, &best);
        self.generation += 1;

        Ok(best)
    }

    fn evaluate_population<E, C>(
        &self,
        evaluator: &mut E,
        callback: &mut C,
    ) -> Result<Vec<EvaluationResult>>
    where
        E: SequenceEvaluator,
        C: ProgressCallback,
    {
        let total = self.population.len();
        let mut results = Vec::with_capacity(total);

        for (i, sequence) in self.population.iter().enumerate() {
            debug!("Testing sequence {}/{} ({} symbols)", i + 1, total, sequence.len());
            let result = evaluator.evaluate(sequence)?;
            callback.on_sequence_evaluated(i, total, &result);
            results.push(result);
        }

        Ok(results)
    }

    /// Survivors, then `evolve_n - rank` mutants per survivor, then fresh sequences.
    fn next_population(&mut self, best: &[EvaluationResult]) -> Vec<ActionSequence> {
        let mut next = Vec::new();

        for (rank, result) in best.iter().enumerate() {
            next.push(result.sequence.clone());
            next.extend(evolve_n(
                &result.sequence,
                self.config.evolve_n.saturating_sub(rank),
                &mut self.rng,
            ));
        }

        next.extend(random_sequences(
            self.config.add_new_n,
            self.config.min_length,
            self.config.max_length,
            &mut self.rng,
        ));
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::progress::SilentProgressCallback;
    use crate::types::format_sequence;

    /// Scores each sequence by how many `q` symbols it contains.
    struct CountingEvaluator {
        calls: usize,
    }

    impl SequenceEvaluator for CountingEvaluator {
        fn evaluate(&mut self, sequence: &[Action]) -> Result<EvaluationResult> {
            self.calls += 1;
            let score = sequence.iter().filter(|a| **a == Action::Q).count() as f64;
            Ok(EvaluationResult {
                sequence: sequence.to_vec(),
                raw_score: score,
                composite_fitness: score,
            })
        }
    }

    fn config() -> EvolutionConfig {
        EvolutionConfig {
            start_population: 12,
            min_length: 40,
            max_length: 160,
            keep_best_n: 3,
            evolve_n: 5,
            add_new_n: 3,
            seed: Some(99),
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_population() {
        let engine = EvolutionEngine::new(config());
        assert_eq!(engine.population().len(), 12);
        assert!(engine
            .population()
            .iter()
            .all(|s| (40..=160).contains(&s.len())));
        assert_eq!(engine.generation(), 0);
    }

    #[test]
    fn test_next_population_composition() {
        let dir = tempfile::tempdir().unwrap();
        let log = BestLog::new(dir.path().join("best.txt"));
        let mut engine = EvolutionEngine::new(config());
        let mut evaluator = CountingEvaluator { calls: 0 };

        let best = engine
            .evolve_generation(&mut evaluator, &log, &mut SilentProgressCallback)
            .unwrap();

        assert_eq!(evaluator.calls, 12);
        assert_eq!(best.len(), 3);
        // 3 survivors + (5 + 4 + 3) mutants + 3 fresh
        assert_eq!(engine.population().len(), 3 + 12 + 3);
        assert_eq!(engine.generation(), 1);

        // survivors lead their own block of children
        assert_eq!(engine.population()[0], best[0].sequence);
        assert_eq!(engine.population()[6], best[1].sequence);
        assert_eq!(engine.population()[11], best[2].sequence);
        for child in &engine.population()[1..6] {
            assert_eq!(child.len(), best[0].sequence.len());
        }
    }

    #[test]
    fn test_low_ranks_get_no_children_when_keep_exceeds_evolve() {
        let dir = tempfile::tempdir().unwrap();
        let log = BestLog::new(dir.path().join("best.txt"));
        let mut engine = EvolutionEngine::new(EvolutionConfig {
            keep_best_n: 4,
            evolve_n: 2,
            add_new_n: 0,
            ..config()
        });

        engine
            .evolve_generation(
                &mut CountingEvaluator { calls: 0 },
                &log,
                &mut SilentProgressCallback,
            )
            .unwrap();

        // 4 survivors + (2 + 1 + 0 + 0) mutants
        assert_eq!(engine.population().len(), 7);
    }

    #[test]
    fn test_best_log_receives_survivors() {
        let dir = tempfile::tempdir().unwrap();
        let log = BestLog::new(dir.path().join("best.txt"));
        let mut engine = EvolutionEngine::new(config());

        let best = engine
            .evolve_generation(
                &mut CountingEvaluator { calls: 0 },
                &log,
                &mut SilentProgressCallback,
            )
            .unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(&format!("pattern={}", format_sequence(&best[0].sequence))));
    }

    #[test]
    fn test_failed_evaluation_keeps_population() {
        struct FailingEvaluator;
        impl SequenceEvaluator for FailingEvaluator {
            fn evaluate(&mut self, _sequence: &[Action]) -> Result<EvaluationResult> {
                Err(QwopEvolveError::Interrupted)
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let log = BestLog::new(dir.path().join("best.txt"));
        let mut engine = EvolutionEngine::new(config());
        let before = engine.population().to_vec();

        let result =
            engine.evolve_generation(&mut FailingEvaluator, &log, &mut SilentProgressCallback);
        assert!(matches!(result, Err(QwopEvolveError::Interrupted)));
        assert_eq!(engine.population(), before.as_slice());
        assert_eq!(engine.generation(), 0);
        assert!(!log.path().exists());
    }

    #[test]
    fn test_selection_improves_best_score() {
        let dir = tempfile::tempdir().unwrap();
        let log = BestLog::new(dir.path().join("best.txt"));
        let mut engine = EvolutionEngine::new(config());
        let mut evaluator = CountingEvaluator { calls: 0 };

        let first = engine
            .evolve_generation(&mut evaluator, &log, &mut SilentProgressCallback)
            .unwrap();
        let latest = (0..5)
            .map(|_| {
                engine
                    .evolve_generation(&mut evaluator, &log, &mut SilentProgressCallback)
                    .unwrap()
            })
            .last()
            .unwrap();

        // the previous best is always re-evaluated, and this evaluator is deterministic
        assert!(latest[0].composite_fitness >= first[0].composite_fitness);
    }
}
