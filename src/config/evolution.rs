use super::traits::{invalid, ConfigSection};
use crate::error::QwopEvolveError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Number of random sequences in the first generation.
    pub start_population: usize,
    pub min_length: usize,
    pub max_length: usize,
    /// Survivors carried into the next generation.
    pub keep_best_n: usize,
    /// Children produced for the best survivor; rank `i` gets `evolve_n - i`.
    pub evolve_n: usize,
    /// Fresh random sequences injected each generation.
    pub add_new_n: usize,
    /// Maximum repetitions of a sequence within one trial.
    pub repeat_pattern_for: usize,
    /// Reset before every repetition instead of only the first. The first sample
    /// after such a reset reads as a regression, so this is off by default.
    pub reset_every_repeat: bool,
    /// Stop after this many generations; run until interrupted when unset.
    pub max_generations: Option<usize>,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            start_population: 12,
            min_length: 40,
            max_length: 160,
            keep_best_n: 3,
            evolve_n: 5,
            add_new_n: 3,
            repeat_pattern_for: 300,
            reset_every_repeat: false,
            max_generations: None,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), QwopEvolveError> {
        if self.start_population == 0 {
            return Err(invalid::<Self>("start_population must be at least 1"));
        }
        if self.min_length < 2 {
            return Err(invalid::<Self>("min_length must be at least 2"));
        }
        if self.min_length > self.max_length {
            return Err(invalid::<Self>("min_length must not exceed max_length"));
        }
        if self.keep_best_n == 0 {
            return Err(invalid::<Self>("keep_best_n must be at least 1"));
        }
        if self.evolve_n == 0 {
            return Err(invalid::<Self>("evolve_n must be at least 1"));
        }
        if self.repeat_pattern_for == 0 {
            return Err(invalid::<Self>("repeat_pattern_for must be at least 1"));
        }
        Ok(())
    }
}
