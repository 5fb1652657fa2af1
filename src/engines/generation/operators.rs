use crate::types::{Action, ActionSequence, EvaluationResult};
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly random symbol from the alphabet
pub fn random_action<R: Rng>(rng: &mut R) -> Action {
    *Action::ALL.choose(rng).unwrap_or(&Action::Q)
}

/// Random sequence with length uniform in `[min_length, max_length]`
pub fn random_sequence<R: Rng>(
    min_length: usize,
    max_length: usize,
    rng: &mut R,
) -> ActionSequence {
    let length = rng.gen_range(min_length..=max_length);
    (0..length).map(|_| random_action(rng)).collect()
}

pub fn random_sequences<R: Rng>(
    count: usize,
    min_length: usize,
    max_length: usize,
    rng: &mut R,
) -> Vec<ActionSequence> {
    (0..count)
        .map(|_| random_sequence(min_length, max_length, rng))
        .collect()
}

/// Point mutation on a copy of `parent`.
///
/// Draws a mutation count in `[1, len / 2]` and overwrites that many random
/// positions with random symbols. Positions may repeat and a symbol may be
/// overwritten with itself, so fewer positions can end up changed.
pub fn mutate<R: Rng>(parent: &[Action], rng: &mut R) -> ActionSequence {
    let mut child = parent.to_vec();
    if child.is_empty() {
        return child;
    }

    let mutations = rng.gen_range(1..=(child.len() / 2).max(1));
    for _ in 0..mutations {
        let point = rng.gen_range(0..child.len());
        child[point] = random_action(rng);
    }
    child
}

/// `n` independent mutants of the same parent
pub fn evolve_n<R: Rng>(parent: &[Action], n: usize, rng: &mut R) -> Vec<ActionSequence> {
    (0..n).map(|_| mutate(parent, rng)).collect()
}

/// Top `n` results by composite fitness, highest first.
///
/// The sort is stable, so equal fitness keeps population order.
pub fn select_best(mut results: Vec<EvaluationResult>, n: usize) -> Vec<EvaluationResult> {
    results.sort_by(|a, b| b.composite_fitness.total_cmp(&a.composite_fitness));
    results.truncate(n);
    results
}
