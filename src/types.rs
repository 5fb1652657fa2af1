use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// One input symbol. Each maps to a single keyboard key held for a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Q, // left thigh
    W, // right thigh
    O, // left calf
    P, // right calf
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Q, Action::W, Action::O, Action::P];

    pub fn key(self) -> char {
        match self {
            Action::Q => 'q',
            Action::W => 'w',
            Action::O => 'o',
            Action::P => 'p',
        }
    }

    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'q' => Some(Action::Q),
            'w' => Some(Action::W),
            'o' => Some(Action::O),
            'p' => Some(Action::P),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Ordered list of actions evolved by the search.
///
/// Sequences are never edited in place once evaluated; mutation clones the
/// parent and works on the copy.
pub type ActionSequence = Vec<Action>;

/// Render a sequence as its concatenated key symbols, e.g. `qwop`.
pub fn format_sequence(sequence: &[Action]) -> String {
    sequence.iter().map(|a| a.key()).collect()
}

/// Parse a string of key symbols back into a sequence.
pub fn parse_sequence(symbols: &str) -> Option<ActionSequence> {
    symbols.chars().map(Action::from_key).collect()
}

/// Round to two decimal places, the precision scores are published at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Outcome of one trial of a sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub sequence: ActionSequence,
    pub raw_score: f64,
    pub composite_fitness: f64,
}

impl EvaluationResult {
    /// Build a result from the last observed score and the trial's wall time.
    ///
    /// `composite_fitness = raw_score + |raw_score| / elapsed_seconds`
    pub fn from_trial(sequence: ActionSequence, raw_score: f64, elapsed: Duration) -> Self {
        let seconds = elapsed.as_secs_f64();
        let speed = if seconds > 0.0 {
            raw_score.abs() / seconds
        } else {
            0.0
        };

        Self {
            sequence,
            raw_score,
            composite_fitness: raw_score + speed,
        }
    }
}

/// One line of the append-only best log.
#[derive(Debug, Clone, PartialEq)]
pub struct BestLogEntry {
    pub raw_score: f64,
    pub composite_fitness: f64,
    pub sequence: ActionSequence,
}

impl From<&EvaluationResult> for BestLogEntry {
    fn from(result: &EvaluationResult) -> Self {
        Self {
            raw_score: result.raw_score,
            composite_fitness: result.composite_fitness,
            sequence: result.sequence.clone(),
        }
    }
}

impl fmt::Display for BestLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "score={}; final={}; pattern={}",
            self.raw_score,
            self.composite_fitness,
            format_sequence(&self.sequence)
        )
    }
}
