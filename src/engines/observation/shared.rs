//! Shared observation state for a single evaluation.
//!
//! Two scalar slots cross the thread boundary: the latest published score and
//! the termination flag. Each slot fits in one atomic word, so a reader can
//! never see a torn value. The slots are split into a [`ObservationWriter`]
//! owned by the score observer and an [`ObservationReader`] owned by the
//! generation runner. Neither handle is `Clone`, which keeps exactly one
//! writer and one reader per slot for the lifetime of the evaluation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Slots {
    score_bits: AtomicU64,
    terminated: AtomicBool,
}

/// Create a fresh pair of handles with score `0.0` and no termination.
pub fn observation_slots() -> (ObservationWriter, ObservationReader) {
    let slots = Arc::new(Slots {
        score_bits: AtomicU64::new(0.0f64.to_bits()),
        terminated: AtomicBool::new(false),
    });
    (
        ObservationWriter {
            slots: Arc::clone(&slots),
        },
        ObservationReader { slots },
    )
}

/// Sole writer of the observation slots.
#[derive(Debug)]
pub struct ObservationWriter {
    slots: Arc<Slots>,
}

impl ObservationWriter {
    pub fn publish_score(&self, score: f64) {
        self.slots.score_bits.store(score.to_bits(), Ordering::Release);
    }

    pub fn signal_termination(&self) {
        self.slots.terminated.store(true, Ordering::Release);
    }

    /// The value this writer last published.
    pub fn published_score(&self) -> f64 {
        f64::from_bits(self.slots.score_bits.load(Ordering::Acquire))
    }
}

/// Sole reader of the observation slots.
#[derive(Debug)]
pub struct ObservationReader {
    slots: Arc<Slots>,
}

impl ObservationReader {
    pub fn score(&self) -> f64 {
        f64::from_bits(self.slots.score_bits.load(Ordering::Acquire))
    }

    pub fn is_terminated(&self) -> bool {
        self.slots.terminated.load(Ordering::Acquire)
    }
}
