pub mod observer;
pub mod score;
pub mod shared;

pub use observer::{ObserverExit, ObserverHandle, ScoreObserver, StopOutcome, TickOutcome};
pub use score::{Assessment, ScoreReader, TerminationReason};
pub use shared::{observation_slots, ObservationReader, ObservationWriter};
