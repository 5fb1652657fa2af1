pub mod best_log;
pub mod evolution_engine;
pub mod operators;
pub mod progress;
pub mod runner;

pub use best_log::BestLog;
pub use evolution_engine::{EvolutionEngine, ProgressCallback, SequenceEvaluator};
pub use progress::{LogProgressCallback, SilentProgressCallback};
pub use runner::GenerationRunner;
