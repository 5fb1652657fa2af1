pub mod control;
pub mod generation;
pub mod observation;
