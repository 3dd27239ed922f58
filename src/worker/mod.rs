pub mod collector;
pub mod commands;

pub use collector::{ConfigAvailability, DataCollector, EditContext, ProgressEntry};
