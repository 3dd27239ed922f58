pub mod commands;
pub mod report;

pub use report::{Report, ReportRow, Stats};
