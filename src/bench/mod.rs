//! Warmup, measured batches, drain, and reporting for each client engine.
mod driver;
mod plan;
mod report;


pub use driver::{Phase, run_all, run_benchmark};
pub use plan::BenchmarkPlan;
pub use report::{BackendReport, summary_lines, undrained_count};
