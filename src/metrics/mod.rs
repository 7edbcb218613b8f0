//! Completion tracking and dispatch-latency histograms.
mod histogram;
mod tracker;


pub use histogram::{LatencyRecorder, LatencySummary, REPORT_PERCENTILES};
pub use tracker::CompletionTracker;
