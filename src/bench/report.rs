use crate::args::ClientKind;
use crate::http::OutcomeCounts;
use crate::metrics::LatencySummary;

/// Outcome of one backend run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReport {
    pub kind: ClientKind,
    /// Every dispatched request completed before the drain timeout.
    pub drained: bool,
    /// Completions still missing when the drain wait ended.
    pub outstanding: u64,
    pub dispatched: u64,
    /// Measured dispatches recorded in the histogram.
    pub recorded: u64,
    /// Measured dispatches above the histogram bound.
    pub dropped: u64,
    pub outcomes: OutcomeCounts,
    pub latency: LatencySummary,
}

impl BackendReport {
    fn summary_line(&self) -> String {
        format!(
            "\t{:<10} {:>9} {:>9} {:>9} {:>9}   ok={} non_success={} failed={} cancelled={} dropped={} drained={}",
            self.kind.as_str(),
            self.latency.p50,
            self.latency.p99,
            self.latency.max,
            self.recorded,
            self.outcomes.ok,
            self.outcomes.non_success,
            self.outcomes.failed,
            self.outcomes.cancelled,
            self.dropped,
            self.drained,
        )
    }
}

/// Final comparison table, one row per backend, latencies in nanoseconds.
#[must_use]
pub fn summary_lines(reports: &[BackendReport]) -> Vec<String> {
    let mut lines = Vec::with_capacity(reports.len().saturating_add(1));
    lines.push(format!(
        "\t{:<10} {:>9} {:>9} {:>9} {:>9}",
        "Client", "p50 (ns)", "p99 (ns)", "Max (ns)", "Samples"
    ));
    lines.extend(reports.iter().map(BackendReport::summary_line));
    lines
}

#[must_use]
pub fn undrained_count(reports: &[BackendReport]) -> usize {
    reports.iter().filter(|report| !report.drained).count()
}
