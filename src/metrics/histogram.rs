use hdrhistogram::Histogram;

use crate::error::MetricsError;

/// Percentile rows of the rendered table.
pub const REPORT_PERCENTILES: [f64; 15] = [
    0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 99.0, 99.9, 99.99, 99.999, 100.0,
];

/// Bounded histogram of `dispatch()` call durations in nanoseconds.
#[derive(Debug)]
pub struct LatencyRecorder {
    hist: Histogram<u64>,
    max_nanos: u64,
    dropped: u64,
}

/// Headline numbers of one recorder, detached from the histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySummary {
    pub count: u64,
    pub dropped: u64,
    pub min: u64,
    pub p50: u64,
    pub p99: u64,
    pub max: u64,
}

impl LatencyRecorder {
    /// Create a recorder covering `0..=max_nanos`.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram bounds or precision are invalid.
    pub fn new(max_nanos: u64, significant_digits: u8) -> Result<Self, MetricsError> {
        let hist = Histogram::<u64>::new_with_max(max_nanos, significant_digits).map_err(
            |err| MetricsError::CreateHistogram {
                max_nanos,
                significant_digits,
                source: err,
            },
        )?;
        Ok(Self {
            hist,
            max_nanos,
            dropped: 0,
        })
    }

    /// Record one duration. Values above the maximum are dropped, not clamped.
    pub fn record(&mut self, duration_nanos: u64) -> bool {
        if duration_nanos > self.max_nanos || self.hist.record(duration_nanos).is_err() {
            self.dropped = self.dropped.saturating_add(1);
            return false;
        }
        true
    }

    #[must_use]
    pub fn percentile(&self, percentile: f64) -> u64 {
        self.hist.value_at_percentile(percentile)
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.hist.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hist.is_empty()
    }

    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    #[must_use]
    pub fn min(&self) -> u64 {
        if self.is_empty() { 0 } else { self.hist.min() }
    }

    #[must_use]
    pub fn max(&self) -> u64 {
        if self.is_empty() { 0 } else { self.hist.max() }
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.hist.mean() }
    }

    #[must_use]
    pub fn summary(&self) -> LatencySummary {
        LatencySummary {
            count: self.len(),
            dropped: self.dropped,
            min: self.min(),
            p50: self.percentile(50.0),
            p99: self.percentile(99.0),
            max: self.max(),
        }
    }

    /// Render the percentile table followed by the min/mean/max/total line.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(REPORT_PERCENTILES.len().saturating_add(2));
        lines.push("\tPercentile (%)     Value (ns)          Count      Count Sum".to_owned());

        let mut previous: u64 = 0;
        for percentile in REPORT_PERCENTILES {
            let value = self.percentile(percentile);
            let cumulative = if self.is_empty() {
                0
            } else {
                self.hist.count_between(0, value)
            };
            let count = cumulative.saturating_sub(previous);
            lines.push(format!(
                "\t       {:7.3}      {:>9}      {:>9}      {:>9}",
                percentile,
                group_thousands(value),
                count,
                cumulative
            ));
            previous = cumulative;
        }

        lines.push(format!(
            "\t[Min {} ns, Mean {:.0} ns, Max {} ns, Total {}]",
            self.min(),
            self.mean(),
            self.max(),
            self.len()
        ));
        lines.join("\n")
    }
}

/// `1234567` -> `1,234,567`
pub(crate) fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len().saturating_add(digits.len() / 3));
    let len = digits.len();
    for (idx, ch) in digits.chars().enumerate() {
        let remaining = len.saturating_sub(idx);
        if idx > 0 && remaining % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
