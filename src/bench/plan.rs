use std::time::Duration;

use crate::args::parsers::check_significant_digits;
use crate::args::{
    BenchArgs, DEFAULT_BATCHES, DEFAULT_DRAIN_TIMEOUT, DEFAULT_MAX_LATENCY, DEFAULT_PERIOD_MS,
    DEFAULT_REQUESTS_PER_BATCH, DEFAULT_SETTLE_DELAY, DEFAULT_SIGNIFICANT_DIGITS,
    DEFAULT_WARMUP_BATCHES, DEFAULT_WARMUP_PAUSE,
};
use crate::error::ValidationError;

/// Shape and timing of one backend run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkPlan {
    pub warmup_batches: u64,
    pub requests_per_batch: u64,
    pub batch_count: u64,
    /// Sleep between measured batches, not before the first.
    pub period: Duration,
    /// Sleep after each warmup batch.
    pub warmup_pause: Duration,
    /// Sleep between warmup and measuring.
    pub settle_delay: Duration,
    pub drain_timeout: Duration,
    /// Histogram upper bound.
    pub max_latency: Duration,
    pub significant_digits: u8,
}

impl Default for BenchmarkPlan {
    fn default() -> Self {
        Self {
            warmup_batches: DEFAULT_WARMUP_BATCHES,
            requests_per_batch: DEFAULT_REQUESTS_PER_BATCH,
            batch_count: DEFAULT_BATCHES,
            period: Duration::from_millis(DEFAULT_PERIOD_MS),
            warmup_pause: DEFAULT_WARMUP_PAUSE,
            settle_delay: DEFAULT_SETTLE_DELAY,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            max_latency: DEFAULT_MAX_LATENCY,
            significant_digits: DEFAULT_SIGNIFICANT_DIGITS,
        }
    }
}

impl From<&BenchArgs> for BenchmarkPlan {
    fn from(args: &BenchArgs) -> Self {
        Self {
            warmup_batches: args.warmup_batches,
            requests_per_batch: args.requests_per_batch.get(),
            batch_count: args.batches.get(),
            period: Duration::from_millis(args.period_ms),
            warmup_pause: args.warmup_pause,
            settle_delay: args.settle_delay,
            drain_timeout: args.drain_timeout,
            max_latency: args.max_latency,
            significant_digits: args.significant_digits,
        }
    }
}

impl BenchmarkPlan {
    /// Requests dispatched over warmup plus measuring.
    ///
    /// # Errors
    ///
    /// Returns an error when the total does not fit in `u64`.
    pub fn expected_completions(&self) -> Result<u64, ValidationError> {
        let batches = self.warmup_batches.checked_add(self.batch_count);
        batches
            .and_then(|batches| batches.checked_mul(self.requests_per_batch))
            .ok_or(ValidationError::RequestCountOverflow {
                batches: self.warmup_batches.saturating_add(self.batch_count),
                per_batch: self.requests_per_batch,
            })
    }

    /// # Errors
    ///
    /// Returns an error when the bound is zero or exceeds `u64` nanoseconds.
    pub fn max_latency_nanos(&self) -> Result<u64, ValidationError> {
        u64::try_from(self.max_latency.as_nanos())
            .ok()
            .filter(|nanos| *nanos > 0)
            .ok_or(ValidationError::MaxLatencyOutOfRange)
    }

    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.requests_per_batch == 0 || self.batch_count == 0 {
            return Err(ValidationError::ValueTooSmall { min: 1 });
        }
        check_significant_digits(self.significant_digits)?;
        self.max_latency_nanos()?;
        self.expected_completions()?;
        Ok(())
    }
}
