//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod tests;

pub use cli::BenchArgs;
pub use types::{ClientKind, PositiveU64};

pub(crate) use defaults::DEFAULT_USER_AGENT;
pub use defaults::{
    DEFAULT_BATCHES, DEFAULT_DRAIN_TIMEOUT, DEFAULT_MAX_LATENCY, DEFAULT_PERIOD_MS,
    DEFAULT_REQUESTS_PER_BATCH, DEFAULT_SETTLE_DELAY, DEFAULT_SIGNIFICANT_DIGITS,
    DEFAULT_WARMUP_BATCHES, DEFAULT_WARMUP_PAUSE,
};
