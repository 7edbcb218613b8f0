use std::time::Duration;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("webclient-latency/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_PERIOD_MS: u64 = 200;
pub const DEFAULT_BATCHES: u64 = 20;
pub const DEFAULT_REQUESTS_PER_BATCH: u64 = 5;
pub const DEFAULT_WARMUP_BATCHES: u64 = 2;
pub const DEFAULT_SIGNIFICANT_DIGITS: u8 = 3;

pub const DEFAULT_WARMUP_PAUSE: Duration = Duration::from_millis(100);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(2);
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(120);
/// Upper bound of the latency histogram; slower dispatches are dropped.
pub const DEFAULT_MAX_LATENCY: Duration = Duration::from_millis(100);
