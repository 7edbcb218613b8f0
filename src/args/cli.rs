use clap::Parser;
use std::time::Duration;

use crate::http::{DEFAULT_SIGN_PATH, DEFAULT_TARGET_URL};

use super::defaults::{DEFAULT_PERIOD_MS, DEFAULT_SIGNIFICANT_DIGITS, DEFAULT_WARMUP_BATCHES};
use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_positive_u64, parse_significant_digits,
};
use super::types::{ClientKind, PositiveU64};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Compare the dispatch latency of async HTTP client engines under batched, signed GET load."
)]
pub struct BenchArgs {
    /// API key sent in the APIKey header
    #[arg(long = "api-key", env = "WEBCLIENT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base64 API secret used to sign requests
    #[arg(long = "api-secret", env = "WEBCLIENT_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Client engines to benchmark, comma separated, run in order
    #[arg(long, value_delimiter = ',', default_value = "reqwest", ignore_case = true)]
    pub clients: Vec<ClientKind>,

    /// Pause between measured batches (milliseconds)
    #[arg(long = "period", default_value_t = DEFAULT_PERIOD_MS)]
    pub period_ms: u64,

    /// Number of measured batches
    #[arg(
        long = "batches",
        default_value = "20",
        value_parser = parse_positive_u64
    )]
    pub batches: PositiveU64,

    /// Requests dispatched per batch
    #[arg(
        long = "requests-per-batch",
        default_value = "5",
        value_parser = parse_positive_u64
    )]
    pub requests_per_batch: PositiveU64,

    /// Untimed batches dispatched before measuring
    #[arg(long = "warmup-batches", default_value_t = DEFAULT_WARMUP_BATCHES)]
    pub warmup_batches: u64,

    /// Prefer the platform-native transport where an engine offers one
    #[arg(long = "native-transport")]
    pub native_transport: bool,

    /// Worker threads per engine runtime (0 = engine default)
    #[arg(long = "io-threads", default_value_t = 0)]
    pub io_threads: usize,

    /// Target URL
    #[arg(long, short, default_value = DEFAULT_TARGET_URL)]
    pub url: String,

    /// Path fed to the request signer
    #[arg(long = "sign-path", default_value = DEFAULT_SIGN_PATH)]
    pub sign_path: String,

    /// Wait between warmup and measuring (supports ms/s/m/h)
    #[arg(long = "settle-delay", default_value = "2s", value_parser = parse_duration_arg)]
    pub settle_delay: Duration,

    /// Pause after each warmup batch (supports ms/s/m/h)
    #[arg(long = "warmup-pause", default_value = "100ms", value_parser = parse_duration_arg)]
    pub warmup_pause: Duration,

    /// How long to wait for outstanding responses (supports ms/s/m/h)
    #[arg(long = "drain-timeout", default_value = "2m", value_parser = parse_duration_arg)]
    pub drain_timeout: Duration,

    /// Histogram upper bound; slower dispatches are dropped (supports ms/s/m/h)
    #[arg(long = "max-latency", default_value = "100ms", value_parser = parse_duration_arg)]
    pub max_latency: Duration,

    /// Histogram precision in significant decimal digits (1-5)
    #[arg(
        long = "significant-digits",
        default_value_t = DEFAULT_SIGNIFICANT_DIGITS,
        value_parser = parse_significant_digits
    )]
    pub significant_digits: u8,

    /// Exit non-zero when any client leaves responses outstanding
    #[arg(long = "fail-on-drain-timeout")]
    pub fail_on_drain_timeout: bool,

    /// Path to config file (TOML/JSON). Defaults to ./webclient-latency.toml or ./webclient-latency.json if present.
    #[arg(long)]
    pub config: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by WEBCLIENT_LOG/RUST_LOG)
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
