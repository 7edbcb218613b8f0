use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration_arg;
use crate::error::ValidationError;

/// Every key is optional; keys mirror the long CLI flags in snake case.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub clients: Option<Vec<String>>,
    /// Milliseconds between measured batches.
    pub period: Option<u64>,
    pub batches: Option<u64>,
    pub requests_per_batch: Option<u64>,
    pub warmup_batches: Option<u64>,
    pub native_transport: Option<bool>,
    pub io_threads: Option<usize>,
    pub url: Option<String>,
    pub sign_path: Option<String>,
    pub settle_delay: Option<DurationValue>,
    pub warmup_pause: Option<DurationValue>,
    pub drain_timeout: Option<DurationValue>,
    pub max_latency: Option<DurationValue>,
    pub significant_digits: Option<u8>,
    pub fail_on_drain_timeout: Option<bool>,
    pub verbose: Option<bool>,
    pub no_color: Option<bool>,
}

/// A duration given either as whole seconds or as text with a unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => Ok(Duration::from_secs(*secs)),
            DurationValue::Text(text) => parse_duration_arg(text),
        }
    }
}
