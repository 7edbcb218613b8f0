use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Unknown client '{value}'. Use reqwest, hyper, or pipelined.")]
    UnknownClient { value: String },
    #[error("At least one client must be selected.")]
    NoClients,
    #[error("Significant digits must be between 1 and 5, got {value}.")]
    SignificantDigitsOutOfRange { value: u8 },
    #[error("Invalid boolean '{value}'. Use true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Max latency must be > 0 and fit in u64 nanoseconds.")]
    MaxLatencyOutOfRange,
    #[error("Request count overflow ({batches} batches of {per_batch}).")]
    RequestCountOverflow { batches: u64, per_batch: u64 },
    #[error("{clients} client(s) did not receive all responses before the drain timeout.")]
    DrainTimeout { clients: usize },
}
