use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to create histogram (max {max_nanos} ns, {significant_digits} digits): {source}")]
    CreateHistogram {
        max_nanos: u64,
        significant_digits: u8,
        #[source]
        source: hdrhistogram::CreationError,
    },
}
