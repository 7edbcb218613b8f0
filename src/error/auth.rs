use thiserror::Error;

/// Startup failures while turning the API secret into a signature.
///
/// Messages never include the secret itself.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("API secret is not valid base64: {source}")]
    InvalidCredential {
        #[source]
        source: base64::DecodeError,
    },
    #[error("API secret decoded to an empty key.")]
    EmptySecret,
    #[error("HMAC-SHA512 could not be initialised: {source}")]
    AlgorithmUnavailable {
        #[source]
        source: hmac::digest::InvalidLength,
    },
    #[error("Missing API key (set --api-key, WEBCLIENT_API_KEY or provide in config).")]
    MissingApiKey,
    #[error("Missing API secret (set --api-secret, WEBCLIENT_API_SECRET or provide in config).")]
    MissingApiSecret,
}
