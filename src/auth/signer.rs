use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

use crate::error::AuthError;

type HmacSha512 = Hmac<Sha512>;

/// Decoded API secret used as the HMAC key.
#[derive(Clone)]
pub struct AuthSecret {
    key: Vec<u8>,
}

impl AuthSecret {
    /// Decode a standard base64 secret.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCredential` when the value is not base64 and
    /// `EmptySecret` when it decodes to zero bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, AuthError> {
        let key = B64
            .decode(encoded.trim().as_bytes())
            .map_err(|err| AuthError::InvalidCredential { source: err })?;
        if key.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        Ok(Self { key })
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.key.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl std::fmt::Debug for AuthSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSecret")
            .field("len", &self.key.len())
            .finish_non_exhaustive()
    }
}

/// Compute the `Authent` header value for `path`.
///
/// `base64(HMAC-SHA512(secret, SHA-256(path)))`
///
/// # Errors
///
/// Returns `AlgorithmUnavailable` if the MAC cannot be keyed.
pub fn sign(secret: &AuthSecret, path: &[u8]) -> Result<String, AuthError> {
    let digest = Sha256::digest(path);
    let mut mac = HmacSha512::new_from_slice(&secret.key)
        .map_err(|err| AuthError::AlgorithmUnavailable { source: err })?;
    mac.update(&digest);
    Ok(B64.encode(mac.finalize().into_bytes()))
}
