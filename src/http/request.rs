use http::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::HttpError;

pub const DEFAULT_TARGET_URL: &str = "https://demo-futures.kraken.com/derivatives/api/v3/accounts";
/// Path fed to the signer; differs from the URL path on purpose.
pub const DEFAULT_SIGN_PATH: &str = "/api/v3/accounts";
pub const API_KEY_HEADER: &str = "APIKey";
pub const SIGNATURE_HEADER: &str = "Authent";

/// The one GET request every backend of a run issues.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    url: Url,
    api_key: HeaderValue,
    signature: HeaderValue,
}

impl SignedRequest {
    /// Validate the target and header values.
    ///
    /// # Errors
    ///
    /// Returns an error for unparsable or non-HTTP URLs and for header values
    /// that cannot be sent.
    pub fn new(url: &str, api_key: &str, signature: &str) -> Result<Self, HttpError> {
        let parsed = Url::parse(url).map_err(|err| HttpError::InvalidUrl {
            url: url.to_owned(),
            source: err,
        })?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(HttpError::UnsupportedScheme {
                    scheme: other.to_owned(),
                });
            }
        }
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(HttpError::MissingHost {
                url: url.to_owned(),
            });
        }

        let api_key = HeaderValue::from_str(api_key).map_err(|err| {
            HttpError::InvalidHeaderValue {
                name: API_KEY_HEADER,
                source: err,
            }
        })?;
        let mut signature = HeaderValue::from_str(signature).map_err(|err| {
            HttpError::InvalidHeaderValue {
                name: SIGNATURE_HEADER,
                source: err,
            }
        })?;
        signature.set_sensitive(true);

        Ok(Self {
            url: parsed,
            api_key,
            signature,
        })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn method(&self) -> http::Method {
        http::Method::GET
    }

    #[must_use]
    pub const fn api_key(&self) -> &HeaderValue {
        &self.api_key
    }

    #[must_use]
    pub const fn signature(&self) -> &HeaderValue {
        &self.signature
    }

    /// The two custom headers, in send order.
    #[must_use]
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert(HeaderName::from_static("apikey"), self.api_key.clone());
        headers.insert(HeaderName::from_static("authent"), self.signature.clone());
        headers
    }

    #[must_use]
    pub fn is_tls(&self) -> bool {
        self.url.scheme() == "https"
    }

    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.url
            .port_or_known_default()
            .unwrap_or(if self.is_tls() { 443 } else { 80 })
    }

    /// `Host` header value: the port is included only when it is not the default.
    #[must_use]
    pub fn authority(&self) -> String {
        match self.url.port() {
            Some(port) => format!("{}:{}", self.host(), port),
            None => self.host().to_owned(),
        }
    }

    #[must_use]
    pub fn path_and_query(&self) -> String {
        match self.url.query() {
            Some(query) => format!("{}?{}", self.url.path(), query),
            None => self.url.path().to_owned(),
        }
    }
}
