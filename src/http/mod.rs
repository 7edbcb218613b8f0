//! Async HTTP backends, the signed request they send, and completion handling.
mod backend;
mod completion;
mod hyper_client;
mod pipelined;
mod reqwest_client;
mod request;
mod runtime;

#[cfg(test)]
mod tests;

pub use backend::{AsyncHttpBackend, BackendGuard, BackendSettings};
pub use completion::{BackendContext, OutcomeCounts, OutcomeTally};
pub use request::{
    API_KEY_HEADER, DEFAULT_SIGN_PATH, DEFAULT_TARGET_URL, SIGNATURE_HEADER, SignedRequest,
};
