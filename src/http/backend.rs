use tracing::debug;

use crate::args::ClientKind;
use crate::error::HttpError;

use super::completion::{BackendContext, ResponseHandler};
use super::hyper_client::HyperBackend;
use super::pipelined::PipelinedBackend;
use super::reqwest_client::ReqwestBackend;
use super::request::SignedRequest;

/// One async HTTP engine issuing the signed request.
///
/// `dispatch` must return as soon as the request is handed to the engine;
/// completion is reported through the backend's `ResponseHandler`.
pub trait AsyncHttpBackend: Send {
    fn kind(&self) -> ClientKind;

    /// Issue one request without waiting for its response.
    fn dispatch(&self);

    /// Release connections and stop the engine's threads.
    fn shutdown(self: Box<Self>);
}

/// Advisory transport settings shared by every engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackendSettings {
    /// Worker threads for the engine runtime; 0 keeps the default.
    pub io_threads: usize,
    pub native_transport: bool,
}

impl ClientKind {
    /// Construct this engine, wired to `context`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine's runtime, client, or connection cannot
    /// be established.
    pub fn build(
        self,
        request: &SignedRequest,
        settings: &BackendSettings,
        context: &BackendContext,
    ) -> Result<Box<dyn AsyncHttpBackend>, HttpError> {
        if settings.native_transport {
            debug!(
                "({}) Native transport requested; tokio already drives the platform reactor.",
                self
            );
        }
        let handler = ResponseHandler::new(self, context);
        let backend: Box<dyn AsyncHttpBackend> = match self {
            Self::Reqwest => Box::new(ReqwestBackend::build(request, settings, handler)?),
            Self::Hyper => Box::new(HyperBackend::build(request, settings, handler)?),
            Self::Pipelined => Box::new(PipelinedBackend::build(request, settings, handler)?),
        };
        Ok(backend)
    }
}

/// Owns a backend for one run and shuts it down on every exit path.
pub struct BackendGuard {
    backend: Option<Box<dyn AsyncHttpBackend>>,
}

impl BackendGuard {
    #[must_use]
    pub const fn new(backend: Box<dyn AsyncHttpBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    pub fn dispatch(&self) {
        if let Some(backend) = self.backend.as_ref() {
            backend.dispatch();
        }
    }

    /// Shut the backend down now instead of at drop.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(backend) = self.backend.take() {
            let kind = backend.kind();
            backend.shutdown();
            debug!("({}) Backend shut down.", kind);
        }
    }
}

impl Drop for BackendGuard {
    fn drop(&mut self) {
        self.release();
    }
}
