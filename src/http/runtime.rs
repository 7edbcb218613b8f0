use std::future::Future;
use std::time::Duration;

use tokio::runtime::{Builder, EnterGuard, Runtime};

use crate::args::ClientKind;
use crate::error::HttpError;

/// Time given to in-flight tasks to unwind when a backend shuts down.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Thread pool and reactor owned by one backend.
#[derive(Debug)]
pub(crate) struct IoRuntime {
    runtime: Runtime,
}

impl IoRuntime {
    /// `io_threads == 0` keeps tokio's default worker count.
    pub(crate) fn build(kind: ClientKind, io_threads: usize) -> Result<Self, HttpError> {
        let mut builder = Builder::new_multi_thread();
        builder
            .enable_all()
            .thread_name(format!("{}-io", kind.as_str()));
        if io_threads > 0 {
            builder.worker_threads(io_threads);
        }
        let runtime = builder
            .build()
            .map_err(|err| HttpError::BuildRuntime { source: err })?;
        Ok(Self { runtime })
    }

    pub(crate) fn enter(&self) -> EnterGuard<'_> {
        self.runtime.enter()
    }

    pub(crate) fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Hand a task to the pool without waiting on it.
    pub(crate) fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        drop(self.runtime.spawn(future));
    }

    pub(crate) fn shutdown(self) {
        self.runtime.shutdown_timeout(SHUTDOWN_GRACE);
    }
}
