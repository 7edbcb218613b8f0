use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::error;

use crate::args::ClientKind;
use crate::metrics::CompletionTracker;

const SUCCESS_STATUS: u16 = 200;

/// Shared state a backend reports completions into.
#[derive(Debug, Clone)]
pub struct BackendContext {
    pub tracker: Arc<CompletionTracker>,
    pub tally: Arc<OutcomeTally>,
}

impl BackendContext {
    #[must_use]
    pub fn new(expected: u64) -> Self {
        Self {
            tracker: Arc::new(CompletionTracker::new(expected)),
            tally: Arc::new(OutcomeTally::default()),
        }
    }
}

/// Per-outcome completion counters.
#[derive(Debug, Default)]
pub struct OutcomeTally {
    ok: AtomicU64,
    non_success: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    pub ok: u64,
    pub non_success: u64,
    pub failed: u64,
    pub cancelled: u64,
}

impl OutcomeCounts {
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.ok
            .saturating_add(self.non_success)
            .saturating_add(self.failed)
            .saturating_add(self.cancelled)
    }
}

impl OutcomeTally {
    #[must_use]
    pub fn snapshot(&self) -> OutcomeCounts {
        OutcomeCounts {
            ok: self.ok.load(Ordering::Acquire),
            non_success: self.non_success.load(Ordering::Acquire),
            failed: self.failed.load(Ordering::Acquire),
            cancelled: self.cancelled.load(Ordering::Acquire),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::AcqRel);
    }
}

#[derive(Debug)]
struct HandlerInner {
    kind: ClientKind,
    context: BackendContext,
}

/// Completion callback shared by every request of one backend.
#[derive(Debug, Clone)]
pub(crate) struct ResponseHandler {
    inner: Arc<HandlerInner>,
}

impl ResponseHandler {
    pub(crate) fn new(kind: ClientKind, context: &BackendContext) -> Self {
        Self {
            inner: Arc::new(HandlerInner {
                kind,
                context: context.clone(),
            }),
        }
    }

    /// Start tracking one dispatched request.
    pub(crate) fn begin(&self) -> PendingCompletion {
        PendingCompletion {
            handler: Some(Arc::clone(&self.inner)),
        }
    }
}

/// One in-flight request. Signals exactly once: through `responded`,
/// `failed`, or, when dropped unconsumed, as a cancellation.
#[derive(Debug)]
pub(crate) struct PendingCompletion {
    handler: Option<Arc<HandlerInner>>,
}

impl PendingCompletion {
    pub(crate) fn responded(mut self, status: u16) {
        let Some(handler) = self.handler.take() else {
            return;
        };
        let tally = &handler.context.tally;
        if status == SUCCESS_STATUS {
            OutcomeTally::bump(&tally.ok);
        } else {
            OutcomeTally::bump(&tally.non_success);
        }
        handler.context.tracker.decrement();
        if status != SUCCESS_STATUS {
            error!("({}) Response is not successful: {}", handler.kind, status);
        }
    }

    pub(crate) fn failed(mut self, reason: &dyn Display) {
        let Some(handler) = self.handler.take() else {
            return;
        };
        OutcomeTally::bump(&handler.context.tally.failed);
        handler.context.tracker.decrement();
        error!("({}) Request failed: {}", handler.kind, reason);
    }
}

impl Drop for PendingCompletion {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            OutcomeTally::bump(&handler.context.tally.cancelled);
            handler.context.tracker.decrement();
            error!("({}) Request has been cancelled", handler.kind);
        }
    }
}
