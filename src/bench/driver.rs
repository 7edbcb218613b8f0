use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::args::ClientKind;
use crate::error::{AppError, AppResult};
use crate::http::{BackendContext, BackendGuard, BackendSettings, SignedRequest};
use crate::metrics::LatencyRecorder;

use super::plan::BenchmarkPlan;
use super::report::BackendReport;

/// Lifecycle of one backend run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Warmup,
    Measuring,
    Draining,
    Reported,
    Closed,
}

struct PhaseTracker {
    kind: ClientKind,
    phase: Phase,
}

impl PhaseTracker {
    const fn new(kind: ClientKind) -> Self {
        Self {
            kind,
            phase: Phase::Idle,
        }
    }

    fn advance(&mut self, next: Phase) {
        debug!("({}) Phase {:?} -> {:?}", self.kind, self.phase, next);
        self.phase = next;
    }
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

/// Run warmup, measured batches and the drain wait against one engine.
///
/// Only the `dispatch()` call is timed. The backend is shut down before this
/// returns, on every path.
///
/// # Errors
///
/// Returns an error for an invalid plan, a histogram that cannot be created,
/// or an engine that cannot be constructed.
pub fn run_benchmark(
    kind: ClientKind,
    request: &SignedRequest,
    settings: &BackendSettings,
    plan: &BenchmarkPlan,
) -> AppResult<BackendReport> {
    plan.validate()?;
    let expected = plan.expected_completions()?;
    let mut recorder = LatencyRecorder::new(plan.max_latency_nanos()?, plan.significant_digits)?;
    let context = BackendContext::new(expected);
    let mut phase = PhaseTracker::new(kind);

    let backend = BackendGuard::new(kind.build(request, settings, &context)?);
    let mut dispatched: u64 = 0;

    phase.advance(Phase::Warmup);
    debug!(
        "({}) Expecting {} completions.",
        kind,
        context.tracker.expected()
    );
    for _ in 0..plan.warmup_batches {
        for _ in 0..plan.requests_per_batch {
            backend.dispatch();
            dispatched = dispatched.saturating_add(1);
        }
        pause(plan.warmup_pause);
    }
    pause(plan.settle_delay);

    phase.advance(Phase::Measuring);
    info!("({}) Start Experiment", kind);
    for batch in 0..plan.batch_count {
        if batch > 0 {
            pause(plan.period);
        }
        for _ in 0..plan.requests_per_batch {
            let started = Instant::now();
            backend.dispatch();
            let elapsed = started.elapsed();
            dispatched = dispatched.saturating_add(1);
            recorder.record(u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX));
        }
    }
    info!("({}) Finish Experiment", kind);
    info!(
        "({}) Responses are not received so far: {}",
        kind,
        context.tracker.outstanding()
    );
    info!("({}) Balance Requests Stats: \n{}", kind, recorder.render());

    phase.advance(Phase::Draining);
    let drained = context.tracker.await_zero(plan.drain_timeout);
    let outstanding = context.tracker.outstanding();
    if drained {
        info!("({}) All responses successfully received.", kind);
    } else {
        error!("({}) {} responses still not received!", kind, outstanding);
    }

    phase.advance(Phase::Reported);
    let report = BackendReport {
        kind,
        drained,
        outstanding,
        dispatched,
        recorded: recorder.len(),
        dropped: recorder.dropped(),
        outcomes: context.tally.snapshot(),
        latency: recorder.summary(),
    };

    backend.close();
    phase.advance(Phase::Closed);
    Ok(report)
}

/// Run every selected engine in order.
///
/// An engine that cannot be constructed is logged and skipped.
///
/// # Errors
///
/// Returns an error for an invalid plan or histogram settings.
pub fn run_all(
    kinds: &[ClientKind],
    request: &SignedRequest,
    settings: &BackendSettings,
    plan: &BenchmarkPlan,
) -> AppResult<Vec<BackendReport>> {
    let mut reports = Vec::with_capacity(kinds.len());
    for kind in kinds {
        match run_benchmark(*kind, request, settings, plan) {
            Ok(report) => reports.push(report),
            Err(AppError::Http(err)) => {
                error!("({}) Failed to construct client: {}", kind, err);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(reports)
}
