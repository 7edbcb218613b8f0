
use std::time::Duration;

use support_single::{MockMode, MockServer, spawn_mock_server_or_skip};
use webclient_latency::args::ClientKind;
use webclient_latency::bench::{BackendReport, BenchmarkPlan, run_benchmark};
use webclient_latency::http::{BackendSettings, SignedRequest};

fn small_plan(drain_timeout: Duration) -> BenchmarkPlan {
    BenchmarkPlan {
        warmup_batches: 1,
        requests_per_batch: 2,
        batch_count: 3,
        period: Duration::from_millis(50),
        warmup_pause: Duration::from_millis(10),
        settle_delay: Duration::from_millis(20),
        drain_timeout,
        ..BenchmarkPlan::default()
    }
}

fn run_against(
    server: &MockServer,
    kind: ClientKind,
    plan: &BenchmarkPlan,
) -> Result<BackendReport, String> {
    let request = SignedRequest::new(
        &format!("{}/derivatives/api/v3/accounts", server.url),
        "test-key",
        "c2lnbmF0dXJl",
    )
    .map_err(|err| format!("request failed: {}", err))?;
    let settings = BackendSettings {
        io_threads: 2,
        native_transport: false,
    };
    run_benchmark(kind, &request, &settings, plan).map_err(|err| format!("run failed: {}", err))
}

fn expect_all_ok(kind: ClientKind) -> Result<(), String> {
    let Some(server) = spawn_mock_server_or_skip(MockMode::Ok200)? else {
        return Ok(());
    };
    let report = run_against(&server, kind, &small_plan(Duration::from_secs(10)))?;

    if !report.drained || report.outstanding != 0 {
        return Err(format!("{}: expected drained run, got {:?}", kind, report));
    }
    if report.dispatched != 8 || report.outcomes.ok != 8 || report.outcomes.total() != 8 {
        return Err(format!("{}: expected 8 ok completions, got {:?}", kind, report));
    }
    if report.recorded.saturating_add(report.dropped) != 6 {
        return Err(format!("{}: expected 6 measured dispatches, got {:?}", kind, report));
    }
    if server.requests() != 8 {
        return Err(format!("{}: server saw {} requests", kind, server.requests()));
    }
    let head = server.first_head().unwrap_or_default();
    if !head.contains("apikey: test-key") || !head.contains("authent: c2lnbmF0dXJl".to_ascii_lowercase().as_str()) {
        return Err(format!("{}: signed headers missing from {:?}", kind, head));
    }
    Ok(())
}

#[test]
fn reqwest_completes_every_request() -> Result<(), String> {
    expect_all_ok(ClientKind::Reqwest)
}

#[test]
fn hyper_completes_every_request() -> Result<(), String> {
    expect_all_ok(ClientKind::Hyper)
}

#[test]
fn pipelined_completes_every_request() -> Result<(), String> {
    expect_all_ok(ClientKind::Pipelined)
}

#[test]
fn non_success_responses_still_complete() -> Result<(), String> {
    let Some(server) = spawn_mock_server_or_skip(MockMode::Status500)? else {
        return Ok(());
    };
    for kind in [ClientKind::Reqwest, ClientKind::Pipelined] {
        let report = run_against(&server, kind, &small_plan(Duration::from_secs(10)))?;
        if !report.drained {
            return Err(format!("{}: expected drained run, got {:?}", kind, report));
        }
        if report.outcomes.non_success != report.dispatched || report.outcomes.ok != 0 {
            return Err(format!("{}: expected all non-success, got {:?}", kind, report));
        }
    }
    Ok(())
}

#[test]
fn hung_responses_time_out_the_drain() -> Result<(), String> {
    let Some(server) = spawn_mock_server_or_skip(MockMode::HangEveryOther)? else {
        return Ok(());
    };
    for kind in [ClientKind::Reqwest, ClientKind::Hyper] {
        let before = server.requests();
        let report = run_against(&server, kind, &small_plan(Duration::from_millis(500)))?;
        let seen = server.requests().saturating_sub(before);
        let hung = (0..seen)
            .map(|offset| before.saturating_add(offset))
            .filter(|index| index % 2 == 1)
            .count();
        let hung = u64::try_from(hung).map_err(|err| err.to_string())?;

        if report.drained {
            return Err(format!("{}: expected drain timeout, got {:?}", kind, report));
        }
        if seen != 8 || report.outstanding != hung {
            return Err(format!(
                "{}: expected {} outstanding of {} seen, got {:?}",
                kind, hung, seen, report
            ));
        }
        if report.outcomes.ok != 8u64.saturating_sub(hung) {
            return Err(format!("{}: unexpected ok count in {:?}", kind, report));
        }
    }
    Ok(())
}
