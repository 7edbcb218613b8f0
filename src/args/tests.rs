use super::parsers::{parse_bool_env, parse_duration_arg, parse_significant_digits};
use super::*;
use crate::error::ValidationError;
use clap::Parser;
use std::time::Duration;

fn parse(args: &[&str]) -> Result<BenchArgs, String> {
    let mut argv = vec!["webclient-latency"];
    argv.extend_from_slice(args);
    BenchArgs::try_parse_from(argv).map_err(|err| format!("Expected parse success: {}", err))
}

#[test]
fn defaults_match_published_constants() -> Result<(), String> {
    let args = parse(&["--api-key", "k", "--api-secret", "s"])?;
    if args.clients != [ClientKind::Reqwest] {
        return Err(format!("Unexpected clients: {:?}", args.clients));
    }
    if args.period_ms != DEFAULT_PERIOD_MS
        || args.batches.get() != DEFAULT_BATCHES
        || args.requests_per_batch.get() != DEFAULT_REQUESTS_PER_BATCH
        || args.warmup_batches != DEFAULT_WARMUP_BATCHES
        || args.significant_digits != DEFAULT_SIGNIFICANT_DIGITS
    {
        return Err(format!("Unexpected count defaults: {:?}", args));
    }
    if args.settle_delay != DEFAULT_SETTLE_DELAY
        || args.warmup_pause != DEFAULT_WARMUP_PAUSE
        || args.drain_timeout != DEFAULT_DRAIN_TIMEOUT
        || args.max_latency != DEFAULT_MAX_LATENCY
    {
        return Err(format!("Unexpected duration defaults: {:?}", args));
    }
    if args.url != crate::http::DEFAULT_TARGET_URL || args.sign_path != crate::http::DEFAULT_SIGN_PATH
    {
        return Err("Unexpected target defaults".to_owned());
    }
    Ok(())
}

#[test]
fn clients_accept_comma_list() -> Result<(), String> {
    let args = parse(&["--clients", "hyper,Pipelined,reqwest"])?;
    let expected = [ClientKind::Hyper, ClientKind::Pipelined, ClientKind::Reqwest];
    if args.clients != expected {
        return Err(format!("Unexpected clients: {:?}", args.clients));
    }
    Ok(())
}

#[test]
fn unknown_client_is_rejected() -> Result<(), String> {
    if parse(&["--clients", "reqwest,curl"]).is_ok() {
        return Err("Expected unknown client to be rejected".to_owned());
    }
    match "curl".parse::<ClientKind>() {
        Err(ValidationError::UnknownClient { value }) if value == "curl" => Ok(()),
        other => Err(format!("Expected UnknownClient, got {:?}", other)),
    }
}

#[test]
fn zero_batches_is_rejected() -> Result<(), String> {
    if parse(&["--batches", "0"]).is_ok() {
        return Err("Expected zero batches to be rejected".to_owned());
    }
    if parse(&["--requests-per-batch", "0"]).is_ok() {
        return Err("Expected zero requests per batch to be rejected".to_owned());
    }
    let args = parse(&["--warmup-batches", "0", "--period", "0"])?;
    if args.warmup_batches != 0 || args.period_ms != 0 {
        return Err("Expected zero warmup and period to be accepted".to_owned());
    }
    Ok(())
}

#[test]
fn duration_units_are_parsed() -> Result<(), String> {
    let cases = [
        ("250ms", Duration::from_millis(250)),
        ("3", Duration::from_secs(3)),
        ("3s", Duration::from_secs(3)),
        ("2m", Duration::from_secs(120)),
        ("1h", Duration::from_secs(3600)),
        ("0ms", Duration::ZERO),
    ];
    for (input, expected) in cases {
        let parsed = parse_duration_arg(input).map_err(|err| format!("{}: {}", input, err))?;
        if parsed != expected {
            return Err(format!("{} parsed as {:?}", input, parsed));
        }
    }
    for bad in ["", "ms", "10d", "5 s"] {
        if parse_duration_arg(bad).is_ok() {
            return Err(format!("Expected '{}' to be rejected", bad));
        }
    }
    Ok(())
}

#[test]
fn significant_digits_range_is_enforced() -> Result<(), String> {
    for ok in ["1", "5"] {
        parse_significant_digits(ok).map_err(|err| format!("{}: {}", ok, err))?;
    }
    for bad in ["0", "6", "x"] {
        if parse_significant_digits(bad).is_ok() {
            return Err(format!("Expected '{}' to be rejected", bad));
        }
    }
    Ok(())
}

#[test]
fn bool_env_values() -> Result<(), String> {
    for (input, expected) in [("1", true), ("YES", true), ("off", false), ("", false)] {
        let parsed = parse_bool_env(input).map_err(|err| err.to_string())?;
        if parsed != expected {
            return Err(format!("{:?} parsed as {}", input, parsed));
        }
    }
    if parse_bool_env("maybe").is_ok() {
        return Err("Expected 'maybe' to be rejected".to_owned());
    }
    Ok(())
}
