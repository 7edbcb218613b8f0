use clap::ArgMatches;
use clap::parser::ValueSource;
use std::time::Duration;

use crate::args::parsers::check_significant_digits;
use crate::args::{BenchArgs, ClientKind, PositiveU64};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ConfigFile, DurationValue};

/// Applies configuration values to CLI arguments.
///
/// Values given on the command line win over the file; credentials supplied
/// through the environment win as well.
///
/// # Errors
///
/// Returns an error when a config value is invalid.
pub fn apply_config(
    args: &mut BenchArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "api_key")
        && let Some(api_key) = config.api_key.clone()
    {
        args.api_key = Some(api_key);
    }

    if !is_explicit(matches, "api_secret")
        && let Some(api_secret) = config.api_secret.clone()
    {
        args.api_secret = Some(api_secret);
    }

    if !is_cli(matches, "clients")
        && let Some(clients) = config.clients.as_ref()
    {
        args.clients = parse_clients(clients)?;
    }

    if !is_cli(matches, "period_ms")
        && let Some(period) = config.period
    {
        args.period_ms = period;
    }

    if !is_cli(matches, "batches")
        && let Some(batches) = config.batches
    {
        args.batches = ensure_positive_u64(batches, "batches")?;
    }

    if !is_cli(matches, "requests_per_batch")
        && let Some(per_batch) = config.requests_per_batch
    {
        args.requests_per_batch = ensure_positive_u64(per_batch, "requests_per_batch")?;
    }

    if !is_cli(matches, "warmup_batches")
        && let Some(warmup) = config.warmup_batches
    {
        args.warmup_batches = warmup;
    }

    if !is_cli(matches, "native_transport")
        && let Some(native) = config.native_transport
    {
        args.native_transport = native;
    }

    if !is_cli(matches, "io_threads")
        && let Some(io_threads) = config.io_threads
    {
        args.io_threads = io_threads;
    }

    if !is_cli(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = url;
    }

    if !is_cli(matches, "sign_path")
        && let Some(sign_path) = config.sign_path.clone()
    {
        args.sign_path = sign_path;
    }

    if !is_cli(matches, "settle_delay")
        && let Some(value) = config.settle_delay.as_ref()
    {
        args.settle_delay = to_duration(value, "settle_delay")?;
    }

    if !is_cli(matches, "warmup_pause")
        && let Some(value) = config.warmup_pause.as_ref()
    {
        args.warmup_pause = to_duration(value, "warmup_pause")?;
    }

    if !is_cli(matches, "drain_timeout")
        && let Some(value) = config.drain_timeout.as_ref()
    {
        args.drain_timeout = to_duration(value, "drain_timeout")?;
    }

    if !is_cli(matches, "max_latency")
        && let Some(value) = config.max_latency.as_ref()
    {
        args.max_latency = to_duration(value, "max_latency")?;
    }

    if !is_cli(matches, "significant_digits")
        && let Some(digits) = config.significant_digits
    {
        args.significant_digits = check_significant_digits(digits).map_err(|err| {
            AppError::config(ConfigError::InvalidField {
                field: "significant_digits",
                source: err,
            })
        })?;
    }

    if !is_cli(matches, "fail_on_drain_timeout")
        && let Some(fail) = config.fail_on_drain_timeout
    {
        args.fail_on_drain_timeout = fail;
    }

    if !is_cli(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_explicit(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(ValueSource::CommandLine)
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn to_duration(value: &DurationValue, field: &'static str) -> AppResult<Duration> {
    value
        .to_duration()
        .map_err(|err| AppError::config(ConfigError::InvalidField { field, source: err }))
}

fn parse_clients(values: &[String]) -> AppResult<Vec<ClientKind>> {
    if values.is_empty() {
        return Err(AppError::config(ConfigError::InvalidField {
            field: "clients",
            source: ValidationError::NoClients,
        }));
    }
    values
        .iter()
        .map(|value| {
            value.parse::<ClientKind>().map_err(|err| {
                AppError::config(ConfigError::InvalidField {
                    field: "clients",
                    source: err,
                })
            })
        })
        .collect()
}
