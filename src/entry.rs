use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::{error, info};

use crate::args::BenchArgs;
use crate::auth::{AuthSecret, sign};
use crate::bench::{BenchmarkPlan, run_all, summary_lines, undrained_count};
use crate::config::{apply_config, load_config};
use crate::error::{AppError, AppResult, AuthError, ValidationError};
use crate::http::{BackendSettings, SignedRequest};

/// Parse arguments, run every selected client, and report.
///
/// # Errors
///
/// Returns an error for invalid arguments or configuration, unusable
/// credentials, or, with `--fail-on-drain-timeout`, undrained clients.
pub fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    crate::logger::init_logging(args.verbose, args.no_color);

    run_with_args(&args).inspect_err(|err| error!("{}", err))
}

fn parse_args() -> AppResult<(BenchArgs, ArgMatches)> {
    let matches = BenchArgs::command().get_matches();
    let args = BenchArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

fn run_with_args(args: &BenchArgs) -> AppResult<()> {
    if args.clients.is_empty() {
        return Err(AppError::validation(ValidationError::NoClients));
    }
    let plan = BenchmarkPlan::from(args);
    plan.validate()?;
    let settings = BackendSettings {
        io_threads: args.io_threads,
        native_transport: args.native_transport,
    };
    log_settings(args, &plan);

    let request = signed_request(args)?;
    let reports = run_all(&args.clients, &request, &settings, &plan)?;

    info!("Summary: \n{}", summary_lines(&reports).join("\n"));

    let undrained = undrained_count(&reports);
    if args.fail_on_drain_timeout && undrained > 0 {
        return Err(AppError::validation(ValidationError::DrainTimeout {
            clients: undrained,
        }));
    }
    Ok(())
}

fn signed_request(args: &BenchArgs) -> AppResult<SignedRequest> {
    let api_key = args
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or(AuthError::MissingApiKey)?;
    let encoded_secret = args
        .api_secret
        .as_deref()
        .filter(|secret| !secret.trim().is_empty())
        .ok_or(AuthError::MissingApiSecret)?;

    let secret = AuthSecret::from_base64(encoded_secret)?;
    let signature = sign(&secret, args.sign_path.as_bytes())?;
    SignedRequest::new(&args.url, api_key, &signature).map_err(AppError::from)
}

fn log_settings(args: &BenchArgs, plan: &BenchmarkPlan) {
    let clients: Vec<&str> = args.clients.iter().map(|kind| kind.as_str()).collect();
    let lines = [
        "Experiment Settings: ".to_owned(),
        format!("\tWeb Client Types: [{}]", clients.join(", ")),
        format!("\tTarget: {}", args.url),
        format!("\tWarmup Batches: {}", plan.warmup_batches),
        format!("\tBatch Count: {}", plan.batch_count),
        format!("\tRequests in Batch: {}", plan.requests_per_batch),
        format!("\tPeriod: {} ms", plan.period.as_millis()),
        format!("\tUse Native?: {}", args.native_transport),
        format!("\tIO Threads: {}", args.io_threads),
        format!("\tDrain Timeout: {:?}", plan.drain_timeout),
    ];
    info!("{}", lines.join("\n"));
}
