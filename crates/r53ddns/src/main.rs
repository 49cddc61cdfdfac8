// # r53ddns - Route 53 dynamic-DNS updater
//
// A one-shot updater: resolve the public address, push it into every
// configured Route 53 hosted zone, exit. Run it from cron or a systemd timer.
//
// The binary is a thin integration layer:
// 1. Parse command-line flags
// 2. Load the YAML configuration
// 3. Initialize logging (stderr or the configured log file)
// 4. Wire the HTTP address lookup and the Route 53 provider into `run_once`
// 5. Map the outcome to an exit code
//
// ## Example
//
// ```bash
// r53ddns --config /etc/r53ddns/configuration.yaml
// DDNS_DRY_RUN=true r53ddns -c conf/configuration.yaml --log-level debug
// ```

use anyhow::{Context, Result};
use clap::Parser;
use r53ddns_core::{DdnsConfig, Error, run_once};
use r53ddns_ip_http::HttpIpSource;
use r53ddns_provider_route53::Route53Provider;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use tracing::{Level, Subscriber, error, info};
use tracing_subscriber::FmtSubscriber;

const DEFAULT_CONFIG_PATH: &str = "conf/configuration.yaml";

/// Exit codes for different termination scenarios
///
/// - 0: All sites processed
/// - 1: Configuration or startup error
/// - 2: Runtime error (lookup, credentials, provider)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Normal exit
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Push the current public IP address into AWS Route 53 records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file to use
    #[arg(short, long, env = "DDNS_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DDNS_LOG_LEVEL", default_value = "info", value_parser = parse_level)]
    log_level: Level,

    /// Log the change batches instead of submitting them
    #[arg(long, env = "DDNS_DRY_RUN")]
    dry_run: bool,
}

fn parse_level(s: &str) -> std::result::Result<Level, String> {
    match s.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(format!(
            "'{}' is not valid. Valid levels: trace, debug, info, warn, error",
            s
        )),
    }
}

/// Open the log file for appending, creating it if needed
fn open_log_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Unable to open log file {}", path.display()))
}

/// Build the tracing subscriber
///
/// Output goes to stderr unless a log file is configured, in which case it
/// is appended to that file.
fn build_subscriber(
    level: Level,
    log_file: Option<&Path>,
) -> Result<Box<dyn Subscriber + Send + Sync>> {
    let builder = FmtSubscriber::builder().with_max_level(level);

    let subscriber: Box<dyn Subscriber + Send + Sync> = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            Box::new(builder.with_ansi(false).with_writer(Mutex::new(file)).finish())
        }
        None => Box::new(builder.with_writer(std::io::stderr).finish()),
    };

    Ok(subscriber)
}

/// Install the global tracing subscriber
fn init_logging(level: Level, log_file: Option<&Path>) -> Result<()> {
    let subscriber = build_subscriber(level, log_file)?;
    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration before logging: the log destination lives in it
    let config = match DdnsConfig::load(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = init_logging(args.log_level, config.log_file.as_deref()) {
        eprintln!("{:#}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!(
        "Configuration loaded from {}: {} site(s)",
        args.config.display(),
        config.sites.len()
    );
    config.warn_suspicious();

    let source = match HttpIpSource::from_config(&config) {
        Ok(source) => source,
        Err(e) => {
            error!("{}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let provider = Route53Provider::new(config.aws.clone(), args.dry_run);
    if provider.is_dry_run() {
        tracing::warn!("Running in DRY-RUN mode - no changes will be made");
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(run_once(&config, Arc::new(source), Box::new(provider)));

    exit_code_for(&result).into()
}

fn exit_code_for(result: &r53ddns_core::Result<r53ddns_core::RunSummary>) -> DdnsExitCode {
    match result {
        Ok(summary) => {
            if summary.sites_failed > 0 {
                info!(
                    "{} site(s) updated, {} skipped after provider errors",
                    summary.sites_updated, summary.sites_failed
                );
            }
            DdnsExitCode::Success
        }
        Err(e @ Error::Config(_)) => {
            error!("{}", e);
            DdnsExitCode::ConfigError
        }
        Err(e) => {
            error!("{}", e);
            DdnsExitCode::RuntimeError
        }
    }
}
