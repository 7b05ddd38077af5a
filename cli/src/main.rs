//! CLI entrypoint for witness-quorum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use witness_application::{ProgressNotifier, ResolutionEngine};
use witness_domain::{OutputFormat, Request};
use witness_infrastructure::{
    ConfigLoader, FileConfig, JsonlAuditLog, SourceRouter, build_witnesses, load_request,
};
use witness_presentation::{Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};

/// Install the tracing subscriber. The guard must live until exit when
/// logging to a file.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let Some(path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("--log-file needs a file name: {}", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}

/// Load configuration and apply command-line overrides.
fn load_config(cli: &Cli) -> Result<FileConfig> {
    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if let Some(count) = cli.witnesses {
        config.witnesses.count = count;
    }
    if let Some(window_ms) = cli.window_ms {
        config.engine.collection_window_ms = window_ms;
    }
    if let Some(path) = &cli.audit_log {
        config.audit.path = Some(path.clone());
    }

    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("{}", issue);
    }
    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(ToString::to_string)
        .collect();
    if !errors.is_empty() {
        bail!("Invalid configuration:\n  {}", errors.join("\n  "));
    }

    Ok(config)
}

fn print_validation(request: &Request, witnesses: usize) {
    let economics = request.economics();
    let witnesses = u32::try_from(witnesses).unwrap_or(u32::MAX);

    println!("Request is valid");
    println!("  content hash:     {}", request.content_hash());
    println!("  sources:          {}", request.sources().len());
    println!("  quorum:           {}", request.quorum());
    match economics.total_fee(witnesses) {
        Some(fee) => println!("  total fee:        {} ({} witnesses)", fee, witnesses),
        None => println!("  total fee:        overflow ({} witnesses)", witnesses),
    }
    match economics.total_collateral(witnesses) {
        Some(collateral) => println!("  total collateral: {}", collateral),
        None => println!("  total collateral: overflow"),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(ExitCode::SUCCESS);
    }

    info!("Starting witness-quorum");

    let config = load_config(&cli)?;
    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = config.output.resolve_format(cli.output);

    let request = match &cli.request_file {
        Some(path) => load_request(path)?,
        None => Request::randomness(),
    };

    if cli.validate {
        print_validation(&request, config.witnesses.count);
        return Ok(ExitCode::SUCCESS);
    }

    // === Dependency Injection ===
    let params = config.engine.to_engine_params();
    let router = SourceRouter::standard(params.fetch_timeout);
    let witnesses = build_witnesses(&config.witnesses, router);

    let mut engine = ResolutionEngine::new(witnesses, params);
    if let Some(path) = &config.audit.path {
        match JsonlAuditLog::new(path) {
            Some(log) => {
                info!("Auditing rounds to {}", log.path().display());
                engine = engine.with_audit_log(Arc::new(log));
            }
            None => warn!("Auditing disabled: could not open {}", path.display()),
        }
    }

    let show_progress = !cli.quiet && format != OutputFormat::Json;
    if show_progress {
        println!();
        println!("Request:   {}", request.content_hash());
        println!("Witnesses: {}", engine.nodes().len());
        println!("Quorum:    {}", request.quorum());
        println!();
    }

    let id = engine.submit(request.clone());

    let progress: Box<dyn ProgressNotifier> = if !show_progress {
        Box::new(witness_application::NoProgress)
    } else if cli.verbose > 0 {
        Box::new(SimpleProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    let result = tokio::select! {
        result = engine.resolve_with_progress(id, progress.as_ref()) => {
            result.with_context(|| format!("Failed to resolve {}", id))?
        }
        _ = tokio::signal::ctrl_c() => {
            engine.cancel(id)?;
            bail!("Interrupted, {} cancelled", id);
        }
    };

    println!("{}", ConsoleFormatter::render(format, id, &request, &result));

    if result.is_accepted() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}
