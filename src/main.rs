//! shard-uris - connection URIs for every shard and member of a cluster
//!
//! Reads a captured `listShards` reply and the original connection options,
//! then prints replica-set discovery URIs and/or direct member URIs.

use anyhow::{Context, Result};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use shard_uri_resolver::cluster::SnapshotAdmin;
use shard_uri_resolver::config::{CliArgs, ConnectionConfig};
use shard_uri_resolver::report::UriReporter;
use shard_uri_resolver::resolve::fetch_and_resolve;

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Setup logging
    setup_logging(args.verbose, args.quiet);

    // Build configuration: profile first, flags on top
    let base = match args.config {
        Some(ref path) => {
            info!("Loading connection profile from: {:?}", path);
            ConnectionConfig::from_yaml_file(path)?
        }
        None => ConnectionConfig::default(),
    };
    let config = args
        .to_connection_config(base)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    let mut admin = SnapshotAdmin::open(&args.topology)
        .with_context(|| format!("Failed to load topology from {:?}", args.topology))?;

    let resolved = fetch_and_resolve(
        &mut admin,
        &config,
        args.naming_rules(),
        &args.mode.uri_modes(),
    )?;

    let reporter = UriReporter::new(args.output_format);
    match args.output {
        Some(ref path) => {
            info!("Writing {} URIs to: {:?}", resolved.len(), path);
            reporter
                .write_file(path, &resolved)
                .with_context(|| format!("Failed to write {:?}", path))?;
        }
        None => reporter.print(&resolved),
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
