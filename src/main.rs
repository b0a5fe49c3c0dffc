//! tunwatch - OpenVPN client watchdog
//!
//! Watches a running OpenVPN client, probes connectivity through the
//! tunnel, and restarts the client when the tunnel degrades.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tunwatch_core::config::ClientConfig;
use tunwatch_core::error::{ConfigError, ProcessError, WatchdogError};
use tunwatch_core::exec::SystemRunner;
use tunwatch_core::vpn::prober::DEFAULT_REMOTE_HOST;
use tunwatch_core::vpn::{Watchdog, WatchdogSettings};
use tunwatch_core::{init_logging, Verbosity};

#[derive(Parser)]
#[command(name = "tunwatch")]
#[command(about = "Keep an OpenVPN client and its tunnel routes healthy")]
struct Cli {
    /// Path to the OpenVPN client config
    #[arg(value_name = "OVPN_FILE")]
    ovpn_file: PathBuf,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Print debug output
    #[arg(short, long)]
    debug: bool,

    /// VPN route prefix the first hop must match when the connection is fine
    #[arg(short = 'p', long, value_name = "PREFIX")]
    route_prefix: Option<String>,

    /// Remote host for checking the connection
    #[arg(short = 'r', long, value_name = "HOST", default_value = DEFAULT_REMOTE_HOST)]
    remote_host: String,

    /// Give up after this many restart attempts instead of looping forever
    #[arg(long, value_name = "N")]
    max_attempts: Option<u32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let verbosity = if cli.debug {
        Verbosity::Debug
    } else if cli.verbose {
        Verbosity::Info
    } else {
        Verbosity::Warn
    };

    // Initialize logging
    if let Err(e) = init_logging(verbosity) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(2);
    }

    std::process::exit(run(cli).await);
}

async fn run(cli: Cli) -> i32 {
    info!(
        "Starting with config {} targeting {}",
        cli.ovpn_file.display(),
        cli.remote_host
    );

    // The client process is located by the config file's base name
    let search = cli
        .ovpn_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let config = match ClientConfig::load(&cli.ovpn_file) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return exit_code(&WatchdogError::Config(e));
        }
    };

    let settings = WatchdogSettings {
        remote_host: cli.remote_host,
        route_prefix: cli.route_prefix.filter(|prefix| !prefix.is_empty()),
        max_attempts: cli.max_attempts,
        ..WatchdogSettings::default()
    };

    let watchdog = Watchdog::new(SystemRunner, settings);
    match watchdog.run(&config, &search).await {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!("{}", e);
            exit_code(&e)
        }
    }
}

/// Map a watchdog error to the process exit code
fn exit_code(err: &WatchdogError) -> i32 {
    match err {
        // Missing config file exits with the OS error number
        WatchdogError::Config(ConfigError::NotFound { errno, .. }) => *errno,
        WatchdogError::Config(_) => 2,
        // Launch failures and an exhausted restart budget (exit code 1)
        WatchdogError::Launch(_) => 1,
        WatchdogError::Process(ProcessError::RestartBudgetExhausted { .. }) => 1,
        // Environment failures: probe tooling unusable (exit code 2)
        WatchdogError::Process(_) => 2,
        WatchdogError::Probe(_) => 2,
        WatchdogError::Io(_) => 2,
    }
}
