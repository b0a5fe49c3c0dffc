//! Core library for the tunwatch VPN watchdog
//!
//! This crate provides the OpenVPN client-config parser, the external
//! command abstraction, and the connectivity probing and restart logic
//! driven by the `tunwatch` binary.

pub mod config;
pub mod error;
pub mod exec;
pub mod vpn;

pub use error::{Result, WatchdogError};

/// Log verbosity selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Warnings and errors only (the default)
    #[default]
    Warn,
    /// Informational output (`-v`)
    Info,
    /// Full debug output (`-d`)
    Debug,
}

/// Initialize logging infrastructure
///
/// Sets up tracing with systemd journal logging when running under
/// systemd. Otherwise logs to stderr as timestamped lines, gated by the
/// requested verbosity.
pub fn init_logging(verbosity: Verbosity) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        Verbosity::Warn => LevelFilter::WARN,
        Verbosity::Info => LevelFilter::INFO,
        Verbosity::Debug => LevelFilter::DEBUG,
    };

    // Use systemd journal logging if available
    #[cfg(target_os = "linux")]
    {
        if std::env::var("JOURNAL_STREAM").is_ok() {
            let journal_layer = tracing_journald::layer()?;
            tracing_subscriber::registry()
                .with(journal_layer)
                .with(level)
                .init();
            return Ok(());
        }
    }

    // Fallback to stderr logging, timestamp + message
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(level)
        .init();

    Ok(())
}
