//! Error types for the tunwatch VPN watchdog
//!
//! This module defines all error types used throughout the application.
//! Degraded connectivity and an absent client process are steady-state
//! conditions handled by the watchdog loop, not errors; everything here
//! represents a condition the loop cannot recover from on its own.

use thiserror::Error;

/// Main error type for the tunwatch application
#[derive(Error, Debug)]
pub enum WatchdogError {
    /// Errors related to client configuration loading/parsing
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Errors invoking the OS observation utilities
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Errors related to VPN client process control
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    /// Errors bringing up the VPN interface
    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Client configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file does not exist; carries the OS error number so
    /// the binary can exit with it
    #[error("No such file or directory: {path}")]
    NotFound { path: String, errno: i32 },

    #[error("Failed to read configuration file {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A directive the watchdog depends on is absent from the file
    #[error("Configuration has no {name} directive")]
    MissingDirective { name: &'static str },
}

/// Failures of the external observation utilities
///
/// These indicate a broken environment (utility missing, not runnable,
/// or reporting its own failure), never "the VPN is unhealthy".
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to invoke {tool}: {source}")]
    Unavailable {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with failure")]
    ToolFailed { tool: &'static str },

    #[error("traceroute to {host} reported no first hop")]
    NoFirstHop { host: String },
}

/// VPN client process control errors
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to signal process {pid}: {errno}")]
    SignalFailed { pid: i32, errno: nix::errno::Errno },

    #[error("VPN connection still unhealthy after {max_attempts} restart attempts")]
    RestartBudgetExhausted { max_attempts: u32 },
}

/// VPN interface bring-up errors
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Failed to bring up VPN interface {interface}")]
    BringUpFailed { interface: String },
}

/// Result type alias for convenience
pub type Result<T, E = WatchdogError> = std::result::Result<T, E>;
