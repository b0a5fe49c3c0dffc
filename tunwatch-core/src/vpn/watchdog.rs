//! Watchdog control loop
//!
//! One iteration: locate the client process, launch it when absent,
//! probe connectivity, and on an unhealthy probe tear everything down
//! before going around again. The loop ends when a probe reports
//! healthy or a non-recoverable error surfaces.

use crate::config::ClientConfig;
use crate::error::{ConfigError, LaunchError, ProcessError, Result};
use crate::exec::CommandRunner;
use crate::vpn::{launcher, locator, prober, routes, terminator};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

/// Delay after bring-up before the first probe, giving the client time
/// to negotiate the tunnel
pub const SETTLE_DELAY: Duration = Duration::from_secs(30);

/// Grace period between SIGTERM and the follow-up route cleanup
pub const TERMINATION_GRACE: Duration = Duration::from_secs(5);

/// Targets and timings for one watchdog instance
///
/// Every default the watchdog relies on lives here explicitly, so
/// instances with different targets can coexist under test.
#[derive(Debug, Clone)]
pub struct WatchdogSettings {
    /// Host probed for ICMP reachability
    pub remote_host: String,

    /// Expected first-hop prefix; `None` (or empty) skips the route
    /// verification entirely
    pub route_prefix: Option<String>,

    /// OS bring-up script, invoked as `sh <script> <iface>`
    pub bringup_script: String,

    /// Wait between bring-up and the first probe
    pub settle_delay: Duration,

    /// Wait after signaling the client to terminate
    pub termination_grace: Duration,

    /// Restart-cycle ceiling; `None` keeps probing and restarting until
    /// healthy
    pub max_attempts: Option<u32>,
}

impl Default for WatchdogSettings {
    fn default() -> Self {
        Self {
            remote_host: prober::DEFAULT_REMOTE_HOST.to_string(),
            route_prefix: None,
            bringup_script: launcher::DEFAULT_BRINGUP_SCRIPT.to_string(),
            settle_delay: SETTLE_DELAY,
            termination_grace: TERMINATION_GRACE,
            max_attempts: None,
        }
    }
}

/// Keeps one VPN client and its tunnel routes healthy
pub struct Watchdog<R> {
    runner: R,
    settings: WatchdogSettings,
}

impl<R: CommandRunner> Watchdog<R> {
    pub fn new(runner: R, settings: WatchdogSettings) -> Self {
        Self { runner, settings }
    }

    pub fn settings(&self) -> &WatchdogSettings {
        &self.settings
    }

    /// Run the control loop until the tunnel is healthy
    ///
    /// `search` identifies the client process in the listing, normally
    /// the base name of the config file the client was started with.
    pub async fn run(&self, config: &ClientConfig, search: &str) -> Result<()> {
        let mut attempts = 0u32;

        loop {
            let pid = locator::find_pid(&self.runner, search)?;
            if pid.is_none() {
                warn!("VPN client {} is not running", search);
                let iface = device(config)?;
                if !launcher::bring_up(&self.runner, iface, &self.settings.bringup_script)? {
                    error!("Failed to start VPN client {}", search);
                    return Err(LaunchError::BringUpFailed {
                        interface: iface.to_string(),
                    }
                    .into());
                }

                info!("Wait some time before client starts");
                sleep(self.settings.settle_delay).await;
            }

            warn!("VPN client {} is running", search);

            if prober::run_checks(
                &self.runner,
                &self.settings.remote_host,
                self.settings.route_prefix.as_deref(),
            )? {
                warn!("VPN connection {} is ok", search);
                return Ok(());
            }

            warn!("VPN connection {} is unstable, need to restart", search);
            if let Some(pid) = pid {
                terminator::terminate(pid, self.settings.termination_grace).await?;
            }
            routes::delete_iface_routes(&self.runner, device(config)?)?;

            attempts += 1;
            if let Some(max_attempts) = self.settings.max_attempts {
                if attempts >= max_attempts {
                    error!(
                        "Giving up on {} after {} restart attempts",
                        search, attempts
                    );
                    return Err(ProcessError::RestartBudgetExhausted { max_attempts }.into());
                }
            }
        }
    }
}

/// Tunnel interface name from the client config
///
/// Resolved lazily so a config without `dev` still works as long as
/// the client never needs a restart.
fn device(config: &ClientConfig) -> Result<&str, ConfigError> {
    config
        .device()
        .ok_or(ConfigError::MissingDirective { name: "dev" })
}
