//! VPN interface bring-up
//!
//! Bringing up the tunnel delegates to the OS network-start script.
//! Stale routes for the interface are always cleared first; a cleanup
//! failure aborts the launch before the script is touched.

use crate::error::{ProbeError, Result};
use crate::exec::CommandRunner;
use crate::vpn::routes;
use tracing::{error, info, warn};

/// Default OS bring-up script invoked as `sh <script> <iface>`
pub const DEFAULT_BRINGUP_SCRIPT: &str = "/etc/netstart";

/// Bring up the VPN interface `iface`
///
/// `Ok(true)` when the bring-up script exits zero, `Ok(false)` when it
/// runs but fails. Route cleanup failure aborts before bring-up.
pub fn bring_up<R: CommandRunner>(runner: &R, iface: &str, script: &str) -> Result<bool> {
    info!("Removing {} routes before starting VPN client", iface);
    if !routes::delete_iface_routes(runner, iface)? {
        return Ok(false);
    }

    warn!("Bringing up VPN interface {}", iface);
    let output = runner
        .run("sh", &[script, iface])
        .map_err(|source| ProbeError::Unavailable { tool: "sh", source })?;
    if !output.success {
        error!("Failed to bring up VPN interface {}", iface);
        return Ok(false);
    }

    Ok(true)
}
