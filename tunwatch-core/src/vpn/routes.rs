//! Routing-table cleanup for the tunnel interface
//!
//! Stale routes left behind by a dead client keep traffic pointed at a
//! tunnel that no longer exists, so they are removed before every
//! bring-up and after every teardown. Cleanup is best effort per entry.

use crate::error::{ProbeError, Result};
use crate::exec::CommandRunner;
use tracing::{debug, error, info, warn};

/// Delete every routing-table entry associated with `iface`
///
/// Scans the IPv4 routing table for lines mentioning the interface and
/// issues a delete for each line's destination (its first field). A
/// delete that fails is logged and skipped; only a table query that
/// cannot run at all is an error.
pub fn delete_iface_routes<R: CommandRunner>(runner: &R, iface: &str) -> Result<bool> {
    info!("Fetching route table");
    let output = runner
        .run("netstat", &["-rn", "-finet"])
        .map_err(|source| ProbeError::Unavailable {
            tool: "netstat",
            source,
        })?;
    if !output.success {
        return Err(ProbeError::ToolFailed { tool: "netstat" }.into());
    }

    for line in output.stdout.lines() {
        if !line.contains(iface) {
            continue;
        }
        debug!("Processing route line: {}", line);

        let Some(destination) = line.split_whitespace().next() else {
            continue;
        };

        warn!("Removing route {} for iface {}", destination, iface);
        let deleted = runner
            .run("route", &["delete", destination])
            .map_err(|source| ProbeError::Unavailable {
                tool: "route",
                source,
            })?;
        if !deleted.success {
            error!("Failed to remove route {} for iface {}", destination, iface);
        }
    }

    Ok(true)
}
