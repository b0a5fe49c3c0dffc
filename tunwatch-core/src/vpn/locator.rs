//! VPN client process lookup
//!
//! Scans the system process listing for the running VPN client. The
//! listing is consumed from `ps` as text; candidates are restricted to
//! the expected client binary before the search string is matched
//! case-insensitively against the full command line.

use crate::error::{ProbeError, Result};
use crate::exec::CommandRunner;
use tracing::{debug, info};

/// Name of the VPN client binary a candidate line must mention
pub const CLIENT_BINARY: &str = "openvpn";

/// Find the pid of the VPN client process matching `search`
///
/// Returns the first match in listing order, or `None` when no process
/// matches. Failure to run `ps` at all is an error, never "not found".
pub fn find_pid<R: CommandRunner>(runner: &R, search: &str) -> Result<Option<i32>> {
    info!("Searching process by string: {}", search);

    let output = runner
        .run("ps", &["-A", "-o", "pid,command"])
        .map_err(|source| ProbeError::Unavailable { tool: "ps", source })?;
    if !output.success {
        return Err(ProbeError::ToolFailed { tool: "ps" }.into());
    }

    let needle = search.to_lowercase();
    for line in output.stdout.lines() {
        if !line.contains(CLIENT_BINARY) {
            continue;
        }

        let Some((pid, command)) = line.trim().split_once(' ') else {
            continue;
        };
        if !command.to_lowercase().contains(&needle) {
            continue;
        }

        match pid.parse::<i32>() {
            Ok(pid) => {
                info!("Process found: {}", line.trim());
                return Ok(Some(pid));
            }
            Err(_) => {
                debug!("Skipping listing line with non-numeric pid: {}", line);
            }
        }
    }

    info!("No processes are found: {}", search);
    Ok(None)
}
