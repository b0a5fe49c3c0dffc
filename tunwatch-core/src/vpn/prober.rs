//! Tunnel connectivity probing
//!
//! Health is decided from two observations: ICMP reachability of a
//! remote host, and optionally the first hop on the path toward it.
//! The first hop standing in an expected prefix is the proxy for
//! "traffic actually flows through the tunnel".

use crate::error::{ProbeError, Result};
use crate::exec::CommandRunner;
use tracing::{info, warn};

/// Remote host probed when none is configured
pub const DEFAULT_REMOTE_HOST: &str = "4.2.2.2";

/// Number of ICMP echo requests per probe
const PING_COUNT: &str = "5";

/// Check reachability of `remote_host` via ICMP
///
/// Healthy only when the ping utility itself reports overall success;
/// partial loss that makes it exit nonzero counts as unreachable.
pub fn check_connection<R: CommandRunner>(runner: &R, remote_host: &str) -> Result<bool> {
    let output = runner
        .run("ping", &["-c", PING_COUNT, remote_host])
        .map_err(|source| ProbeError::Unavailable {
            tool: "ping",
            source,
        })?;

    if !output.stdout.is_empty() {
        info!("ping stdout:\n{}", output.stdout.trim());
    }
    if !output.stderr.is_empty() {
        info!("ping stderr:\n{}", output.stderr.trim());
    }

    Ok(output.success)
}

/// First hop on the path toward `remote_host`
///
/// Runs a single-hop trace; the hop address is the second whitespace
/// field of the trace output (the banner goes to stderr and is
/// discarded). A trace that cannot run or exits nonzero is an
/// environment failure, not an unhealthy probe.
pub fn first_hop<R: CommandRunner>(runner: &R, remote_host: &str) -> Result<String> {
    let output = runner
        .run("traceroute", &["-m", "1", remote_host])
        .map_err(|source| ProbeError::Unavailable {
            tool: "traceroute",
            source,
        })?;
    if !output.success {
        return Err(ProbeError::ToolFailed { tool: "traceroute" }.into());
    }

    output
        .stdout
        .split_whitespace()
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| {
            ProbeError::NoFirstHop {
                host: remote_host.to_string(),
            }
            .into()
        })
}

/// Run the connectivity checks for one watchdog iteration
///
/// ICMP first; when it fails the route check is skipped and the probe
/// is unhealthy. The route check only runs when a non-empty prefix is
/// configured.
pub fn run_checks<R: CommandRunner>(
    runner: &R,
    remote_host: &str,
    route_prefix: Option<&str>,
) -> Result<bool> {
    info!("Checking internet connection");
    if !check_connection(runner, remote_host)? {
        warn!("Remote host {} is not available through ICMP", remote_host);
        return Ok(false);
    }

    if let Some(prefix) = route_prefix.filter(|p| !p.is_empty()) {
        info!("Checking default route");
        let hop = first_hop(runner, remote_host)?;
        if !hop.starts_with(prefix) {
            warn!(
                "First hop {} does not match expected route prefix {}",
                hop, prefix
            );
            return Ok(false);
        }
    }

    Ok(true)
}
