//! VPN client process termination
//!
//! Teardown is a single SIGTERM followed by a fixed grace period, long
//! enough for the client to release its tunnel device and routes. It is
//! deliberately not a poll-until-exited loop; the next watchdog
//! iteration re-checks the process listing anyway.

use crate::error::{ProcessError, Result};
use nix::errno::Errno;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Send SIGTERM to `pid` and wait out the grace period
///
/// A process that is already gone counts as success. The grace delay is
/// incurred either way, so route state has settled before the caller
/// touches it.
pub async fn terminate(pid: i32, grace: Duration) -> Result<()> {
    warn!("Killing VPN client process {}", pid);
    match kill(Pid::from_raw(pid), Signal::SIGTERM) {
        Ok(()) => {}
        Err(Errno::ESRCH) => {
            info!("VPN client process {} already gone", pid);
        }
        Err(errno) => {
            return Err(ProcessError::SignalFailed { pid, errno }.into());
        }
    }

    sleep(grace).await;
    warn!("VPN client process {} is killed", pid);
    Ok(())
}
