//! VPN client observation and control
//!
//! Thin wrappers over the OS utilities that expose VPN client state:
//! process listing, ICMP probing, route-table inspection and interface
//! bring-up. The watchdog loop in [`watchdog`] orchestrates them.

pub mod launcher;
pub mod locator;
pub mod prober;
pub mod routes;
pub mod terminator;
pub mod watchdog;

// Public re-exports
pub use watchdog::{Watchdog, WatchdogSettings};
