//! macwatch-probe: network probing for the macwatch device tracker.
//!
//! Wraps arp-scan as a child process and parses its plain-text output into
//! an observation set of IP/MAC pairs. One observation set is fetched per
//! reconciliation pass and handed to the engine by argument; there is no
//! cache between passes.

pub mod config;
pub mod error;
pub mod parse;
pub mod scanner;

pub use config::ProbeConfig;
pub use error::ProbeError;
pub use scanner::{ArpScanner, ProbeResult};
