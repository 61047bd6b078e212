//! macwatch-agent: reconciliation engine and command layer.
//!
//! One invocation probes the local network with arp-scan and reconciles
//! the observation set into the known and unknown device registries:
//! stale unknown rows are evicted, known devices get their IP refreshed,
//! newly seen devices are admitted, and promoted duplicates are dropped.

pub mod commands;
pub mod config;
pub mod display;
pub mod engine;
