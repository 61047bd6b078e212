//! macwatch-core: shared types for the macwatch device tracker.
//!
//! This crate provides the foundational types used across all macwatch
//! components:
//! - `Observation`: one IP/MAC pair seen on the wire during a probe
//! - `KnownDevice` / `UnknownDevice`: the persisted registry rows
//! - MAC address syntax validation and comparison keys

pub mod mac;
pub mod types;

pub use types::{KnownDevice, Observation, UnknownDevice};
