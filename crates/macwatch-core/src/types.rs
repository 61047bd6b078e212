//! Core domain types for the macwatch device registries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One IP/MAC pair seen on the wire during a probe round.
///
/// Transient: produced fresh each probe and never persisted directly. The
/// set is not deduplicated; when one round reports the same MAC twice, the
/// last entry wins downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub ip: String,
    pub mac: String,
}

impl Observation {
    pub fn new(ip: impl Into<String>, mac: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            mac: mac.into(),
        }
    }
}

/// An operator-registered device.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct KnownDevice {
    pub id: i64,
    /// Operator-assigned name, never empty.
    pub name: String,
    pub mac: String,
    /// IP from the most recent reconciliation pass; `None` while the
    /// device is off-network.
    pub ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A device observed on the network but not yet classified.
///
/// A discovery record, not a liveness record: `ip` and `created_at` are
/// fixed at admission and never refreshed. The row leaves the registry only
/// by promotion into the known registry or by age eviction.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UnknownDevice {
    pub id: i64,
    pub ip: String,
    pub mac: String,
    pub created_at: DateTime<Utc>,
}
