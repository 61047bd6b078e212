//! Configuration for the arp-scan probe.

use ipnet::IpNet;
use serde::Deserialize;

use crate::error::{ProbeError, Result};

/// Probe configuration, loaded from `macwatch.toml` `[probe]` section or
/// `MACWATCH__PROBE__` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Path to the arp-scan binary (default: "arp-scan").
    #[serde(default = "default_arp_scan_path")]
    pub arp_scan_path: String,

    /// Run arp-scan under sudo. Needed when the binary lacks cap_net_raw.
    #[serde(default)]
    pub use_sudo: bool,

    /// Interface to probe; arp-scan picks the default route's interface
    /// when unset.
    #[serde(default)]
    pub interface: Option<String>,

    /// Explicit CIDR target. Probes the local network (`--localnet`) when
    /// unset.
    #[serde(default)]
    pub target: Option<String>,
}

impl ProbeConfig {
    /// Validate the configured CIDR target, if any.
    pub fn target_net(&self) -> Result<Option<IpNet>> {
        match &self.target {
            None => Ok(None),
            Some(t) => t
                .parse::<IpNet>()
                .map(Some)
                .map_err(|e| ProbeError::InvalidTarget {
                    target: t.clone(),
                    reason: e.to_string(),
                }),
        }
    }
}

fn default_arp_scan_path() -> String {
    "arp-scan".to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            arp_scan_path: default_arp_scan_path(),
            use_sudo: false,
            interface: None,
            target: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProbeConfig::default();
        assert_eq!(config.arp_scan_path, "arp-scan");
        assert!(!config.use_sudo);
        assert!(config.target_net().unwrap().is_none());
    }

    #[test]
    fn test_target_validation() {
        let config = ProbeConfig {
            target: Some("192.168.1.0/24".to_string()),
            ..Default::default()
        };
        assert!(config.target_net().unwrap().is_some());

        let config = ProbeConfig {
            target: Some("not-a-cidr".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            config.target_net(),
            Err(ProbeError::InvalidTarget { .. })
        ));
    }
}
