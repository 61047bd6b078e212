//! arp-scan process wrapper.
//!
//! Executes arp-scan as a child process via `tokio::process::Command` and
//! parses its stdout into an observation set.

use std::time::Instant;

use tokio::process::Command;
use uuid::Uuid;

use macwatch_core::Observation;

use crate::config::ProbeConfig;
use crate::error::{ProbeError, Result};
use crate::parse;

/// Result of a single probe run.
#[derive(Debug)]
pub struct ProbeResult {
    /// Unique ID for this probe run, for log correlation.
    pub probe_id: Uuid,
    /// The observation set: every IP/MAC pair that answered.
    pub observations: Vec<Observation>,
    /// Wall-clock duration of the probe.
    pub duration: std::time::Duration,
}

/// Wrapper around the arp-scan binary.
pub struct ArpScanner {
    config: ProbeConfig,
}

impl ArpScanner {
    /// Build a scanner, validating the configured target up front.
    pub fn new(config: ProbeConfig) -> Result<Self> {
        config.target_net()?;
        Ok(Self { config })
    }

    fn command(&self) -> Command {
        if self.config.use_sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg(&self.config.arp_scan_path);
            cmd
        } else {
            Command::new(&self.config.arp_scan_path)
        }
    }

    /// Verify arp-scan is installed and accessible.
    pub async fn verify_installation(&self) -> Result<String> {
        let output = self
            .command()
            .arg("--version")
            .output()
            .await
            .map_err(|_| ProbeError::NotFound {
                path: self.config.arp_scan_path.clone(),
            })?;

        // arp-scan prints its version banner on stderr on some builds.
        let text = if output.stdout.is_empty() {
            output.stderr
        } else {
            output.stdout
        };
        Ok(String::from_utf8(text)?)
    }

    /// Probe the network once and return the observation set.
    ///
    /// An empty set is a valid outcome (nothing answered); only a failed
    /// or missing arp-scan invocation is an error.
    pub async fn scan(&self) -> Result<ProbeResult> {
        let probe_id = Uuid::new_v4();
        let start = Instant::now();

        let mut cmd = self.command();
        cmd.arg("-q");
        if let Some(iface) = &self.config.interface {
            cmd.arg("-I").arg(iface);
        }
        match &self.config.target {
            Some(target) => cmd.arg(target),
            None => cmd.arg("--localnet"),
        };

        tracing::info!(
            probe_id = %probe_id,
            target = self.config.target.as_deref().unwrap_or("--localnet"),
            "Starting ARP probe"
        );

        let output = cmd.output().await.map_err(|e| ProbeError::NotFound {
            path: format!("{}: {e}", self.config.arp_scan_path),
        })?;

        let duration = start.elapsed();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(ProbeError::ScanFailed {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        let stdout = String::from_utf8(output.stdout)?;
        let observations = parse::parse_arp_output(&stdout);

        tracing::info!(
            probe_id = %probe_id,
            observed = observations.len(),
            duration_ms = duration.as_millis(),
            "ARP probe complete"
        );

        Ok(ProbeResult {
            probe_id,
            observations,
            duration,
        })
    }
}
