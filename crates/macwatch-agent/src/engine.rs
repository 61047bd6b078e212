//! The reconciliation engine.
//!
//! Merges one observation set into the two device registries. A full pass
//! runs in fixed order: age eviction, known-IP refresh, unknown admission
//! with promotion cleanup. Eviction runs first so a stale row can never be
//! renewed by merely still being on the wire, and so later steps never
//! reconcile rows about to disappear.
//!
//! A registry failure on one row is logged and the loop moves to the next
//! row; the worst outcome of any pass is a partially updated store that the
//! next full pass self-heals.

use std::collections::{HashMap, HashSet};

use chrono::{TimeDelta, Utc};

use macwatch_core::{mac, Observation};
use macwatch_store::{KnownRegistry, StoreError, UnknownRegistry};

type Result<T> = std::result::Result<T, StoreError>;

/// Row-count outcome of a reconciliation pass, for logging and display.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PassSummary {
    /// Unknown rows deleted for exceeding the retention threshold.
    pub evicted: u32,
    /// Known rows whose IP was set from the observation set.
    pub refreshed: u32,
    /// Known rows whose IP was cleared (MAC not observed).
    pub cleared: u32,
    /// Unknown rows admitted for newly observed MACs.
    pub admitted: u32,
    /// Unknown rows dropped because their MAC is now registered as known.
    pub promoted_dropped: u32,
}

/// Reconciles one observation set against the two registries.
pub struct ReconcileEngine<'a> {
    known: &'a KnownRegistry,
    unknown: &'a UnknownRegistry,
    retention: TimeDelta,
}

impl<'a> ReconcileEngine<'a> {
    pub fn new(
        known: &'a KnownRegistry,
        unknown: &'a UnknownRegistry,
        retention: TimeDelta,
    ) -> Self {
        Self {
            known,
            unknown,
            retention,
        }
    }

    /// One full pass: eviction, known refresh, unknown admission with
    /// embedded promotion cleanup. After it returns Ok, no MAC is present
    /// in both registries.
    pub async fn run_full_pass(&self, observations: &[Observation]) -> Result<PassSummary> {
        let evicted = self.evict_stale_unknown().await?;
        let (refreshed, cleared) = self.refresh_known(observations).await?;
        let (admitted, promoted_dropped) = self.admit_unknown(observations).await?;

        let summary = PassSummary {
            evicted,
            refreshed,
            cleared,
            admitted,
            promoted_dropped,
        };
        tracing::info!(
            evicted = summary.evicted,
            refreshed = summary.refreshed,
            cleared = summary.cleared,
            admitted = summary.admitted,
            promoted_dropped = summary.promoted_dropped,
            "Reconciliation pass complete"
        );
        Ok(summary)
    }

    /// Partial pass: eviction plus known refresh. Guarantees IP freshness
    /// but leaves cross-registry duplicates for the next full pass.
    pub async fn run_known_pass(&self, observations: &[Observation]) -> Result<PassSummary> {
        let evicted = self.evict_stale_unknown().await?;
        let (refreshed, cleared) = self.refresh_known(observations).await?;
        Ok(PassSummary {
            evicted,
            refreshed,
            cleared,
            ..Default::default()
        })
    }

    /// Partial pass: eviction plus admission and promotion cleanup. Known
    /// IPs stay stale.
    pub async fn run_unknown_pass(&self, observations: &[Observation]) -> Result<PassSummary> {
        let evicted = self.evict_stale_unknown().await?;
        let (admitted, promoted_dropped) = self.admit_unknown(observations).await?;
        Ok(PassSummary {
            evicted,
            admitted,
            promoted_dropped,
            ..Default::default()
        })
    }

    /// Delete every unknown row older than the retention threshold.
    ///
    /// Age is measured from admission; re-observation never resets it.
    pub async fn evict_stale_unknown(&self) -> Result<u32> {
        let now = Utc::now();
        let mut evicted = 0;

        for row in self.unknown.all().await? {
            if now - row.created_at > self.retention {
                match self.unknown.delete_by_id(row.id).await {
                    Ok(_) => {
                        evicted += 1;
                        tracing::debug!(mac = %row.mac, ip = %row.ip, "Evicted stale unknown device");
                    }
                    Err(e) => {
                        tracing::warn!(id = row.id, error = %e, "Failed to evict stale unknown device");
                    }
                }
            }
        }
        Ok(evicted)
    }

    /// Set every known row's IP from the observation set, clearing it when
    /// the MAC was not observed (device currently off-network).
    pub async fn refresh_known(&self, observations: &[Observation]) -> Result<(u32, u32)> {
        let observed = observed_ips(observations);
        let mut refreshed = 0;
        let mut cleared = 0;

        for row in self.known.all().await? {
            let ip = observed.get(mac::key(&row.mac).as_str()).copied();
            match self.known.set_ip(row.id, ip).await {
                Ok(()) => match ip {
                    Some(_) => refreshed += 1,
                    None => cleared += 1,
                },
                Err(e) => {
                    tracing::warn!(mac = %row.mac, error = %e, "Failed to refresh known device");
                }
            }
        }
        Ok((refreshed, cleared))
    }

    /// Observed devices whose MAC is in neither registry: exactly what the
    /// admission step would insert. Read-only; used by the `preview`
    /// command as a dry run.
    pub async fn preview_admission(
        &self,
        observations: &[Observation],
    ) -> Result<Vec<Observation>> {
        let known_keys = registry_keys(&self.known.macs().await?);
        let unknown_keys = registry_keys(&self.unknown.macs().await?);
        Ok(unregistered(observations, &known_keys, &unknown_keys))
    }

    /// Admit an unknown row for every observed MAC present in neither
    /// registry, then drop rows promoted to known since the last pass.
    ///
    /// Both membership snapshots are taken before any insertion, so
    /// admission decisions are made against a consistent pre-step state.
    pub async fn admit_unknown(&self, observations: &[Observation]) -> Result<(u32, u32)> {
        let candidates = self.preview_admission(observations).await?;

        let mut admitted = 0;
        for obs in &candidates {
            match self.unknown.insert(&obs.ip, &obs.mac).await {
                Ok(()) => admitted += 1,
                Err(e) => {
                    tracing::warn!(mac = %obs.mac, error = %e, "Failed to admit unknown device");
                }
            }
        }

        let promoted_dropped = self.drop_promoted().await?;
        Ok((admitted, promoted_dropped))
    }

    /// Delete every unknown row whose MAC is also registered as known,
    /// restoring cross-registry uniqueness after a promotion that happened
    /// while the unknown row still existed.
    async fn drop_promoted(&self) -> Result<u32> {
        let known_keys = registry_keys(&self.known.macs().await?);
        let mut dropped = 0;

        for row in self.unknown.all().await? {
            if known_keys.contains(&mac::key(&row.mac)) {
                match self.unknown.delete_by_id(row.id).await {
                    Ok(_) => {
                        dropped += 1;
                        tracing::info!(mac = %row.mac, "Dropped promoted device from unknown registry");
                    }
                    Err(e) => {
                        tracing::warn!(id = row.id, error = %e, "Failed to drop promoted device");
                    }
                }
            }
        }
        Ok(dropped)
    }
}

/// Observations whose MAC key is in neither registry snapshot, one entry
/// per MAC in first-encounter order; the last observation wins for a MAC
/// reported twice in one round.
fn unregistered(
    observations: &[Observation],
    known_keys: &HashSet<String>,
    unknown_keys: &HashSet<String>,
) -> Vec<Observation> {
    let mut order: Vec<String> = Vec::new();
    let mut latest: HashMap<String, &Observation> = HashMap::new();
    for obs in observations {
        let key = mac::key(&obs.mac);
        if known_keys.contains(&key) || unknown_keys.contains(&key) {
            continue;
        }
        if !latest.contains_key(&key) {
            order.push(key.clone());
        }
        latest.insert(key, obs);
    }
    order.iter().map(|key| latest[key].clone()).collect()
}

/// Fold the observation set into a MAC-key to IP map; the last entry for a
/// MAC wins.
fn observed_ips(observations: &[Observation]) -> HashMap<String, &str> {
    let mut map = HashMap::new();
    for obs in observations {
        map.insert(mac::key(&obs.mac), obs.ip.as_str());
    }
    map
}

fn registry_keys(macs: &[String]) -> HashSet<String> {
    macs.iter().map(|m| mac::key(m)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_ips_last_wins() {
        let observations = vec![
            Observation::new("10.0.0.1", "aa:bb:cc:dd:ee:01"),
            Observation::new("10.0.0.2", "AA:BB:CC:DD:EE:01"),
        ];
        let map = observed_ips(&observations);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("aabbccddee01").copied(), Some("10.0.0.2"));
    }

    #[test]
    fn test_unregistered_filters_both_snapshots() {
        let observations = vec![
            Observation::new("10.0.0.1", "aa:bb:cc:dd:ee:01"),
            Observation::new("10.0.0.2", "aa:bb:cc:dd:ee:02"),
            Observation::new("10.0.0.3", "aa:bb:cc:dd:ee:03"),
            Observation::new("10.0.0.4", "AA:BB:CC:DD:EE:03"),
        ];
        let known_keys: HashSet<String> = [mac::key("aa:bb:cc:dd:ee:01")].into_iter().collect();
        let unknown_keys: HashSet<String> = [mac::key("AA-BB-CC-DD-EE-02")].into_iter().collect();

        let candidates = unregistered(&observations, &known_keys, &unknown_keys);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].mac, "AA:BB:CC:DD:EE:03");
        assert_eq!(candidates[0].ip, "10.0.0.4");
    }

    #[test]
    fn test_registry_keys_fold_style() {
        let macs = vec!["AA-BB-CC-DD-EE-01".to_string()];
        let keys = registry_keys(&macs);
        assert!(keys.contains("aabbccddee01"));
    }
}
