//! Command layer: maps CLI subcommands onto registry and engine calls.
//!
//! The command set is a closed tagged enum; clap rejects anything outside
//! it, so there is no "unknown command" fallback path.

use clap::{Subcommand, ValueEnum};

use macwatch_core::Observation;
use macwatch_probe::ArpScanner;
use macwatch_store::{KnownRegistry, Store, UnknownRegistry};

use crate::config::AgentConfig;
use crate::display;
use crate::engine::ReconcileEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TableSel {
    Known,
    Unknown,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the registry schema.
    Init,

    /// Probe the network and reconcile the registries.
    ///
    /// Without a table argument runs the full pass; scoped to one table it
    /// runs the partial variant (eviction always runs first).
    Update { table: Option<TableSel> },

    /// Probe the network and list observed devices present in neither
    /// registry: what `update` would admit, without writing anything.
    Preview,

    /// Show registry contents; both registries when no table is given.
    Show {
        table: Option<TableSel>,

        /// Emit rows as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Insert a device row by hand.
    #[command(subcommand)]
    Insert(InsertTarget),

    /// Delete rows matching a column value.
    Delete {
        table: TableSel,
        column: String,
        value: String,
    },

    /// Update a column for rows where another column matches a value.
    Set {
        table: TableSel,
        where_column: String,
        where_value: String,
        column: String,
        value: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum InsertTarget {
    /// Register a named device in the known registry.
    Known { name: String, mac: String },

    /// Record an unclassified device in the unknown registry.
    Unknown { ip: String, mac: String },
}

pub async fn run(command: Command, config: &AgentConfig, store: &Store) -> anyhow::Result<()> {
    let known = KnownRegistry::new(store);
    let unknown = UnknownRegistry::new(store);

    match command {
        Command::Init => {
            store.init_schema().await?;
            println!("Registry schema ready");
        }

        Command::Update { table } => {
            let observations = fetch_observations(config).await;
            let engine = ReconcileEngine::new(&known, &unknown, config.retention());

            let summary = match table {
                None => engine.run_full_pass(&observations).await?,
                Some(TableSel::Known) => engine.run_known_pass(&observations).await?,
                Some(TableSel::Unknown) => engine.run_unknown_pass(&observations).await?,
            };
            println!(
                "observed {}: evicted {}, refreshed {}, cleared {}, admitted {}, dropped {}",
                observations.len(),
                summary.evicted,
                summary.refreshed,
                summary.cleared,
                summary.admitted,
                summary.promoted_dropped,
            );
        }

        Command::Preview => {
            let observations = fetch_observations(config).await;
            let engine = ReconcileEngine::new(&known, &unknown, config.retention());
            let candidates = engine.preview_admission(&observations).await?;

            if candidates.is_empty() {
                println!("No unregistered devices observed");
            } else {
                for obs in &candidates {
                    println!("{}\t{}", obs.ip, obs.mac);
                }
            }
        }

        Command::Show { table, json } => match table {
            // Unscoped JSON is one document; two concatenated arrays would
            // not parse as a stream.
            None if json => {
                let payload = combined_json(&unknown.all().await?, &known.all().await?);
                println!("{}", serde_json::to_string_pretty(&payload)?);
            }
            // Unscoped show prints unknown first, then known.
            None => {
                print!("{}", display::render_unknown(&unknown.all().await?));
                print!("{}", display::render_known(&known.all().await?));
            }
            Some(TableSel::Known) => {
                let rows = known.all().await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                } else {
                    print!("{}", display::render_known(&rows));
                }
            }
            Some(TableSel::Unknown) => {
                let rows = unknown.all().await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&rows)?);
                } else {
                    print!("{}", display::render_unknown(&rows));
                }
            }
        },

        Command::Insert(target) => match target {
            InsertTarget::Known { name, mac } => {
                known.insert(&name, &mac).await?;
                println!("Registered known device {name}");
            }
            InsertTarget::Unknown { ip, mac } => {
                unknown.insert(&ip, &mac).await?;
                println!("Recorded unknown device {ip}");
            }
        },

        Command::Delete {
            table,
            column,
            value,
        } => {
            let removed = match table {
                TableSel::Known => known.delete_where(&column, &value).await?,
                TableSel::Unknown => unknown.delete_where(&column, &value).await?,
            };
            println!("Deleted {removed} row(s)");
        }

        Command::Set {
            table,
            where_column,
            where_value,
            column,
            value,
        } => {
            let updated = match table {
                TableSel::Known => {
                    known
                        .update_where(&where_column, &where_value, &column, &value)
                        .await?
                }
                TableSel::Unknown => {
                    unknown
                        .update_where(&where_column, &where_value, &column, &value)
                        .await?
                }
            };
            println!("Updated {updated} row(s)");
        }
    }

    Ok(())
}

/// One JSON document for the unscoped `show --json`.
fn combined_json(
    unknown_rows: &[macwatch_core::UnknownDevice],
    known_rows: &[macwatch_core::KnownDevice],
) -> serde_json::Value {
    serde_json::json!({
        "unknown": unknown_rows,
        "known": known_rows,
    })
}

/// Probe once and return the observation set.
///
/// Probe failure policy: the error is reported here and the pass continues
/// with an empty observation set, so an unreachable network reads as "no
/// devices on the wire" (known IPs get cleared) instead of aborting.
/// Callers that want abort-on-failure can drive `ArpScanner` directly.
async fn fetch_observations(config: &AgentConfig) -> Vec<Observation> {
    let scanner = match ArpScanner::new(config.probe.clone()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "Probe unavailable; reconciling with empty observation set");
            return Vec::new();
        }
    };

    match scanner.verify_installation().await {
        Ok(version) => tracing::debug!(arp_scan_version = %version.trim(), "arp-scan verified"),
        Err(e) => {
            tracing::warn!(error = %e, "Probe unavailable; reconciling with empty observation set");
            return Vec::new();
        }
    }

    match scanner.scan().await {
        Ok(result) => result.observations,
        Err(e) => {
            tracing::warn!(error = %e, "Probe failed; reconciling with empty observation set");
            Vec::new()
        }
    }
}
