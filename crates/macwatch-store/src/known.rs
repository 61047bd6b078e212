//! The known-device registry: operator-named devices.

use chrono::Utc;
use macwatch_core::KnownDevice;

use crate::error::{Result, StoreError};
use crate::store::Store;
use crate::table::Table;

const COLUMNS: &[&str] = &["id", "name", "mac", "ip", "created_at"];

/// Registry of operator-registered devices.
///
/// Rows enter only through [`KnownRegistry::insert`]; the reconciliation
/// engine refreshes `ip` but never deletes known rows.
#[derive(Clone)]
pub struct KnownRegistry {
    table: Table,
}

impl KnownRegistry {
    pub fn new(store: &Store) -> Self {
        Self {
            table: Table::new(store.pool().clone(), "known", COLUMNS),
        }
    }

    /// All rows, in insertion order.
    pub async fn all(&self) -> Result<Vec<KnownDevice>> {
        Ok(sqlx::query_as::<_, KnownDevice>(
            "SELECT id, name, mac, ip, created_at FROM known ORDER BY id",
        )
        .fetch_all(self.table.pool())
        .await?)
    }

    /// Projection of one column across all rows.
    pub async fn column(&self, name: &str) -> Result<Vec<Option<String>>> {
        self.table.column(name).await
    }

    /// All MACs currently registered.
    pub async fn macs(&self) -> Result<Vec<String>> {
        Ok(self.column("mac").await?.into_iter().flatten().collect())
    }

    /// Register a device under an operator-assigned name.
    ///
    /// The MAC must be new to this registry; a MAC still sitting in the
    /// unknown registry is fine (promotion), the next reconciliation pass
    /// drops the unknown counterpart.
    pub async fn insert(&self, name: &str, mac: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(StoreError::InvalidName);
        }
        let mac = self.table.guard_new_mac(mac).await?;

        sqlx::query("INSERT INTO known (name, mac, created_at) VALUES (?, ?, ?)")
            .bind(name)
            .bind(&mac)
            .bind(Utc::now())
            .execute(self.table.pool())
            .await?;

        tracing::info!(name, mac = %mac, "Registered known device");
        Ok(())
    }

    /// Set or clear the stored IP for one row. Engine-only in the normal
    /// flow.
    pub async fn set_ip(&self, id: i64, ip: Option<&str>) -> Result<()> {
        self.table.update_by_id("ip", ip, id).await?;
        Ok(())
    }

    /// Point update of one column by row id.
    pub async fn update_by_id(&self, column: &str, value: Option<&str>, id: i64) -> Result<u64> {
        self.table.update_by_id(column, value, id).await
    }

    /// Operator-driven targeted edit: set `column` wherever `where_column`
    /// matches `where_value`.
    pub async fn update_where(
        &self,
        where_column: &str,
        where_value: &str,
        column: &str,
        value: &str,
    ) -> Result<u64> {
        self.table
            .update_where(where_column, where_value, column, value)
            .await
    }

    /// Delete all rows where `column` equals `value`.
    pub async fn delete_where(&self, column: &str, value: &str) -> Result<u64> {
        self.table.delete_where(column, value).await
    }

    pub async fn count(&self) -> Result<i64> {
        self.table.count().await
    }
}
