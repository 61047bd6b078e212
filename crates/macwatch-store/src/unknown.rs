//! The unknown-device registry: observed-but-unclassified devices.

use chrono::Utc;
use macwatch_core::UnknownDevice;

use crate::error::Result;
use crate::store::Store;
use crate::table::Table;

const COLUMNS: &[&str] = &["id", "ip", "mac", "created_at"];

/// Registry of devices seen on the wire that no operator has classified.
///
/// Rows are admitted by the reconciliation engine (or by hand) and leave
/// only through promotion cleanup or age eviction; they are never
/// IP-refreshed after admission.
#[derive(Clone)]
pub struct UnknownRegistry {
    table: Table,
}

impl UnknownRegistry {
    pub fn new(store: &Store) -> Self {
        Self {
            table: Table::new(store.pool().clone(), "unknown", COLUMNS),
        }
    }

    /// All rows, in insertion order.
    pub async fn all(&self) -> Result<Vec<UnknownDevice>> {
        Ok(sqlx::query_as::<_, UnknownDevice>(
            "SELECT id, ip, mac, created_at FROM unknown ORDER BY id",
        )
        .fetch_all(self.table.pool())
        .await?)
    }

    /// Projection of one column across all rows.
    pub async fn column(&self, name: &str) -> Result<Vec<Option<String>>> {
        self.table.column(name).await
    }

    /// All MACs currently recorded.
    pub async fn macs(&self) -> Result<Vec<String>> {
        Ok(self.column("mac").await?.into_iter().flatten().collect())
    }

    /// Record a newly observed device with the current timestamp.
    pub async fn insert(&self, ip: &str, mac: &str) -> Result<()> {
        let mac = self.table.guard_new_mac(mac).await?;

        sqlx::query("INSERT INTO unknown (ip, mac, created_at) VALUES (?, ?, ?)")
            .bind(ip)
            .bind(&mac)
            .bind(Utc::now())
            .execute(self.table.pool())
            .await?;

        tracing::info!(ip, mac = %mac, "Recorded unknown device");
        Ok(())
    }

    /// Record a device with an explicit admission timestamp.
    ///
    /// Aging tests need rows that predate "now"; production code always
    /// goes through [`UnknownRegistry::insert`].
    #[cfg(feature = "testkit")]
    pub async fn insert_observed_at(
        &self,
        ip: &str,
        mac: &str,
        created_at: chrono::DateTime<Utc>,
    ) -> Result<()> {
        let mac = self.table.guard_new_mac(mac).await?;
        sqlx::query("INSERT INTO unknown (ip, mac, created_at) VALUES (?, ?, ?)")
            .bind(ip)
            .bind(&mac)
            .bind(created_at)
            .execute(self.table.pool())
            .await?;
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

    /// Delete one row by id. Used by eviction and promotion cleanup.
    pub async fn delete_by_id(&self, id: i64) -> Result<u64> {
        self.table.delete_by_id(id).await
    }

    pub async fn count(&self) -> Result<i64> {
        self.table.count().await
    }
}
