//! Shared table core for the two device registries.
//!
//! Column names are never interpolated from caller input: every operation
//! resolves the requested name against the table's schema whitelist first
//! and interpolates only the `'static` whitelist entry. Values always go
//! through bound parameters.

use macwatch_core::mac;
use sqlx::{Row, SqlitePool};

use crate::error::{Result, StoreError};

#[derive(Clone)]
pub(crate) struct Table {
    pool: SqlitePool,
    name: &'static str,
    columns: &'static [&'static str],
}

impl Table {
    pub(crate) fn new(
        pool: SqlitePool,
        name: &'static str,
        columns: &'static [&'static str],
    ) -> Self {
        Self {
            pool,
            name,
            columns,
        }
    }

    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn resolve_column(&self, column: &str) -> Result<&'static str> {
        self.columns
            .iter()
            .find(|c| **c == column)
            .copied()
            .ok_or_else(|| StoreError::UnknownColumn {
                table: self.name,
                column: column.to_string(),
            })
    }

    /// Projection of one column across all rows, as text.
    ///
    /// SQL NULLs come back as `None` (the known table's `ip` column is
    /// nullable).
    pub(crate) async fn column(&self, column: &str) -> Result<Vec<Option<String>>> {
        let col = self.resolve_column(column)?;
        let sql = format!(
            "SELECT CAST({col} AS TEXT) AS value FROM {} ORDER BY id",
            self.name
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows
            .iter()
            .map(|r| r.get::<Option<String>, _>("value"))
            .collect())
    }

    /// Point update of one column for the row with the given id.
    pub(crate) async fn update_by_id(
        &self,
        column: &str,
        value: Option<&str>,
        id: i64,
    ) -> Result<u64> {
        let col = self.resolve_column(column)?;
        let sql = format!("UPDATE {} SET {col} = ? WHERE id = ?", self.name);
        let result = sqlx::query(&sql)
            .bind(value)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Update `column` for all rows where `where_column` equals
    /// `where_value`. A new MAC value must pass syntax validation.
    ///
    /// The WHERE side compares as text so id lookups work with string
    /// arguments from the command line.
    pub(crate) async fn update_where(
        &self,
        where_column: &str,
        where_value: &str,
        column: &str,
        value: &str,
    ) -> Result<u64> {
        let where_col = self.resolve_column(where_column)?;
        let col = self.resolve_column(column)?;

        let value = if col == "mac" {
            let stripped = mac::normalize(value);
            if !mac::is_valid(&stripped) {
                return Err(StoreError::InvalidMac { mac: stripped });
            }
            stripped
        } else {
            value.to_string()
        };

        let sql = format!(
            "UPDATE {} SET {col} = ? WHERE CAST({where_col} AS TEXT) = ?",
            self.name
        );
        let result = sqlx::query(&sql)
            .bind(&value)
            .bind(where_value)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete all rows where `column` equals `value`.
    pub(crate) async fn delete_where(&self, column: &str, value: &str) -> Result<u64> {
        let col = self.resolve_column(column)?;
        let sql = format!(
            "DELETE FROM {} WHERE CAST({col} AS TEXT) = ?",
            self.name
        );
        let result = sqlx::query(&sql).bind(value).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Delete the row with the given id.
    pub(crate) async fn delete_by_id(&self, id: i64) -> Result<u64> {
        let sql = format!("DELETE FROM {} WHERE id = ?", self.name);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    pub(crate) async fn count(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) AS n FROM {}", self.name);
        let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
        Ok(row.get::<i64, _>("n"))
    }

    /// Whitespace-strip, duplicate-check, then syntax-check a MAC bound for
    /// insertion. The duplicate check precedes the syntax check and is
    /// scoped to this table only; a MAC sitting in the other registry is
    /// not a duplicate here (that is how promotion works).
    ///
    /// Duplicates are detected on the folded comparison key, the same
    /// identity the reconciliation engine uses, so `AA:BB:..` cannot slip
    /// in beside an existing `aa:bb:..` row.
    pub(crate) async fn guard_new_mac(&self, mac_addr: &str) -> Result<String> {
        let mac_addr = mac::normalize(mac_addr);
        let key = mac::key(&mac_addr);

        let sql = format!("SELECT mac FROM {}", self.name);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        let duplicate = rows
            .iter()
            .any(|r| mac::key(&r.get::<String, _>("mac")) == key);
        if duplicate {
            tracing::warn!(table = self.name, mac = %mac_addr, "Duplicate MAC address");
            return Err(StoreError::DuplicateMac {
                table: self.name,
                mac: mac_addr,
            });
        }

        if !mac::is_valid(&mac_addr) {
            return Err(StoreError::InvalidMac { mac: mac_addr });
        }

        Ok(mac_addr)
    }
}
