//! Error types for the macwatch-store crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid MAC address: {mac}")]
    InvalidMac { mac: String },

    #[error("Duplicate MAC address in {table} registry: {mac}")]
    DuplicateMac { table: &'static str, mac: String },

    #[error("Column {column} does not exist in table {table}")]
    UnknownColumn { table: &'static str, column: String },

    #[error("Device name must not be empty")]
    InvalidName,

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
