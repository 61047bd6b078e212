//! macwatch-store: SQLite persistence for the device registries.
//!
//! Two registries share one [`Store`] handle: `known` (operator-named
//! devices) and `unknown` (observed-but-unclassified devices). Each registry
//! is its own type with its own insert contract; reads, updates, and deletes
//! go through a shared whitelist-checked table core.

pub mod error;
pub mod known;
pub mod store;
mod table;
pub mod unknown;

pub use error::StoreError;
pub use known::KnownRegistry;
pub use store::Store;
pub use unknown::UnknownRegistry;
