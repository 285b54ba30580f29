//! Thin PostgreSQL convenience layer for the group-chat bot.
//!
//! `PsqlStore` wraps a bounded connection pool and exposes schema setup,
//! single-statement execution, fetch helpers, and chunked bulk operations.
//! It is deliberately not a storage engine: no caching, no cross-statement
//! transactions, no retries.

mod error;
mod store;
mod value;

pub use error::{Result, StoreError};
pub use store::{PsqlStore, BULK_SIZE};
pub use value::SqlValue;
