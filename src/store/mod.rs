//! # Record Stores
//!
//! The flag layer never talks to a database directly. It builds a
//! [`RecordQuery`] and hands it to a [`RecordStore`].
//!
//! - [`memory`] - in-process tables, used by tests and embedded callers
//! - [`postgres`] - `sqlx` backed store for PostgreSQL tables
//!
//! Errors are the store's own type and reach the caller unchanged.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::{MemoryStore, MemoryStoreError};
#[cfg(feature = "postgres")]
pub use postgres::PgRecordStore;

use crate::models::Record;
use crate::query_builder::{Assignment, RecordQuery};
use async_trait::async_trait;

/// Persistence collaborator used by flag scopes
#[async_trait]
pub trait RecordStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// All rows matching the query
    async fn fetch_all(&self, query: &RecordQuery) -> Result<Vec<Record>, Self::Error>;

    /// Number of rows matching the query
    async fn count(&self, query: &RecordQuery) -> Result<i64, Self::Error>;

    /// Write `assignments` to every row matching the query, returning the
    /// number of rows affected
    async fn update(
        &self,
        query: &RecordQuery,
        assignments: &[Assignment],
    ) -> Result<u64, Self::Error>;

    /// Load a single row by primary key
    async fn find(&self, table: &str, id: i64) -> Result<Option<Record>, Self::Error>;

    /// Reload the record's columns from the store
    async fn refresh(&self, table: &str, record: &mut Record) -> Result<(), Self::Error>;

    /// Persist the record's in-memory column values
    async fn save(&self, table: &str, record: &Record) -> Result<(), Self::Error>;
}
