//! Store traits the seeder is written against.
//!
//! The seeder only needs two capabilities from a data store: open/close a
//! connection, and insert a batch of records in order. Implementations live in
//! adapter crates (`seed-mongodb`) and in [`crate::testing`].

use anyhow::Result;
use async_trait::async_trait;

use crate::record::ProductRecord;

/// Outcome of an ordered batch insert as reported by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertedBatch {
    /// Number of records the store reports as inserted.
    pub inserted_count: u64,
    /// Store-assigned identifiers, in insertion order.
    pub ids: Vec<String>,
}

/// Opens connections to a store.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    type Store: RecordStore;

    /// Connect to `target`.
    ///
    /// If connecting fails after client resources were allocated, the
    /// connector releases them before returning the error.
    async fn connect(&self, target: &str) -> Result<Self::Store>;
}

/// An open connection to a store.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert `records` into `database.collection` in order, stopping at the
    /// first rejected record.
    async fn insert_ordered(
        &self,
        database: &str,
        collection: &str,
        records: &[ProductRecord],
    ) -> Result<InsertedBatch>;

    /// Release the connection.
    async fn close(self)
    where
        Self: Sized;
}
