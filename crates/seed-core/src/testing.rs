//! In-memory store for exercising the seeder without a database.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::record::ProductRecord;
use crate::store::{InsertedBatch, RecordStore, StoreConnector};

/// Failure to inject into a [`MemoryConnector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryFailure {
    /// Connecting fails.
    Unreachable,
    /// The record at this batch index is rejected; ordered semantics stop there.
    RejectAt(usize),
    /// Everything is stored but only this many inserts are reported.
    UnderReport(u64),
}

/// A document persisted by the in-memory store.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: String,
    pub record: ProductRecord,
}

#[derive(Debug, Default)]
struct MemoryState {
    collections: HashMap<String, Vec<StoredDocument>>,
    next_id: u64,
    connects: usize,
    closes: usize,
}

/// Connector whose stores share one in-memory state.
///
/// Clones share state, so a test can keep a handle and inspect what a seeder
/// wrote through its own clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    state: Arc<Mutex<MemoryState>>,
    failure: Option<MemoryFailure>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, failure: MemoryFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Documents stored in `database.collection`, in insertion order.
    pub fn documents(&self, database: &str, collection: &str) -> Vec<StoredDocument> {
        lock(&self.state)
            .collections
            .get(&format!("{database}.{collection}"))
            .cloned()
            .unwrap_or_default()
    }

    pub fn connect_count(&self) -> usize {
        lock(&self.state).connects
    }

    pub fn close_count(&self) -> usize {
        lock(&self.state).closes
    }
}

#[async_trait]
impl StoreConnector for MemoryConnector {
    type Store = MemoryStore;

    async fn connect(&self, target: &str) -> Result<MemoryStore> {
        let mut state = lock(&self.state);
        state.connects += 1;
        if self.failure == Some(MemoryFailure::Unreachable) {
            // Mirror a real client: resources allocated, then released on failure.
            state.closes += 1;
            bail!("no reachable servers at {target}");
        }
        Ok(MemoryStore {
            state: Arc::clone(&self.state),
            failure: self.failure,
        })
    }
}

/// An open in-memory connection.
#[derive(Debug)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    failure: Option<MemoryFailure>,
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_ordered(
        &self,
        database: &str,
        collection: &str,
        records: &[ProductRecord],
    ) -> Result<InsertedBatch> {
        let mut state = lock(&self.state);
        let mut ids = Vec::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            if self.failure == Some(MemoryFailure::RejectAt(index)) {
                return Err(anyhow!(
                    "write error at index {index}: document '{}' rejected",
                    record.name
                ));
            }
            state.next_id += 1;
            let id = format!("{:024x}", state.next_id);
            state
                .collections
                .entry(format!("{database}.{collection}"))
                .or_default()
                .push(StoredDocument {
                    id: id.clone(),
                    record: record.clone(),
                });
            ids.push(id);
        }

        let inserted_count = match self.failure {
            Some(MemoryFailure::UnderReport(count)) => count,
            _ => ids.len() as u64,
        };
        Ok(InsertedBatch {
            inserted_count,
            ids,
        })
    }

    async fn close(self) {
        lock(&self.state).closes += 1;
    }
}

fn lock(state: &Mutex<MemoryState>) -> MutexGuard<'_, MemoryState> {
    state
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
