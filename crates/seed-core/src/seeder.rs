//! The seeding run: connect, insert one ordered batch, release.

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::SeedConfig;
use crate::error::SeedError;
use crate::record::{generate_batch, ProductRecord, BATCH_SIZE};
use crate::store::{RecordStore, StoreConnector};

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    /// Count reported by the store. Never rounded up to the batch size.
    pub inserted_count: u64,
    /// Store-assigned identifiers, in insertion order.
    pub ids: Vec<String>,
    /// The records that were submitted.
    pub records: Vec<ProductRecord>,
}

/// Inserts a fixed batch of product records into the configured collection.
pub struct Seeder<C> {
    connector: C,
    config: SeedConfig,
}

impl<C: StoreConnector> Seeder<C> {
    pub fn new(connector: C, config: SeedConfig) -> Self {
        Self { connector, config }
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Run once with thread-local randomness for the record names.
    pub async fn run(&self) -> Result<SeedReport, SeedError> {
        let records = generate_batch(&mut rand::rng());
        self.seed(records).await
    }

    /// Run once with names drawn from `rng`.
    pub async fn run_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<SeedReport, SeedError> {
        let records = generate_batch(rng);
        self.seed(records).await
    }

    async fn seed(&self, records: Vec<ProductRecord>) -> Result<SeedReport, SeedError> {
        let namespace = self.config.namespace();
        debug!("Connecting to store for {}", namespace);

        let store = self
            .connector
            .connect(&self.config.connection_target)
            .await
            .map_err(SeedError::Connect)?;

        // Hold the outcome until the store is closed so every path releases it.
        let outcome = store
            .insert_ordered(&self.config.database, &self.config.collection, &records)
            .await;
        store.close().await;

        let batch = outcome.map_err(|source| SeedError::Insert {
            namespace: namespace.clone(),
            source,
        })?;

        if batch.inserted_count < BATCH_SIZE as u64 {
            warn!(
                "Store reported {} of {} records inserted into {}",
                batch.inserted_count, BATCH_SIZE, namespace
            );
        }
        info!(
            "Inserted {} records into {}",
            batch.inserted_count, namespace
        );

        Ok(SeedReport {
            inserted_count: batch.inserted_count,
            ids: batch.ids,
            records,
        })
    }
}
