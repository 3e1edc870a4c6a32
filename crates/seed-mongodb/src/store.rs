//! MongoDB implementation of the seeding store traits.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use bson::{doc, Bson, Document};
use mongodb::Client;
use seed_core::{InsertedBatch, ProductRecord, RecordStore, StoreConnector};
use tracing::debug;

use crate::connect::connect_verified;

/// Connects to MongoDB from a connection string.
///
/// Driver defaults apply for timeouts, pooling and retryable writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoConnector;

#[async_trait]
impl StoreConnector for MongoConnector {
    type Store = MongoStore;

    async fn connect(&self, target: &str) -> Result<MongoStore> {
        let client = connect_verified(target).await?;
        Ok(MongoStore { client })
    }
}

/// An open MongoDB client.
#[derive(Debug)]
pub struct MongoStore {
    client: Client,
}

#[async_trait]
impl RecordStore for MongoStore {
    async fn insert_ordered(
        &self,
        database: &str,
        collection: &str,
        records: &[ProductRecord],
    ) -> Result<InsertedBatch> {
        let collection = self
            .client
            .database(database)
            .collection::<Document>(collection);
        let documents: Vec<Document> = records.iter().map(record_to_document).collect();

        debug!(
            "Inserting {} documents into {}",
            documents.len(),
            collection.namespace()
        );
        let result = collection.insert_many(documents).ordered(true).await?;

        let ids = ids_in_insertion_order(&result.inserted_ids);
        Ok(InsertedBatch {
            inserted_count: ids.len() as u64,
            ids,
        })
    }

    async fn close(self) {
        debug!("Shutting down MongoDB client");
        self.client.shutdown().await;
    }
}

/// Convert a record to its stored shape: `{ name, createdAt }`.
pub fn record_to_document(record: &ProductRecord) -> Document {
    doc! {
        "name": record.name.as_str(),
        "createdAt": bson::DateTime::from_chrono(record.created_at),
    }
}

/// Order the driver's index→id map by batch index.
pub fn ids_in_insertion_order(inserted_ids: &HashMap<usize, Bson>) -> Vec<String> {
    let mut indexed: Vec<(&usize, &Bson)> = inserted_ids.iter().collect();
    indexed.sort_by_key(|(index, _)| **index);
    indexed
        .into_iter()
        .map(|(_, id)| id_to_string(id))
        .collect()
}

/// Render an `_id`. ObjectIds become their 24-character hex form.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}
