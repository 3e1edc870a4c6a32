//! Seeding core for replica-seed
//!
//! Generates product records and submits them to a store as one ordered batch.
//! The store is reached through the [`StoreConnector`] and [`RecordStore`]
//! traits so the flow can run against MongoDB (`seed-mongodb`) or the
//! in-memory store in [`testing`].
//!
//! A run is a single linear sequence:
//!
//! 1. connect to the configured target
//! 2. build [`BATCH_SIZE`] records named `Product_xxxxxxxx`
//! 3. insert them in order, stopping at the first rejected record
//! 4. close the connection, on success and on failure
//! 5. return a [`SeedReport`] or a [`SeedError`]

mod config;
mod error;
mod record;
mod seeder;
mod store;
pub mod testing;

pub use config::{SeedConfig, DEFAULT_COLLECTION, DEFAULT_CONNECTION_TARGET, DEFAULT_DATABASE};
pub use error::SeedError;
pub use record::{
    base36_fraction, generate_batch, random_name, ProductRecord, BATCH_SIZE, NAME_PREFIX,
    NAME_SUFFIX_LEN,
};
pub use seeder::{SeedReport, Seeder};
pub use store::{InsertedBatch, RecordStore, StoreConnector};
