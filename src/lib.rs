//! replica-seed
//!
//! Seeds two `Product_xxxxxxxx` records into a MongoDB replica set as one
//! ordered batch, plus two admin helpers carried over from the cluster setup
//! scripts: provisioning the application user and a read-only replica-set
//! health report.
//!
//! # CLI Usage
//!
//! ```bash
//! # Seed the products collection (MONGO_URI or the local 3-node default)
//! replica-seed seed
//!
//! # Create or update the application user
//! replica-seed create-app-user --config mongo_servers.yml --db appdb --user appuser
//!
//! # Check replica-set health
//! replica-seed replica-set-status --config mongo_servers.yml
//! ```

use std::path::PathBuf;

use clap::Parser;

pub use seed_core::{
    SeedConfig, SeedError, SeedReport, Seeder, DEFAULT_COLLECTION, DEFAULT_CONNECTION_TARGET,
    DEFAULT_DATABASE,
};
pub use seed_mongodb::MongoConnector;
use seed_mongodb::AdminError;

/// Exit status for "no primary" and "not fully healthy" verdicts.
pub const EXIT_UNHEALTHY: i32 = 2;

#[derive(Parser, Clone, Debug)]
pub struct SeedOpts {
    /// MongoDB connection string (replica-set aware)
    #[arg(long = "uri", env = "MONGO_URI", default_value = DEFAULT_CONNECTION_TARGET)]
    pub connection_target: String,

    /// Target database
    #[arg(long, default_value = DEFAULT_DATABASE)]
    pub database: String,

    /// Target collection
    #[arg(long, default_value = DEFAULT_COLLECTION)]
    pub collection: String,
}

impl From<SeedOpts> for SeedConfig {
    fn from(opts: SeedOpts) -> Self {
        SeedConfig::new(opts.connection_target, opts.database, opts.collection)
    }
}

#[derive(Parser, Clone, Debug)]
pub struct AdminOpts {
    /// Servers config file listing replica-set members and admin credentials
    #[arg(long, default_value = "mongo_servers.yml")]
    pub config: PathBuf,

    /// Admin password, used when the config file has no admin_password
    #[arg(long, env = "MONGO_ROOT_PASSWORD", hide_env_values = true)]
    pub root_password: Option<String>,
}

/// Build a seeder against MongoDB.
pub fn mongodb_seeder(opts: SeedOpts) -> Seeder<MongoConnector> {
    Seeder::new(MongoConnector, opts.into())
}

/// Lines printed after a successful run.
pub fn report_lines(report: &SeedReport) -> Vec<String> {
    let mut lines = Vec::with_capacity(report.ids.len() + 1);
    lines.push(format!("Inserted {} products:", report.inserted_count));
    lines.extend(report.ids.iter().map(|id| format!("  {id}")));
    lines
}

/// Process exit status for a failed command: [`EXIT_UNHEALTHY`] for replica-set
/// health verdicts, 1 for everything else.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<AdminError>() {
        Some(AdminError::NoPrimary | AdminError::Unhealthy) => EXIT_UNHEALTHY,
        _ => 1,
    }
}
