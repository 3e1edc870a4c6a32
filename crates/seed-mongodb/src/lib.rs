//! MongoDB support for replica-seed
//!
//! - [`MongoConnector`] / [`MongoStore`]: the seeding store, writing through a
//!   replica-set aware client so inserts follow the primary.
//! - [`ensure_app_user`]: create or update the application user on the primary.
//! - [`replica_set_status`]: read-only `replSetGetStatus` report.
//!
//! The admin helpers connect directly to individual nodes listed in a
//! [`ServersConfig`] file.

mod admin;
mod connect;
mod replset;
mod servers;
mod store;
mod users;

pub use admin::{connect_first_reachable, AdminError};
pub use connect::{connect_verified, direct_client, direct_options, ping};
pub use replset::{replica_set_status, MemberStatus, ReplicaSetStatus, StatusReport};
pub use servers::{
    AdminCredentials, ServerEntry, ServersConfig, ServersConfigError, DEFAULT_ADMIN_USER,
    DEFAULT_PORT,
};
pub use store::{
    id_to_string, ids_in_insertion_order, record_to_document, MongoConnector, MongoStore,
};
pub use users::{ensure_app_user, AppUser, UserOutcome};
