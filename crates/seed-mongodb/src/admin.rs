//! Direct-node connections shared by the admin helpers.

use mongodb::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::connect::{direct_client, ping};
use crate::servers::{AdminCredentials, ServerEntry, ServersConfig, ServersConfigError};

/// Errors from the admin helpers.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error(transparent)]
    Config(#[from] ServersConfigError),

    /// MongoDB connection or command error.
    #[error("MongoDB error")]
    MongoDB(#[from] mongodb::error::Error),

    #[error("Unable to connect to any node directly. Last error: {last_error}")]
    NoReachableNode { last_error: String },

    /// The replica set has not elected a primary.
    #[error("No primary found yet. Try again after election completes")]
    NoPrimary,

    /// Some member is down or not PRIMARY/SECONDARY, or there is no primary.
    #[error("Replica set is not fully healthy")]
    Unhealthy,

    #[error("Primary '{0}' does not match any configured server and is not host:port")]
    UnknownPrimary(String),
}

/// Connect directly to the first configured node that answers `ping`.
///
/// Returns the client together with the node it is connected to.
pub async fn connect_first_reachable<'a>(
    config: &'a ServersConfig,
    admin: &AdminCredentials,
) -> Result<(Client, &'a ServerEntry), AdminError> {
    let mut last_error = String::from("no servers configured");

    for server in &config.servers {
        debug!("Trying direct connection to {}", server.address());
        let client = match direct_client(server, admin) {
            Ok(client) => client,
            Err(e) => {
                warn!("Cannot build client for {}: {}", server.address(), e);
                last_error = e.to_string();
                continue;
            }
        };
        match ping(&client).await {
            Ok(()) => return Ok((client, server)),
            Err(e) => {
                warn!(
                    "Cannot reach {} as {}: {}",
                    server.address(),
                    admin.user,
                    e
                );
                last_error = e.to_string();
                client.shutdown().await;
            }
        }
    }

    Err(AdminError::NoReachableNode { last_error })
}
