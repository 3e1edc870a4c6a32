//! MongoDB client construction.

use std::time::Duration;

use bson::doc;
use mongodb::options::{ClientOptions, Credential, ServerAddress};
use mongodb::Client;

use crate::servers::{AdminCredentials, ServerEntry};

/// Server selection timeout for direct connections to a single node.
pub const DIRECT_SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

/// Build a client for `uri` and verify it answers `ping`.
///
/// The client is shut down before a failed ping is returned, so callers never
/// hold a half-open client.
pub async fn connect_verified(uri: &str) -> Result<Client, mongodb::error::Error> {
    tracing::debug!("Parsing MongoDB connection options");
    let options = ClientOptions::parse(uri).await?;
    let client = Client::with_options(options)?;

    if let Err(e) = ping(&client).await {
        tracing::debug!("Ping failed, shutting client down: {}", e);
        client.shutdown().await;
        return Err(e);
    }
    tracing::debug!("MongoDB ping succeeded");
    Ok(client)
}

/// Run `ping` against the `admin` database.
pub async fn ping(client: &Client) -> Result<(), mongodb::error::Error> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;
    Ok(())
}

/// Options for a direct (non-topology-discovering) connection to one node,
/// authenticated against `admin`.
pub fn direct_options(
    server: &ServerEntry,
    admin: &AdminCredentials,
) -> Result<ClientOptions, mongodb::error::Error> {
    let mut credential = Credential::default();
    credential.username = Some(admin.user.clone());
    credential.password = Some(admin.password.clone());
    credential.source = Some("admin".to_string());

    let mut options = ClientOptions::default();
    options.hosts = vec![ServerAddress::parse(server.address())?];
    options.credential = Some(credential);
    options.direct_connection = Some(true);
    options.server_selection_timeout = Some(DIRECT_SERVER_SELECTION_TIMEOUT);
    Ok(options)
}

/// Create a direct client to `server`. No round trip is made.
pub fn direct_client(
    server: &ServerEntry,
    admin: &AdminCredentials,
) -> Result<Client, mongodb::error::Error> {
    Client::with_options(direct_options(server, admin)?)
}
