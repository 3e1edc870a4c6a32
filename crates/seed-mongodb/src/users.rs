//! Application user provisioning.

use bson::{doc, Document};
use mongodb::error::{Error, ErrorKind};
use mongodb::Client;
use tracing::info;

use crate::admin::{connect_first_reachable, AdminError};
use crate::connect::direct_client;
use crate::servers::{AdminCredentials, ServerEntry, ServersConfig};

/// Server error code for `createUser` on an existing user.
const USER_ALREADY_EXISTS: i32 = 51003;

/// The application user to provision.
#[derive(Debug, Clone)]
pub struct AppUser {
    pub database: String,
    pub user: String,
    pub password: String,
}

/// What [`ensure_app_user`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOutcome {
    Created,
    Updated,
}

/// Create `user` with `readWrite` on its database, or update its password and
/// roles if it already exists. Writes are sent to the primary.
pub async fn ensure_app_user(
    config: &ServersConfig,
    admin: &AdminCredentials,
    user: &AppUser,
) -> Result<UserOutcome, AdminError> {
    let (client, node) = connect_first_reachable(config, admin).await?;
    info!("Connected directly to {}", node.address());

    let client = match primary_to_follow(&client, config).await {
        Ok(None) => client,
        Ok(Some(primary)) => {
            info!("Reconnecting to primary at {}", primary.address());
            client.shutdown().await;
            direct_client(&primary, admin)?
        }
        Err(e) => {
            client.shutdown().await;
            return Err(e);
        }
    };

    let outcome = create_or_update_user(&client, user).await;
    client.shutdown().await;
    outcome
}

/// `None` when the connected node is the writable primary, otherwise the
/// configured server for the current primary.
async fn primary_to_follow(
    client: &Client,
    config: &ServersConfig,
) -> Result<Option<ServerEntry>, AdminError> {
    let hello = client
        .database("admin")
        .run_command(doc! { "hello": 1 })
        .await?;
    match primary_from_hello(&hello)? {
        None => Ok(None),
        Some(name) => config
            .resolve_member(name)
            .map(Some)
            .ok_or_else(|| AdminError::UnknownPrimary(name.to_string())),
    }
}

/// Read the `hello` reply: `Ok(None)` if this node is the writable primary,
/// `Ok(Some(name))` naming the primary otherwise.
pub(crate) fn primary_from_hello(hello: &Document) -> Result<Option<&str>, AdminError> {
    if hello.get_bool("isWritablePrimary").unwrap_or(false) {
        return Ok(None);
    }
    match hello.get_str("primary") {
        Ok(name) if !name.is_empty() => Ok(Some(name)),
        _ => Err(AdminError::NoPrimary),
    }
}

fn user_command(verb: &str, user: &AppUser) -> Document {
    doc! {
        verb: user.user.as_str(),
        "pwd": user.password.as_str(),
        "roles": [ { "role": "readWrite", "db": user.database.as_str() } ],
    }
}

async fn create_or_update_user(
    client: &Client,
    user: &AppUser,
) -> Result<UserOutcome, AdminError> {
    let db = client.database(&user.database);

    match db.run_command(user_command("createUser", user)).await {
        Ok(_) => {
            info!(
                "Created user '{}' with readWrite on '{}'",
                user.user, user.database
            );
            Ok(UserOutcome::Created)
        }
        Err(e) if is_user_exists(&e) => {
            info!("User '{}' exists; updating password/roles", user.user);
            db.run_command(user_command("updateUser", user)).await?;
            Ok(UserOutcome::Updated)
        }
        Err(e) => Err(e.into()),
    }
}

fn is_user_exists(error: &Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Command(command) => {
            command.code == USER_ALREADY_EXISTS || command.message.contains("already exists")
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_user() -> AppUser {
        AppUser {
            database: "appdb".to_string(),
            user: "appuser".to_string(),
            password: "appuserpassword".to_string(),
        }
    }

    #[test]
    fn test_user_command_shape() {
        let cmd = user_command("createUser", &app_user());

        assert_eq!(cmd.keys().next().map(String::as_str), Some("createUser"));
        assert_eq!(cmd.get_str("createUser").unwrap(), "appuser");
        assert_eq!(cmd.get_str("pwd").unwrap(), "appuserpassword");
        let roles = cmd.get_array("roles").unwrap();
        assert_eq!(roles.len(), 1);
        let role = roles[0].as_document().unwrap();
        assert_eq!(role.get_str("role").unwrap(), "readWrite");
        assert_eq!(role.get_str("db").unwrap(), "appdb");
    }

    #[test]
    fn test_hello_on_primary() {
        let hello = doc! { "isWritablePrimary": true, "primary": "mongo1:27017" };
        assert_eq!(primary_from_hello(&hello).unwrap(), None);
    }

    #[test]
    fn test_hello_on_secondary() {
        let hello = doc! { "isWritablePrimary": false, "primary": "mongo2:27017" };
        assert_eq!(primary_from_hello(&hello).unwrap(), Some("mongo2:27017"));
    }

    #[test]
    fn test_hello_without_primary() {
        let hello = doc! { "isWritablePrimary": false };
        assert!(matches!(primary_from_hello(&hello), Err(AdminError::NoPrimary)));
    }
}
