//! Replica-set server list used by the admin helpers.
//!
//! Loaded from a YAML file (`mongo_servers.yml` by default):
//!
//! ```yaml
//! admin_user: root
//! admin_password: example
//! servers:
//!   - host: 127.0.0.1
//!     port: 27030
//!     rs_host: mongo1:27017
//!   - host: 127.0.0.1
//!     port: 27031
//!     rs_host: mongo2:27017
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 27017;

pub const DEFAULT_ADMIN_USER: &str = "root";

/// Error type for server list loading.
#[derive(Debug, thiserror::Error)]
pub enum ServersConfigError {
    /// Error reading the config file
    #[error("Failed to read servers config")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse servers config YAML")]
    YamlError(#[from] serde_yaml::Error),

    #[error("No servers in config")]
    NoServers,

    /// Neither the config file nor `MONGO_ROOT_PASSWORD` provides a password
    #[error("Missing admin password (set admin_password or MONGO_ROOT_PASSWORD)")]
    MissingAdminPassword,
}

/// One replica-set member as reachable from this machine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerEntry {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Member name as known inside the replica set, when it differs from
    /// `host:port` (e.g. container hostnames behind port mappings).
    #[serde(default)]
    pub rs_host: Option<String>,
}

impl ServerEntry {
    /// `host:port` as reachable from this machine.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Name of this member inside the replica set.
    pub fn member_name(&self) -> String {
        self.rs_host.clone().unwrap_or_else(|| self.address())
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Credentials of the administrative user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub user: String,
    pub password: String,
}

/// Parsed `mongo_servers.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServersConfig {
    #[serde(default)]
    pub admin_user: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
    #[serde(default)]
    pub servers: Vec<ServerEntry>,
}

impl ServersConfig {
    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ServersConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse from a YAML string. Rejects an empty server list.
    pub fn from_yaml(yaml: &str) -> Result<Self, ServersConfigError> {
        let config: ServersConfig = serde_yaml::from_str(yaml)?;
        if config.servers.is_empty() {
            return Err(ServersConfigError::NoServers);
        }
        Ok(config)
    }

    /// Resolve admin credentials. The file's `admin_password` wins over
    /// `fallback_password` (normally `MONGO_ROOT_PASSWORD`).
    pub fn admin_credentials(
        &self,
        fallback_password: Option<&str>,
    ) -> Result<AdminCredentials, ServersConfigError> {
        let user = self
            .admin_user
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_ADMIN_USER)
            .to_string();
        let password = self
            .admin_password
            .as_deref()
            .filter(|p| !p.is_empty())
            .or(fallback_password.filter(|p| !p.is_empty()))
            .ok_or(ServersConfigError::MissingAdminPassword)?
            .to_string();
        Ok(AdminCredentials { user, password })
    }

    /// Map a replica-set member name (as reported by `hello.primary`) back to
    /// a configured server. Falls back to reading `name` as `host:port`.
    pub fn resolve_member(&self, name: &str) -> Option<ServerEntry> {
        if let Some(server) = self
            .servers
            .iter()
            .find(|s| s.rs_host.as_deref() == Some(name))
        {
            return Some(server.clone());
        }
        let (host, port) = name.rsplit_once(':')?;
        Some(ServerEntry {
            host: host.to_string(),
            port: port.parse().ok()?,
            rs_host: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const YAML: &str = r#"
admin_user: root
servers:
  - host: 127.0.0.1
    port: 27030
    rs_host: mongo1:27017
  - host: 127.0.0.1
    port: 27031
    rs_host: mongo2:27017
  - host: db3.internal
"#;

    #[test]
    fn test_parse_servers() {
        let config = ServersConfig::from_yaml(YAML).unwrap();
        assert_eq!(config.servers.len(), 3);
        assert_eq!(config.servers[0].address(), "127.0.0.1:27030");
        assert_eq!(config.servers[2].port, DEFAULT_PORT);
        assert_eq!(config.servers[2].member_name(), "db3.internal:27017");
    }

    #[test]
    fn test_empty_servers_rejected() {
        let err = ServersConfig::from_yaml("admin_user: root\nservers: []\n").unwrap_err();
        assert!(matches!(err, ServersConfigError::NoServers));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YAML.as_bytes()).unwrap();

        let config = ServersConfig::from_file(file.path()).unwrap();
        assert_eq!(config.servers.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        let err = ServersConfig::from_file("/nonexistent/mongo_servers.yml").unwrap_err();
        assert!(matches!(err, ServersConfigError::IoError(_)));
    }

    #[test]
    fn test_error_message_leaves_cause_to_source() {
        let err = ServersConfig::from_file("/nonexistent/mongo_servers.yml").unwrap_err();
        let cause = std::error::Error::source(&err).unwrap().to_string();

        assert_eq!(err.to_string(), "Failed to read servers config");
        let chain = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(chain.matches(cause.as_str()).count(), 1);
    }

    #[test]
    fn test_admin_password_precedence() {
        let mut config = ServersConfig::from_yaml(YAML).unwrap();

        let creds = config.admin_credentials(Some("from-env")).unwrap();
        assert_eq!(creds.user, "root");
        assert_eq!(creds.password, "from-env");

        config.admin_password = Some("from-file".to_string());
        let creds = config.admin_credentials(Some("from-env")).unwrap();
        assert_eq!(creds.password, "from-file");
    }

    #[test]
    fn test_admin_password_missing() {
        let config = ServersConfig::from_yaml(YAML).unwrap();
        assert!(matches!(
            config.admin_credentials(None),
            Err(ServersConfigError::MissingAdminPassword)
        ));
        assert!(matches!(
            config.admin_credentials(Some("")),
            Err(ServersConfigError::MissingAdminPassword)
        ));
    }

    #[test]
    fn test_default_admin_user() {
        let config =
            ServersConfig::from_yaml("admin_password: pw\nservers:\n  - host: a\n").unwrap();
        assert_eq!(config.admin_credentials(None).unwrap().user, "root");
    }

    #[test]
    fn test_resolve_member() {
        let config = ServersConfig::from_yaml(YAML).unwrap();

        let mapped = config.resolve_member("mongo2:27017").unwrap();
        assert_eq!(mapped.address(), "127.0.0.1:27031");

        let literal = config.resolve_member("10.0.0.9:27099").unwrap();
        assert_eq!(literal.address(), "10.0.0.9:27099");

        assert!(config.resolve_member("no-port").is_none());
        assert!(config.resolve_member("host:notaport").is_none());
    }
}
