//! Read-only replica-set health report.

use bson::{doc, Bson, Document};
use chrono::{DateTime, Utc};

use crate::admin::{connect_first_reachable, AdminError};
use crate::servers::{AdminCredentials, ServersConfig};

/// One member entry of `replSetGetStatus`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberStatus {
    pub name: String,
    pub state: String,
    pub up: bool,
    pub optime: Option<DateTime<Utc>>,
    pub sync_source: Option<String>,
}

impl MemberStatus {
    fn from_document(member: &Document) -> Self {
        let sync_source = ["syncSourceHost", "syncingTo"]
            .iter()
            .filter_map(|key| member.get_str(key).ok())
            .find(|s| !s.is_empty())
            .map(str::to_string);

        Self {
            name: member.get_str("name").unwrap_or_default().to_string(),
            state: member.get_str("stateStr").unwrap_or_default().to_string(),
            up: member.get("health").map(health_is_up).unwrap_or(false),
            optime: member
                .get_datetime("optimeDate")
                .ok()
                .map(|d| d.to_chrono()),
            sync_source,
        }
    }

    /// PRIMARY or SECONDARY, and reported up.
    pub fn is_healthy(&self) -> bool {
        self.up && matches!(self.state.as_str(), "PRIMARY" | "SECONDARY")
    }

    /// Fixed-width line for the status table.
    pub fn summary_line(&self) -> String {
        let optime = self.optime.map(|t| t.to_rfc3339()).unwrap_or_default();
        format!(
            "{:<25} state={:<10} health={:<4} optime={} syncingTo={}",
            self.name,
            self.state,
            if self.up { "UP" } else { "DOWN" },
            optime,
            self.sync_source.as_deref().unwrap_or_default()
        )
    }
}

fn health_is_up(health: &Bson) -> bool {
    match health {
        Bson::Double(h) => *h == 1.0,
        Bson::Int32(h) => *h == 1,
        Bson::Int64(h) => *h == 1,
        _ => false,
    }
}

/// Parsed `replSetGetStatus` reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicaSetStatus {
    pub set_name: String,
    pub members: Vec<MemberStatus>,
}

impl ReplicaSetStatus {
    pub fn from_document(status: &Document) -> Self {
        let members = status
            .get_array("members")
            .map(|members| {
                members
                    .iter()
                    .filter_map(Bson::as_document)
                    .map(MemberStatus::from_document)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            set_name: status.get_str("set").unwrap_or("(unknown)").to_string(),
            members,
        }
    }

    pub fn primary(&self) -> Option<&MemberStatus> {
        self.members.iter().find(|m| m.state == "PRIMARY")
    }

    /// A primary exists and every member is healthy.
    pub fn is_healthy(&self) -> bool {
        self.primary().is_some() && self.members.iter().all(MemberStatus::is_healthy)
    }
}

/// Status as seen from one node.
#[derive(Debug, Clone)]
pub struct StatusReport {
    /// `host:port` of the node that answered.
    pub queried: String,
    pub status: ReplicaSetStatus,
}

/// Run `replSetGetStatus` on the first reachable node.
pub async fn replica_set_status(
    config: &ServersConfig,
    admin: &AdminCredentials,
) -> Result<StatusReport, AdminError> {
    let (client, node) = connect_first_reachable(config, admin).await?;
    let queried = node.address();

    let reply = client
        .database("admin")
        .run_command(doc! { "replSetGetStatus": 1 })
        .await;
    client.shutdown().await;

    Ok(StatusReport {
        queried,
        status: ReplicaSetStatus::from_document(&reply?),
    })
}
