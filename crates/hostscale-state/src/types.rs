//! Domain types for the host store.
//!
//! These types represent hosts as the fleet reports them: an opaque id,
//! the human-readable identifiers used for naming clones, the driver that
//! provisioned the host (empty for manually added hosts), its lifecycle
//! state, and the provisioning template that groups hosts for scaling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unique identifier for a host.
pub type HostId = String;

/// Identifier of the provisioning template shared by a scaling group.
pub type HostTemplateId = String;

// ── Host ──────────────────────────────────────────────────────────

/// A host as listed by the fleet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostRecord {
    pub id: HostId,
    /// Display name. Takes precedence over `hostname` when set.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostname: String,
    /// Machine driver that provisioned this host. Empty for custom hosts.
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub state: HostState,
    pub host_template_id: HostTemplateId,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    /// Unix timestamp (seconds) when this host was created.
    #[serde(default)]
    pub created: u64,
    /// Store-wide creation sequence; breaks ties between equal `created`.
    #[serde(default)]
    pub created_seq: u64,
}

impl HostRecord {
    /// The name used for display and clone-name derivation.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.hostname
        } else {
            &self.name
        }
    }

    /// Whether this host was created by a machine driver rather than
    /// registered by hand.
    pub fn is_provisioned(&self) -> bool {
        !self.driver.is_empty()
    }
}

/// Lifecycle state of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HostState {
    Registering,
    Provisioning,
    Activating,
    #[default]
    Active,
    Inactive,
    Deactivating,
    Reconnecting,
    Disconnected,
    Error,
    Removed,
    /// Any state this version does not know about.
    #[serde(other)]
    Unknown,
}

impl HostState {
    /// States whose hosts are removed first when a group scales down.
    pub fn is_unhealthy(self) -> bool {
        matches!(
            self,
            HostState::Inactive
                | HostState::Deactivating
                | HostState::Reconnecting
                | HostState::Disconnected
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HostState::Registering => "registering",
            HostState::Provisioning => "provisioning",
            HostState::Activating => "activating",
            HostState::Active => "active",
            HostState::Inactive => "inactive",
            HostState::Deactivating => "deactivating",
            HostState::Reconnecting => "reconnecting",
            HostState::Disconnected => "disconnected",
            HostState::Error => "error",
            HostState::Removed => "removed",
            HostState::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for HostState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Creation draft ────────────────────────────────────────────────

/// Payload for creating a host. The store assigns id and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewHost {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub driver: String,
    #[serde(default)]
    pub state: HostState,
    pub host_template_id: HostTemplateId,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl NewHost {
    /// Build a clone of `template` that will register as `hostname`.
    ///
    /// `name` is left empty so the clone's display name follows its
    /// hostname instead of repeating the template's name.
    /// The clone starts `Active` whatever state the template is in.
    pub fn clone_of(template: &HostRecord, hostname: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            hostname: hostname.into(),
            driver: template.driver.clone(),
            state: HostState::Active,
            host_template_id: template.host_template_id.clone(),
            labels: template.labels.clone(),
        }
    }

    /// Materialize the draft into a record with store-assigned fields.
    pub fn into_record(self, id: HostId, created: u64, created_seq: u64) -> HostRecord {
        HostRecord {
            id,
            name: self.name,
            hostname: self.hostname,
            driver: self.driver,
            state: self.state,
            host_template_id: self.host_template_id,
            labels: self.labels,
            created,
            created_seq,
        }
    }
}
