//! Event types emitted by the platform's stores.
//!
//! Every state change made by a store is described by a [`PlatformEvent`].
//! Hooks react to them (for example to provision a personal organization
//! when a user is created) and passive observers receive them through the
//! broadcaster.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::model::{ApiKey, Organization, OrganizationQuota, RegistryCredential, Snapshot, User};

/// Discriminant of a [`PlatformEvent`], used for hook filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformEventKind {
    UserCreated,
    OrganizationCreated,
    OrganizationSuspended,
    OrganizationUnsuspended,
    RegistryCreated,
    SnapshotCreated,
    ApiKeyCreated,
}

impl PlatformEventKind {
    /// Returns the dotted event name used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformEventKind::UserCreated => "user.created",
            PlatformEventKind::OrganizationCreated => "organization.created",
            PlatformEventKind::OrganizationSuspended => "organization.suspended",
            PlatformEventKind::OrganizationUnsuspended => "organization.unsuspended",
            PlatformEventKind::RegistryCreated => "registry.created",
            PlatformEventKind::SnapshotCreated => "snapshot.created",
            PlatformEventKind::ApiKeyCreated => "api_key.created",
        }
    }
}

impl std::fmt::Display for PlatformEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payload of a platform event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlatformEventPayload {
    UserCreated {
        user: User,
        /// Quota requested for the user's personal organization.
        personal_quota: Option<OrganizationQuota>,
    },
    OrganizationCreated {
        organization: Organization,
    },
    OrganizationSuspended {
        organization_id: String,
        reason: String,
    },
    OrganizationUnsuspended {
        organization_id: String,
    },
    RegistryCreated {
        registry: RegistryCredential,
    },
    SnapshotCreated {
        snapshot: Snapshot,
    },
    ApiKeyCreated {
        organization_id: String,
        user_id: String,
        name: String,
    },
}

/// A timestamped platform event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    pub payload: PlatformEventPayload,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl PlatformEvent {
    pub fn new(payload: PlatformEventPayload) -> Self {
        Self {
            payload,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn user_created(user: User, personal_quota: Option<OrganizationQuota>) -> Self {
        Self::new(PlatformEventPayload::UserCreated {
            user,
            personal_quota,
        })
    }

    pub fn organization_created(organization: Organization) -> Self {
        Self::new(PlatformEventPayload::OrganizationCreated { organization })
    }

    pub fn organization_suspended(
        organization_id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(PlatformEventPayload::OrganizationSuspended {
            organization_id: organization_id.into(),
            reason: reason.into(),
        })
    }

    pub fn organization_unsuspended(organization_id: impl Into<String>) -> Self {
        Self::new(PlatformEventPayload::OrganizationUnsuspended {
            organization_id: organization_id.into(),
        })
    }

    pub fn registry_created(registry: RegistryCredential) -> Self {
        Self::new(PlatformEventPayload::RegistryCreated { registry })
    }

    pub fn snapshot_created(snapshot: Snapshot) -> Self {
        Self::new(PlatformEventPayload::SnapshotCreated { snapshot })
    }

    pub fn api_key_created(key: &ApiKey) -> Self {
        Self::new(PlatformEventPayload::ApiKeyCreated {
            organization_id: key.organization_id.clone(),
            user_id: key.user_id.clone(),
            name: key.name.clone(),
        })
    }

    pub fn kind(&self) -> PlatformEventKind {
        match &self.payload {
            PlatformEventPayload::UserCreated { .. } => PlatformEventKind::UserCreated,
            PlatformEventPayload::OrganizationCreated { .. } => {
                PlatformEventKind::OrganizationCreated
            }
            PlatformEventPayload::OrganizationSuspended { .. } => {
                PlatformEventKind::OrganizationSuspended
            }
            PlatformEventPayload::OrganizationUnsuspended { .. } => {
                PlatformEventKind::OrganizationUnsuspended
            }
            PlatformEventPayload::RegistryCreated { .. } => PlatformEventKind::RegistryCreated,
            PlatformEventPayload::SnapshotCreated { .. } => PlatformEventKind::SnapshotCreated,
            PlatformEventPayload::ApiKeyCreated { .. } => PlatformEventKind::ApiKeyCreated,
        }
    }

    /// Id of the record the event refers to.
    pub fn subject_id(&self) -> &str {
        match &self.payload {
            PlatformEventPayload::UserCreated { user, .. } => &user.id,
            PlatformEventPayload::OrganizationCreated { organization } => &organization.id,
            PlatformEventPayload::OrganizationSuspended {
                organization_id, ..
            }
            | PlatformEventPayload::OrganizationUnsuspended { organization_id } => {
                organization_id
            }
            PlatformEventPayload::RegistryCreated { registry } => &registry.id,
            PlatformEventPayload::SnapshotCreated { snapshot } => &snapshot.id,
            PlatformEventPayload::ApiKeyCreated { name, .. } => name,
        }
    }
}
