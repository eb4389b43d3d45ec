//! Creation specs accepted by the stores.

use dockyard_core::{OrganizationQuota, RegistryType, SnapshotSizing, SystemRole};
use serde::{Deserialize, Serialize};

/// Parameters for creating a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    /// Caller-chosen id; must be unique.
    pub id: String,
    pub name: String,
    pub email: String,
    /// Unverified users get a suspended personal organization.
    pub email_verified: bool,
    pub role: SystemRole,
    /// Quota for the personal organization; the platform default when `None`.
    pub personal_organization_quota: Option<OrganizationQuota>,
}

/// Parameters for creating a registry credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRegistry {
    pub name: String,
    /// Registry host without scheme.
    pub url: String,
    pub username: String,
    pub password: String,
    pub project: String,
    pub registry_type: RegistryType,
    pub is_default: bool,
}

/// Parameters for creating a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSnapshot {
    pub name: String,
    pub image_name: String,
    #[serde(flatten)]
    pub sizing: SnapshotSizing,
}
