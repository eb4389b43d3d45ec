//! Domain records shared by the stores, the event system and the bootstrap routine.
//!
//! These types mirror the rows owned by the platform's persistence services.
//! They carry no behavior beyond small predicates; every mutation goes through
//! a store.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// ============================================================================
// Users
// ============================================================================

/// System-wide role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemRole {
    /// Full administrative capability across all organizations.
    Admin,
    /// Regular tenant user.
    User,
}

impl SystemRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemRole::Admin => "admin",
            SystemRole::User => "user",
        }
    }
}

impl std::fmt::Display for SystemRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub role: SystemRole,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

// ============================================================================
// Organizations
// ============================================================================

/// Resource limits attached to an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationQuota {
    pub total_cpu_quota: u32,
    pub total_memory_quota: u32,
    pub total_disk_quota: u32,
    pub max_cpu_per_sandbox: u32,
    pub max_memory_per_sandbox: u32,
    pub max_disk_per_sandbox: u32,
    pub snapshot_quota: u32,
    pub max_snapshot_size: u32,
    pub volume_quota: u32,
}

impl OrganizationQuota {
    /// A quota with every limit set to the same value.
    pub const fn uniform(limit: u32) -> Self {
        Self {
            total_cpu_quota: limit,
            total_memory_quota: limit,
            total_disk_quota: limit,
            max_cpu_per_sandbox: limit,
            max_memory_per_sandbox: limit,
            max_disk_per_sandbox: limit,
            snapshot_quota: limit,
            max_snapshot_size: limit,
            volume_quota: limit,
        }
    }
}

impl Default for OrganizationQuota {
    /// Limits applied to a self-registered user's personal organization.
    fn default() -> Self {
        Self {
            total_cpu_quota: 10,
            total_memory_quota: 10,
            total_disk_quota: 30,
            max_cpu_per_sandbox: 4,
            max_memory_per_sandbox: 8,
            max_disk_per_sandbox: 10,
            snapshot_quota: 100,
            max_snapshot_size: 20,
            volume_quota: 100,
        }
    }
}

/// A billing and quota scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    /// Owning user id.
    pub created_by: String,
    /// Personal organizations are auto-created, one per user.
    pub personal: bool,
    pub suspended: bool,
    pub suspension_reason: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub suspended_at: Option<OffsetDateTime>,
    pub quota: OrganizationQuota,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Organization {
    /// Reason string used when an organization is suspended.
    pub fn suspension_reason_or_default(&self) -> &str {
        self.suspension_reason.as_deref().unwrap_or("unspecified")
    }
}

// ============================================================================
// Container registries
// ============================================================================

/// Purpose of a container registry credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistryType {
    /// Ephemeral storage for images pushed during builds.
    Transient,
    /// Platform-managed storage for snapshot images.
    Internal,
    /// Tenant-provided registry.
    Organization,
}

impl RegistryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryType::Transient => "transient",
            RegistryType::Internal => "internal",
            RegistryType::Organization => "organization",
        }
    }
}

impl std::fmt::Display for RegistryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credentials for a container registry.
///
/// `url` never carries a scheme; clients add one when connecting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryCredential {
    pub id: String,
    pub name: String,
    pub url: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub project: String,
    pub registry_type: RegistryType,
    pub is_default: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

// ============================================================================
// Snapshots
// ============================================================================

/// Lifecycle state of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotState {
    /// Registered and waiting to be pulled.
    Pending,
    Pulling,
    Active,
    Error,
}

/// Compute sizing of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSizing {
    pub cpu: u32,
    /// GiB
    pub memory: u32,
    /// GiB
    pub disk: u32,
}

/// A prebuilt execution image available to an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    pub image_name: String,
    pub sizing: SnapshotSizing,
    /// Platform default offered to every tenant; exempt from auto-deletion.
    pub general: bool,
    pub state: SnapshotState,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

// ============================================================================
// API keys
// ============================================================================

/// Permission that can be granted to an API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyPermission {
    WriteRegistries,
    DeleteRegistries,
    WriteSnapshots,
    DeleteSnapshots,
    WriteSandboxes,
    DeleteSandboxes,
    WriteVolumes,
    DeleteVolumes,
}

/// An API key bound to an organization and a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub organization_id: String,
    pub user_id: String,
    pub name: String,
    /// Secret value; only returned once, at creation.
    #[serde(skip_serializing)]
    pub value: String,
    pub permissions: Vec<ApiKeyPermission>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}
