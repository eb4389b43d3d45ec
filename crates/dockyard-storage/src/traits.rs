//! Store traits.
//!
//! Each trait is the contract of one persistence service. Implementations
//! must be thread-safe (`Send + Sync`) and emit a platform event after every
//! successful write.

use async_trait::async_trait;
use dockyard_core::{
    ApiKey, ApiKeyPermission, Organization, RegistryCredential, RegistryType, Snapshot, User,
};

use crate::error::StorageError;
use crate::types::{NewRegistry, NewSnapshot, NewUser};

/// User accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for missing users.
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StorageError>;

    /// Creates a user.
    ///
    /// Completes only after the `UserCreated` event has been handled, so the
    /// user's personal organization exists when this returns (provided the
    /// provisioning hook is attached).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the id is taken.
    async fn create_user(&self, spec: NewUser) -> Result<User, StorageError>;
}

/// Organizations.
#[async_trait]
pub trait OrganizationStore: Send + Sync {
    /// Returns the personal organization of a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user has none.
    async fn find_personal_organization(&self, user_id: &str)
    -> Result<Organization, StorageError>;

    /// Clears the suspension flag and reason of an organization.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown id and
    /// `StorageError::Persistence` if the write fails.
    async fn unsuspend_organization(&self, organization_id: &str) -> Result<(), StorageError>;
}

/// API keys.
#[async_trait]
pub trait ApiKeyStore: Send + Sync {
    /// Mints an API key bound to an organization and a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the user already has a key with
    /// this name in the organization.
    async fn create_api_key(
        &self,
        organization_id: &str,
        user_id: &str,
        name: &str,
        permissions: &[ApiKeyPermission],
    ) -> Result<ApiKey, StorageError>;
}

/// Container registry credentials.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Returns the default registry of a kind, if one exists.
    async fn get_default_registry(
        &self,
        registry_type: RegistryType,
    ) -> Result<Option<RegistryCredential>, StorageError>;

    /// Creates a registry credential.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when `is_default` is set and a default
    /// of the same kind already exists.
    async fn create_registry(&self, spec: NewRegistry) -> Result<RegistryCredential, StorageError>;
}

/// Snapshots.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Looks up a snapshot by name within an organization.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if absent.
    async fn get_snapshot_by_name(
        &self,
        name: &str,
        organization_id: &str,
    ) -> Result<Snapshot, StorageError>;

    /// Creates a snapshot owned by `organization`.
    ///
    /// `general` marks a platform default snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` on a duplicate name within the
    /// organization and `StorageError::Persistence` if the write fails.
    async fn create_snapshot(
        &self,
        organization: &Organization,
        spec: NewSnapshot,
        general: bool,
    ) -> Result<Snapshot, StorageError>;
}
