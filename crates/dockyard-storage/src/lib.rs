//! # dockyard-storage
//!
//! Store abstractions consumed by the Dockyard startup routine.
//!
//! This crate defines the traits and types that persistence backends must
//! implement. It does not contain any implementations; the in-memory backend
//! lives in `dockyard-db-memory`.
//!
//! ## Example
//!
//! ```ignore
//! use dockyard_storage::{OrganizationStore, StorageError};
//!
//! async fn is_usable(orgs: &dyn OrganizationStore, user_id: &str) -> Result<bool, StorageError> {
//!     let org = orgs.find_personal_organization(user_id).await?;
//!     Ok(!org.suspended)
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::StorageError;
pub use traits::{ApiKeyStore, OrganizationStore, RegistryStore, SnapshotStore, UserStore};
pub use types::{NewRegistry, NewSnapshot, NewUser};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

pub type DynUserStore = std::sync::Arc<dyn UserStore>;
pub type DynOrganizationStore = std::sync::Arc<dyn OrganizationStore>;
pub type DynApiKeyStore = std::sync::Arc<dyn ApiKeyStore>;
pub type DynRegistryStore = std::sync::Arc<dyn RegistryStore>;
pub type DynSnapshotStore = std::sync::Arc<dyn SnapshotStore>;
