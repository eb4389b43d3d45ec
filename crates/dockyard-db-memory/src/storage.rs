use std::collections::HashMap;
use std::sync::Arc;

use dockyard_core::{
    ApiKey, HookRegistry, Organization, OrganizationQuota, PlatformEvent, RegistryCredential,
    Snapshot, User, generate_id,
};
use dockyard_storage::{StorageError, StorageResult};
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::hooks::PersonalOrganizationHook;

/// Suspension reason applied to personal organizations of unverified users.
pub const UNVERIFIED_EMAIL_SUSPENSION_REASON: &str = "Please verify your email address";

#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    pub(crate) users: HashMap<String, User>,
    /// Keyed by organization id.
    pub(crate) organizations: HashMap<String, Organization>,
    /// Keyed by registry id.
    pub(crate) registries: HashMap<String, RegistryCredential>,
    /// Keyed by snapshot id.
    pub(crate) snapshots: HashMap<String, Snapshot>,
    pub(crate) api_keys: Vec<ApiKey>,
}

/// In-memory backend implementing every store trait.
///
/// All records live behind a single `RwLock`. Events are emitted after the
/// lock is released, so hooks may call back into the backend.
#[derive(Debug)]
pub struct MemoryBackend {
    pub(crate) state: RwLock<MemoryState>,
    pub(crate) events: Arc<HookRegistry>,
}

impl MemoryBackend {
    /// Creates an empty backend emitting into `events`.
    ///
    /// Does not register any hook; see [`MemoryBackend::install`].
    pub fn new(events: Arc<HookRegistry>) -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            events,
        }
    }

    /// Creates a backend and registers its personal organization hook.
    pub async fn install(events: Arc<HookRegistry>) -> Arc<Self> {
        let backend = Arc::new(Self::new(events.clone()));
        events
            .register(Arc::new(PersonalOrganizationHook::new(&backend)))
            .await;
        backend
    }

    pub(crate) async fn emit(&self, event: PlatformEvent) -> StorageResult<()> {
        self.events.emit(event).await.map_err(StorageError::from)
    }

    /// Creates the personal organization of `owner`.
    ///
    /// Suspends it right away when `suspension_reason` is given.
    pub async fn create_personal_organization(
        &self,
        owner: &User,
        quota: OrganizationQuota,
        suspension_reason: Option<&str>,
    ) -> StorageResult<Organization> {
        let now = OffsetDateTime::now_utc();
        let organization = Organization {
            id: generate_id(),
            name: "Personal".to_string(),
            created_by: owner.id.clone(),
            personal: true,
            suspended: suspension_reason.is_some(),
            suspension_reason: suspension_reason.map(str::to_string),
            suspended_at: suspension_reason.map(|_| now),
            quota,
            created_at: now,
        };

        {
            let mut state = self.state.write().await;
            if state
                .organizations
                .values()
                .any(|o| o.personal && o.created_by == owner.id)
            {
                return Err(StorageError::conflict(
                    "Organization",
                    format!("personal:{}", owner.id),
                ));
            }
            state
                .organizations
                .insert(organization.id.clone(), organization.clone());
        }

        tracing::debug!(
            organization_id = %organization.id,
            owner = %owner.id,
            suspended = organization.suspended,
            "Personal organization created"
        );

        self.emit(PlatformEvent::organization_created(organization.clone()))
            .await?;
        if let Some(reason) = suspension_reason {
            self.emit(PlatformEvent::organization_suspended(
                organization.id.clone(),
                reason,
            ))
            .await?;
        }
        Ok(organization)
    }

    /// Suspends an organization with a human-readable reason.
    pub async fn suspend_organization(
        &self,
        organization_id: &str,
        reason: &str,
    ) -> StorageResult<()> {
        {
            let mut state = self.state.write().await;
            let organization = state
                .organizations
                .get_mut(organization_id)
                .ok_or_else(|| StorageError::not_found("Organization", organization_id))?;
            organization.suspended = true;
            organization.suspension_reason = Some(reason.to_string());
            organization.suspended_at = Some(OffsetDateTime::now_utc());
        }
        self.emit(PlatformEvent::organization_suspended(organization_id, reason))
            .await
    }

    /// All users, in no particular order.
    pub async fn users(&self) -> Vec<User> {
        self.state.read().await.users.values().cloned().collect()
    }

    /// All organizations, in no particular order.
    pub async fn organizations(&self) -> Vec<Organization> {
        self.state
            .read()
            .await
            .organizations
            .values()
            .cloned()
            .collect()
    }

    /// All registry credentials, in no particular order.
    pub async fn registries(&self) -> Vec<RegistryCredential> {
        self.state
            .read()
            .await
            .registries
            .values()
            .cloned()
            .collect()
    }

    /// All snapshots, in no particular order.
    pub async fn snapshots(&self) -> Vec<Snapshot> {
        self.state.read().await.snapshots.values().cloned().collect()
    }

    /// All API keys, in creation order.
    pub async fn api_keys(&self) -> Vec<ApiKey> {
        self.state.read().await.api_keys.clone()
    }
}
