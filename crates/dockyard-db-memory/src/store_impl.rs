//! Store trait implementations for [`MemoryBackend`].

use async_trait::async_trait;
use dockyard_core::{
    ApiKey, ApiKeyPermission, Organization, PlatformEvent, RegistryCredential, RegistryType,
    Snapshot, SnapshotState, User, generate_id, validate_id,
};
use dockyard_storage::{
    ApiKeyStore, NewRegistry, NewSnapshot, NewUser, OrganizationStore, RegistryStore,
    SnapshotStore, StorageError, StorageResult, UserStore,
};
use rand::RngCore;
use time::OffsetDateTime;

use crate::storage::MemoryBackend;

/// Length in bytes of generated API key secrets.
const API_KEY_BYTES: usize = 32;

fn generate_api_key_value() -> String {
    let mut bytes = [0u8; API_KEY_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("dy_{}", hex::encode(bytes))
}

#[async_trait]
impl UserStore for MemoryBackend {
    async fn find_user_by_id(&self, id: &str) -> StorageResult<Option<User>> {
        Ok(self.state.read().await.users.get(id).cloned())
    }

    async fn create_user(&self, spec: NewUser) -> StorageResult<User> {
        validate_id(&spec.id).map_err(|e| StorageError::invalid("User", e.to_string()))?;

        let user = User {
            id: spec.id,
            name: spec.name,
            email: spec.email,
            email_verified: spec.email_verified,
            role: spec.role,
            created_at: OffsetDateTime::now_utc(),
        };

        {
            let mut state = self.state.write().await;
            if state.users.contains_key(&user.id) {
                return Err(StorageError::conflict("User", user.id));
            }
            state.users.insert(user.id.clone(), user.clone());
        }

        self.emit(PlatformEvent::user_created(
            user.clone(),
            spec.personal_organization_quota,
        ))
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl OrganizationStore for MemoryBackend {
    async fn find_personal_organization(&self, user_id: &str) -> StorageResult<Organization> {
        self.state
            .read()
            .await
            .organizations
            .values()
            .find(|o| o.personal && o.created_by == user_id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("Organization", format!("personal:{user_id}")))
    }

    async fn unsuspend_organization(&self, organization_id: &str) -> StorageResult<()> {
        let was_suspended = {
            let mut state = self.state.write().await;
            let organization = state
                .organizations
                .get_mut(organization_id)
                .ok_or_else(|| StorageError::not_found("Organization", organization_id))?;
            let was_suspended = organization.suspended;
            organization.suspended = false;
            organization.suspension_reason = None;
            organization.suspended_at = None;
            was_suspended
        };

        if was_suspended {
            self.emit(PlatformEvent::organization_unsuspended(organization_id))
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ApiKeyStore for MemoryBackend {
    async fn create_api_key(
        &self,
        organization_id: &str,
        user_id: &str,
        name: &str,
        permissions: &[ApiKeyPermission],
    ) -> StorageResult<ApiKey> {
        let key = ApiKey {
            organization_id: organization_id.to_string(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            value: generate_api_key_value(),
            permissions: permissions.to_vec(),
            created_at: OffsetDateTime::now_utc(),
        };

        {
            let mut state = self.state.write().await;
            if !state.organizations.contains_key(organization_id) {
                return Err(StorageError::not_found("Organization", organization_id));
            }
            if state.api_keys.iter().any(|k| {
                k.organization_id == organization_id && k.user_id == user_id && k.name == name
            }) {
                return Err(StorageError::conflict(
                    "ApiKey",
                    format!("{organization_id}/{user_id}/{name}"),
                ));
            }
            state.api_keys.push(key.clone());
        }

        self.emit(PlatformEvent::api_key_created(&key)).await?;
        Ok(key)
    }
}

#[async_trait]
impl RegistryStore for MemoryBackend {
    async fn get_default_registry(
        &self,
        registry_type: RegistryType,
    ) -> StorageResult<Option<RegistryCredential>> {
        Ok(self
            .state
            .read()
            .await
            .registries
            .values()
            .find(|r| r.is_default && r.registry_type == registry_type)
            .cloned())
    }

    async fn create_registry(&self, spec: NewRegistry) -> StorageResult<RegistryCredential> {
        if spec.url.is_empty() {
            return Err(StorageError::invalid("Registry", "url must not be empty"));
        }

        let registry = RegistryCredential {
            id: generate_id(),
            name: spec.name,
            url: spec.url,
            username: spec.username,
            password: spec.password,
            project: spec.project,
            registry_type: spec.registry_type,
            is_default: spec.is_default,
            created_at: OffsetDateTime::now_utc(),
        };

        {
            let mut state = self.state.write().await;
            if registry.is_default
                && state
                    .registries
                    .values()
                    .any(|r| r.is_default && r.registry_type == registry.registry_type)
            {
                return Err(StorageError::conflict(
                    "Registry",
                    format!("default:{}", registry.registry_type),
                ));
            }
            state
                .registries
                .insert(registry.id.clone(), registry.clone());
        }

        self.emit(PlatformEvent::registry_created(registry.clone()))
            .await?;
        Ok(registry)
    }
}

#[async_trait]
impl SnapshotStore for MemoryBackend {
    async fn get_snapshot_by_name(
        &self,
        name: &str,
        organization_id: &str,
    ) -> StorageResult<Snapshot> {
        self.state
            .read()
            .await
            .snapshots
            .values()
            .find(|s| s.name == name && s.organization_id == organization_id)
            .cloned()
            .ok_or_else(|| StorageError::not_found("Snapshot", name))
    }

    async fn create_snapshot(
        &self,
        organization: &Organization,
        spec: NewSnapshot,
        general: bool,
    ) -> StorageResult<Snapshot> {
        if spec.name.trim().is_empty() {
            return Err(StorageError::invalid("Snapshot", "name must not be empty"));
        }

        let snapshot = Snapshot {
            id: generate_id(),
            organization_id: organization.id.clone(),
            name: spec.name,
            image_name: spec.image_name,
            sizing: spec.sizing,
            general,
            state: SnapshotState::Pending,
            created_at: OffsetDateTime::now_utc(),
        };

        {
            let mut state = self.state.write().await;
            if !state.organizations.contains_key(&organization.id) {
                return Err(StorageError::not_found("Organization", &organization.id));
            }
            if state
                .snapshots
                .values()
                .any(|s| s.name == snapshot.name && s.organization_id == snapshot.organization_id)
            {
                return Err(StorageError::conflict("Snapshot", snapshot.name));
            }
            state
                .snapshots
                .insert(snapshot.id.clone(), snapshot.clone());
        }

        self.emit(PlatformEvent::snapshot_created(snapshot.clone()))
            .await?;
        Ok(snapshot)
    }
}
