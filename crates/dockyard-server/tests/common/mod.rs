//! Shared fixtures for the startup reconciliation tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dockyard_core::{
    ApiKey, ApiKeyPermission, HookRegistry, Organization, RegistryCredential, RegistryType,
    Snapshot, User,
};
use dockyard_db_memory::MemoryBackend;
use dockyard_server::BootstrapServices;
use dockyard_server::config::{BootstrapConfig, RegistryConfig};
use dockyard_storage::{
    ApiKeyStore, NewRegistry, NewSnapshot, NewUser, OrganizationStore, RegistryStore,
    SnapshotStore, StorageError, UserStore,
};

pub const SNAPSHOT_NAME: &str = "dockyardio/sandbox:0.4.3";

/// Number of write calls seen by a [`RecordingBackend`].
#[derive(Debug, Default)]
pub struct Calls {
    pub create_user: AtomicUsize,
    pub unsuspend: AtomicUsize,
    pub create_api_key: AtomicUsize,
    pub create_registry: AtomicUsize,
    pub create_snapshot: AtomicUsize,
}

impl Calls {
    pub fn writes(&self) -> usize {
        [
            &self.create_user,
            &self.unsuspend,
            &self.create_api_key,
            &self.create_registry,
            &self.create_snapshot,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }
}

/// Wraps a [`MemoryBackend`], counting writes and injecting failures.
pub struct RecordingBackend {
    pub inner: Arc<MemoryBackend>,
    pub calls: Calls,
    /// Unsuspend returns a persistence error.
    pub fail_unsuspend: AtomicBool,
    /// Unsuspend reports success without touching the organization.
    pub ignore_unsuspend: AtomicBool,
    pub fail_create_snapshot: AtomicBool,
    /// Snapshot lookups fail with a connection error.
    pub fail_snapshot_lookup: AtomicBool,
    pub fail_create_registry: Mutex<Option<RegistryType>>,
}

impl RecordingBackend {
    pub fn new(inner: Arc<MemoryBackend>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            calls: Calls::default(),
            fail_unsuspend: AtomicBool::new(false),
            ignore_unsuspend: AtomicBool::new(false),
            fail_create_snapshot: AtomicBool::new(false),
            fail_snapshot_lookup: AtomicBool::new(false),
            fail_create_registry: Mutex::new(None),
        })
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserStore for RecordingBackend {
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, StorageError> {
        self.inner.find_user_by_id(id).await
    }

    async fn create_user(&self, spec: NewUser) -> Result<User, StorageError> {
        self.calls.create_user.fetch_add(1, Ordering::SeqCst);
        self.inner.create_user(spec).await
    }
}

#[async_trait]
impl OrganizationStore for RecordingBackend {
    async fn find_personal_organization(
        &self,
        user_id: &str,
    ) -> Result<Organization, StorageError> {
        self.inner.find_personal_organization(user_id).await
    }

    async fn unsuspend_organization(&self, organization_id: &str) -> Result<(), StorageError> {
        self.calls.unsuspend.fetch_add(1, Ordering::SeqCst);
        if self.fail_unsuspend.load(Ordering::SeqCst) {
            return Err(StorageError::persistence("organization table is read-only"));
        }
        if self.ignore_unsuspend.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.inner.unsuspend_organization(organization_id).await
    }
}

#[async_trait]
impl ApiKeyStore for RecordingBackend {
    async fn create_api_key(
        &self,
        organization_id: &str,
        user_id: &str,
        name: &str,
        permissions: &[ApiKeyPermission],
    ) -> Result<ApiKey, StorageError> {
        self.calls.create_api_key.fetch_add(1, Ordering::SeqCst);
        self.inner
            .create_api_key(organization_id, user_id, name, permissions)
            .await
    }
}

#[async_trait]
impl RegistryStore for RecordingBackend {
    async fn get_default_registry(
        &self,
        registry_type: RegistryType,
    ) -> Result<Option<RegistryCredential>, StorageError> {
        self.inner.get_default_registry(registry_type).await
    }

    async fn create_registry(&self, spec: NewRegistry) -> Result<RegistryCredential, StorageError> {
        self.calls.create_registry.fetch_add(1, Ordering::SeqCst);
        let failing = *self.fail_create_registry.lock().unwrap();
        if failing == Some(spec.registry_type) {
            return Err(StorageError::persistence("registry write rejected"));
        }
        self.inner.create_registry(spec).await
    }
}

#[async_trait]
impl SnapshotStore for RecordingBackend {
    async fn get_snapshot_by_name(
        &self,
        name: &str,
        organization_id: &str,
    ) -> Result<Snapshot, StorageError> {
        if self.fail_snapshot_lookup.load(Ordering::SeqCst) {
            return Err(StorageError::connection("database unreachable"));
        }
        self.inner.get_snapshot_by_name(name, organization_id).await
    }

    async fn create_snapshot(
        &self,
        organization: &Organization,
        spec: NewSnapshot,
        general: bool,
    ) -> Result<Snapshot, StorageError> {
        self.calls.create_snapshot.fetch_add(1, Ordering::SeqCst);
        if self.fail_create_snapshot.load(Ordering::SeqCst) {
            return Err(StorageError::persistence("snapshot write rejected"));
        }
        self.inner.create_snapshot(organization, spec, general).await
    }
}

/// Started hook registry, backend with its hook installed, and a recorder on top.
pub struct Harness {
    pub events: Arc<HookRegistry>,
    pub backend: Arc<MemoryBackend>,
    pub recorder: Arc<RecordingBackend>,
}

impl Harness {
    /// Builds the harness without opening the readiness gate.
    pub async fn unstarted() -> Self {
        let events = HookRegistry::new_shared();
        let backend = MemoryBackend::install(events.clone()).await;
        let recorder = RecordingBackend::new(backend.clone());
        Self {
            events,
            backend,
            recorder,
        }
    }

    pub async fn started() -> Self {
        let harness = Self::unstarted().await;
        harness.events.start().await;
        harness
    }

    pub fn services(&self) -> BootstrapServices {
        BootstrapServices::from_backend(self.recorder.clone(), self.events.readiness())
    }
}

pub fn registry_config(url: &str) -> RegistryConfig {
    RegistryConfig {
        url: Some(url.to_string()),
        username: Some("robot$dockyard".to_string()),
        password: Some("s3cret".to_string()),
        project_id: Some("dockyard".to_string()),
    }
}

/// Every setting present.
pub fn full_config() -> BootstrapConfig {
    BootstrapConfig {
        transient_registry: registry_config("https://transient.registry.local"),
        internal_registry: registry_config("http://internal.registry.local:5000"),
        default_snapshot: Some(SNAPSHOT_NAME.to_string()),
    }
}
