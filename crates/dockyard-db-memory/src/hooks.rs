//! Hooks owned by the in-memory backend.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use dockyard_core::{
    HookError, PlatformEvent, PlatformEventKind, PlatformEventPayload, PlatformHook,
};

use crate::storage::{MemoryBackend, UNVERIFIED_EMAIL_SUSPENSION_REASON};

/// Provisions a personal organization for every created user.
///
/// Users whose email is not verified get a suspended organization.
pub struct PersonalOrganizationHook {
    backend: Weak<MemoryBackend>,
}

impl PersonalOrganizationHook {
    pub fn new(backend: &Arc<MemoryBackend>) -> Self {
        Self {
            backend: Arc::downgrade(backend),
        }
    }
}

#[async_trait]
impl PlatformHook for PersonalOrganizationHook {
    fn name(&self) -> &str {
        "personal_organization"
    }

    fn event_kinds(&self) -> &[PlatformEventKind] {
        &[PlatformEventKind::UserCreated]
    }

    async fn handle(&self, event: &PlatformEvent) -> Result<(), HookError> {
        let PlatformEventPayload::UserCreated {
            user,
            personal_quota,
        } = &event.payload
        else {
            return Ok(());
        };

        let backend = self
            .backend
            .upgrade()
            .ok_or_else(|| HookError::execution("memory backend dropped"))?;

        let suspension_reason =
            (!user.email_verified).then_some(UNVERIFIED_EMAIL_SUSPENSION_REASON);

        backend
            .create_personal_organization(
                user,
                personal_quota.unwrap_or_default(),
                suspension_reason,
            )
            .await
            .map_err(|e| HookError::storage(e.to_string()))?;
        Ok(())
    }
}
