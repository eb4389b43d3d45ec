//! Startup reconciliation.
//!
//! Runs once per process start, after every event hook is attached and before
//! the listener is bound. Brings the admin identity, the default registries
//! and the default snapshot into a known-good state, tolerating any subset of
//! them already existing from a previous run.
//!
//! Steps run strictly in order:
//!
//! 1. admin user and its personal organization ([`admin`])
//! 2. transient registry, then internal registry ([`registry`])
//! 3. default snapshot ([`snapshot`])
//!
//! Registry failures are logged and skipped. Admin failures, and snapshot
//! failures while the admin organization is healthy, abort startup.
//!
//! The suspension check-then-act is not atomic. This is sound only while a
//! single instance runs the routine before serving traffic; running several
//! instances concurrently needs an advisory lock or leader election around
//! [`Bootstrapper::run`].

pub mod admin;
mod error;
pub mod registry;
pub mod snapshot;

use std::sync::Arc;

use dockyard_core::{ReadinessGate, RegistryType};
use dockyard_storage::{
    ApiKeyStore, DynApiKeyStore, DynOrganizationStore, DynRegistryStore, DynSnapshotStore,
    DynUserStore, OrganizationStore, RegistryStore, SnapshotStore, UserStore,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{BootstrapConfig, RegistryConfig};

pub use error::{BootstrapError, RegistryProvisionError};

/// Result of a single reconciliation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Nothing to do; the resource was already in the desired state.
    AlreadySatisfied,
    /// The step created or repaired something.
    Applied,
    /// The step was skipped without failing startup.
    Skipped(String),
}

impl StepOutcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped(reason.into())
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }
}

/// Outcome of every step of one [`Bootstrapper::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    pub admin: StepOutcome,
    pub transient_registry: StepOutcome,
    pub internal_registry: StepOutcome,
    pub default_snapshot: StepOutcome,
}

impl BootstrapReport {
    /// `true` when no step had anything to do.
    pub fn is_noop(&self) -> bool {
        [
            &self.admin,
            &self.transient_registry,
            &self.internal_registry,
            &self.default_snapshot,
        ]
        .iter()
        .all(|outcome| **outcome == StepOutcome::AlreadySatisfied)
    }
}

/// Stores and signals the routine depends on.
#[derive(Clone)]
pub struct BootstrapServices {
    pub users: DynUserStore,
    pub organizations: DynOrganizationStore,
    pub api_keys: DynApiKeyStore,
    pub registries: DynRegistryStore,
    pub snapshots: DynSnapshotStore,
    /// Opens once every event hook is attached.
    pub readiness: ReadinessGate,
}

impl BootstrapServices {
    /// Uses one backend for every store.
    pub fn from_backend<B>(backend: Arc<B>, readiness: ReadinessGate) -> Self
    where
        B: UserStore + OrganizationStore + ApiKeyStore + RegistryStore + SnapshotStore + 'static,
    {
        Self {
            users: backend.clone(),
            organizations: backend.clone(),
            api_keys: backend.clone(),
            registries: backend.clone(),
            snapshots: backend,
            readiness,
        }
    }
}

/// Runs the reconciliation steps in order.
pub struct Bootstrapper {
    services: BootstrapServices,
    config: BootstrapConfig,
}

impl Bootstrapper {
    /// The configuration is captured here and not re-read during the run.
    pub fn new(services: BootstrapServices, config: &BootstrapConfig) -> Self {
        Self {
            services,
            config: config.clone(),
        }
    }

    pub async fn run(&self) -> Result<BootstrapReport, BootstrapError> {
        info!("Starting startup reconciliation");

        let admin = admin::ensure_admin(&self.services).await?;
        let transient_registry = self
            .registry_step(RegistryType::Transient, &self.config.transient_registry)
            .await;
        let internal_registry = self
            .registry_step(RegistryType::Internal, &self.config.internal_registry)
            .await;
        let default_snapshot = snapshot::ensure_default_snapshot(
            &self.services,
            self.config.default_snapshot.as_deref(),
        )
        .await?;

        let report = BootstrapReport {
            admin,
            transient_registry,
            internal_registry,
            default_snapshot,
        };
        info!(
            admin = ?report.admin,
            transient_registry = ?report.transient_registry,
            internal_registry = ?report.internal_registry,
            default_snapshot = ?report.default_snapshot,
            "Startup reconciliation completed"
        );
        Ok(report)
    }

    async fn registry_step(
        &self,
        registry_type: RegistryType,
        config: &RegistryConfig,
    ) -> StepOutcome {
        match registry::ensure_default_registry(
            self.services.registries.as_ref(),
            registry_type,
            config,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    registry_type = %registry_type,
                    error = %e,
                    "Skipping {registry_type} registry setup"
                );
                StepOutcome::skipped(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_noop_requires_every_step_satisfied() {
        let mut report = BootstrapReport {
            admin: StepOutcome::AlreadySatisfied,
            transient_registry: StepOutcome::AlreadySatisfied,
            internal_registry: StepOutcome::AlreadySatisfied,
            default_snapshot: StepOutcome::AlreadySatisfied,
        };
        assert!(report.is_noop());

        report.internal_registry = StepOutcome::skipped("missing url");
        assert!(!report.is_noop());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(StepOutcome::skipped("no config")).unwrap();
        assert_eq!(json, serde_json::json!({"status": "skipped", "reason": "no config"}));

        let json = serde_json::to_value(StepOutcome::Applied).unwrap();
        assert_eq!(json, serde_json::json!({"status": "applied"}));
    }
}
