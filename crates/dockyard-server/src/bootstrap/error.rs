use dockyard_core::RegistryType;
use dockyard_storage::StorageError;

/// A failure that must stop the process from serving traffic.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("failed to look up admin user: {0}")]
    AdminLookup(#[source] StorageError),

    #[error("failed to create admin user: {0}")]
    AdminCreation(#[source] StorageError),

    #[error("admin personal organization is unavailable: {0}")]
    AdminOrganization(#[source] StorageError),

    #[error("failed to unsuspend admin personal organization {organization_id}: {source}")]
    AdminUnsuspend {
        organization_id: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to create admin API key: {0}")]
    AdminApiKey(#[source] StorageError),

    #[error("missing required configuration: {0}")]
    MissingConfiguration(&'static str),

    #[error("failed to look up default snapshot {name}: {source}")]
    SnapshotLookup {
        name: String,
        #[source]
        source: StorageError,
    },

    #[error("failed to create default snapshot {name}: {source}")]
    SnapshotCreation {
        name: String,
        #[source]
        source: StorageError,
    },
}

impl BootstrapError {
    /// Name of the step that produced the error.
    pub fn step(&self) -> &'static str {
        match self {
            Self::AdminLookup(_)
            | Self::AdminCreation(_)
            | Self::AdminUnsuspend { .. }
            | Self::AdminApiKey(_) => "admin",
            Self::AdminOrganization(_) => "admin_organization",
            Self::MissingConfiguration(_)
            | Self::SnapshotLookup { .. }
            | Self::SnapshotCreation { .. } => "default_snapshot",
        }
    }
}

/// A registry provisioning failure. Never fatal: the step is skipped.
#[derive(Debug, thiserror::Error)]
pub enum RegistryProvisionError {
    #[error("{registry_type} registry configuration not found (missing: {})", missing.join(", "))]
    MissingConfiguration {
        registry_type: RegistryType,
        missing: Vec<&'static str>,
    },

    #[error("{registry_type} registry could not be provisioned: {source}")]
    Storage {
        registry_type: RegistryType,
        #[source]
        source: StorageError,
    },
}

impl RegistryProvisionError {
    pub fn is_missing_configuration(&self) -> bool {
        matches!(self, Self::MissingConfiguration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_configuration_lists_fields() {
        let err = RegistryProvisionError::MissingConfiguration {
            registry_type: RegistryType::Transient,
            missing: vec!["url", "password"],
        };
        assert_eq!(
            err.to_string(),
            "transient registry configuration not found (missing: url, password)"
        );
        assert!(err.is_missing_configuration());
    }

    #[test]
    fn steps_are_named() {
        let err = BootstrapError::MissingConfiguration("bootstrap.default_snapshot");
        assert_eq!(err.step(), "default_snapshot");
        assert_eq!(
            err.to_string(),
            "missing required configuration: bootstrap.default_snapshot"
        );

        let err = BootstrapError::AdminUnsuspend {
            organization_id: "org-1".into(),
            source: StorageError::persistence("locked"),
        };
        assert_eq!(err.step(), "admin");
    }
}
