//! Default registry step.

use dockyard_core::RegistryType;
use dockyard_storage::{NewRegistry, RegistryStore};
use tracing::{debug, info};

use super::{RegistryProvisionError, StepOutcome};
use crate::config::RegistryConfig;

/// Removes one leading `http://` or `https://`.
///
/// Registry URLs are stored without a scheme; clients add one when connecting.
pub fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

/// Display name given to the default registry of a kind.
pub fn default_registry_name(registry_type: RegistryType) -> &'static str {
    match registry_type {
        RegistryType::Transient => "Transient Registry",
        RegistryType::Internal => "Internal Registry",
        RegistryType::Organization => "Organization Registry",
    }
}

/// Ensures a default registry of `registry_type` exists.
///
/// Every error returned here is recoverable; the caller logs it and moves on.
pub async fn ensure_default_registry(
    store: &dyn RegistryStore,
    registry_type: RegistryType,
    config: &RegistryConfig,
) -> Result<StepOutcome, RegistryProvisionError> {
    let storage_error = |source| RegistryProvisionError::Storage {
        registry_type,
        source,
    };

    if store
        .get_default_registry(registry_type)
        .await
        .map_err(storage_error)?
        .is_some()
    {
        debug!(registry_type = %registry_type, "Default registry already exists");
        return Ok(StepOutcome::AlreadySatisfied);
    }

    let (Some(url), Some(username), Some(password), Some(project)) = (
        non_blank(&config.url),
        non_blank(&config.username),
        non_blank(&config.password),
        non_blank(&config.project_id),
    ) else {
        return Err(RegistryProvisionError::MissingConfiguration {
            registry_type,
            missing: config.missing_fields(),
        });
    };

    info!(registry_type = %registry_type, "Initializing default {registry_type} registry...");

    let registry = store
        .create_registry(NewRegistry {
            name: default_registry_name(registry_type).to_string(),
            url: strip_scheme(url).to_string(),
            username: username.to_string(),
            password: password.to_string(),
            project: project.to_string(),
            registry_type,
            is_default: true,
        })
        .await
        .map_err(storage_error)?;

    info!(
        registry_type = %registry_type,
        registry_id = %registry.id,
        url = %registry.url,
        "Default {registry_type} registry initialized successfully"
    );
    Ok(StepOutcome::Applied)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_scheme_removes_http_and_https() {
        assert_eq!(strip_scheme("https://reg.example.com"), "reg.example.com");
        assert_eq!(strip_scheme("http://reg.example.com:5000"), "reg.example.com:5000");
        assert_eq!(strip_scheme("reg.example.com"), "reg.example.com");
    }

    #[test]
    fn strip_scheme_only_strips_one_leading_scheme() {
        assert_eq!(strip_scheme("https://http://x"), "http://x");
        assert_eq!(strip_scheme("ftp://reg"), "ftp://reg");
        assert_eq!(strip_scheme("reg/https://x"), "reg/https://x");
        assert_eq!(strip_scheme("HTTPS://reg"), "HTTPS://reg");
    }

    #[test]
    fn default_names() {
        assert_eq!(
            default_registry_name(RegistryType::Transient),
            "Transient Registry"
        );
        assert_eq!(
            default_registry_name(RegistryType::Internal),
            "Internal Registry"
        );
    }
}
