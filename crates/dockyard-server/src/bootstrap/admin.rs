//! Admin identity step.

use dockyard_core::{Organization, OrganizationQuota, SystemRole};
use dockyard_storage::NewUser;
use tracing::{debug, info};

use super::{BootstrapError, BootstrapServices, StepOutcome};

/// Fixed id of the administrative user.
pub const ADMIN_USER_ID: &str = "admin";
pub const ADMIN_NAME: &str = "Dockyard Admin";
pub const ADMIN_EMAIL: &str = "dev@dockyard.local";
/// Name of the API key minted alongside a fresh admin.
pub const ADMIN_API_KEY_NAME: &str = "admin";
/// Quota of the admin's personal organization.
pub const ADMIN_QUOTA: OrganizationQuota = OrganizationQuota::uniform(100);

/// Ensures the admin user exists and its personal organization is usable.
///
/// A failed unsuspend is fatal here, unlike the re-check done by the snapshot
/// step.
pub async fn ensure_admin(services: &BootstrapServices) -> Result<StepOutcome, BootstrapError> {
    let existing = services
        .users
        .find_user_by_id(ADMIN_USER_ID)
        .await
        .map_err(BootstrapError::AdminLookup)?;

    if existing.is_some() {
        let organization = personal_organization(services).await?;
        if !organization.suspended {
            debug!("Admin user already initialized");
            return Ok(StepOutcome::AlreadySatisfied);
        }
        info!(
            organization_id = %organization.id,
            reason = %organization.suspension_reason_or_default(),
            "Admin user's personal organization is suspended. Unsuspending..."
        );
        unsuspend(services, &organization).await?;
        return Ok(StepOutcome::Applied);
    }

    // The personal organization is provisioned by a user.created hook.
    services.readiness.wait_ready().await;

    // Email is pre-verified so the organization is not suspended for verification.
    let user = services
        .users
        .create_user(NewUser {
            id: ADMIN_USER_ID.to_string(),
            name: ADMIN_NAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            email_verified: true,
            role: SystemRole::Admin,
            personal_organization_quota: Some(ADMIN_QUOTA),
        })
        .await
        .map_err(BootstrapError::AdminCreation)?;

    let organization = personal_organization(services).await?;
    if organization.suspended {
        info!(
            organization_id = %organization.id,
            "Admin user's personal organization was created as suspended. Unsuspending..."
        );
        unsuspend(services, &organization).await?;
    }

    services
        .api_keys
        .create_api_key(&organization.id, &user.id, ADMIN_API_KEY_NAME, &[])
        .await
        .map_err(BootstrapError::AdminApiKey)?;

    info!(
        user_id = %user.id,
        organization_id = %organization.id,
        "Admin user initialized successfully"
    );
    Ok(StepOutcome::Applied)
}

async fn personal_organization(
    services: &BootstrapServices,
) -> Result<Organization, BootstrapError> {
    services
        .organizations
        .find_personal_organization(ADMIN_USER_ID)
        .await
        .map_err(BootstrapError::AdminOrganization)
}

async fn unsuspend(
    services: &BootstrapServices,
    organization: &Organization,
) -> Result<(), BootstrapError> {
    services
        .organizations
        .unsuspend_organization(&organization.id)
        .await
        .map_err(|source| BootstrapError::AdminUnsuspend {
            organization_id: organization.id.clone(),
            source,
        })?;
    info!(
        organization_id = %organization.id,
        "Admin user's personal organization has been unsuspended"
    );
    Ok(())
}
