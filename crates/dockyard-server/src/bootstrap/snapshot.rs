//! Default snapshot step.

use dockyard_core::SnapshotSizing;
use dockyard_storage::NewSnapshot;
use tracing::{debug, error, info, warn};

use super::admin::ADMIN_USER_ID;
use super::{BootstrapError, BootstrapServices, StepOutcome};

/// Resources given to the default snapshot.
pub const DEFAULT_SNAPSHOT_SIZING: SnapshotSizing = SnapshotSizing {
    cpu: 2,
    memory: 4,
    disk: 10,
};

const DEFAULT_SNAPSHOT_SETTING: &str = "bootstrap.default_snapshot";

/// Ensures the default snapshot exists under the admin organization.
///
/// The organization is re-read here because it may have been suspended since
/// the admin step. A single unsuspend is attempted; if the organization stays
/// suspended the step is skipped rather than failing startup.
pub async fn ensure_default_snapshot(
    services: &BootstrapServices,
    name: Option<&str>,
) -> Result<StepOutcome, BootstrapError> {
    let mut organization = services
        .organizations
        .find_personal_organization(ADMIN_USER_ID)
        .await
        .map_err(BootstrapError::AdminOrganization)?;

    if organization.suspended {
        warn!(
            organization_id = %organization.id,
            reason = %organization.suspension_reason_or_default(),
            "Admin organization is suspended. Unsuspending before creating default snapshot"
        );
        if let Err(e) = services
            .organizations
            .unsuspend_organization(&organization.id)
            .await
        {
            error!(
                organization_id = %organization.id,
                error = %e,
                "Failed to unsuspend admin user's personal organization"
            );
            return Ok(StepOutcome::skipped(format!(
                "admin organization could not be unsuspended: {e}"
            )));
        }
        organization = services
            .organizations
            .find_personal_organization(ADMIN_USER_ID)
            .await
            .map_err(BootstrapError::AdminOrganization)?;
        if organization.suspended {
            error!(
                organization_id = %organization.id,
                "Admin organization is still suspended. Cannot create default snapshot"
            );
            return Ok(StepOutcome::skipped("admin organization is still suspended"));
        }
    }

    let name = name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(BootstrapError::MissingConfiguration(DEFAULT_SNAPSHOT_SETTING))?;

    match services
        .snapshots
        .get_snapshot_by_name(name, &organization.id)
        .await
    {
        Ok(_) => {
            debug!(snapshot = %name, "Default snapshot already exists");
            return Ok(StepOutcome::AlreadySatisfied);
        }
        Err(e) if e.is_not_found() => {}
        Err(source) => {
            return Err(BootstrapError::SnapshotLookup {
                name: name.to_string(),
                source,
            });
        }
    }

    info!(snapshot = %name, "Creating default snapshot");
    let spec = NewSnapshot {
        name: name.to_string(),
        image_name: name.to_string(),
        sizing: DEFAULT_SNAPSHOT_SIZING,
    };
    match services
        .snapshots
        .create_snapshot(&organization, spec, true)
        .await
    {
        Ok(snapshot) => {
            info!(
                snapshot = %snapshot.name,
                snapshot_id = %snapshot.id,
                "Default snapshot created successfully"
            );
            Ok(StepOutcome::Applied)
        }
        Err(source) => {
            error!(snapshot = %name, error = %source, "Failed to create default snapshot");
            Err(BootstrapError::SnapshotCreation {
                name: name.to_string(),
                source,
            })
        }
    }
}
