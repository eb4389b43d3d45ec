pub mod events;
pub mod id;
pub mod model;

pub use events::{
    EventBroadcaster, HookError, HookRegistry, PlatformEvent, PlatformEventKind,
    PlatformEventPayload, PlatformHook, ReadinessGate,
};
pub use id::{IdError, generate_id, validate_id};
pub use model::{
    ApiKey, ApiKeyPermission, Organization, OrganizationQuota, RegistryCredential, RegistryType,
    Snapshot, SnapshotSizing, SnapshotState, SystemRole, User,
};
