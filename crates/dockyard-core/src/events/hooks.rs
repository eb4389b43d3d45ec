//! Hook trait for the platform event system.
//!
//! Hooks are asynchronous listeners for [`PlatformEvent`]s. Unlike a
//! fire-and-forget subscriber, a hook is awaited by the emitter, so side
//! effects such as provisioning a personal organization are complete by the
//! time the store call that emitted the event returns.

use async_trait::async_trait;

use super::types::{PlatformEvent, PlatformEventKind};

/// Error type for hook operations.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// Hook execution failed with a message.
    #[error("Hook execution failed: {0}")]
    Execution(String),

    /// Hook failed due to a storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Hook did not complete within the registry timeout.
    #[error("Hook {hook} timed out after {timeout_ms}ms")]
    Timeout { hook: String, timeout_ms: u128 },

    /// Hook panicked while handling an event.
    #[error("Hook {hook} panicked: {message}")]
    Panicked { hook: String, message: String },

    /// Generic error with source.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HookError {
    /// Create an execution error from a string.
    pub fn execution(msg: impl Into<String>) -> Self {
        HookError::Execution(msg.into())
    }

    /// Create a storage error from a string.
    pub fn storage(msg: impl Into<String>) -> Self {
        HookError::Storage(msg.into())
    }
}

/// Listener for platform events.
///
/// # Example
///
/// ```ignore
/// struct WelcomeMailHook;
///
/// #[async_trait]
/// impl PlatformHook for WelcomeMailHook {
///     fn name(&self) -> &str { "welcome_mail" }
///     fn event_kinds(&self) -> &[PlatformEventKind] { &[PlatformEventKind::UserCreated] }
///
///     async fn handle(&self, event: &PlatformEvent) -> Result<(), HookError> {
///         // ...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait PlatformHook: Send + Sync {
    /// Unique name for this hook (for logging).
    fn name(&self) -> &str;

    /// Event kinds this hook handles.
    ///
    /// Return an empty slice to match every kind.
    fn event_kinds(&self) -> &[PlatformEventKind] {
        &[]
    }

    /// Handle an event. Errors propagate to the emitter.
    async fn handle(&self, event: &PlatformEvent) -> Result<(), HookError>;

    /// Called once when the hook system starts.
    async fn on_start(&self) -> Result<(), HookError> {
        Ok(())
    }

    /// Check if this hook should handle the given event.
    fn matches(&self, event: &PlatformEvent) -> bool {
        let kinds = self.event_kinds();
        kinds.is_empty() || kinds.contains(&event.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::PlatformEvent;

    struct OrgOnly;

    #[async_trait]
    impl PlatformHook for OrgOnly {
        fn name(&self) -> &str {
            "org_only"
        }

        fn event_kinds(&self) -> &[PlatformEventKind] {
            &[PlatformEventKind::OrganizationUnsuspended]
        }

        async fn handle(&self, _event: &PlatformEvent) -> Result<(), HookError> {
            Ok(())
        }
    }

    #[test]
    fn matches_filters_by_kind() {
        let hook = OrgOnly;
        assert!(hook.matches(&PlatformEvent::organization_unsuspended("o1")));
        assert!(!hook.matches(&PlatformEvent::organization_suspended("o1", "reason")));
    }

    #[test]
    fn error_display() {
        let err = HookError::Timeout {
            hook: "slow".into(),
            timeout_ms: 50,
        };
        assert_eq!(err.to_string(), "Hook slow timed out after 50ms");
        assert_eq!(
            HookError::storage("boom").to_string(),
            "Storage error: boom"
        );
    }
}
