//! Hook registry and emitter for the platform event system.
//!
//! The registry owns the registered hooks, the broadcaster for passive
//! observers and the readiness gate that opens once the hook set is
//! complete.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::broadcaster::EventBroadcaster;
use super::hooks::{HookError, PlatformHook};
use super::readiness::ReadinessGate;
use super::types::PlatformEvent;

/// Default timeout for hook execution.
const DEFAULT_HOOK_TIMEOUT: Duration = Duration::from_secs(30);

/// Registry for platform hooks.
///
/// Stores hold an `Arc<HookRegistry>` and call [`HookRegistry::emit`] after
/// every state change. Hooks may be registered after the stores are built;
/// the host calls [`HookRegistry::start`] once every hook is attached.
pub struct HookRegistry {
    /// All registered hooks, in registration order.
    hooks: RwLock<Vec<Arc<dyn PlatformHook>>>,
    /// Hook execution timeout.
    timeout: Duration,
    broadcaster: EventBroadcaster,
    readiness: ReadinessGate,
}

impl HookRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_HOOK_TIMEOUT)
    }

    /// Create a new registry with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            hooks: RwLock::new(Vec::new()),
            timeout,
            broadcaster: EventBroadcaster::new(),
            readiness: ReadinessGate::new(),
        }
    }

    /// Create a new registry wrapped in an Arc for sharing.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a hook.
    pub async fn register(&self, hook: Arc<dyn PlatformHook>) {
        let name = hook.name().to_string();
        self.hooks.write().await.push(hook);
        debug!(hook = %name, "Registered platform hook");
    }

    /// Get the number of registered hooks.
    pub async fn hook_count(&self) -> usize {
        self.hooks.read().await.len()
    }

    /// Get hooks that match an event.
    pub async fn get_matching_hooks(&self, event: &PlatformEvent) -> Vec<Arc<dyn PlatformHook>> {
        let hooks = self.hooks.read().await;
        hooks.iter().filter(|h| h.matches(event)).cloned().collect()
    }

    /// Emit an event.
    ///
    /// Every matching hook is awaited in registration order with timeout and
    /// panic protection. The first failure stops delivery and is returned to
    /// the caller. On success the event is republished to broadcast
    /// subscribers.
    pub async fn emit(&self, event: PlatformEvent) -> Result<(), HookError> {
        let hooks = self.get_matching_hooks(&event).await;
        let kind = event.kind();

        if hooks.is_empty() {
            debug!(event = %kind, "No hooks matched event");
        }

        for hook in hooks {
            let hook_name = hook.name().to_string();

            let result = tokio::time::timeout(self.timeout, async {
                AssertUnwindSafe(hook.handle(&event)).catch_unwind().await
            })
            .await;

            match result {
                Ok(Ok(Ok(()))) => {
                    debug!(hook = %hook_name, event = %kind, "Hook executed successfully");
                }
                Ok(Ok(Err(e))) => {
                    warn!(
                        hook = %hook_name,
                        event = %kind,
                        error = %e,
                        "Hook execution failed"
                    );
                    return Err(e);
                }
                Ok(Err(panic)) => {
                    let message = if let Some(s) = panic.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    error!(
                        hook = %hook_name,
                        event = %kind,
                        panic = %message,
                        "Hook panicked!"
                    );
                    return Err(HookError::Panicked {
                        hook: hook_name,
                        message,
                    });
                }
                Err(_) => {
                    error!(
                        hook = %hook_name,
                        event = %kind,
                        timeout_ms = self.timeout.as_millis() as u64,
                        "Hook timed out"
                    );
                    return Err(HookError::Timeout {
                        hook: hook_name,
                        timeout_ms: self.timeout.as_millis(),
                    });
                }
            }
        }

        self.broadcaster.send(event);
        Ok(())
    }

    /// Run `on_start` for every hook and open the readiness gate.
    ///
    /// `on_start` failures are logged; they do not keep the gate closed.
    pub async fn start(&self) {
        {
            let hooks = self.hooks.read().await;
            for hook in hooks.iter() {
                if let Err(e) = hook.on_start().await {
                    warn!(hook = %hook.name(), error = %e, "Hook on_start failed");
                }
            }
            info!(hooks = hooks.len(), "Event hooks attached");
        }
        self.readiness.mark_ready();
    }

    /// Gate that opens when [`HookRegistry::start`] completes.
    pub fn readiness(&self) -> ReadinessGate {
        self.readiness.clone()
    }

    /// Broadcaster that receives every successfully emitted event.
    pub fn broadcaster(&self) -> &EventBroadcaster {
        &self.broadcaster
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("timeout", &self.timeout)
            .field("ready", &self.readiness.is_ready())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::types::PlatformEventKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingHook {
        name: &'static str,
        count: AtomicU32,
    }

    impl CountingHook {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                count: AtomicU32::new(0),
            }
        }

        fn count(&self) -> u32 {
            self.count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PlatformHook for CountingHook {
        fn name(&self) -> &str {
            self.name
        }

        async fn handle(&self, _event: &PlatformEvent) -> Result<(), HookError> {
            self.count.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingHook;

    #[async_trait]
    impl PlatformHook for FailingHook {
        fn name(&self) -> &str {
            "failing"
        }

        async fn handle(&self, _event: &PlatformEvent) -> Result<(), HookError> {
            Err(HookError::execution("nope"))
        }
    }

    struct PanicHook;

    #[async_trait]
    impl PlatformHook for PanicHook {
        fn name(&self) -> &str {
            "panic_hook"
        }

        async fn handle(&self, _event: &PlatformEvent) -> Result<(), HookError> {
            panic!("This hook panics!");
        }
    }

    struct SlowHook;

    #[async_trait]
    impl PlatformHook for SlowHook {
        fn name(&self) -> &str {
            "slow"
        }

        async fn handle(&self, _event: &PlatformEvent) -> Result<(), HookError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        }
    }

    fn event() -> PlatformEvent {
        PlatformEvent::organization_unsuspended("org-1")
    }

    #[tokio::test]
    async fn test_registry_register() {
        let registry = HookRegistry::new();
        assert_eq!(registry.hook_count().await, 0);

        registry.register(Arc::new(CountingHook::new("test"))).await;
        assert_eq!(registry.hook_count().await, 1);
    }

    #[tokio::test]
    async fn emit_awaits_hooks_before_returning() {
        let registry = HookRegistry::new();
        let hook = Arc::new(CountingHook::new("test"));
        registry.register(hook.clone()).await;

        registry.emit(event()).await.unwrap();

        // No sleep needed: the hook ran inline.
        assert_eq!(hook.count(), 1);
    }

    #[tokio::test]
    async fn emit_republishes_to_broadcast_subscribers() {
        let registry = HookRegistry::new();
        let mut receiver = registry.broadcaster().subscribe();

        registry.emit(event()).await.unwrap();

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.kind(), PlatformEventKind::OrganizationUnsuspended);
    }

    #[tokio::test]
    async fn hook_failure_stops_delivery() {
        let registry = HookRegistry::new();
        let counter = Arc::new(CountingHook::new("after"));
        registry.register(Arc::new(FailingHook)).await;
        registry.register(counter.clone()).await;
        let mut receiver = registry.broadcaster().subscribe();

        let err = registry.emit(event()).await.unwrap_err();

        assert!(matches!(err, HookError::Execution(_)));
        assert_eq!(counter.count(), 0);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_panic_isolation() {
        let registry = HookRegistry::new();
        registry.register(Arc::new(PanicHook)).await;

        let err = registry.emit(event()).await.unwrap_err();
        match err {
            HookError::Panicked { hook, message } => {
                assert_eq!(hook, "panic_hook");
                assert_eq!(message, "This hook panics!");
            }
            other => panic!("expected panic error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_hook_times_out() {
        let registry = HookRegistry::with_timeout(Duration::from_millis(50));
        registry.register(Arc::new(SlowHook)).await;

        let err = registry.emit(event()).await.unwrap_err();
        assert!(matches!(err, HookError::Timeout { timeout_ms: 50, .. }));
    }

    #[tokio::test]
    async fn start_opens_readiness_gate() {
        let registry = HookRegistry::new();
        let gate = registry.readiness();
        assert!(!gate.is_ready());

        registry.register(Arc::new(CountingHook::new("test"))).await;
        registry.start().await;

        assert!(gate.is_ready());
        gate.wait_ready().await;
    }
}
