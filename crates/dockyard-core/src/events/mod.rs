//! Platform event system.
//!
//! Stores emit a [`PlatformEvent`] after every state change. Registered
//! [`PlatformHook`]s are awaited by the emitter; passive observers subscribe
//! to the [`EventBroadcaster`].
//!
//! ```text
//!   store ──emit──▶ HookRegistry ──await──▶ hook, hook, ...
//!                        │
//!                        └──broadcast──▶ observers (event log, ...)
//! ```
//!
//! The [`ReadinessGate`] opens when the host calls [`HookRegistry::start`],
//! i.e. once every hook is attached. Anything that depends on a hook's side
//! effect waits on the gate before emitting.
//!
//! # Module Structure
//!
//! - [`types`]: Event type definitions
//! - [`hooks`]: Hook trait and error type
//! - [`registry`]: Hook registry and emitter
//! - [`broadcaster`]: Fan-out to passive observers
//! - [`readiness`]: One-shot readiness gate

pub mod broadcaster;
pub mod hooks;
pub mod readiness;
pub mod registry;
pub mod types;

// Re-export main types for convenience
pub use broadcaster::EventBroadcaster;
pub use hooks::{HookError, PlatformHook};
pub use readiness::ReadinessGate;
pub use registry::HookRegistry;
pub use types::{PlatformEvent, PlatformEventKind, PlatformEventPayload};
