//! In-memory store backend for the Dockyard platform.
//!
//! [`MemoryBackend`] implements every trait from `dockyard-storage` and emits
//! platform events through a shared [`HookRegistry`](dockyard_core::HookRegistry).
//!
//! # Example
//!
//! ```ignore
//! use dockyard_core::HookRegistry;
//! use dockyard_db_memory::MemoryBackend;
//!
//! let events = HookRegistry::new_shared();
//! let backend = MemoryBackend::install(events.clone()).await;
//! events.start().await;
//! ```

pub mod hooks;
pub mod storage;
mod store_impl;

pub use hooks::PersonalOrganizationHook;
pub use storage::{MemoryBackend, UNVERIFIED_EMAIL_SUSPENSION_REASON};
