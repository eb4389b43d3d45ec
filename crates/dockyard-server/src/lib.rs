//! Dockyard API server host.
//!
//! Wires the in-memory stores and event hooks, runs the startup
//! reconciliation in [`bootstrap`] and serves health endpoints.

pub mod bootstrap;
pub mod config;
pub mod event_log;
mod handlers;
pub mod observability;
pub mod server;

pub use bootstrap::{BootstrapError, BootstrapReport, BootstrapServices, Bootstrapper, StepOutcome};
pub use config::AppConfig;
pub use server::{DockyardServer, ServerBuilder, build_app};
