//! winring: User-Defined Circular Window Ordering
//!
//! Keeps a persisted, user-defined ordering of a host's normal windows,
//! repairs it against the live window set, cycles focus around it and moves
//! the selected tabs to the neighbouring window.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod cycle;
pub mod error;
pub mod labels;
pub mod lifecycle;
pub mod logging;
pub mod outcome;
pub mod platform;
pub mod reconcile;
pub mod relocate;
pub mod scenario;
pub mod store;
pub mod types;

pub use api::{CommandOutcome, WindowRing};
pub use commands::Command;
pub use error::{ApiError, PlatformError, StorageError};
