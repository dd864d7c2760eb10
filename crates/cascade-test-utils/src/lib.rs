//! Shared test utilities for the Cascade Config workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`seed`]: an in-memory source seeded with the standard test entries
//! - [`dir`]: [`TempConfigDir`] builder for on-disk config layouts

pub mod dir;
pub mod seed;

pub use dir::TempConfigDir;
pub use seed::{SEEDED_ORDINAL, SEEDED_SOURCE_NAME, seeded_config, seeded_source};
