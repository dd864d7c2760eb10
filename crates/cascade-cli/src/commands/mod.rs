//! Command implementations for cascade-cli

pub mod get;
pub mod inspect;
pub mod stage;

pub use get::run_get;
pub use inspect::{run_entries, run_sources};
pub use stage::run_stage;
