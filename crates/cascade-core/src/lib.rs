//! Layered configuration resolution for Cascade Config
//!
//! This crate resolves configuration values from an ordered cascade of
//! sources:
//!
//! - **Sources**: named, ordinal-ranked key/value providers (command line
//!   overrides, environment, a config directory, property and structured
//!   files, in-memory maps)
//! - **Config**: the sorted sources and value filters of one application
//! - **TypedResolver**: key fallback over parameter and project stage
//!   suffixes, typed conversion, `${var}` evaluation, TTL caching and
//!   change callbacks
//! - **ConfigResolver**: registry of one `Config` per application
//! - **ConfigInfo**: read-only inspection of sources and entries
//!
//! # Architecture
//!
//! ```text
//!                 cascade-cli
//!                      |
//!                cascade-core
//!                      |
//!                 cascade-fs
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cascade_core::{Config, MapConfigSource, ProjectStage};
//!
//! let config = Config::builder()
//!     .with_source(MapConfigSource::with_values(
//!         "defaults",
//!         100,
//!         [("db.url", "jdbc:h2:mem"), ("db.url.Production", "jdbc:pg://db")],
//!     ))
//!     .with_project_stage(ProjectStage::Production)
//!     .build()?;
//!
//! let url = config.resolve("db.url").get_value()?;
//! assert_eq!(url.as_deref(), Some("jdbc:pg://db"));
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod filter;
pub mod inspect;
pub mod resolver;
pub mod snapshot;
pub mod source;
pub mod stage;
pub mod typed;
pub mod variables;

pub use config::{
    APPLICATION_NAME_KEY, CONFIG_LOG_KEY, Config, ConfigBuilder, DEFAULT_APPLICATION,
};
pub use convert::{BoxError, FromConfigValue, parse_bool, split_list};
pub use error::{Error, Result};
pub use filter::{ConfigFilter, SECRET_MASK, SecretMaskingFilter};
pub use inspect::{ConfigEntry, ConfigInfo, ConfigReport, SourceInfo};
pub use resolver::{ConfigFactory, ConfigResolver};
pub use snapshot::{ConfigSnapshot, SNAPSHOT_ATTEMPTS, Snapshottable};
pub use source::{
    ArgsConfigSource, ChangeListener, ConfigSource, ConfigSourceProvider,
    DefaultConfigSourceProvider, DirectoryConfigSource, EnvironmentConfigSource, MapConfigSource,
    PropertyFileConfig, PropertyFileConfigSource, PropertyLoader, SourceOptions,
    StructuredFileConfigSource, compare_sources,
};
pub use stage::{ProjectStage, STAGE_DETECTION_KEYS};
pub use typed::{ChangeCallback, ConfigValue, TypedConfig, TypedResolver};
