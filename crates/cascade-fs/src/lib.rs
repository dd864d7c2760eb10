//! Filesystem layer for Cascade Config
//!
//! Provides normalized paths, text reading, a `.properties` parser and
//! format-agnostic loading of structured config files into flat
//! dotted-key maps.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod properties;

pub use config::{ConfigStore, FlattenOptions, flatten_value};
pub use constants::{ConfigFile, ORDINAL_KEY};
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use properties::parse_properties;
