//! Config sources
//!
//! A [`ConfigSource`] is one prioritized origin of key/value pairs. The
//! [`Config`](crate::Config) consults sources from the highest ordinal to
//! the lowest and returns the first value found.

mod args;
mod directory;
mod env;
mod file;
mod loader;
mod map;
mod provider;

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

pub use args::ArgsConfigSource;
pub use directory::DirectoryConfigSource;
pub use env::EnvironmentConfigSource;
pub use file::{PropertyFileConfigSource, StructuredFileConfigSource};
pub use loader::PropertyLoader;
pub use map::MapConfigSource;
pub use provider::{DefaultConfigSourceProvider, PropertyFileConfig, SourceOptions};

use crate::Result;

/// Callback invoked by a source with the set of keys whose values changed.
pub type ChangeListener = Arc<dyn Fn(&BTreeSet<String>) + Send + Sync>;

/// Ordinal of [`ArgsConfigSource`].
pub const ARGS_ORDINAL: i32 = 400;
/// Ordinal of [`EnvironmentConfigSource`].
pub const ENVIRONMENT_ORDINAL: i32 = 300;
/// Ordinal of [`DirectoryConfigSource`].
pub const DIRECTORY_ORDINAL: i32 = 200;
/// Default ordinal of file backed sources.
pub const FILE_ORDINAL: i32 = 100;

/// One prioritized origin of configuration values.
pub trait ConfigSource: Send + Sync {
    /// Priority; higher ordinals win.
    fn ordinal(&self) -> i32;

    /// Human readable identifier used in logs and inspection output.
    fn config_name(&self) -> &str;

    /// The raw value for `key`, if this source has one.
    fn property_value(&self, key: &str) -> Option<String>;

    /// All key/value pairs this source can enumerate.
    fn properties(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// Whether [`properties`](ConfigSource::properties) is meaningful.
    fn is_scannable(&self) -> bool {
        true
    }

    /// Register a listener for attribute changes. Sources that never
    /// change ignore the listener.
    fn set_on_attribute_change(&self, _listener: ChangeListener) {}

    /// Release resources held by the source.
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Supplies a batch of config sources, e.g. discovered on disk.
pub trait ConfigSourceProvider: Send + Sync {
    fn config_sources(&self) -> Result<Vec<Arc<dyn ConfigSource>>>;
}

/// Lookup order: descending ordinal, ties broken by ascending name.
pub fn compare_sources(a: &dyn ConfigSource, b: &dyn ConfigSource) -> Ordering {
    b.ordinal()
        .cmp(&a.ordinal())
        .then_with(|| a.config_name().cmp(b.config_name()))
}

/// Read `config_ordinal` from loaded properties, falling back to `default`.
pub(crate) fn ordinal_from(name: &str, properties: &BTreeMap<String, String>, default: i32) -> i32 {
    match properties.get(cascade_fs::ORDINAL_KEY) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(source = name, value = %raw, "Invalid config_ordinal, using default {default}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_by_descending_ordinal_then_name() {
        let mut sources: Vec<Arc<dyn ConfigSource>> = vec![
            Arc::new(MapConfigSource::new("b", 100)),
            Arc::new(MapConfigSource::new("x", 300)),
            Arc::new(MapConfigSource::new("a", 100)),
        ];
        sources.sort_by(|a, b| compare_sources(a.as_ref(), b.as_ref()));
        let names: Vec<_> = sources.iter().map(|s| s.config_name().to_string()).collect();
        assert_eq!(names, vec!["x", "a", "b"]);
    }

    #[test]
    fn ordinal_override_is_parsed() {
        let props = BTreeMap::from([("config_ordinal".to_string(), " 250 ".to_string())]);
        assert_eq!(ordinal_from("t", &props, 100), 250);
        let bad = BTreeMap::from([("config_ordinal".to_string(), "high".to_string())]);
        assert_eq!(ordinal_from("t", &bad, 100), 100);
        assert_eq!(ordinal_from("t", &BTreeMap::new(), 100), 100);
    }
}
