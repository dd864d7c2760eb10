use std::collections::BTreeMap;

use cascade_fs::{ConfigStore, FlattenOptions, NormalizedPath, properties};

use super::{ConfigSource, FILE_ORDINAL, ordinal_from};
use crate::Result;

/// A `.properties` file loaded once.
///
/// The ordinal defaults to 100 and is overridden by a `config_ordinal`
/// entry inside the file.
#[derive(Debug, Clone)]
pub struct PropertyFileConfigSource {
    name: String,
    ordinal: i32,
    values: BTreeMap<String, String>,
}

impl PropertyFileConfigSource {
    pub fn load(path: impl Into<NormalizedPath>) -> Result<Self> {
        let path = path.into();
        let values = properties::load_properties(&path)?;
        Ok(Self::from_properties(format!("properties {path}"), values))
    }

    /// Wrap already loaded properties.
    pub fn from_properties(name: impl Into<String>, values: BTreeMap<String, String>) -> Self {
        let name = name.into();
        let ordinal = ordinal_from(&name, &values, FILE_ORDINAL);
        Self { name, ordinal, values }
    }
}

impl ConfigSource for PropertyFileConfigSource {
    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn config_name(&self) -> &str {
        &self.name
    }

    fn property_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn properties(&self) -> BTreeMap<String, String> {
        self.values.clone()
    }
}

/// A TOML, JSON or YAML document flattened to dotted keys.
///
/// Same ordinal rules as [`PropertyFileConfigSource`]; a top level
/// `config_ordinal` entry overrides the default.
#[derive(Debug, Clone)]
pub struct StructuredFileConfigSource {
    name: String,
    ordinal: i32,
    values: BTreeMap<String, String>,
}

impl StructuredFileConfigSource {
    pub fn load(path: impl Into<NormalizedPath>) -> Result<Self> {
        Self::load_with(path, FlattenOptions::default())
    }

    pub fn load_with(path: impl Into<NormalizedPath>, options: FlattenOptions) -> Result<Self> {
        let path = path.into();
        let values = ConfigStore::with_options(options).load_flat(&path)?;
        let format = path.extension().unwrap_or("structured").to_lowercase();
        let name = format!("{format} {path}");
        let ordinal = ordinal_from(&name, &values, FILE_ORDINAL);
        Ok(Self { name, ordinal, values })
    }
}

impl ConfigSource for StructuredFileConfigSource {
    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn config_name(&self) -> &str {
        &self.name
    }

    fn property_value(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn properties(&self) -> BTreeMap<String, String> {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn properties_file_ordinal_override() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.properties");
        fs::write(&path, "config_ordinal=250\ncolor=red\n").unwrap();

        let source = PropertyFileConfigSource::load(path.as_path()).unwrap();
        assert_eq!(source.ordinal(), 250);
        assert_eq!(source.property_value("color").as_deref(), Some("red"));
        assert!(source.config_name().starts_with("properties "));
    }

    #[test]
    fn yaml_file_is_flattened() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.yml");
        fs::write(&path, "db:\n  url: jdbc:h2\nhosts: [a, b]\n").unwrap();

        let source = StructuredFileConfigSource::load(path.as_path()).unwrap();
        assert_eq!(source.ordinal(), FILE_ORDINAL);
        assert_eq!(source.property_value("db.url").as_deref(), Some("jdbc:h2"));
        assert_eq!(source.property_value("hosts").as_deref(), Some("a,b"));
        assert!(source.config_name().starts_with("yml "));
    }
}
