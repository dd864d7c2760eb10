use std::collections::BTreeMap;

use cascade_fs::{NormalizedPath, io};

use super::{ConfigSource, DIRECTORY_ORDINAL};
use crate::Result;

/// Directory of one file per key.
///
/// Every regular, non-hidden file becomes an entry named after the file,
/// with the trimmed file content as value. Suited to mounted secrets and
/// orchestrator provided config maps.
#[derive(Debug, Clone)]
pub struct DirectoryConfigSource {
    name: String,
    values: BTreeMap<String, String>,
}

impl DirectoryConfigSource {
    /// Load all entries below `dir`. A missing directory yields an empty
    /// source.
    pub fn load(dir: impl Into<NormalizedPath>) -> Result<Self> {
        let dir = dir.into();
        let name = format!("directory {dir}");
        let mut values = BTreeMap::new();

        if !dir.is_dir() {
            tracing::debug!(%dir, "Config directory does not exist");
            return Ok(Self { name, values });
        }

        for file in io::list_files(&dir)? {
            let Some(key) = file.file_name() else {
                continue;
            };
            let content = io::read_text(&file)?;
            values.insert(key.to_string(), content.trim().to_string());
        }
        tracing::debug!(%dir, entries = values.len(), "Loaded config directory");

        Ok(Self { name, values })
    }
}

impl ConfigSource for DirectoryConfigSource {
    fn ordinal(&self) -> i32 {
        DIRECTORY_ORDINAL
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
