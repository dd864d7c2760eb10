use std::collections::BTreeMap;

use cascade_fs::{NormalizedPath, ORDINAL_KEY, properties};

use super::{FILE_ORDINAL, ordinal_from};
use crate::{ProjectStage, Result};

const PROPERTIES_SUFFIX: &str = ".properties";

/// Merges a properties file with its stage specific variant.
///
/// For a base name `db` and stage `UnitTest`, every `db.properties` and
/// `db-UnitTest.properties` found under the search roots is loaded and
/// merged by ascending `config_ordinal`, higher ordinals overriding lower
/// ones. Files with equal ordinals keep discovery order.
#[derive(Debug, Clone, Default)]
pub struct PropertyLoader {
    roots: Vec<NormalizedPath>,
}

impl PropertyLoader {
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<NormalizedPath>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
        }
    }

    /// Load and merge `name` for `stage`. Returns `None` when no file exists.
    pub fn load(&self, name: &str, stage: &ProjectStage) -> Result<Option<BTreeMap<String, String>>> {
        let base = name.strip_suffix(PROPERTIES_SUFFIX).unwrap_or(name);
        let candidates = [
            format!("{base}{PROPERTIES_SUFFIX}"),
            format!("{base}-{stage}{PROPERTIES_SUFFIX}"),
        ];

        let mut found: Vec<(i32, BTreeMap<String, String>)> = Vec::new();
        for file_name in &candidates {
            for root in &self.roots {
                let path = root.join(file_name);
                if !path.is_file() {
                    continue;
                }
                let props = properties::load_properties(&path)?;
                let ordinal = ordinal_from(path.as_str(), &props, FILE_ORDINAL);
                tracing::debug!(%path, ordinal, "Found property file");
                found.push((ordinal, props));
            }
        }

        if found.is_empty() {
            return Ok(None);
        }

        found.sort_by_key(|(ordinal, _)| *ordinal);
        let mut merged = BTreeMap::new();
        for (_, props) in found {
            merged.extend(props);
        }
        merged.remove(ORDINAL_KEY);

        Ok(Some(merged))
    }
}
