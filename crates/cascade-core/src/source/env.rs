use std::collections::BTreeMap;

use super::{ConfigSource, ENVIRONMENT_ORDINAL};

/// Process environment variables.
///
/// A key is tried as given, then with every character other than ASCII
/// letters, digits and `_` replaced by `_`, then that form uppercased, so
/// `db.url` also matches `db_url` and `DB_URL`.
#[derive(Debug, Clone)]
pub struct EnvironmentConfigSource {
    name: String,
    ordinal: i32,
}

impl EnvironmentConfigSource {
    pub fn new() -> Self {
        Self {
            name: "environment".to_string(),
            ordinal: ENVIRONMENT_ORDINAL,
        }
    }

    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = ordinal;
        self
    }

    fn lookup(key: &str) -> Option<String> {
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        std::env::var(key).ok()
    }
}

impl Default for EnvironmentConfigSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Candidate variable names for `key`, in lookup order.
pub(crate) fn candidate_names(key: &str) -> Vec<String> {
    let sanitized: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    let upper = sanitized.to_ascii_uppercase();

    let mut names = vec![key.to_string()];
    for candidate in [sanitized, upper] {
        if !names.contains(&candidate) {
            names.push(candidate);
        }
    }
    names
}

impl ConfigSource for EnvironmentConfigSource {
    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn config_name(&self) -> &str {
        &self.name
    }

    fn property_value(&self, key: &str) -> Option<String> {
        candidate_names(key).iter().find_map(|name| Self::lookup(name))
    }

    /// Variables whose name or value is not valid UTF-8 are skipped.
    fn properties(&self) -> BTreeMap<String, String> {
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }
}
