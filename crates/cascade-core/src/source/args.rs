use std::collections::BTreeMap;

use super::{ARGS_ORDINAL, ConfigSource};
use crate::{Error, Result};

/// Overrides passed on the command line as `key=value`.
#[derive(Debug, Clone)]
pub struct ArgsConfigSource {
    name: String,
    values: BTreeMap<String, String>,
}

impl ArgsConfigSource {
    /// Parse `key=value` arguments. Later duplicates win.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = BTreeMap::new();
        for arg in args {
            let arg = arg.as_ref();
            let (key, value) = arg.split_once('=').ok_or_else(|| Error::InvalidOverride {
                argument: arg.to_string(),
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::InvalidOverride {
                    argument: arg.to_string(),
                });
            }
            values.insert(key.to_string(), value.to_string());
        }

        Ok(Self {
            name: "args".to_string(),
            values,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigSource for ArgsConfigSource {
    fn ordinal(&self) -> i32 {
        ARGS_ORDINAL
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
