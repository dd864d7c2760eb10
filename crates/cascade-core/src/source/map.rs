use std::collections::{BTreeMap, BTreeSet};

use parking_lot::RwLock;

use super::{ChangeListener, ConfigSource};

/// In-memory source whose values can change at runtime.
///
/// Every mutation notifies registered listeners with the affected keys,
/// which invalidates cached resolver values.
pub struct MapConfigSource {
    name: String,
    ordinal: i32,
    values: RwLock<BTreeMap<String, String>>,
    listeners: RwLock<Vec<ChangeListener>>,
}

impl MapConfigSource {
    pub fn new(name: impl Into<String>, ordinal: i32) -> Self {
        Self {
            name: name.into(),
            ordinal,
            values: RwLock::new(BTreeMap::new()),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Create a source pre-populated with `values`.
    pub fn with_values<I, K, V>(name: impl Into<String>, ordinal: i32, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source = Self::new(name, ordinal);
        *source.values.write() = values.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        source
    }

    /// Set a value and notify listeners.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.values.write().insert(key.clone(), value.into());
        self.notify(BTreeSet::from([key]));
    }

    /// Remove a value and notify listeners if it was present.
    pub fn remove(&self, key: &str) -> Option<String> {
        let removed = self.values.write().remove(key);
        if removed.is_some() {
            self.notify(BTreeSet::from([key.to_string()]));
        }
        removed
    }

    fn notify(&self, keys: BTreeSet<String>) {
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener(&keys);
        }
    }
}

impl ConfigSource for MapConfigSource {
    fn ordinal(&self) -> i32 {
        self.ordinal
    }

    fn config_name(&self) -> &str {
        &self.name
    }

    fn property_value(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }

    fn properties(&self) -> BTreeMap<String, String> {
        self.values.read().clone()
    }

    fn set_on_attribute_change(&self, listener: ChangeListener) {
        self.listeners.write().push(listener);
    }
}
