//! Consistent reads of several resolvers

use std::any::Any;
use std::collections::HashMap;

use crate::config::Config;
use crate::{Error, Result};

/// Attempts made before giving up on a consistent snapshot.
pub const SNAPSHOT_ATTEMPTS: usize = 4;

/// A resolver whose current value can be captured into a snapshot.
pub trait Snapshottable {
    fn resolver_id(&self) -> u64;

    fn capture(&mut self) -> Result<Box<dyn Any + Send + Sync>>;
}

/// Values of several resolvers read without an intervening config change.
///
/// Read values back with [`TypedResolver::value_in`](crate::TypedResolver::value_in).
#[derive(Default)]
pub struct ConfigSnapshot {
    values: HashMap<u64, Box<dyn Any + Send + Sync>>,
}

impl ConfigSnapshot {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn contains(&self, resolver_id: u64) -> bool {
        self.values.contains_key(&resolver_id)
    }

    pub(crate) fn get(&self, resolver_id: u64) -> Option<&(dyn Any + Send + Sync)> {
        self.values.get(&resolver_id).map(|value| value.as_ref())
    }
}

impl std::fmt::Debug for ConfigSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.values.keys().collect();
        ids.sort();
        f.debug_struct("ConfigSnapshot").field("resolvers", &ids).finish()
    }
}

impl Config {
    /// Read all `resolvers` while `last_changed` stays put.
    ///
    /// Retries up to [`SNAPSHOT_ATTEMPTS`] times before failing with
    /// [`Error::SnapshotUnstable`].
    pub fn snapshot_for(&self, resolvers: &mut [&mut dyn Snapshottable]) -> Result<ConfigSnapshot> {
        for attempt in 1..=SNAPSHOT_ATTEMPTS {
            let before = self.last_changed();
            let mut values = HashMap::with_capacity(resolvers.len());
            for resolver in resolvers.iter_mut() {
                values.insert(resolver.resolver_id(), resolver.capture()?);
            }
            if self.last_changed() == before {
                return Ok(ConfigSnapshot { values });
            }
            tracing::debug!(attempt, "Configuration changed while taking snapshot, retrying");
        }

        Err(Error::SnapshotUnstable {
            attempts: SNAPSHOT_ATTEMPTS,
        })
    }
}
