//! Typed resolution of a single key
//!
//! A [`TypedResolver`] is a builder started by [`Config::resolve`]. It
//! collects lookup options and finishes with [`TypedResolver::get_value`],
//! which walks the key cascade:
//!
//! ```text
//! key.param.stage -> key.param -> key.stage -> key
//! ```
//!
//! The longest key is tried first; shorter keys only when the resolver is
//! not strict. Values may be cached for a TTL and are revalidated against
//! the owning config's change clock.

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::config::{Config, Evaluation};
use crate::convert::{BoxError, FromConfigValue, split_list};
use crate::snapshot::{ConfigSnapshot, Snapshottable};
use crate::{Error, Result};

static NEXT_RESOLVER_ID: AtomicU64 = AtomicU64::new(1);

/// Bounds every resolved value type satisfies.
pub trait ConfigValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> ConfigValue for T where T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

type Converter<T> = Arc<dyn Fn(&str) -> std::result::Result<T, BoxError> + Send + Sync>;

/// Callback receiving `(key, old, new)` whenever a resolved value changes.
pub type ChangeCallback<T> = Box<dyn FnMut(&str, Option<&T>, Option<&T>) + Send>;

/// Builder and cache for the typed value of one key.
///
/// Type changing calls (`as_type`, `with_converter`, `as_list`) keep all
/// lookup options and a string default, but drop typed defaults, the
/// change callback and the cached value; call them first.
pub struct TypedResolver<T> {
    id: u64,
    config: Config,
    key_original: String,
    key_resolved: Option<String>,
    converter: Converter<T>,
    list: bool,
    default_value: Option<T>,
    default_text: Option<String>,
    project_stage_aware: bool,
    property_parameter: Option<String>,
    parameter_value: Option<String>,
    strict: bool,
    evaluate_variables: bool,
    log_changes: bool,
    on_change: Option<ChangeCallback<T>>,
    cache_time: Option<Duration>,
    reload_after: Option<u64>,
    last_reloaded_at: u64,
    last_value: Option<T>,
}

impl<T: ConfigValue> TypedResolver<T> {
    pub(crate) fn from_parts(config: Config, key: &str, converter: Converter<T>) -> Self {
        Self {
            id: NEXT_RESOLVER_ID.fetch_add(1, Ordering::Relaxed),
            config,
            key_original: key.to_string(),
            key_resolved: None,
            converter,
            list: false,
            default_value: None,
            default_text: None,
            project_stage_aware: true,
            property_parameter: None,
            parameter_value: None,
            strict: false,
            evaluate_variables: false,
            log_changes: false,
            on_change: None,
            cache_time: None,
            reload_after: None,
            last_reloaded_at: 0,
            last_value: None,
        }
    }

    fn retype<N: ConfigValue>(self, converter: Converter<N>) -> TypedResolver<N> {
        let default_value = self
            .default_text
            .as_deref()
            .and_then(|text| converter(text).ok());
        TypedResolver {
            id: self.id,
            config: self.config,
            key_original: self.key_original,
            key_resolved: self.key_resolved,
            converter,
            list: self.list,
            default_value,
            default_text: self.default_text,
            project_stage_aware: self.project_stage_aware,
            property_parameter: self.property_parameter,
            parameter_value: self.parameter_value,
            strict: self.strict,
            evaluate_variables: self.evaluate_variables,
            log_changes: self.log_changes,
            on_change: None,
            cache_time: self.cache_time,
            reload_after: None,
            last_reloaded_at: 0,
            last_value: None,
        }
    }

    /// Convert with the built-in conversion of `N`.
    pub fn as_type<N>(self) -> TypedResolver<N>
    where
        N: FromConfigValue + ConfigValue,
    {
        self.retype(Arc::new(|value: &str| N::from_config_value(value)))
    }

    /// Convert with a custom function. Its errors surface as
    /// [`Error::Conversion`].
    pub fn with_converter<N, F, E>(self, converter: F) -> TypedResolver<N>
    where
        N: ConfigValue,
        F: Fn(&str) -> std::result::Result<N, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.retype(Arc::new(move |value: &str| converter(value).map_err(Into::into)))
    }

    /// Treat the value as a comma separated list of the current type.
    ///
    /// Without a default, a missing value resolves to an empty list.
    pub fn as_list(self) -> TypedResolver<Vec<T>> {
        let element = self.converter.clone();
        let previous_default = self.default_value.clone();
        let mut list = self.retype(Arc::new(move |value: &str| {
            split_list(value)
                .iter()
                .map(|item| element(item.as_str()))
                .collect::<std::result::Result<Vec<T>, BoxError>>()
        }));
        list.list = true;
        if list.default_value.is_none() && list.default_text.is_none() {
            list.default_value = Some(previous_default.into_iter().collect());
        }
        list
    }

    pub fn with_default(mut self, value: T) -> Self {
        self.default_text = (&value as &dyn Any).downcast_ref::<String>().cloned();
        self.default_value = Some(value);
        self
    }

    /// Default given as configuration text, converted like a configured
    /// value. Text containing `${` is converted after variable evaluation
    /// at lookup time.
    ///
    /// The text survives `as_type`, `with_converter` and `as_list` and is
    /// converted again with the new converter. If that conversion fails,
    /// `get_value` returns [`Error::Conversion`] whenever it falls back to
    /// the default.
    pub fn with_string_default(mut self, value: &str) -> Result<Self> {
        if value.is_empty() {
            return Err(Error::EmptyStringDefault {
                key: self.key_original.clone(),
            });
        }
        self.default_value = if value.contains("${") {
            (self.converter)(value).ok()
        } else {
            Some(self.convert(value)?)
        };
        self.default_text = Some(value.to_string());
        Ok(self)
    }

    /// Append the value of `property` to the key, e.g. `db.url.<vendor>`.
    ///
    /// The property is resolved immediately, honoring the stage-awareness
    /// set so far.
    pub fn parameterized_by(mut self, property: &str) -> Self {
        self.parameter_value = if property.is_empty() {
            None
        } else {
            self.config
                .stage_aware_value(property, self.project_stage_aware, None)
        };
        self.property_parameter = Some(property.to_string());
        self
    }

    pub fn with_current_project_stage(mut self, enabled: bool) -> Self {
        self.project_stage_aware = enabled;
        self
    }

    /// Only the longest key is consulted; a configured parameter that does
    /// not resolve yields no value.
    pub fn strictly(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn evaluate_variables(mut self, enabled: bool) -> Self {
        self.evaluate_variables = enabled;
        self
    }

    /// Log value changes at info, log-filtered.
    pub fn log_changes(mut self, enabled: bool) -> Self {
        self.log_changes = enabled;
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str, Option<&T>, Option<&T>) + Send + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Reuse the last value for `ttl` unless the config changes. A zero
    /// duration disables caching.
    pub fn cache_for(mut self, ttl: Duration) -> Self {
        self.cache_time = (!ttl.is_zero()).then_some(ttl);
        self
    }

    pub fn key(&self) -> &str {
        &self.key_original
    }

    /// The last key consulted by the most recent lookup.
    pub fn resolved_key(&self) -> Option<&str> {
        self.key_resolved.as_deref()
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default_value.as_ref()
    }

    pub fn is_list(&self) -> bool {
        self.list
    }

    /// Unique identity used by snapshots.
    pub fn id(&self) -> u64 {
        self.id
    }

    fn has_default(&self) -> bool {
        self.default_value.is_some() || self.default_text.is_some()
    }

    fn convert(&self, value: &str) -> Result<T> {
        (self.converter)(value).map_err(|e| Error::Conversion {
            key: self.key_original.clone(),
            value: value.to_string(),
            message: e.to_string(),
        })
    }

    /// Resolve and convert the value.
    ///
    /// Missing values yield the default, or `None` without one. Empty
    /// configured values also fall back to a default when one is set.
    pub fn get_value(&mut self) -> Result<Option<T>> {
        let now = self.config.now_nanos();
        if let (Some(_), Some(reload_after)) = (self.cache_time, self.reload_after) {
            if now <= reload_after && self.config.last_changed() < self.last_reloaded_at {
                return Ok(self.last_value.clone());
            }
        }

        let raw = self.resolve_string_value();
        let mut value = match raw.as_deref() {
            Some(text) if text.is_empty() && self.has_default() => None,
            Some(text) => Some(self.convert(text)?),
            None => None,
        };
        if value.is_none() && self.has_default() {
            value = self.fallback_default()?;
            tracing::debug!(key = %self.key_original, default = ?value, "No configured value, using default");
        }

        if value != self.last_value && (self.log_changes || self.on_change.is_some()) {
            if self.log_changes {
                let logged = raw
                    .as_deref()
                    .map(|v| self.config.filter_config_value(&self.key_original, v, true));
                tracing::info!(key = %self.key_original, value = ?logged, "New value for key");
            }
            if let Some(callback) = self.on_change.as_mut() {
                callback(&self.key_original, self.last_value.as_ref(), value.as_ref());
            }
        }
        self.last_value = value.clone();

        if let Some(ttl) = self.cache_time {
            let ttl_nanos = u64::try_from(ttl.as_nanos()).unwrap_or(u64::MAX);
            self.reload_after = Some(now.saturating_add(ttl_nanos));
            self.last_reloaded_at = now;
        }

        Ok(value)
    }

    fn fallback_default(&self) -> Result<Option<T>> {
        match (&self.default_text, &self.default_value) {
            (Some(text), _) if self.evaluate_variables => {
                let mut eval = Evaluation::new(self.project_stage_aware);
                let text = self.config.evaluate_variables(text, &mut eval);
                self.convert(&text).map(Some)
            }
            (_, Some(value)) => Ok(Some(value.clone())),
            (Some(text), None) => self.convert(text).map(Some),
            (None, None) => Ok(None),
        }
    }

    /// Walk the key cascade and return the first raw value found.
    pub(crate) fn resolve_string_value(&mut self) -> Option<String> {
        let mut resolved = self.key_original.clone();
        let mut suffixes = 0;

        let has_parameter = self
            .property_parameter
            .as_deref()
            .is_some_and(|property| !property.is_empty());
        if has_parameter {
            match self.parameter_value.as_deref().filter(|v| !v.is_empty()) {
                Some(parameter) => {
                    resolved = format!("{resolved}.{parameter}");
                    suffixes += 1;
                }
                None if self.strict => {
                    self.key_resolved = Some(resolved);
                    return None;
                }
                None => {}
            }
        }

        let stage = self.project_stage_aware.then(|| self.config.project_stage());
        if let Some(stage) = &stage {
            resolved = format!("{resolved}.{stage}");
            suffixes += 1;
        }
        self.key_resolved = Some(resolved.clone());

        let value = self.lookup(&resolved);
        if value.is_some() || self.strict {
            return value;
        }

        if suffixes == 2 {
            if let Some(parameter) = self.parameter_value.clone() {
                if let Some(value) = self.lookup_as_resolved(format!("{}.{parameter}", self.key_original)) {
                    return Some(value);
                }
            }
            if let Some(stage) = &stage {
                if let Some(value) = self.lookup_as_resolved(format!("{}.{stage}", self.key_original)) {
                    return Some(value);
                }
            }
        }
        if suffixes > 0 {
            return self.lookup_as_resolved(self.key_original.clone());
        }
        None
    }

    /// Look up `key` and record it as the resolved key.
    fn lookup_as_resolved(&mut self, key: String) -> Option<String> {
        let value = self.lookup(&key);
        self.key_resolved = Some(key);
        value
    }

    fn lookup(&self, key: &str) -> Option<String> {
        let mut eval = Evaluation::new(self.project_stage_aware);
        self.config
            .find_value(key, self.evaluate_variables.then_some(&mut eval))
    }

    /// The value captured for this resolver in `snapshot`.
    pub fn value_in(&self, snapshot: &ConfigSnapshot) -> Result<Option<T>> {
        snapshot
            .get(self.id)
            .and_then(|value| value.downcast_ref::<Option<T>>())
            .cloned()
            .ok_or_else(|| Error::NotInSnapshot {
                key: self.key_original.clone(),
            })
    }
}

impl<T: ConfigValue> Snapshottable for TypedResolver<T> {
    fn resolver_id(&self) -> u64 {
        self.id
    }

    fn capture(&mut self) -> Result<Box<dyn Any + Send + Sync>> {
        Ok(Box::new(self.get_value()?))
    }
}

impl<T: fmt::Debug> fmt::Debug for TypedResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedResolver")
            .field("key", &self.key_original)
            .field("resolved_key", &self.key_resolved)
            .field("default", &self.default_value)
            .field("stage_aware", &self.project_stage_aware)
            .field("parameter", &self.property_parameter)
            .field("strict", &self.strict)
            .field("list", &self.list)
            .field("cache_time", &self.cache_time)
            .finish()
    }
}

/// A declared configuration entry.
///
/// Holds the key, converter and default in one place so call sites only
/// need the [`Config`]. Resolution is stage-aware.
pub struct TypedConfig<T> {
    key: String,
    converter: Converter<T>,
    default: Option<T>,
}

impl<T> TypedConfig<T>
where
    T: FromConfigValue + ConfigValue,
{
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            converter: Arc::new(|value: &str| T::from_config_value(value)),
            default: None,
        }
    }
}

impl<T: ConfigValue> TypedConfig<T> {
    pub fn with_converter<F, E>(key: impl Into<String>, converter: F) -> Self
    where
        F: Fn(&str) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            key: key.into(),
            converter: Arc::new(move |value: &str| converter(value).map_err(Into::into)),
            default: None,
        }
    }

    pub fn with_default(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    /// A resolver for this entry against `config`.
    pub fn resolver(&self, config: &Config) -> TypedResolver<T> {
        let resolver = TypedResolver::from_parts(config.clone(), &self.key, self.converter.clone());
        match &self.default {
            Some(value) => resolver.with_default(value.clone()),
            None => resolver,
        }
    }

    pub fn value(&self, config: &Config) -> Result<Option<T>> {
        self.resolver(config).get_value()
    }
}

impl<T: fmt::Debug> fmt::Debug for TypedConfig<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedConfig")
            .field("key", &self.key)
            .field("default", &self.default)
            .finish()
    }
}
