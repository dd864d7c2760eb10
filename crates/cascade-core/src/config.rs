//! The aggregated configuration of one application

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Instant;

use arc_swap::ArcSwap;
use parking_lot::RwLock;

use crate::convert::parse_bool;
use crate::filter::ConfigFilter;
use crate::inspect::ConfigInfo;
use crate::source::{ConfigSource, ConfigSourceProvider, compare_sources};
use crate::stage::{ProjectStage, STAGE_DETECTION_KEYS};
use crate::typed::TypedResolver;
use crate::variables::{MAX_VARIABLE_DEPTH, MAX_VARIABLE_EXPANSION, substitute};
use crate::{FromConfigValue, Result};

/// When this key resolves to a true token, the whole configuration is
/// logged at info once the config is built.
pub const CONFIG_LOG_KEY: &str = "cascade.config.log";

/// Key naming the application in inspection output.
pub const APPLICATION_NAME_KEY: &str = "cascade.application.name";

/// Application name used when none is configured.
pub const DEFAULT_APPLICATION: &str = "default";

/// State carried through one `${var}` evaluation.
pub(crate) struct Evaluation {
    stage_aware: bool,
    /// The root key and the variable names currently being resolved.
    active: Vec<String>,
    /// Bytes of replacement text produced so far.
    expanded: usize,
}

impl Evaluation {
    pub(crate) fn new(stage_aware: bool) -> Self {
        Self {
            stage_aware,
            active: Vec::new(),
            expanded: 0,
        }
    }
}

struct ConfigInner {
    application: String,
    sources: ArcSwap<Vec<Arc<dyn ConfigSource>>>,
    filters: RwLock<Vec<Arc<dyn ConfigFilter>>>,
    stage: RwLock<Option<ProjectStage>>,
    custom_stages: Vec<String>,
    clock: Instant,
    last_changed: AtomicU64,
}

impl ConfigInner {
    fn now_nanos(&self) -> u64 {
        u64::try_from(self.clock.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    /// Advance `last_changed` to now, or past its current value.
    fn mark_changed(&self) {
        let now = self.now_nanos();
        let _ = self
            .last_changed
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(now.max(prev.saturating_add(1)))
            });
    }
}

/// Ordered sources and filters of one application.
///
/// Cloning is cheap and every clone sees the same state. Sources are
/// swapped as a whole on change, so readers always observe a complete,
/// sorted array.
#[derive(Clone)]
pub struct Config {
    inner: Arc<ConfigInner>,
}

impl Config {
    /// An empty configuration.
    pub fn new(application: impl Into<String>) -> Self {
        Self::from_parts(application.into(), Vec::new())
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    fn from_parts(application: String, custom_stages: Vec<String>) -> Self {
        Self {
            inner: Arc::new(ConfigInner {
                application,
                sources: ArcSwap::from_pointee(Vec::new()),
                filters: RwLock::new(Vec::new()),
                stage: RwLock::new(None),
                custom_stages,
                clock: Instant::now(),
                last_changed: AtomicU64::new(0),
            }),
        }
    }

    pub fn application(&self) -> &str {
        &self.inner.application
    }

    /// Merge `sources` into the current set and re-sort.
    pub fn add_config_sources(&self, sources: Vec<Arc<dyn ConfigSource>>) {
        if sources.is_empty() {
            return;
        }

        for source in &sources {
            let weak: Weak<ConfigInner> = Arc::downgrade(&self.inner);
            let name = source.config_name().to_string();
            source.set_on_attribute_change(Arc::new(move |keys| {
                if let Some(inner) = weak.upgrade() {
                    tracing::debug!(source = %name, ?keys, "Config source attributes changed");
                    inner.mark_changed();
                }
            }));
        }

        self.inner.sources.rcu(|current| {
            let mut merged: Vec<Arc<dyn ConfigSource>> =
                current.iter().chain(sources.iter()).cloned().collect();
            merged.sort_by(|a, b| compare_sources(a.as_ref(), b.as_ref()));
            merged
        });
        self.inner.mark_changed();
    }

    /// The current sources in lookup order.
    pub fn config_sources(&self) -> Arc<Vec<Arc<dyn ConfigSource>>> {
        self.inner.sources.load_full()
    }

    pub fn add_config_filter(&self, filter: Arc<dyn ConfigFilter>) {
        self.inner.filters.write().push(filter);
        self.inner.mark_changed();
    }

    pub fn config_filters(&self) -> Vec<Arc<dyn ConfigFilter>> {
        self.inner.filters.read().clone()
    }

    /// Pipe `value` through every filter in registration order.
    pub fn filter_config_value(&self, key: &str, value: &str, for_log: bool) -> String {
        self.inner
            .filters
            .read()
            .iter()
            .fold(value.to_string(), |current, filter| {
                if for_log {
                    filter.filter_value_for_log(key, &current)
                } else {
                    filter.filter_value(key, &current)
                }
            })
    }

    /// Start a typed lookup of `key`.
    pub fn resolve(&self, key: &str) -> TypedResolver<String> {
        TypedResolver::from_parts(self.clone(), key, Arc::new(String::from_config_value))
    }

    /// Monotonic nanoseconds of the last reported change.
    pub fn last_changed(&self) -> u64 {
        self.inner.last_changed.load(Ordering::Acquire)
    }

    pub(crate) fn now_nanos(&self) -> u64 {
        self.inner.now_nanos()
    }

    /// The active stage, detected from the sources on first use.
    pub fn project_stage(&self) -> ProjectStage {
        if let Some(stage) = self.inner.stage.read().clone() {
            return stage;
        }
        let detected = self.detect_project_stage();
        self.inner.stage.write().get_or_insert(detected).clone()
    }

    /// Override the active stage.
    pub fn set_project_stage(&self, stage: ProjectStage) {
        let previous = self.inner.stage.write().replace(stage.clone());
        if previous.as_ref() != Some(&stage) {
            tracing::info!(application = %self.inner.application, %stage, "Project stage set");
            self.inner.mark_changed();
        }
    }

    fn detect_project_stage(&self) -> ProjectStage {
        for key in STAGE_DETECTION_KEYS {
            let Some(name) = self.find_value(key, None) else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            match ProjectStage::parse_with(name, &self.inner.custom_stages) {
                Some(stage) => {
                    tracing::info!(key, %stage, "Detected project stage");
                    return stage;
                }
                None => tracing::warn!(key, value = name, "Ignoring unknown project stage"),
            }
        }

        let stage = ProjectStage::default();
        tracing::debug!(%stage, "No project stage configured");
        stage
    }

    /// First value of `key` in lookup order, with optional `${var}`
    /// evaluation, passed through the value filters.
    pub(crate) fn find_value(&self, key: &str, eval: Option<&mut Evaluation>) -> Option<String> {
        for source in self.config_sources().iter() {
            let Some(value) = source.property_value(key) else {
                tracing::trace!(key, source = source.config_name(), "No config value");
                continue;
            };
            tracing::debug!(
                key,
                source = source.config_name(),
                value = %self.filter_config_value(key, &value, true),
                "Found config value"
            );
            let value = match eval {
                Some(eval) => {
                    let root = eval.active.is_empty();
                    if root {
                        eval.active.push(key.to_string());
                    }
                    let evaluated = self.evaluate_variables(&value, eval);
                    if root {
                        eval.active.pop();
                    }
                    evaluated
                }
                None => value,
            };
            return Some(self.filter_config_value(key, &value, false));
        }
        None
    }

    /// `key.<stage>` then `key` when `stage_aware`, otherwise `key` only.
    pub(crate) fn stage_aware_value(
        &self,
        key: &str,
        stage_aware: bool,
        mut eval: Option<&mut Evaluation>,
    ) -> Option<String> {
        if stage_aware {
            let staged = format!("{key}.{}", self.project_stage());
            if let Some(value) = self.find_value(&staged, eval.as_deref_mut()) {
                return Some(value);
            }
        }
        self.find_value(key, eval)
    }

    /// Replace `${name}` references in `value`.
    ///
    /// Names are tracked while they resolve, so a reference back to a name
    /// in progress (with or without a stage suffix on the stored key) stays
    /// literal. Nesting is capped at [`MAX_VARIABLE_DEPTH`] and produced
    /// text at [`MAX_VARIABLE_EXPANSION`].
    pub(crate) fn evaluate_variables(&self, value: &str, eval: &mut Evaluation) -> String {
        substitute(value, |name| {
            if eval.active.len() >= MAX_VARIABLE_DEPTH || eval.active.iter().any(|n| n == name) {
                tracing::warn!(variable = name, "Recursive variable reference left unresolved");
                return None;
            }
            if eval.expanded >= MAX_VARIABLE_EXPANSION {
                tracing::warn!(variable = name, "Variable expansion limit reached");
                return None;
            }

            eval.active.push(name.to_string());
            let stage_aware = eval.stage_aware;
            let resolved = self.stage_aware_value(name, stage_aware, Some(&mut *eval));
            eval.active.pop();

            let resolved = resolved?;
            eval.expanded = eval.expanded.saturating_add(resolved.len());
            if eval.expanded > MAX_VARIABLE_EXPANSION {
                tracing::warn!(variable = name, "Variable expansion limit reached");
                return None;
            }
            Some(resolved)
        })
    }

    /// Raw lookup of `key` with variable evaluation.
    pub fn property_value(&self, key: &str) -> Option<String> {
        self.find_value(key, Some(&mut Evaluation::new(false)))
    }

    /// Lookup of `key`, returning `default` when missing or empty.
    pub fn property_value_or(&self, key: &str, default: &str, evaluate_variables: bool) -> String {
        let mut eval = Evaluation::new(false);
        self.find_value(key, evaluate_variables.then_some(&mut eval))
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Lookup of `key.<stage>`, then `key`.
    pub fn project_stage_aware_property_value(&self, key: &str) -> Option<String> {
        self.stage_aware_value(key, true, Some(&mut Evaluation::new(true)))
    }

    pub fn project_stage_aware_property_value_or(&self, key: &str, default: &str) -> String {
        self.project_stage_aware_property_value(key)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Stage-aware lookup of `key` parameterized by the value of `property`.
    pub fn property_aware_property_value(&self, key: &str, property: &str) -> Option<String> {
        self.resolve(key)
            .parameterized_by(property)
            .evaluate_variables(true)
            .resolve_string_value()
    }

    pub fn property_aware_property_value_or(&self, key: &str, property: &str, default: &str) -> String {
        self.property_aware_property_value(key, property)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Every source's value of `key`, lowest ordinal first, filtered and
    /// without duplicates.
    pub fn all_property_values(&self, key: &str) -> Vec<String> {
        let mut values: Vec<String> = Vec::new();
        for source in self.config_sources().iter().rev() {
            if let Some(value) = source.property_value(key) {
                let value = self.filter_config_value(key, &value, false);
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
        values
    }

    /// Merged entries of all scannable sources; higher ordinals win.
    pub fn all_properties(&self) -> BTreeMap<String, String> {
        let mut merged = BTreeMap::new();
        for source in self.config_sources().iter().rev() {
            if source.is_scannable() {
                merged.extend(source.properties());
            }
        }
        merged
    }

    /// Close every source and filter.
    pub fn release(&self) {
        for source in self.config_sources().iter() {
            if let Err(e) = source.close() {
                tracing::info!(source = source.config_name(), error = %e, "Failed to close config source");
            }
        }
        for filter in self.config_filters() {
            if let Err(e) = filter.close() {
                tracing::info!(error = %e, "Failed to close config filter");
            }
        }
        tracing::debug!(application = %self.inner.application, "Released configuration");
    }

    /// Log all sources and entries at info, values log-filtered.
    pub fn log_config(&self) {
        let info = ConfigInfo::new(self);
        tracing::info!(
            application = %self.inner.application,
            stage = %self.project_stage(),
            "Configuration sources:\n{}",
            info.config_sources_as_strings().join("\n")
        );
        tracing::info!(
            application = %self.inner.application,
            "Configuration entries:\n{}",
            info.config_entries_as_strings().join("\n")
        );
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<String> = self
            .config_sources()
            .iter()
            .map(|s| format!("{} - {}", s.ordinal(), s.config_name()))
            .collect();
        f.debug_struct("Config")
            .field("application", &self.inner.application)
            .field("sources", &sources)
            .field("filters", &self.inner.filters.read().len())
            .field("last_changed", &self.last_changed())
            .finish()
    }
}

/// Assembles a [`Config`] from sources, providers and filters.
#[derive(Default)]
pub struct ConfigBuilder {
    application: Option<String>,
    sources: Vec<Arc<dyn ConfigSource>>,
    providers: Vec<Box<dyn ConfigSourceProvider>>,
    filters: Vec<Arc<dyn ConfigFilter>>,
    stage: Option<ProjectStage>,
    custom_stages: Vec<String>,
}

impl ConfigBuilder {
    pub fn with_application(mut self, name: impl Into<String>) -> Self {
        self.application = Some(name.into());
        self
    }

    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Add a source that is also held elsewhere, e.g. to mutate it later.
    pub fn with_shared_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_provider(mut self, provider: impl ConfigSourceProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn with_filter(mut self, filter: impl ConfigFilter + 'static) -> Self {
        self.filters.push(Arc::new(filter));
        self
    }

    /// Fix the stage instead of detecting it.
    pub fn with_project_stage(mut self, stage: ProjectStage) -> Self {
        self.stage = Some(stage);
        self
    }

    /// Accept `name` as a stage during detection.
    pub fn with_custom_stage(mut self, name: impl Into<String>) -> Self {
        self.custom_stages.push(name.into());
        self
    }

    pub fn build(self) -> Result<Config> {
        let mut sources = self.sources;
        for provider in &self.providers {
            sources.extend(provider.config_sources()?);
        }

        let application = match self.application {
            Some(name) => name,
            None => application_name(&sources),
        };

        let config = Config::from_parts(application, self.custom_stages);
        config.add_config_sources(sources);
        for filter in self.filters {
            config.add_config_filter(filter);
        }
        if let Some(stage) = self.stage {
            config.set_project_stage(stage);
        }

        tracing::debug!(application = %config.application(), sources = config.config_sources().len(), "Built configuration");
        if config.property_value(CONFIG_LOG_KEY).is_some_and(|v| parse_bool(&v)) {
            config.log_config();
        }

        Ok(config)
    }
}

fn application_name(sources: &[Arc<dyn ConfigSource>]) -> String {
    let mut sorted: Vec<&Arc<dyn ConfigSource>> = sources.iter().collect();
    sorted.sort_by(|a, b| compare_sources(a.as_ref(), b.as_ref()));
    sorted
        .iter()
        .find_map(|source| source.property_value(APPLICATION_NAME_KEY))
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_APPLICATION.to_string())
}
