//! Registry of one configuration per application

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::Config;
use crate::filter::ConfigFilter;
use crate::source::{ConfigSource, DefaultConfigSourceProvider, SourceOptions};
use crate::typed::TypedResolver;
use crate::{Error, Result};

/// Builds the [`Config`] of an application on first use.
pub type ConfigFactory = Arc<dyn Fn(&str) -> Result<Config> + Send + Sync>;

/// Application scoped configuration registry.
///
/// Each application name maps to exactly one [`Config`], created lazily by
/// the factory. Concurrent first lookups may both run the factory; only
/// one result is kept.
pub struct ConfigResolver {
    configs: DashMap<String, Config>,
    factory: ConfigFactory,
}

impl ConfigResolver {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&str) -> Result<Config> + Send + Sync + 'static,
    {
        Self {
            configs: DashMap::new(),
            factory: Arc::new(factory),
        }
    }

    /// Registry whose configs use the standard source set.
    pub fn with_default_sources(options: SourceOptions) -> Self {
        Self::new(move |application| {
            Config::builder()
                .with_application(application)
                .with_provider(DefaultConfigSourceProvider::new(options.clone()))
                .build()
        })
    }

    /// The config of `application`, building it on first use.
    pub fn config(&self, application: &str) -> Result<Config> {
        if let Some(config) = self.configs.get(application) {
            return Ok(config.clone());
        }

        let built = (self.factory)(application)?;
        tracing::debug!(application, "Created configuration");
        Ok(self
            .configs
            .entry(application.to_string())
            .or_insert(built)
            .clone())
    }

    /// The config of `application` if it was already built.
    pub fn existing(&self, application: &str) -> Result<Config> {
        self.configs
            .get(application)
            .map(|config| config.clone())
            .ok_or_else(|| Error::UnknownApplication {
                name: application.to_string(),
            })
    }

    pub fn add_config_sources(&self, application: &str, sources: Vec<Arc<dyn ConfigSource>>) -> Result<()> {
        self.config(application)?.add_config_sources(sources);
        Ok(())
    }

    pub fn add_config_filter(&self, application: &str, filter: Arc<dyn ConfigFilter>) -> Result<()> {
        self.config(application)?.add_config_filter(filter);
        Ok(())
    }

    pub fn resolve(&self, application: &str, key: &str) -> Result<TypedResolver<String>> {
        Ok(self.config(application)?.resolve(key))
    }

    /// Drop and close the config of `application`. Returns whether one
    /// was registered.
    pub fn release(&self, application: &str) -> bool {
        match self.configs.remove(application) {
            Some((_, config)) => {
                config.release();
                true
            }
            None => false,
        }
    }

    /// Names of all built configs, sorted.
    pub fn applications(&self) -> Vec<String> {
        let mut names: Vec<String> = self.configs.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for ConfigResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigResolver")
            .field("applications", &self.applications())
            .finish()
    }
}
