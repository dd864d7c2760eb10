//! Read-only inspection of a configuration

use serde::Serialize;
use serde_json::Value;

use crate::Result;
use crate::config::Config;

/// One resolved entry as shown to operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    /// Stage-aware value, log-filtered.
    pub value: String,
    /// Highest source defining the raw key.
    pub from_config_source: String,
}

/// A source as listed in inspection output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub ordinal: i32,
    pub name: String,
}

/// Full inspection report.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub application: String,
    pub project_stage: String,
    pub sources: Vec<SourceInfo>,
    pub entries: Vec<ConfigEntry>,
}

/// Inspection view over a [`Config`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigInfo<'a> {
    config: &'a Config,
}

impl<'a> ConfigInfo<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn sources(&self) -> Vec<SourceInfo> {
        self.config
            .config_sources()
            .iter()
            .map(|source| SourceInfo {
                ordinal: source.ordinal(),
                name: source.config_name().to_string(),
            })
            .collect()
    }

    /// `"<ordinal> - <name>"` per source, in lookup order.
    pub fn config_sources_as_strings(&self) -> Vec<String> {
        self.sources()
            .into_iter()
            .map(|source| format!("{} - {}", source.ordinal, source.name))
            .collect()
    }

    /// Every key of all scannable sources, sorted.
    pub fn config_entries(&self) -> Vec<ConfigEntry> {
        let sources = self.config.config_sources();
        self.config
            .all_properties()
            .into_keys()
            .map(|key| {
                let value = self
                    .config
                    .project_stage_aware_property_value(&key)
                    .map(|value| self.config.filter_config_value(&key, &value, true))
                    .unwrap_or_default();
                let from_config_source = sources
                    .iter()
                    .find(|source| source.property_value(&key).is_some())
                    .map(|source| source.config_name().to_string())
                    .unwrap_or_default();
                ConfigEntry {
                    key,
                    value,
                    from_config_source,
                }
            })
            .collect()
    }

    /// `"<key> = <value> - picked up from: <source>"` per entry.
    pub fn config_entries_as_strings(&self) -> Vec<String> {
        self.config_entries()
            .into_iter()
            .map(|entry| {
                format!(
                    "{} = {} - picked up from: {}",
                    entry.key, entry.value, entry.from_config_source
                )
            })
            .collect()
    }

    pub fn report(&self) -> ConfigReport {
        ConfigReport {
            application: self.config.application().to_string(),
            project_stage: self.config.project_stage().to_string(),
            sources: self.sources(),
            entries: self.config_entries(),
        }
    }

    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self.report())?)
    }
}
