//! Format-agnostic loading of config files into flat key/value maps

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{Error, NormalizedPath, Result, io, properties};

/// Controls how nested documents are flattened into dotted keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Emit list elements as `key[0]`, `key[1]`, ... instead of joining
    /// scalar lists into one comma separated value.
    pub indexed: bool,
}

/// Format-agnostic configuration store.
///
/// Detects the format from the file extension and turns the document
/// into the flat `key -> value` shape every config source works with.
#[derive(Debug, Default)]
pub struct ConfigStore {
    options: FlattenOptions,
}

impl ConfigStore {
    /// Create a new ConfigStore with default flattening.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new ConfigStore with custom flattening options.
    pub fn with_options(options: FlattenOptions) -> Self {
        Self { options }
    }

    /// Load a config file as a flat map.
    ///
    /// Format is detected from file extension:
    /// - `.properties` -> properties
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load_flat(&self, path: &NormalizedPath) -> Result<BTreeMap<String, String>> {
        let extension = path.extension().unwrap_or("").to_lowercase();
        if extension == "properties" {
            return properties::load_properties(path);
        }

        let content = io::read_text(path)?;
        let document = self.parse_document(path, &extension, &content)?;
        tracing::debug!(%path, format = %extension, "Flattening structured config");
        Ok(flatten_value(&document, self.options))
    }

    fn parse_document(&self, path: &NormalizedPath, extension: &str, content: &str) -> Result<Value> {
        match extension {
            "toml" => toml::from_str(content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "TOML".into(),
                message: e.to_string(),
            }),
            "json" => serde_json::from_str(content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                format: "JSON".into(),
                message: e.to_string(),
            }),
            "yaml" | "yml" => {
                if content.trim().is_empty() {
                    return Ok(Value::Object(Default::default()));
                }
                let value: Value = serde_yaml::from_str(content).map_err(|e| Error::ConfigParse {
                    path: path.to_native(),
                    format: "YAML".into(),
                    message: e.to_string(),
                })?;
                Ok(if value.is_null() { Value::Object(Default::default()) } else { value })
            }
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }
}

/// Flatten a nested document into dotted keys.
///
/// Nulls are dropped. Scalar lists are joined with `,` (commas inside
/// elements are escaped with a backslash) unless `options.indexed` is set;
/// lists containing objects are always indexed.
pub fn flatten_value(value: &Value, options: FlattenOptions) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    flatten_into(&mut flat, "", value, options);
    flat
}

fn flatten_into(flat: &mut BTreeMap<String, String>, prefix: &str, value: &Value, options: FlattenOptions) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_into(flat, &path, child, options);
            }
        }
        Value::Array(items) => {
            let all_scalars = items.iter().all(|item| !item.is_object() && !item.is_array());
            if options.indexed || !all_scalars {
                for (idx, item) in items.iter().enumerate() {
                    flatten_into(flat, &format!("{prefix}[{idx}]"), item, options);
                }
            } else {
                let joined = items
                    .iter()
                    .filter_map(scalar_to_string)
                    .map(|s| s.replace('\\', "\\\\").replace(',', "\\,"))
                    .collect::<Vec<_>>()
                    .join(",");
                flat.insert(prefix.to_string(), joined);
            }
        }
        scalar => {
            if let Some(s) = scalar_to_string(scalar) {
                flat.insert(prefix.to_string(), s);
            }
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn nested_objects_become_dotted_keys() {
        let flat = flatten_value(
            &json!({"db": {"url": "jdbc:h2", "pool": {"size": 5}}, "debug": true}),
            FlattenOptions::default(),
        );
        assert_eq!(flat["db.url"], "jdbc:h2");
        assert_eq!(flat["db.pool.size"], "5");
        assert_eq!(flat["debug"], "true");
    }

    #[test]
    fn scalar_lists_join_with_escaped_commas() {
        let flat = flatten_value(&json!({"hosts": ["a", "b,c", 3]}), FlattenOptions::default());
        assert_eq!(flat["hosts"], "a,b\\,c,3");
    }

    #[test]
    fn indexed_lists_use_brackets() {
        let flat = flatten_value(
            &json!({"hosts": ["a", "b"]}),
            FlattenOptions { indexed: true },
        );
        assert_eq!(flat["hosts[0]"], "a");
        assert_eq!(flat["hosts[1]"], "b");
        assert!(!flat.contains_key("hosts"));
    }

    #[test]
    fn lists_of_objects_are_always_indexed() {
        let flat = flatten_value(
            &json!({"servers": [{"name": "a"}, {"name": "b"}]}),
            FlattenOptions::default(),
        );
        assert_eq!(flat["servers[0].name"], "a");
        assert_eq!(flat["servers[1].name"], "b");
    }

    #[test]
    fn nulls_are_dropped() {
        let flat = flatten_value(&json!({"a": null, "b": "x"}), FlattenOptions::default());
        assert_eq!(flat.len(), 1);
    }
}
