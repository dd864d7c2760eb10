use std::path::{Path, PathBuf};
use std::sync::Arc;

use cascade_fs::{ConfigFile, NormalizedPath};

use super::{
    ArgsConfigSource, ConfigSource, ConfigSourceProvider, DirectoryConfigSource,
    EnvironmentConfigSource, PropertyFileConfigSource, StructuredFileConfigSource,
};
use crate::{Error, Result};

/// A property or structured file registered by the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyFileConfig {
    /// Absolute path, or a name looked up under every search root.
    pub file_name: String,
    /// When false, failing to find or load the file is an error.
    pub optional: bool,
}

impl PropertyFileConfig {
    pub fn required(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            optional: false,
        }
    }

    pub fn optional(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            optional: true,
        }
    }
}

/// Inputs of the [`DefaultConfigSourceProvider`].
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// Directories scanned for `cascade.properties` and registered files.
    pub search_roots: Vec<PathBuf>,
    /// `key=value` overrides for the args source.
    pub overrides: Vec<String>,
    /// Directory of one file per key, if any.
    pub config_dir: Option<PathBuf>,
    /// Application registered files.
    pub property_files: Vec<PropertyFileConfig>,
    pub include_environment: bool,
    /// Home directory override; `None` uses the platform home directory.
    pub home_dir: Option<PathBuf>,
    pub include_user_home: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            search_roots: Vec::new(),
            overrides: Vec::new(),
            config_dir: None,
            property_files: Vec::new(),
            include_environment: true,
            home_dir: None,
            include_user_home: true,
        }
    }
}

/// Assembles the standard source set.
///
/// In order: command line overrides, the process environment, the config
/// directory, `~/.cascade/cascade.properties`, every `cascade.properties`
/// directly under a search root, and the registered property files.
#[derive(Debug, Clone, Default)]
pub struct DefaultConfigSourceProvider {
    options: SourceOptions,
}

impl DefaultConfigSourceProvider {
    pub fn new(options: SourceOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SourceOptions {
        &self.options
    }

    fn user_home_file(&self) -> Option<NormalizedPath> {
        if !self.options.include_user_home {
            return None;
        }
        let home = self.options.home_dir.clone().or_else(dirs::home_dir)?;
        Some(
            NormalizedPath::new(home)
                .join(ConfigFile::UserHomeDir.as_str())
                .join(ConfigFile::DefaultProperties.as_str()),
        )
    }

    /// Load a discovered file; failures are logged and skipped.
    fn load_discovered(&self, path: &NormalizedPath, sources: &mut Vec<Arc<dyn ConfigSource>>) {
        if !path.is_file() {
            return;
        }
        match load_file(path) {
            Ok(source) => {
                tracing::debug!(%path, "Discovered config file");
                sources.push(source);
            }
            Err(e) => tracing::warn!(%path, error = %e, "Skipping unreadable config file"),
        }
    }

    fn registered_paths(&self, file: &PropertyFileConfig) -> Vec<NormalizedPath> {
        let direct = Path::new(&file.file_name);
        if direct.is_absolute() {
            return vec![NormalizedPath::new(direct)];
        }
        self.options
            .search_roots
            .iter()
            .map(|root| NormalizedPath::new(root).join(&file.file_name))
            .filter(|path| path.is_file())
            .collect()
    }
}

impl ConfigSourceProvider for DefaultConfigSourceProvider {
    fn config_sources(&self) -> Result<Vec<Arc<dyn ConfigSource>>> {
        let mut sources: Vec<Arc<dyn ConfigSource>> = Vec::new();

        let args = ArgsConfigSource::parse(&self.options.overrides)?;
        if !args.is_empty() {
            sources.push(Arc::new(args));
        }

        if self.options.include_environment {
            sources.push(Arc::new(EnvironmentConfigSource::new()));
        }

        if let Some(dir) = &self.options.config_dir {
            sources.push(Arc::new(DirectoryConfigSource::load(dir.as_path())?));
        }

        if let Some(home_file) = self.user_home_file() {
            self.load_discovered(&home_file, &mut sources);
        }

        for root in &self.options.search_roots {
            let candidate = NormalizedPath::new(root).join(ConfigFile::DefaultProperties.as_str());
            self.load_discovered(&candidate, &mut sources);
        }

        for file in &self.options.property_files {
            let paths = self.registered_paths(file);
            if paths.is_empty() && !file.optional {
                return Err(Error::SourceLoad {
                    name: file.file_name.clone(),
                    message: "required property file not found".to_string(),
                });
            }
            for path in paths {
                match load_file(&path) {
                    Ok(source) => sources.push(source),
                    Err(e) if file.optional => {
                        tracing::warn!(%path, error = %e, "Skipping optional property file");
                    }
                    Err(e) => {
                        return Err(Error::SourceLoad {
                            name: path.to_string(),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::debug!(count = sources.len(), "Assembled default config sources");
        Ok(sources)
    }
}

/// Load a file source, choosing the parser from the extension.
pub(crate) fn load_file(path: &NormalizedPath) -> Result<Arc<dyn ConfigSource>> {
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("properties")) {
        Ok(Arc::new(PropertyFileConfigSource::load(path.clone())?))
    } else {
        Ok(Arc::new(StructuredFileConfigSource::load(path.clone())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn isolated(root: &Path) -> SourceOptions {
        SourceOptions {
            search_roots: vec![root.to_path_buf()],
            include_environment: false,
            include_user_home: false,
            ..SourceOptions::default()
        }
    }

    fn names(sources: &[Arc<dyn ConfigSource>]) -> Vec<String> {
        sources.iter().map(|s| s.config_name().to_string()).collect()
    }

    #[test]
    fn discovers_default_properties_under_roots() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("cascade.properties"), "a=1\n").unwrap();

        let sources = DefaultConfigSourceProvider::new(isolated(temp.path()))
            .config_sources()
            .unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].property_value("a").as_deref(), Some("1"));
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let mut options = isolated(temp.path());
        options.property_files.push(PropertyFileConfig::required("db.properties"));

        let err = DefaultConfigSourceProvider::new(options).config_sources().err().expect("expected an error");
        assert!(matches!(err, Error::SourceLoad { .. }));
    }

    #[test]
    fn missing_optional_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        let mut options = isolated(temp.path());
        options.property_files.push(PropertyFileConfig::optional("db.properties"));

        let sources = DefaultConfigSourceProvider::new(options).config_sources().unwrap();
        assert!(sources.is_empty());
    }

    #[test]
    fn unreadable_discovered_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("cascade.properties"), "bad=\\u12\n").unwrap();
        fs::write(temp.path().join("app.toml"), "x = 1\n").unwrap();
        let mut options = isolated(temp.path());
        options.property_files.push(PropertyFileConfig::required("app.toml"));
        options.overrides.push("o=1".into());

        let sources = DefaultConfigSourceProvider::new(options).config_sources().unwrap();
        let names = names(&sources);
        assert_eq!(names.len(), 2);
        assert_eq!(names[0], "args");
        assert!(names[1].starts_with("toml "));
    }

    #[test]
    fn user_home_file_is_loaded() {
        let home = TempDir::new().unwrap();
        fs::create_dir(home.path().join(".cascade")).unwrap();
        fs::write(home.path().join(".cascade/cascade.properties"), "who=me\n").unwrap();
        let options = SourceOptions {
            include_environment: false,
            home_dir: Some(home.path().to_path_buf()),
            ..SourceOptions::default()
        };

        let sources = DefaultConfigSourceProvider::new(options).config_sources().unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].property_value("who").as_deref(), Some("me"));
    }
}
