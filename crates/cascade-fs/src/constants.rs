//! Well-known file names and reserved keys.

use std::path::Path;

/// Reserved key inside a config file that overrides the ordinal of the
/// source built from that file.
pub const ORDINAL_KEY: &str = "config_ordinal";

/// Well-known configuration file locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile {
    /// The per-user directory below the home directory (`.cascade`)
    UserHomeDir,
    /// The default property file discovered under every search root
    DefaultProperties,
}

impl ConfigFile {
    /// Get the string representation of the path.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserHomeDir => ".cascade",
            Self::DefaultProperties => "cascade.properties",
        }
    }
}

impl AsRef<Path> for ConfigFile {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl std::fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
