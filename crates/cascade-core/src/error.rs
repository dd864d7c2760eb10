//! Error types for cascade-core

/// Result type for cascade-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while assembling or resolving configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An empty string was given as a typed default
    #[error("Empty string default for key '{key}' is not allowed")]
    EmptyStringDefault { key: String },

    /// A configured value could not be converted to the requested type
    #[error("Cannot convert value '{value}' of key '{key}': {message}")]
    Conversion {
        key: String,
        value: String,
        message: String,
    },

    /// A command line override was not of the form `key=value`
    #[error("Invalid override '{argument}', expected key=value")]
    InvalidOverride { argument: String },

    /// A config source could not be loaded
    #[error("Failed to load config source {name}: {message}")]
    SourceLoad { name: String, message: String },

    /// A snapshot could not be taken without a concurrent change
    #[error("Configuration kept changing while taking a snapshot ({attempts} attempts)")]
    SnapshotUnstable { attempts: usize },

    /// A resolver was queried against a snapshot it is not part of
    #[error("Resolver for key '{key}' is not part of this snapshot")]
    NotInSnapshot { key: String },

    /// No configuration is registered for an application
    #[error("No configuration registered for application '{name}'")]
    UnknownApplication { name: String },

    /// A project stage name is neither built in nor registered
    #[error("Unknown project stage: {name}")]
    UnknownProjectStage { name: String },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from cascade-fs
    #[error(transparent)]
    Fs(#[from] cascade_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
