//! Error types for i18n-sync
//!
//! Centralized error handling using snafu. Errors only travel below the
//! translation boundary; translating never fails.

use snafu::Snafu;

/// Main error type for the crate
#[derive(Debug, Snafu)]
pub enum Error {
    /// Invalid input or configuration
    #[snafu(display("Invalid: {message}"))]
    Invalid { message: String },

    /// IO error (file operations)
    #[snafu(display("IO error: {source}"))]
    Io { source: std::io::Error },

    /// JSON serialization/deserialization error
    #[snafu(display("JSON error: {source}"))]
    Json { source: serde_json::Error },

    /// TOML deserialization error
    #[snafu(display("TOML parse error: {source}"))]
    TomlDe { source: toml::de::Error },

    /// TOML serialization error
    #[snafu(display("TOML serialize error: {source}"))]
    TomlSe { source: toml::ser::Error },

    /// No resource file exists for a language/group pair
    #[snafu(display("Resource not found: {path}"))]
    ResourceNotFound { path: String },

    /// A resource file exists but is not a JSON object
    #[snafu(display("Invalid resource {path}: {message}"))]
    InvalidResource { path: String, message: String },

    /// A resource group name cannot be mapped to a file
    #[snafu(display("Invalid resource group: {group:?}"))]
    InvalidGroup { group: String },

    /// A language code outside the supported set
    #[snafu(display("Unsupported language: {code}"))]
    UnsupportedLanguage { code: String },
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { source }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::Json { source }
    }
}

impl From<toml::de::Error> for Error {
    fn from(source: toml::de::Error) -> Self {
        Error::TomlDe { source }
    }
}

impl From<toml::ser::Error> for Error {
    fn from(source: toml::ser::Error) -> Self {
        Error::TomlSe { source }
    }
}

/// Result type alias for convenience
pub type Result<T, E = Error> = std::result::Result<T, E>;
