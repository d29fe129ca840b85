//! Shared configuration loader for bython.
//!
//! `defaults/bython.default.toml` is embedded into the binary so that the documented
//! defaults and runtime behavior stay in sync. Applications layer a project or user file and
//! command-line overrides on top of those defaults via [`Loader`] before deserializing into
//! [`BythonConfig`].

use bython_parser::TranslationConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/bython.default.toml");

/// Project configuration picked up from the working directory.
pub const PROJECT_CONFIG_FILE: &str = "bython.toml";

/// Top-level configuration consumed by bython applications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BythonConfig {
    pub translation: TranslationConfig,
    pub output: OutputConfig,
}

/// What the driver does around each translation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub follow_imports: bool,
    pub message_format: MessageFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageFormat {
    Human,
    Json,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize the resulting configuration and check that the
    /// engine accepts it.
    pub fn build(self) -> Result<BythonConfig, ConfigError> {
        let config: BythonConfig = self.builder.build()?.try_deserialize()?;
        config
            .translation
            .validate()
            .map_err(|err| ConfigError::Message(err.to_string()))?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BythonConfig, ConfigError> {
    Loader::new().build()
}
