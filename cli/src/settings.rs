//! Layered CLI configuration.
//!
//! `defaults/mdkit.default.toml` is embedded in the binary. An optional
//! `mdkit.toml` in the working directory and an explicit `--config` file
//! are layered on top, then individual flags as overrides.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use mdkit::{ConvertOptions, ExportOptions, SyncOptions};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/mdkit.default.toml");

/// Name of the configuration file picked up from the working directory.
pub const LOCAL_CONFIG: &str = "mdkit.toml";

/// Everything the CLI can be configured with.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub convert: ConvertOptions,
    pub export: ExportOptions,
    pub sync: SyncOptions,
    pub stats: StatsSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsSettings {
    pub words_per_minute: usize,
}

/// Layers configuration sources over the built-in defaults.
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

    /// Apply a single key/value override from a command-line flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting settings.
    pub fn build(self) -> Result<Settings, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Layers the local file if present and an explicit file if given.
pub fn loader(explicit: Option<&Path>) -> Loader {
    let loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    match explicit {
        Some(path) => loader.with_file(path),
        None => loader,
    }
}
