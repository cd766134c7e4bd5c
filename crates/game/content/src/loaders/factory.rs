//! Content factory for loading everything the engine needs from a data directory.

use std::path::{Path, PathBuf};

use defense_core::EngineConfig;

use crate::loaders::{ActorLoader, ConfigLoader, LoadResult, TemplateCatalog};

/// Content factory that loads all engine content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── actors.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "config.toml";
    pub const ACTORS_FILE: &'static str = "actors.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load engine configuration from `config.toml`.
    ///
    /// A missing file is not an error: the defaults are used instead. A file
    /// that exists but does not parse is.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(EngineConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load actor templates from `actors.ron`.
    pub fn load_templates(&self) -> LoadResult<TemplateCatalog> {
        let path = self.data_dir.join(Self::ACTORS_FILE);
        ActorLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
