//! Engine configuration loader.

use std::path::Path;

use defense_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys left out keep their defaults, so an empty file yields
    /// [`EngineConfig::default`].
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &EngineConfig) -> LoadResult<()> {
        if config.sturdy_duration_percent > 100 {
            anyhow::bail!(
                "sturdy_duration_percent must be at most 100, got {}",
                config.sturdy_duration_percent
            );
        }
        for (key, value) in [
            ("resist_ratio", config.resist_ratio),
            ("vamp_ratio", config.vamp_ratio),
            ("transcendent_range_bonus", config.transcendent_range_bonus),
        ] {
            if !value.is_finite() || value < 0.0 {
                anyhow::bail!("{key} must be a finite, non-negative number, got {value}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        assert_eq!(ConfigLoader::parse("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn overrides_individual_knobs() {
        let config = ConfigLoader::parse(
            r#"
            sturdy_duration_percent = 25
            vamp_ratio = 0.75
            "#,
        )
        .unwrap();
        assert_eq!(config.sturdy_duration_percent, 25);
        assert_eq!(config.vamp_ratio, 0.75);
        assert_eq!(config.resist_ratio, EngineConfig::DEFAULT_RESIST_RATIO);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(ConfigLoader::parse("sturdy_duration_percent = 150").is_err());
        assert!(ConfigLoader::parse("resist_ratio = -0.5").is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::load(&dir.path().join("config.toml")).is_err());
    }
}
