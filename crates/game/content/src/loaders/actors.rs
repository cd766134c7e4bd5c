//! Actor template catalog loader.
//!
//! Loads enemy and tower templates from a RON list. Template names are the
//! catalog keys and must be unique.

use std::collections::BTreeMap;
use std::path::Path;

use defense_core::{ActorTemplate, EngineConfig};

use crate::loaders::{LoadResult, read_file};

/// Templates keyed by name, in name order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, ActorTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template, refusing duplicate or empty names.
    pub fn insert(&mut self, template: ActorTemplate) -> LoadResult<()> {
        if template.name.trim().is_empty() {
            anyhow::bail!("actor template without a name");
        }
        if template.on_death.len() > EngineConfig::MAX_DEATH_HOOKS {
            anyhow::bail!(
                "actor template '{}' declares {} death hooks (max {})",
                template.name,
                template.on_death.len(),
                EngineConfig::MAX_DEATH_HOOKS
            );
        }
        if self.templates.contains_key(&template.name) {
            anyhow::bail!("duplicate actor template '{}'", template.name);
        }
        self.templates.insert(template.name.clone(), template);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ActorTemplate> {
        self.templates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActorTemplate> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Loader for actor templates from RON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load a template catalog from a RON file.
    ///
    /// RON format: `Vec<ActorTemplate>`. Omitted fields take the template
    /// defaults.
    ///
    /// ```ron
    /// [
    ///     (name: "goblin", max_hp: 120, bounty: 5, immunities: ["poisonresist"]),
    ///     (name: "frost_tower", kind: tower, max_hp: 1),
    /// ]
    /// ```
    pub fn load(path: &Path) -> LoadResult<TemplateCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load actor templates {}: {}", path.display(), e))
    }

    /// Parse a template catalog from RON text.
    pub fn parse(content: &str) -> LoadResult<TemplateCatalog> {
        let raw: Vec<ActorTemplate> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actor template RON: {}", e))?;

        let mut catalog = TemplateCatalog::new();
        for template in raw {
            if template.max_hp < 1 {
                tracing::warn!(
                    name = %template.name,
                    max_hp = template.max_hp,
                    "template max_hp below 1; spawns will clamp it"
                );
            }
            catalog.insert(template)?;
        }
        tracing::debug!(count = catalog.len(), "actor templates loaded");
        Ok(catalog)
    }
}
