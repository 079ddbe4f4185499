//! Static datasets: language tree, migrations, cultures, territories, timeline
//!
//! The datasets are plain JSON shipped in `data/`. They are embedded in the
//! binary so the engines never depend on where the data came from; the same
//! file names can also be read from a directory at runtime.

pub mod culture;
pub mod language;
pub mod migration;
pub mod territory;
pub mod timeline;

pub use culture::{Culture, GeneticComponent, GeneticProfile};
pub use language::{LanguageNode, LanguageStatus};
pub use migration::MigrationRoute;
pub use territory::TerritoryTable;
pub use timeline::{EventCategory, Timeline, TimelineEvent};

use ahash::{AHashMap, AHashSet};
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::core::error::{AtlasError, Result};

/// Culture id -> id of the migration that produced it
pub type CultureDependencies = AHashMap<String, String>;

pub const LANGUAGE_TREE_FILE: &str = "language_tree.json";
pub const MIGRATIONS_FILE: &str = "migrations.json";
pub const CULTURES_FILE: &str = "cultures.json";
pub const TERRITORIES_FILE: &str = "territories.json";
pub const DEPENDENCIES_FILE: &str = "dependencies.json";
pub const TIMELINE_FILE: &str = "timeline.json";

const EMBEDDED_LANGUAGE_TREE: &str = include_str!("../../data/language_tree.json");
const EMBEDDED_MIGRATIONS: &str = include_str!("../../data/migrations.json");
const EMBEDDED_CULTURES: &str = include_str!("../../data/cultures.json");
const EMBEDDED_TERRITORIES: &str = include_str!("../../data/territories.json");
const EMBEDDED_DEPENDENCIES: &str = include_str!("../../data/dependencies.json");
const EMBEDDED_TIMELINE: &str = include_str!("../../data/timeline.json");

/// All static inputs of the atlas. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub language_tree: LanguageNode,
    pub migrations: Vec<MigrationRoute>,
    pub cultures: Vec<Culture>,
    pub territories: TerritoryTable,
    pub dependencies: CultureDependencies,
    pub timeline: Timeline,
}

/// Problems found by [`Dataset::validate`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Structural problems; rendering still degrades gracefully around them
    pub errors: Vec<String>,
    /// Tolerated irregularities
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

fn parse<T: DeserializeOwned>(content: &str) -> Result<T> {
    Ok(serde_json::from_str(content)?)
}

fn read<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<T> {
    let content = std::fs::read_to_string(dir.join(file))?;
    parse(&content)
}

impl Dataset {
    /// Datasets compiled into the binary
    pub fn embedded() -> Result<Self> {
        let dataset = Self {
            language_tree: parse(EMBEDDED_LANGUAGE_TREE)?,
            migrations: parse(EMBEDDED_MIGRATIONS)?,
            cultures: parse(EMBEDDED_CULTURES)?,
            territories: parse(EMBEDDED_TERRITORIES)?,
            dependencies: parse(EMBEDDED_DEPENDENCIES)?,
            timeline: Timeline::new(parse(EMBEDDED_TIMELINE)?),
        };
        dataset.log_summary("embedded");
        Ok(dataset)
    }

    /// Read the dataset files from a directory
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let dataset = Self {
            language_tree: read(dir, LANGUAGE_TREE_FILE)?,
            migrations: read(dir, MIGRATIONS_FILE)?,
            cultures: read(dir, CULTURES_FILE)?,
            territories: read(dir, TERRITORIES_FILE)?,
            dependencies: read(dir, DEPENDENCIES_FILE)?,
            timeline: Timeline::new(read(dir, TIMELINE_FILE)?),
        };
        dataset.log_summary(&dir.display().to_string());
        Ok(dataset)
    }

    fn log_summary(&self, source: &str) {
        tracing::info!(
            "Loaded dataset from {}: {} languages, {} migrations, {} cultures, {} territories, {} events",
            source,
            self.language_tree.count(),
            self.migrations.len(),
            self.cultures.len(),
            self.territories.len(),
            self.timeline.events().len()
        );
    }

    pub fn migration(&self, id: &str) -> Option<&MigrationRoute> {
        self.migrations.iter().find(|m| m.id == id)
    }

    pub fn culture(&self, id: &str) -> Option<&Culture> {
        self.cultures.iter().find(|c| c.id == id)
    }

    /// Migration gating a culture's visibility, if the culture has one and it exists
    pub fn producing_migration(&self, culture_id: &str) -> Option<&MigrationRoute> {
        self.dependencies
            .get(culture_id)
            .and_then(|migration_id| self.migration(migration_id))
    }

    /// Check identifiers and shapes. Never fails; see [`Dataset::validate_strict`].
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        let mut migration_ids = AHashSet::new();
        for route in &self.migrations {
            if !migration_ids.insert(route.id.as_str()) {
                report.errors.push(format!("duplicate migration id '{}'", route.id));
            }
            if route.path.len() < 2 {
                report.errors.push(format!(
                    "migration '{}' has {} waypoint(s), at least 2 required",
                    route.id,
                    route.path.len()
                ));
            }
            if route.end < route.start {
                report.warnings.push(format!(
                    "migration '{}' ends ({}) before it starts ({}); treated as complete",
                    route.id, route.end, route.start
                ));
            }
        }

        let mut culture_ids = AHashSet::new();
        for culture in &self.cultures {
            if !culture_ids.insert(culture.id.as_str()) {
                report.errors.push(format!("duplicate culture id '{}'", culture.id));
            }
            if culture.end < culture.start {
                report.warnings.push(format!(
                    "culture '{}' ends ({}) before it starts ({})",
                    culture.id, culture.end, culture.start
                ));
            }
            if self.territories.get(&culture.id).is_none() {
                report
                    .warnings
                    .push(format!("culture '{}' has no territory polygon", culture.id));
            }
        }

        let mut dependency_keys: Vec<_> = self.dependencies.iter().collect();
        dependency_keys.sort();
        for (culture_id, migration_id) in dependency_keys {
            if !culture_ids.contains(culture_id.as_str()) {
                report.errors.push(format!(
                    "dependency names unknown culture '{}'",
                    culture_id
                ));
            }
            if !migration_ids.contains(migration_id.as_str()) {
                report.warnings.push(format!(
                    "culture '{}' depends on unknown migration '{}'; shown by date only",
                    culture_id, migration_id
                ));
            }
        }

        let mut event_ids = AHashSet::new();
        for event in self.timeline.events() {
            if !event_ids.insert(event.id.as_str()) {
                report.errors.push(format!("duplicate timeline event id '{}'", event.id));
            }
        }

        for name in self.language_tree.duplicate_names() {
            report.warnings.push(format!(
                "language name '{}' appears more than once; transition identity is ambiguous",
                name
            ));
        }

        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }
        report
    }

    /// Like [`Dataset::validate`], but structural problems become an error
    pub fn validate_strict(&self) -> Result<ValidationReport> {
        let report = self.validate();
        if report.errors.is_empty() {
            Ok(report)
        } else {
            Err(AtlasError::InvalidDataset(report.errors.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_dataset_loads_and_validates() {
        let dataset = Dataset::embedded().unwrap();
        assert_eq!(dataset.language_tree.name, "Proto-Indo-European");
        assert_eq!(dataset.migrations.len(), 14);
        assert_eq!(dataset.cultures.len(), 11);
        let report = dataset.validate_strict().unwrap();
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_embedded_dependencies_resolve() {
        let dataset = Dataset::embedded().unwrap();
        let route = dataset.producing_migration("corded-ware").unwrap();
        assert_eq!(route.id, "yamnaya-europe");
        assert!(dataset.producing_migration("yamnaya").is_none());
    }

    #[test]
    fn test_unknown_dependency_is_warning() {
        let mut dataset = Dataset::embedded().unwrap();
        dataset
            .dependencies
            .insert("yamnaya".into(), "no-such-migration".into());
        let report = dataset.validate();
        assert!(report.errors.is_empty());
        assert!(report.warnings.iter().any(|w| w.contains("no-such-migration")));
    }

    #[test]
    fn test_short_route_is_error() {
        let mut dataset = Dataset::embedded().unwrap();
        dataset.migrations[0].path.truncate(1);
        assert!(matches!(
            dataset.validate_strict(),
            Err(AtlasError::InvalidDataset(_))
        ));
    }

    #[test]
    fn test_duplicate_culture_id_is_error() {
        let mut dataset = Dataset::embedded().unwrap();
        let mut copy = dataset.cultures[0].clone();
        let id = copy.id.clone();
        copy.name = "Shadow".into();
        dataset.cultures.push(copy);

        let report = dataset.validate();
        assert!(report.errors.iter().any(|e| e.contains(&id)));
        // Lookups keep resolving to the first record
        assert_ne!(dataset.culture(&id).unwrap().name, "Shadow");
    }
}
