use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde_json::Value;
use tracing::{error, info};

use crate::{
    models::{DecodeError, Resource},
    store::{self, LoadReport, CATALOG_INDENT},
};

use super::{Catalog, Category};

/// Result of loading one category file.
pub type ResourceLoad = LoadReport<Resource, DecodeError>;

/// Load resources from `path`.
///
/// Missing files load as empty, unreadable files load as empty with the
/// failure recorded, and records that fail to decode are skipped.
pub fn load_resources(path: impl AsRef<Path>) -> ResourceLoad {
    store::load_array(path, Resource::from_mapping)
}

/// Write `resources` to `path` as a tagged JSON array.
pub fn save_resources(resources: &[Resource], path: impl AsRef<Path>) -> Result<()> {
    let records: Vec<Value> = resources
        .iter()
        .map(|resource| Value::Object(resource.to_mapping()))
        .collect();
    store::write_array(path, &records, CATALOG_INDENT)
}

/// Maps catalog categories onto files beneath a data directory.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    root: PathBuf,
}

impl CatalogStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Data directory holding the category files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `category`.
    pub fn path(&self, category: Category) -> PathBuf {
        self.root.join(category.file_name())
    }

    /// Load every category. Each file is independent: a broken file only empties its own category.
    pub fn load_all(&self) -> (Catalog, Vec<(Category, ResourceLoad)>) {
        let mut catalog = Catalog::new();
        let mut reports = Vec::with_capacity(Category::ALL.len());
        for category in Category::ALL {
            let mut report = load_resources(self.path(category));
            info!(
                category = category.key(),
                count = report.records.len(),
                "category loaded"
            );
            catalog.set_resources(category, std::mem::take(&mut report.records));
            reports.push((category, report));
        }
        (catalog, reports)
    }

    /// Save every category and return the outcome of each write, in category order.
    pub fn save_each(&self, catalog: &Catalog) -> Vec<(Category, Result<()>)> {
        Category::ALL
            .into_iter()
            .map(|category| {
                let resources = catalog.resources(category);
                let outcome = save_resources(resources, self.path(category));
                match &outcome {
                    Ok(()) => info!(
                        category = category.key(),
                        count = resources.len(),
                        "category saved"
                    ),
                    Err(err) => {
                        error!(category = category.key(), "failed to save category: {err:#}")
                    }
                }
                (category, outcome)
            })
            .collect()
    }

    /// Save every category, attempting all of them before reporting failures.
    pub fn save_all(&self, catalog: &Catalog) -> Result<()> {
        let failed: Vec<&str> = self
            .save_each(catalog)
            .into_iter()
            .filter(|(_, outcome)| outcome.is_err())
            .map(|(category, _)| category.key())
            .collect();

        if failed.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("failed to save {}", failed.join(", ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        resource::tests::sample_job, EducationProgram, PsychologistContact, ResourceKind,
    };
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn partial_load_skips_record_without_type() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("jobs.json");
        let contents = json!([
            {
                "type": "JobPosting",
                "title": "Driver",
                "description": "Deliveries",
                "contact": "hr@acme.test",
                "company": "Acme",
                "requirements": ["licence"]
            },
            { "title": "Orphan" }
        ]);
        fs::write(&path, serde_json::to_string(&contents)?)?;

        let report = load_resources(&path);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].title(), "Driver");
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].error, DecodeError::MissingType);
        assert!(report.failure.is_none());
        Ok(())
    }

    #[test]
    fn reads_hand_written_catalog_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("psychologists.json");
        fs::write(
            &path,
            r#"[
    {
        "type": "PsychologistContact",
        "title": "Олена",
        "description": "ПТСР",
        "contact": "olena@example.com",
        "name": "Олена",
        "specialization": "ПТСР",
        "schedule": "Пн-Пт"
    },
    {
        "type": "Webinar",
        "title": "Unknown"
    }
]"#,
        )?;

        let report = load_resources(&path);
        assert_eq!(
            report.records,
            vec![Resource::PsychologistContact(PsychologistContact {
                name: "Олена".to_string(),
                specialization: "ПТСР".to_string(),
                contact: "olena@example.com".to_string(),
                schedule: "Пн-Пт".to_string(),
            })]
        );
        assert_eq!(
            report.skipped[0].error,
            DecodeError::UnknownType("Webinar".to_string())
        );
        Ok(())
    }

    #[test]
    fn saving_twice_is_byte_identical() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("jobs.json");
        let resources = vec![sample_job("Водій", "Acme"), sample_job("Кухар", "Bistro")];

        save_resources(&resources, &path)?;
        let first = fs::read_to_string(&path)?;
        save_resources(&resources, &path)?;
        let second = fs::read_to_string(&path)?;
        assert_eq!(first, second);
        assert!(first.contains("\"title\": \"Водій\""));
        assert!(first.starts_with("[\n    {\n        \"type\": \"JobPosting\""));

        assert_eq!(load_resources(&path).records, resources);
        Ok(())
    }

    #[test]
    fn save_all_then_load_all_restores_every_category() -> Result<()> {
        let dir = tempdir()?;
        let store = CatalogStore::new(dir.path().join("data"));

        let mut catalog = Catalog::new();
        catalog.add(sample_job("Водій", "Acme"))?;
        catalog.add(
            EducationProgram {
                name: "Курс".to_string(),
                institution: "КПІ".to_string(),
                duration: "3 місяці".to_string(),
                description: "Опис".to_string(),
                contact: "edu@example.com".to_string(),
            }
            .into(),
        )?;
        store.save_all(&catalog)?;

        for category in Category::ALL {
            assert!(store.path(category).is_file(), "{category} not written");
        }

        let (loaded, reports) = store.load_all();
        assert_eq!(loaded, catalog);
        assert_eq!(reports.len(), 5);
        assert!(reports.iter().all(|(_, report)| report.failure.is_none()));
        assert_eq!(
            loaded.resources(Category::Education)[0].kind(),
            ResourceKind::EducationProgram
        );
        Ok(())
    }

    #[test]
    fn failed_category_does_not_stop_the_others() -> Result<()> {
        let dir = tempdir()?;
        let store = CatalogStore::new(dir.path());
        fs::create_dir(store.path(Category::Jobs))?;
        let mut catalog = Catalog::new();
        catalog.add(sample_job("Водій", "Acme"))?;

        let err = store.save_all(&catalog).expect_err("jobs.json is a directory");
        assert_eq!(err.to_string(), "failed to save jobs");
        for category in &Category::ALL[1..] {
            assert_eq!(fs::read_to_string(store.path(*category))?, "[]");
        }

        let outcomes = store.save_each(&catalog);
        assert_eq!(outcomes.len(), 5);
        assert!(outcomes[0].1.is_err());
        assert!(outcomes[1..].iter().all(|(_, outcome)| outcome.is_ok()));
        Ok(())
    }

    #[test]
    fn broken_file_only_empties_its_category() -> Result<()> {
        let dir = tempdir()?;
        let store = CatalogStore::new(dir.path());
        let mut catalog = Catalog::new();
        catalog.add(sample_job("Водій", "Acme"))?;
        store.save_all(&catalog)?;
        fs::write(store.path(Category::SocialGroups), "not json")?;

        let (loaded, reports) = store.load_all();
        assert_eq!(loaded.resources(Category::Jobs).len(), 1);
        let (_, social) = reports
            .iter()
            .find(|(category, _)| *category == Category::SocialGroups)
            .expect("social groups report");
        assert!(social.failure.is_some());
        assert!(social.quarantined.is_some());
        Ok(())
    }
}
