//! Resource catalog: five categories of veteran-support resources.

/// Per-category JSON persistence.
pub mod store;

use std::fmt;

use thiserror::Error;

use crate::models::{Resource, ResourceKind};

pub use store::{load_resources, save_resources, CatalogStore, ResourceLoad};

/// A catalog category. New resources are routed by their kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Employment and careers.
    Jobs,
    /// Psychological support.
    Psychologists,
    /// Legal aid.
    LegalAid,
    /// Education and training.
    Education,
    /// Social adaptation.
    SocialGroups,
}

impl Category {
    /// All categories in menu order.
    pub const ALL: [Category; 5] = [
        Self::Jobs,
        Self::Psychologists,
        Self::LegalAid,
        Self::Education,
        Self::SocialGroups,
    ];

    /// Stable key used in logs.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Jobs => "jobs",
            Self::Psychologists => "psychologists",
            Self::LegalAid => "legal_aids",
            Self::Education => "education",
            Self::SocialGroups => "social_groups",
        }
    }

    /// File name under the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Jobs => "jobs.json",
            Self::Psychologists => "psychologists.json",
            Self::LegalAid => "legal_aids.json",
            Self::Education => "education.json",
            Self::SocialGroups => "social_groups.json",
        }
    }

    /// Heading shown to the operator.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Jobs => "Вакансії",
            Self::Psychologists => "Психологи",
            Self::LegalAid => "Юридична Допомога",
            Self::Education => "Освітні Програми",
            Self::SocialGroups => "Соціальні Групи",
        }
    }

    /// The resource kind stored in this category.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Jobs => ResourceKind::JobPosting,
            Self::Psychologists => ResourceKind::PsychologistContact,
            Self::LegalAid => ResourceKind::LegalAid,
            Self::Education => ResourceKind::EducationProgram,
            Self::SocialGroups => ResourceKind::SocialGroup,
        }
    }

    /// The category that stores `kind`.
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::JobPosting => Self::Jobs,
            ResourceKind::PsychologistContact => Self::Psychologists,
            ResourceKind::LegalAid => Self::LegalAid,
            ResourceKind::EducationProgram => Self::Education,
            ResourceKind::SocialGroup => Self::SocialGroups,
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Jobs => 0,
            Self::Psychologists => 1,
            Self::LegalAid => 2,
            Self::Education => 3,
            Self::SocialGroups => 4,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Errors raised by catalog mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A job with the same title and company is already listed.
    #[error("job posting `{title}` at `{company}` already exists")]
    DuplicateJob {
        /// Title of the rejected posting.
        title: String,
        /// Company of the rejected posting.
        company: String,
    },
}

/// In-memory catalog, one ordered collection per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    collections: [Vec<Resource>; 5],
}

impl Catalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every resource of `category` in insertion order.
    pub fn resources(&self, category: Category) -> &[Resource] {
        &self.collections[category.index()]
    }

    /// Total number of resources across all categories.
    pub fn len(&self) -> usize {
        self.collections.iter().map(Vec::len).sum()
    }

    /// True when no category holds anything.
    pub fn is_empty(&self) -> bool {
        self.collections.iter().all(Vec::is_empty)
    }

    /// Replace the contents of `category` with resources as loaded from its file.
    pub fn set_resources(&mut self, category: Category, resources: Vec<Resource>) {
        self.collections[category.index()] = resources;
    }

    /// Case-insensitive substring search over each resource's full text.
    pub fn search(&self, category: Category, keyword: &str) -> Vec<&Resource> {
        let needle = keyword.to_lowercase();
        self.resources(category)
            .iter()
            .filter(|resource| resource.to_text().to_lowercase().contains(&needle))
            .collect()
    }

    /// True if a job with this title and company (ignoring case) is already listed.
    pub fn has_job(&self, title: &str, company: &str) -> bool {
        let title = title.to_lowercase();
        let company = company.to_lowercase();
        self.resources(Category::Jobs).iter().any(|resource| match resource {
            Resource::JobPosting(job) => {
                job.title.to_lowercase() == title && job.company.to_lowercase() == company
            }
            _ => false,
        })
    }

    /// Append a resource to the category matching its kind.
    pub fn add(&mut self, resource: Resource) -> Result<Category, CatalogError> {
        if let Resource::JobPosting(job) = &resource {
            if self.has_job(&job.title, &job.company) {
                return Err(CatalogError::DuplicateJob {
                    title: job.title.clone(),
                    company: job.company.clone(),
                });
            }
        }

        let category = Category::for_kind(resource.kind());
        self.collections[category.index()].push(resource);
        Ok(category)
    }
}
