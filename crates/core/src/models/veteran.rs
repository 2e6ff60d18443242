//! Veteran registry records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical status labels offered when registering a veteran. Not enforced.
pub const STATUS_LABELS: [&str; 5] = [
    "демобілізований",
    "учасник війни",
    "УБД",
    "інвалід внаслідок війни",
    "член сім'ї загиблого Захисника України",
];

/// A registered veteran. Field order matches the persisted JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Veteran {
    /// Unique identifier, assigned as the current maximum plus one.
    pub veteran_id: u64,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: i64,
    /// Free-form status, normally one of [`STATUS_LABELS`].
    pub status: String,
    /// Region of residence.
    pub region: String,
}

impl Veteran {
    /// Compact line used for search results.
    pub fn summary(&self) -> String {
        format!(
            "{}: {}, {} р. | {} | {}",
            self.veteran_id, self.name, self.age, self.status, self.region
        )
    }
}

impl fmt::Display for Veteran {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | {}, {} р. | {} | {}",
            self.veteran_id, self.name, self.age, self.status, self.region
        )
    }
}
