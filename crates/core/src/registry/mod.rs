//! Veteran registry: a flat list of personal records with integer ids.

/// JSON persistence for the registry file.
pub mod store;

use thiserror::Error;

use crate::models::Veteran;

pub use store::{load_veterans, save_veterans, VeteranLoad};

/// Raw operator input that failed type conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A numeric field received something that is not an integer.
    #[error("{field} must be a whole number, got `{value}`")]
    InvalidNumber {
        /// Name of the field being parsed.
        field: &'static str,
        /// The rejected input, trimmed.
        value: String,
    },
}

/// Errors raised by registry mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No veteran carries the requested id.
    #[error("no veteran with id {0}")]
    NotFound(u64),
    /// The highest stored id is already `u64::MAX`.
    #[error("no veteran id left after {0}")]
    IdsExhausted(u64),
}

/// Parse an integer field from operator input.
pub fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    raw: &str,
) -> Result<T, InputError> {
    let value = raw.trim();
    value.parse().map_err(|_| InputError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Fields of a veteran about to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVeteran {
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: i64,
    /// Status label.
    pub status: String,
    /// Region of residence.
    pub region: String,
}

/// Replacement values for an edit. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VeteranEdit {
    /// New name.
    pub name: Option<String>,
    /// New age.
    pub age: Option<i64>,
    /// New status.
    pub status: Option<String>,
    /// New region.
    pub region: Option<String>,
}

impl VeteranEdit {
    /// Build from raw prompt answers. Blank answers keep the current value.
    ///
    /// Every answer is parsed before anything is applied, so a bad age
    /// rejects the whole edit.
    pub fn parse(name: &str, age: &str, status: &str, region: &str) -> Result<Self, InputError> {
        let age = match age.trim() {
            "" => None,
            value => Some(parse_number("age", value)?),
        };
        Ok(Self {
            name: non_blank(name),
            age,
            status: non_blank(status),
            region: non_blank(region),
        })
    }

    fn apply(self, veteran: &mut Veteran) {
        if let Some(name) = self.name {
            veteran.name = name;
        }
        if let Some(age) = self.age {
            veteran.age = age;
        }
        if let Some(status) = self.status {
            veteran.status = status;
        }
        if let Some(region) = self.region {
            veteran.region = region;
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// In-memory registry in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    veterans: Vec<Veteran>,
}

impl Registry {
    /// Wrap records loaded from disk.
    pub fn new(veterans: Vec<Veteran>) -> Self {
        Self { veterans }
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[Veteran] {
        &self.veterans
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.veterans.len()
    }

    /// True when nobody is registered.
    pub fn is_empty(&self) -> bool {
        self.veterans.is_empty()
    }

    /// Record with the given id.
    pub fn get(&self, veteran_id: u64) -> Option<&Veteran> {
        self.veterans.iter().find(|veteran| veteran.veteran_id == veteran_id)
    }

    /// Id the next registered veteran will receive. Ids of deleted records are not reused
    /// unless they were the highest.
    pub fn next_id(&self) -> Result<u64, RegistryError> {
        let highest = self
            .veterans
            .iter()
            .map(|veteran| veteran.veteran_id)
            .max()
            .unwrap_or(0);
        highest
            .checked_add(1)
            .ok_or(RegistryError::IdsExhausted(highest))
    }

    /// Register a veteran and return the stored record.
    pub fn add(&mut self, new: NewVeteran) -> Result<&Veteran, RegistryError> {
        let veteran = Veteran {
            veteran_id: self.next_id()?,
            name: new.name,
            age: new.age,
            status: new.status,
            region: new.region,
        };
        let index = self.veterans.len();
        self.veterans.push(veteran);
        Ok(&self.veterans[index])
    }

    /// Records whose region equals `region`, ignoring case and surrounding whitespace.
    pub fn find_by_region(&self, region: &str) -> Vec<&Veteran> {
        let needle = region.trim().to_lowercase();
        self.filter(|veteran| veteran.region.to_lowercase() == needle)
    }

    /// Records whose name contains `name`, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Vec<&Veteran> {
        let needle = name.trim().to_lowercase();
        self.filter(|veteran| veteran.name.to_lowercase().contains(&needle))
    }

    /// Records whose status equals `status`, ignoring case.
    pub fn find_by_status(&self, status: &str) -> Vec<&Veteran> {
        let needle = status.trim().to_lowercase();
        self.filter(|veteran| veteran.status.to_lowercase() == needle)
    }

    /// Records with `min_age <= age <= max_age`.
    pub fn filter_by_age(&self, min_age: i64, max_age: i64) -> Vec<&Veteran> {
        self.filter(|veteran| (min_age..=max_age).contains(&veteran.age))
    }

    /// Remove the record with `veteran_id`. Returns whether anything was removed.
    pub fn delete(&mut self, veteran_id: u64) -> bool {
        let before = self.veterans.len();
        self.veterans.retain(|veteran| veteran.veteran_id != veteran_id);
        self.veterans.len() < before
    }

    /// Apply `edit` to the record with `veteran_id`.
    pub fn edit(
        &mut self,
        veteran_id: u64,
        edit: VeteranEdit,
    ) -> Result<&Veteran, RegistryError> {
        let veteran = self
            .veterans
            .iter_mut()
            .find(|veteran| veteran.veteran_id == veteran_id)
            .ok_or(RegistryError::NotFound(veteran_id))?;
        edit.apply(veteran);
        Ok(veteran)
    }

    fn filter(&self, predicate: impl Fn(&Veteran) -> bool) -> Vec<&Veteran> {
        self.veterans
            .iter()
            .filter(|veteran| predicate(veteran))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STATUS_LABELS;

    fn new_veteran(name: &str, age: i64, status: &str, region: &str) -> NewVeteran {
        NewVeteran {
            name: name.to_string(),
            age,
            status: status.to_string(),
            region: region.to_string(),
        }
    }

    fn sample_registry() -> Registry {
        let mut registry = Registry::default();
        for (name, age, status, region) in [
            ("Іван Петренко", 34, "УБД", "Київ"),
            ("Марія Коваль", 41, "учасник війни", "Львів"),
            ("Петро Іваненко", 29, "демобілізований", "київ"),
        ] {
            registry
                .add(new_veteran(name, age, status, region))
                .expect("ids available");
        }
        registry
    }

    fn ids(found: &[&Veteran]) -> Vec<u64> {
        found.iter().map(|veteran| veteran.veteran_id).collect()
    }

    #[test]
    fn ids_are_max_plus_one_and_not_reused() -> Result<(), RegistryError> {
        let mut registry = sample_registry();
        assert_eq!(ids(&registry.list().iter().collect::<Vec<_>>()), vec![1, 2, 3]);

        assert!(registry.delete(2));
        let added = registry.add(new_veteran("Олег", 50, "УБД", "Одеса"))?;
        assert_eq!(added.veteran_id, 4);

        assert!(registry.delete(4));
        assert!(registry.delete(3));
        assert_eq!(registry.next_id(), Ok(2));
        Ok(())
    }

    #[test]
    fn highest_possible_id_blocks_further_adds() {
        let mut registry = Registry::new(vec![Veteran {
            veteran_id: u64::MAX,
            name: "Іван".to_string(),
            age: 30,
            status: "УБД".to_string(),
            region: "Київ".to_string(),
        }]);

        assert_eq!(registry.next_id(), Err(RegistryError::IdsExhausted(u64::MAX)));
        assert_eq!(
            registry.add(new_veteran("Олег", 50, "УБД", "Одеса")),
            Err(RegistryError::IdsExhausted(u64::MAX))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn delete_unknown_id_is_a_no_op() {
        let mut registry = sample_registry();
        assert!(!registry.delete(42));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn finds_by_region_status_and_name() {
        let registry = sample_registry();
        assert_eq!(ids(&registry.find_by_region("  КИЇВ ")), vec![1, 3]);
        assert_eq!(ids(&registry.find_by_status("убд")), vec![1]);
        assert_eq!(ids(&registry.find_by_name("іван")), vec![1, 3]);
        assert!(registry.find_by_region("Ки").is_empty());
        assert!(registry.find_by_status(STATUS_LABELS[3]).is_empty());
    }

    #[test]
    fn age_filter_bounds_are_inclusive() {
        let registry = sample_registry();
        assert_eq!(ids(&registry.filter_by_age(29, 34)), vec![1, 3]);
        assert_eq!(ids(&registry.filter_by_age(30, 41)), vec![1, 2]);
        assert!(registry.filter_by_age(42, 100).is_empty());
    }

    #[test]
    fn numbers_must_parse_as_integers() {
        let err = parse_number::<i64>("age", " тридцять ").expect_err("bad age");
        assert_eq!(
            err,
            InputError::InvalidNumber {
                field: "age",
                value: "тридцять".to_string()
            }
        );
        assert_eq!(parse_number::<i64>("age", " 30 "), Ok(30));
        assert!(parse_number::<u64>("id", "-1").is_err());
    }

    #[test]
    fn blank_edit_leaves_record_unchanged() -> Result<(), RegistryError> {
        let mut registry = sample_registry();
        let before = registry.get(2).cloned();

        let edit = VeteranEdit::parse("", "  ", "", "").expect("blank edit parses");
        assert_eq!(edit, VeteranEdit::default());
        registry.edit(2, edit)?;
        assert_eq!(registry.get(2).cloned(), before);
        Ok(())
    }

    #[test]
    fn edit_replaces_only_provided_fields() -> Result<(), RegistryError> {
        let mut registry = sample_registry();
        let edit = VeteranEdit::parse("", "42", "", "Харків").expect("valid edit");
        let updated = registry.edit(2, edit)?;
        assert_eq!(updated.name, "Марія Коваль");
        assert_eq!(updated.age, 42);
        assert_eq!(updated.status, "учасник війни");
        assert_eq!(updated.region, "Харків");
        Ok(())
    }

    #[test]
    fn bad_age_rejects_whole_edit() {
        assert!(VeteranEdit::parse("Нове ім'я", "abc", "УБД", "Суми").is_err());
    }

    #[test]
    fn edit_unknown_id_reports_not_found() {
        let mut registry = sample_registry();
        assert_eq!(
            registry.edit(9, VeteranEdit::default()),
            Err(RegistryError::NotFound(9))
        );
    }
}
