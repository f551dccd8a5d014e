//! Unit categories and catalog filtering
//!
//! A classifier splits a catalog by a fixed membership set. The standard set
//! is the air roster, so the primary partition is air units and the
//! secondary partition is ground units.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::catalog::{air_membership, Catalog, UnitRecord};
use crate::core::types::unit_key;

/// Which partition to keep when filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    /// Members of the classifier's set (air)
    PrimaryOnly,
    /// Everything else (ground)
    SecondaryOnly,
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "air" | "primary" => Ok(Self::PrimaryOnly),
            "ground" | "secondary" => Ok(Self::SecondaryOnly),
            other => Err(format!(
                "unknown category '{}' (expected all, air or ground)",
                other
            )),
        }
    }
}

/// Result of splitting a catalog
#[derive(Debug, Clone, Default)]
pub struct Partition<'a> {
    /// Entries whose name is in the membership set
    pub primary: Vec<&'a UnitRecord>,
    /// All other entries
    pub secondary: Vec<&'a UnitRecord>,
}

/// Splits units by membership in a fixed set of names
#[derive(Debug, Clone)]
pub struct Classifier {
    members: AHashSet<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::air()
    }
}

impl Classifier {
    /// Classifier over an arbitrary membership set (case-insensitive)
    pub fn new<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            members: members.into_iter().map(|m| unit_key(m.as_ref())).collect(),
        }
    }

    /// Air units are primary, ground units secondary
    pub fn air() -> Self {
        Self {
            members: air_membership(),
        }
    }

    pub fn is_primary(&self, name: &str) -> bool {
        self.members.contains(&unit_key(name))
    }

    /// Split `catalog` into members and non-members, keeping catalog order
    pub fn categorize<'a>(&self, catalog: &'a Catalog) -> Partition<'a> {
        let (primary, secondary): (Vec<&UnitRecord>, Vec<&UnitRecord>) =
            catalog.iter().partition(|r| self.is_primary(&r.name));
        Partition { primary, secondary }
    }

    /// Units matching both `search` and `category`
    ///
    /// Search is a case-insensitive substring match on the name; a blank
    /// term matches everything. The source catalog is left untouched.
    pub fn filter(&self, catalog: &Catalog, search: &str, category: CategoryFilter) -> Catalog {
        let needle = search.trim().to_lowercase();
        catalog.retain_view(|record| {
            matches_search(&record.name, &needle) && self.matches_category(&record.name, category)
        })
    }

    fn matches_category(&self, name: &str, category: CategoryFilter) -> bool {
        match category {
            CategoryFilter::All => true,
            CategoryFilter::PrimaryOnly => self.is_primary(name),
            CategoryFilter::SecondaryOnly => !self.is_primary(name),
        }
    }
}

/// `needle` must already be trimmed and lowercased
pub(crate) fn matches_search(name: &str, needle: &str) -> bool {
    needle.is_empty() || name.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::from_json_str(
            r#"{
                "Crawler": {}, "Wasp": {}, "Phoenix": {}, "Fang": {},
                "Phantom Ray": {}, "Fire Badger": {}
            }"#,
        )
        .unwrap()
    }

    fn names(records: &[&UnitRecord]) -> Vec<String> {
        records.iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_categorize_air_and_ground() {
        let catalog = sample();
        let partition = Classifier::air().categorize(&catalog);
        assert_eq!(names(&partition.primary), vec!["Wasp", "Phoenix", "Phantom Ray"]);
        assert_eq!(names(&partition.secondary), vec!["Crawler", "Fang", "Fire Badger"]);
    }

    #[test]
    fn test_categorize_custom_membership() {
        let catalog = sample();
        let partition = Classifier::new(["crawler", "FANG"]).categorize(&catalog);
        assert_eq!(names(&partition.primary), vec!["Crawler", "Fang"]);
        assert_eq!(partition.secondary.len(), 4);
    }

    #[test]
    fn test_filter_search_case_insensitive() {
        let catalog = sample();
        let filtered = Classifier::air().filter(&catalog, "PH", CategoryFilter::All);
        let found: Vec<_> = filtered.names().collect();
        assert_eq!(found, vec!["Phoenix", "Phantom Ray"]);
    }

    #[test]
    fn test_filter_blank_search_matches_all() {
        let catalog = sample();
        let filtered = Classifier::air().filter(&catalog, "   ", CategoryFilter::All);
        assert_eq!(filtered.len(), catalog.len());
    }

    #[test]
    fn test_filter_combines_search_and_category() {
        let catalog = sample();
        let classifier = Classifier::air();
        let ground = classifier.filter(&catalog, "a", CategoryFilter::SecondaryOnly);
        let found: Vec<_> = ground.names().collect();
        assert_eq!(found, vec!["Crawler", "Fang", "Fire Badger"]);

        let air = classifier.filter(&catalog, "a", CategoryFilter::PrimaryOnly);
        let found: Vec<_> = air.names().collect();
        assert_eq!(found, vec!["Wasp", "Phantom Ray"]);
    }

    #[test]
    fn test_filter_does_not_mutate_source() {
        let catalog = sample();
        let _ = Classifier::air().filter(&catalog, "wasp", CategoryFilter::PrimaryOnly);
        assert_eq!(catalog.len(), 6);
        assert!(catalog.contains("Crawler"));
    }

    #[test]
    fn test_filtered_catalog_lookup() {
        let catalog = sample();
        let filtered = Classifier::air().filter(&catalog, "", CategoryFilter::PrimaryOnly);
        assert!(filtered.get("wasp").is_ok());
        assert!(filtered.get("Crawler").is_err());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Air".parse::<CategoryFilter>().unwrap(), CategoryFilter::PrimaryOnly);
        assert_eq!("ground".parse::<CategoryFilter>().unwrap(), CategoryFilter::SecondaryOnly);
        assert_eq!("all".parse::<CategoryFilter>().unwrap(), CategoryFilter::All);
        assert!("naval".parse::<CategoryFilter>().is_err());
    }
}
