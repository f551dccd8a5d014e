//! Counter-relationship catalog
//!
//! Each unit lists the units it is good against and the units that counter
//! it. The catalog is loaded once and never mutated; filtered views are new
//! catalogs.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{MatchupError, Result};
use crate::core::types::unit_key;

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitRecord {
    pub name: String,
    /// Units this unit counters, in display order
    pub good_against: Vec<String>,
    /// Units that counter this unit, in display order
    pub countered_by: Vec<String>,
}

/// Source shape of a record. Missing or null lists are empty.
#[derive(Debug, Deserialize)]
struct RawUnitRecord {
    #[serde(default, alias = "goodAgainst")]
    good_against: Option<Vec<String>>,
    #[serde(default, alias = "counteredBy")]
    countered_by: Option<Vec<String>>,
}

impl UnitRecord {
    pub fn new(
        name: impl Into<String>,
        good_against: Vec<String>,
        countered_by: Vec<String>,
    ) -> Self {
        let name = name.into();
        Self {
            good_against: dedup_names(&name, "good_against", good_against),
            countered_by: dedup_names(&name, "countered_by", countered_by),
            name,
        }
    }
}

/// Drop repeated names (case-insensitive), keeping the first occurrence
fn dedup_names(unit: &str, field: &str, names: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let key = unit_key(&name);
        if seen.contains(&key) {
            tracing::warn!(unit, field, duplicate = %name, "dropping duplicate counter entry");
            continue;
        }
        seen.push(key);
        out.push(name);
    }
    out
}

/// The catalog, in source order
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<UnitRecord>,
    index: AHashMap<String, usize>,
}

/// A counter reference resolved against the catalog
#[derive(Debug, Clone, Copy)]
pub struct CounterRef<'a> {
    pub name: &'a str,
    /// `None` when the name is not in the catalog
    pub record: Option<&'a UnitRecord>,
}

impl CounterRef<'_> {
    pub fn is_known(&self) -> bool {
        self.record.is_some()
    }
}

/// Both counter lists of a unit with every reference resolved
#[derive(Debug, Clone)]
pub struct CounterView<'a> {
    pub unit: &'a UnitRecord,
    pub good_against: Vec<CounterRef<'a>>,
    pub countered_by: Vec<CounterRef<'a>>,
}

impl Catalog {
    /// Parse a catalog from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::parse("catalog", json)
    }

    /// Parse a catalog, naming `source_name` in any error
    ///
    /// The source must be an object keyed by unit name. Either every record
    /// loads or the whole catalog is rejected.
    pub fn parse(source_name: &str, json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| MatchupError::data_format(source_name, e.to_string()))?;
        let object = value.as_object().ok_or_else(|| {
            MatchupError::data_format(source_name, "expected an object keyed by unit name")
        })?;

        let mut records = Vec::with_capacity(object.len());
        for (name, raw) in object {
            let raw: RawUnitRecord = serde_json::from_value(raw.clone()).map_err(|e| {
                MatchupError::data_format(source_name, format!("unit '{}': {}", name, e))
            })?;
            records.push(UnitRecord::new(
                name.clone(),
                raw.good_against.unwrap_or_default(),
                raw.countered_by.unwrap_or_default(),
            ));
        }

        let catalog = Self::from_records(records)
            .map_err(|e| MatchupError::data_format(source_name, e.to_string()))?;

        let dangling = catalog.dangling_references();
        for (unit, missing) in &dangling {
            tracing::warn!(unit, missing, "counter references a unit not in the catalog");
        }
        tracing::info!(
            source = source_name,
            units = catalog.len(),
            dangling = dangling.len(),
            "catalog loaded"
        );

        Ok(catalog)
    }

    /// Build a catalog from records. Names must be unique, ignoring case.
    pub fn from_records(records: Vec<UnitRecord>) -> Result<Self> {
        let mut index = AHashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if index.insert(unit_key(&record.name), i).is_some() {
                return Err(MatchupError::data_format(
                    "catalog",
                    format!("duplicate unit '{}'", record.name),
                ));
            }
        }
        Ok(Self { records, index })
    }

    /// Sub-catalog of the records `keep` accepts, in the same order
    pub(crate) fn retain_view(&self, mut keep: impl FnMut(&UnitRecord) -> bool) -> Self {
        let records: Vec<UnitRecord> = self.records.iter().filter(|r| keep(r)).cloned().collect();
        let index = records
            .iter()
            .enumerate()
            .map(|(i, r)| (unit_key(&r.name), i))
            .collect();
        Self { records, index }
    }

    /// Look up a unit, ignoring case
    pub fn get(&self, name: &str) -> Result<&UnitRecord> {
        self.find(name)
            .ok_or_else(|| MatchupError::NotFound(name.to_string()))
    }

    pub fn find(&self, name: &str) -> Option<&UnitRecord> {
        self.index.get(&unit_key(name)).map(|&i| &self.records[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&unit_key(name))
    }

    /// All records in source order
    pub fn all(&self) -> &[UnitRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitRecord> {
        self.records.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve both counter lists of `name` against this catalog
    pub fn resolve_counters(&self, name: &str) -> Result<CounterView<'_>> {
        let unit = self.get(name)?;
        Ok(CounterView {
            unit,
            good_against: self.resolve_refs(&unit.good_against),
            countered_by: self.resolve_refs(&unit.countered_by),
        })
    }

    fn resolve_refs<'a>(&'a self, names: &'a [String]) -> Vec<CounterRef<'a>> {
        names
            .iter()
            .map(|n| CounterRef {
                name: n.as_str(),
                record: self.find(n),
            })
            .collect()
    }

    /// `(unit, missing)` pairs for every counter reference with no record
    pub fn dangling_references(&self) -> Vec<(&str, &str)> {
        self.records
            .iter()
            .flat_map(|r| {
                r.good_against
                    .iter()
                    .chain(r.countered_by.iter())
                    .filter(move |n| !self.contains(n))
                    .map(move |n| (r.name.as_str(), n.as_str()))
            })
            .collect()
    }
}
