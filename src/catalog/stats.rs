//! Combat stat table for breakpoint analysis
//!
//! Independent of the counter catalog: it may describe fewer units, and its
//! names are not required to match the catalog's.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{MatchupError, Result};
use crate::core::types::unit_key;

/// Stats shipped with the crate
const BUILTIN_STATS: &str = include_str!("../../data/unit_stats.json");

/// Hit points and single-hit damage of one unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatStat {
    pub hp: f64,
    pub damage: f64,
}

impl CombatStat {
    pub fn new(hp: f64, damage: f64) -> Self {
        Self { hp, damage }
    }

    /// Whether a single hit from `self` eliminates `target`
    pub fn one_shots(&self, target: &CombatStat) -> bool {
        self.damage >= target.hp
    }

    fn validate(&self) -> std::result::Result<(), String> {
        if !self.hp.is_finite() || self.hp <= 0.0 {
            return Err(format!("hp must be positive, got {}", self.hp));
        }
        if !self.damage.is_finite() || self.damage < 0.0 {
            return Err(format!("damage must be non-negative, got {}", self.damage));
        }
        Ok(())
    }
}

/// Stat table in source order
#[derive(Debug, Clone, Default)]
pub struct StatTable {
    entries: Vec<(String, CombatStat)>,
    index: AHashMap<String, usize>,
}

impl StatTable {
    /// The game's stat table bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::parse("builtin stats", BUILTIN_STATS)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::parse("stats", json)
    }

    /// Parse an object of `name -> {hp, damage}`. All-or-nothing.
    pub fn parse(source_name: &str, json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| MatchupError::data_format(source_name, e.to_string()))?;
        let object = value.as_object().ok_or_else(|| {
            MatchupError::data_format(source_name, "expected an object keyed by unit name")
        })?;

        let mut table = Self::default();
        for (name, raw) in object {
            let stat: CombatStat = serde_json::from_value(raw.clone()).map_err(|e| {
                MatchupError::data_format(source_name, format!("unit '{}': {}", name, e))
            })?;
            table.insert(name.clone(), stat).map_err(|message| {
                MatchupError::data_format(source_name, format!("unit '{}': {}", name, message))
            })?;
        }

        tracing::info!(source = source_name, units = table.len(), "stat table loaded");
        Ok(table)
    }

    /// Build a table from `(name, stat)` pairs, validating each entry
    pub fn from_entries<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, CombatStat)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (name, stat) in entries {
            let name = name.into();
            table.insert(name.clone(), stat).map_err(|message| {
                MatchupError::data_format("stats", format!("unit '{}': {}", name, message))
            })?;
        }
        Ok(table)
    }

    fn insert(&mut self, name: String, stat: CombatStat) -> std::result::Result<(), String> {
        stat.validate()?;
        let key = unit_key(&name);
        if self.index.contains_key(&key) {
            return Err("duplicate unit".into());
        }
        self.index.insert(key, self.entries.len());
        self.entries.push((name, stat));
        Ok(())
    }

    /// Look up a unit, ignoring case. Returns the table's spelling of the name.
    pub fn get(&self, name: &str) -> Result<(&str, &CombatStat)> {
        self.index
            .get(&unit_key(name))
            .map(|&i| {
                let (name, stat) = &self.entries[i];
                (name.as_str(), stat)
            })
            .ok_or_else(|| MatchupError::NotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(&unit_key(name))
    }

    /// Entries in source order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CombatStat)> {
        self.entries.iter().map(|(name, stat)| (name.as_str(), stat))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
