//! Player selections for one session
//!
//! Each side holds a set of unit names. Names compare case-insensitively and
//! keep the spelling they were first added with. Insertion order is retained
//! only so that rendered lists are stable.

use serde::{Deserialize, Serialize};

use crate::core::error::{MatchupError, Result};
use crate::core::types::{same_unit, Side};

/// The units currently selected for one side
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchupSet {
    names: Vec<String>,
}

impl MatchupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from names, dropping repeats
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        for name in names {
            set.add(name);
        }
        set
    }

    /// Add `name`. Returns false if it was already present.
    pub fn add(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Remove `name`. Returns false if it was absent.
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(i) => {
                self.names.remove(i);
                true
            }
            None => false,
        }
    }

    /// Add if absent, otherwise remove. Returns whether `name` is now selected.
    pub fn toggle(&mut self, name: &str) -> bool {
        if self.remove(name) {
            false
        } else {
            self.add(name)
        }
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Selected names in insertion order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| same_unit(n, name))
    }
}

/// Fails with `IncompleteSelection` unless both sides have at least one unit
pub fn validate_ready(opponent: &MatchupSet, own: &MatchupSet) -> Result<()> {
    if opponent.is_empty() || own.is_empty() {
        return Err(MatchupError::IncompleteSelection {
            opponent_empty: opponent.is_empty(),
            own_empty: own.is_empty(),
        });
    }
    Ok(())
}

/// Both selections of one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub opponent: MatchupSet,
    pub own: MatchupSet,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, side: Side) -> &MatchupSet {
        match side {
            Side::Opponent => &self.opponent,
            Side::Own => &self.own,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut MatchupSet {
        match side {
            Side::Opponent => &mut self.opponent,
            Side::Own => &mut self.own,
        }
    }

    /// Toggle `name` on `side`. Returns whether it is now selected.
    pub fn toggle(&mut self, side: Side, name: &str) -> bool {
        let selected = self.side_mut(side).toggle(name);
        tracing::debug!(%side, unit = name, selected, "selection toggled");
        selected
    }

    pub fn clear_all(&mut self) {
        self.opponent.clear();
        self.own.clear();
    }

    pub fn validate_ready(&self) -> Result<()> {
        validate_ready(&self.opponent, &self.own)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut set = MatchupSet::new();
        assert!(set.add("Crawler"));
        assert!(!set.add("Crawler"));
        assert!(!set.add("crawler"));
        assert_eq!(set.len(), 1);
        assert_eq!(set.names(), ["Crawler"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut set = MatchupSet::from_names(["Fang"]);
        assert!(!set.remove("Wasp"));
        assert_eq!(set.len(), 1);
        assert!(set.remove("FANG"));
        assert!(set.is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut set = MatchupSet::new();
        assert!(set.toggle("Rhino"));
        assert!(set.contains("rhino"));
        assert!(!set.toggle("Rhino"));
        assert!(!set.contains("Rhino"));
    }

    #[test]
    fn test_blank_names_ignored() {
        let mut set = MatchupSet::new();
        assert!(!set.add("   "));
        assert!(set.is_empty());
    }

    #[test]
    fn test_insertion_order_kept() {
        let set = MatchupSet::from_names(["Wasp", "Fang", "wasp", "Rhino"]);
        assert_eq!(set.names(), ["Wasp", "Fang", "Rhino"]);
    }

    #[test]
    fn test_clear() {
        let mut set = MatchupSet::from_names(["Wasp", "Fang"]);
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_validate_ready_truth_table() {
        let empty = MatchupSet::new();
        let one = MatchupSet::from_names(["Fang"]);
        let two = MatchupSet::from_names(["Fang", "Wasp"]);

        assert!(validate_ready(&empty, &empty).is_err());
        assert!(validate_ready(&one, &empty).is_err());
        assert!(validate_ready(&empty, &one).is_err());
        assert!(validate_ready(&one, &one).is_ok());
        assert!(validate_ready(&two, &one).is_ok());
        assert!(validate_ready(&one, &two).is_ok());
    }

    #[test]
    fn test_validate_ready_names_empty_side() {
        let err = validate_ready(&MatchupSet::from_names(["Fang"]), &MatchupSet::new()).unwrap_err();
        assert_eq!(err.empty_sides(), vec![Side::Own]);
    }

    #[test]
    fn test_selection_sides_independent() {
        let mut selection = Selection::new();
        selection.toggle(Side::Opponent, "Crawler");
        selection.toggle(Side::Own, "Arclight");
        selection.toggle(Side::Own, "Crawler");
        assert_eq!(selection.side(Side::Opponent).names(), ["Crawler"]);
        assert_eq!(selection.side(Side::Own).names(), ["Arclight", "Crawler"]);
        assert!(selection.validate_ready().is_ok());

        selection.clear_all();
        assert!(selection.validate_ready().is_err());
    }
}
