//! One-shot breakpoint analysis
//!
//! A unit one-shots another when its single-hit damage meets or exceeds the
//! target's total hit points. The relation is neither symmetric nor
//! transitive: two units may one-shot each other, and that is not a
//! contradiction.

use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Reverse;

use crate::catalog::{CombatStat, StatTable};
use crate::classifier::matches_search;
use crate::core::error::{MatchupError, Result};
use crate::core::types::same_unit;

/// A unit able to one-shot the analyzed unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Attacker<'a> {
    pub name: &'a str,
    pub damage: f64,
}

/// A unit the analyzed unit can one-shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Target<'a> {
    pub name: &'a str,
    pub hp: f64,
}

/// Both breakpoint lists for one unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OneShotResult<'a> {
    /// Table spelling of the analyzed unit
    pub unit: &'a str,
    pub stat: CombatStat,
    pub efficiency: f64,
    /// Units whose damage meets this unit's hp, highest damage first
    pub one_shotters: Vec<Attacker<'a>>,
    /// Units whose hp this unit's damage meets, highest hp first
    pub one_shot_targets: Vec<Target<'a>>,
}

/// Damage per point of hit points
pub fn efficiency(stat: &CombatStat) -> Result<f64> {
    if stat.hp == 0.0 {
        return Err(MatchupError::DivisionByZero);
    }
    Ok(stat.damage / stat.hp)
}

/// Every other unit in `stats` that can eliminate `target` in one hit
///
/// Ordered by damage, descending; ties keep table order.
pub fn one_shotters_of<'a>(stats: &'a StatTable, target: &str) -> Result<Vec<Attacker<'a>>> {
    let (target_name, target_stat) = stats.get(target)?;
    let mut attackers: Vec<Attacker<'a>> = stats
        .iter()
        .filter(|(name, stat)| !same_unit(name, target_name) && stat.one_shots(target_stat))
        .map(|(name, stat)| Attacker {
            name,
            damage: stat.damage,
        })
        .collect();
    attackers.sort_by_key(|a| Reverse(OrderedFloat(a.damage)));
    Ok(attackers)
}

/// Every other unit in `stats` that `attacker` eliminates in one hit
///
/// Ordered by hp, descending; ties keep table order.
pub fn one_shot_targets_of<'a>(stats: &'a StatTable, attacker: &str) -> Result<Vec<Target<'a>>> {
    let (attacker_name, attacker_stat) = stats.get(attacker)?;
    let mut targets: Vec<Target<'a>> = stats
        .iter()
        .filter(|(name, stat)| !same_unit(name, attacker_name) && attacker_stat.one_shots(stat))
        .map(|(name, stat)| Target { name, hp: stat.hp })
        .collect();
    targets.sort_by_key(|t| Reverse(OrderedFloat(t.hp)));
    Ok(targets)
}

/// Full breakpoint analysis of one unit
pub fn analyze<'a>(stats: &'a StatTable, name: &str) -> Result<OneShotResult<'a>> {
    let (unit, stat) = stats.get(name)?;
    Ok(OneShotResult {
        unit,
        stat: *stat,
        efficiency: efficiency(stat)?,
        one_shotters: one_shotters_of(stats, unit)?,
        one_shot_targets: one_shot_targets_of(stats, unit)?,
    })
}

/// All units matching `search`, by damage descending
///
/// Ties keep table order. A blank search term matches every unit.
pub fn ranked<'a>(stats: &'a StatTable, search: &str) -> Result<Vec<OneShotResult<'a>>> {
    let needle = search.trim().to_lowercase();
    let mut names: Vec<(&'a str, f64)> = stats
        .iter()
        .filter(|(name, _)| matches_search(name, &needle))
        .map(|(name, stat)| (name, stat.damage))
        .collect();
    names.sort_by_key(|(_, damage)| Reverse(OrderedFloat(*damage)));

    names
        .into_iter()
        .map(|(name, _)| analyze(stats, name))
        .collect()
}
