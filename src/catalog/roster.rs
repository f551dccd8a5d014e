//! The fixed in-game roster
//!
//! Kept as literal constants rather than derived from the catalog: the roster
//! is every unit in the game, while a catalog file may describe only a subset.

use ahash::AHashSet;

use crate::core::types::unit_key;

/// Every unit name the game knows, in display order
pub const ROSTER: [&str; 29] = [
    "Abyss",
    "Arclight",
    "Crawler",
    "Fang",
    "Farseer",
    "Fire Badger",
    "Fortress",
    "Hacker",
    "Hound",
    "Marksman",
    "Melting Point",
    "Mustang",
    "Overlord",
    "Phantom Ray",
    "Phoenix",
    "Raiden",
    "Rhino",
    "Sabertooth",
    "Sandworm",
    "Scorpion",
    "Sledgehammer",
    "Steel Ball",
    "Stormcaller",
    "Tarantula",
    "Typhoon",
    "Vulcan",
    "War Factory",
    "Wasp",
    "Wraith",
];

/// Units that fly; everything else is ground
pub const AIR_UNITS: [&str; 7] = [
    "Phoenix",
    "Wasp",
    "Phantom Ray",
    "Wraith",
    "Raiden",
    "Overlord",
    "Abyss",
];

/// Whether `name` is part of the roster (case-insensitive)
pub fn is_roster_unit(name: &str) -> bool {
    let key = unit_key(name);
    ROSTER.iter().any(|unit| unit_key(unit) == key)
}

/// Roster spelling of `name`, if it is a roster unit
pub fn canonical_name(name: &str) -> Option<&'static str> {
    let key = unit_key(name);
    ROSTER.iter().copied().find(|unit| unit_key(unit) == key)
}

/// Membership set of air units, keyed for case-insensitive lookup
pub fn air_membership() -> AHashSet<String> {
    AIR_UNITS.iter().map(|name| unit_key(name)).collect()
}
