//! Static unit reference data: counter catalog, combat stats and the roster

pub mod record;
pub mod roster;
pub mod stats;

pub use record::{Catalog, CounterRef, CounterView, UnitRecord};
pub use roster::{air_membership, canonical_name, is_roster_unit, AIR_UNITS, ROSTER};
pub use stats::{CombatStat, StatTable};
