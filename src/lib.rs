//! MatchupMaster - counter-pick and breakpoint analysis for Mechabellum

pub mod assets;
pub mod breakpoint;
pub mod catalog;
pub mod classifier;
pub mod core;
pub mod llm;
pub mod matchup;
pub mod prompt;
