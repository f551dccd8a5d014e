//! Boundary to the external text-generation service

pub mod client;
pub mod desk;
pub mod narrative;

pub use client::{ApiFormat, LlmClient, NarrativeGenerator};
pub use desk::StrategyDesk;
pub use narrative::{CounterRating, Narrative, NarrativeLine, NarrativeSection};
