pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LlmConfig};
pub use error::{MatchupError, Result};
pub use types::{RequestId, Side};
