use thiserror::Error;

use crate::core::types::Side;

#[derive(Error, Debug)]
pub enum MatchupError {
    #[error("Malformed data in {source_name}: {message}")]
    DataFormat {
        source_name: String,
        message: String,
    },

    #[error("No such unit: {0}")]
    NotFound(String),

    #[error("{}", incomplete_message(.opponent_empty, .own_empty))]
    IncompleteSelection {
        opponent_empty: bool,
        own_empty: bool,
    },

    #[error("Efficiency undefined: hp is zero")]
    DivisionByZero,

    #[error("Malformed response from generator: {0}")]
    MalformedResponse(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Request superseded by a newer one")]
    Superseded,

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl MatchupError {
    pub fn data_format(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DataFormat {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Sides that were empty when an `IncompleteSelection` was raised
    pub fn empty_sides(&self) -> Vec<Side> {
        match self {
            Self::IncompleteSelection {
                opponent_empty,
                own_empty,
            } => {
                let mut sides = Vec::new();
                if *opponent_empty {
                    sides.push(Side::Opponent);
                }
                if *own_empty {
                    sides.push(Side::Own);
                }
                sides
            }
            _ => Vec::new(),
        }
    }

    /// Whether the caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::MalformedResponse(_) | Self::Generation(_) | Self::Superseded
        )
    }
}

fn incomplete_message(opponent_empty: &bool, own_empty: &bool) -> &'static str {
    match (*opponent_empty, *own_empty) {
        (true, true) => "Please select at least one unit for both you and your opponent",
        (true, false) => "Please select at least one opponent unit",
        (false, true) => "Please select at least one of your own units",
        (false, false) => "Selection is complete",
    }
}

pub type Result<T> = std::result::Result<T, MatchupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_selection_message() {
        let err = MatchupError::IncompleteSelection {
            opponent_empty: true,
            own_empty: true,
        };
        assert!(err.to_string().contains("both you and your opponent"));
        assert_eq!(err.empty_sides(), vec![Side::Opponent, Side::Own]);

        let err = MatchupError::IncompleteSelection {
            opponent_empty: false,
            own_empty: true,
        };
        assert_eq!(err.empty_sides(), vec![Side::Own]);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(MatchupError::Generation("timeout".into()).is_retryable());
        assert!(MatchupError::MalformedResponse("no text".into()).is_retryable());
        assert!(!MatchupError::NotFound("Zeppelin".into()).is_retryable());
    }

    #[test]
    fn test_data_format_display() {
        let err = MatchupError::data_format("units.json", "expected object");
        assert_eq!(err.to_string(), "Malformed data in units.json: expected object");
    }
}
