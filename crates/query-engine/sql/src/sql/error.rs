//! Errors for SQL parsing.

use thiserror::Error;

/// A failure to turn SQL text into a statement.
///
/// Positions are byte offsets into the statement text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },
    #[error("unsupported SQL feature at position {position}: {construct}")]
    UnsupportedFeature { construct: String, position: usize },
}

impl Error {
    pub fn syntax(position: usize, message: impl Into<String>) -> Error {
        Error::Syntax {
            position,
            message: message.into(),
        }
    }

    pub fn unsupported(position: usize, construct: impl Into<String>) -> Error {
        Error::UnsupportedFeature {
            construct: construct.into(),
            position,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            Error::Syntax { position, .. } | Error::UnsupportedFeature { position, .. } => {
                *position
            }
        }
    }
}
