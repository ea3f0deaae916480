// Mon Oct 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("Malformed pattern at position {position}: {reason}")]
    MalformedPattern { position: usize, reason: String },
    #[error("Pattern has more than one anchor (token {first} and token {second})")]
    MultipleAnchors { first: usize, second: usize },
    #[error("Anchor offset {offset} is outside of the pattern ({length} bytes)")]
    AnchorOutOfRange { offset: usize, length: usize },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PatternError {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            position,
            reason: reason.into(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPattern { .. })
    }
}
