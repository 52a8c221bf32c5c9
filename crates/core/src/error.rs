use thiserror::Error;

/// A control change that would break a selection invariant.
///
/// The store rejects the mutation and keeps its previous state; front ends
/// surface `reason` to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("invalid selection: {reason}")]
    InvalidSelection { reason: String },
}

impl SelectionError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SelectionError::InvalidSelection {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset has no header row")]
    MissingHeader,
    #[error("dataset has no release years, timeline cannot be built")]
    NoYears,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
