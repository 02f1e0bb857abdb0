use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpecError {
    #[error("missing required parameter(s): {}", keys.join(", "))]
    MissingParameter { keys: Vec<String> },

    #[error("invalid value for '{key}': {reason}")]
    InvalidShape { key: String, reason: String },
}

impl SpecError {
    pub(crate) fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        SpecError::InvalidShape {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Keys responsible for the failure
    pub fn keys(&self) -> Vec<&str> {
        match self {
            SpecError::MissingParameter { keys } => keys.iter().map(String::as_str).collect(),
            SpecError::InvalidShape { key, .. } => vec![key.as_str()],
        }
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
