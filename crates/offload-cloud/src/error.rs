//! Provisioning error types

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CloudError {
    /// The service rejected or failed the creation request
    #[error("Provisioning failed: {message}")]
    Provisioning { code: Option<i32>, message: String },

    #[error("Operation {operation} did not complete within {}s", .timeout.as_secs())]
    ProvisioningTimeout { operation: String, timeout: Duration },

    #[error("No free cluster name for {prefix} after {attempts} attempts")]
    NameCollision { prefix: String, attempts: u32 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error(transparent)]
    Spec(#[from] offload_core::SpecError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Whether a later run may attempt the same descriptor again
    pub fn is_retryable(&self) -> bool {
        matches!(self, CloudError::ProvisioningTimeout { .. })
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
