//! Dataproc client error types

use offload_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataprocError {
    #[error("gcloud not found. Install the Google Cloud CLI or set GOOGLE_OAUTH_ACCESS_TOKEN")]
    GcloudNotFound,

    #[error("gcloud authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("gcloud command failed: {0}")]
    CommandFailed(String),

    #[error("Dataproc API error (HTTP {status}): {message}")]
    Api {
        status: u16,
        code: Option<i32>,
        message: String,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DataprocError>;

impl From<DataprocError> for CloudError {
    fn from(err: DataprocError) -> Self {
        match err {
            DataprocError::Api { code, message, .. } => CloudError::Provisioning { code, message },
            DataprocError::GcloudNotFound => CloudError::AuthenticationFailed(err.to_string()),
            DataprocError::AuthenticationFailed(msg) => CloudError::AuthenticationFailed(msg),
            DataprocError::CommandFailed(msg) => CloudError::CommandFailed(msg),
            DataprocError::Http(e) => CloudError::ApiError(e.to_string()),
            DataprocError::JsonError(e) => CloudError::Json(e),
            DataprocError::IoError(e) => CloudError::Io(e),
        }
    }
}
