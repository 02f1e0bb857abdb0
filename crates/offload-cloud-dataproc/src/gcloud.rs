//! Access tokens
//!
//! Uses `GOOGLE_OAUTH_ACCESS_TOKEN` when set, otherwise asks the gcloud CLI.

use crate::error::{DataprocError, Result};
use std::process::Stdio;
use tokio::process::Command;

pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// gcloud CLI wrapper
#[derive(Debug, Clone, Default)]
pub struct Gcloud {
    account: Option<String>,
}

impl Gcloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Impersonate a specific configured account
    pub fn with_account(account: impl Into<String>) -> Self {
        Self {
            account: Some(account.into()),
        }
    }

    /// Run a gcloud command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("gcloud");
        cmd.args(args);
        if let Some(account) = &self.account {
            cmd.arg("--account").arg(account);
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: gcloud {}", args.join(" "));

        let output = cmd.output().await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataprocError::GcloudNotFound,
            _ => DataprocError::IoError(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DataprocError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    pub async fn print_access_token(&self) -> Result<String> {
        let output = self
            .run_command(&["auth", "print-access-token", "--quiet"])
            .await
            .map_err(|e| match e {
                DataprocError::CommandFailed(msg) => DataprocError::AuthenticationFailed(msg),
                other => other,
            })?;

        let token = output.trim();
        if token.is_empty() {
            return Err(DataprocError::AuthenticationFailed(
                "gcloud returned an empty access token".to_string(),
            ));
        }
        Ok(token.to_string())
    }
}

/// Where bearer tokens come from
#[derive(Debug, Clone)]
pub enum TokenSource {
    Static(String),
    Gcloud(Gcloud),
}

impl TokenSource {
    pub fn from_env() -> Self {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => TokenSource::Static(token.trim().to_string()),
            _ => TokenSource::Gcloud(Gcloud::new()),
        }
    }

    pub async fn token(&self) -> Result<String> {
        match self {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Gcloud(gcloud) => gcloud.print_access_token().await,
        }
    }
}
