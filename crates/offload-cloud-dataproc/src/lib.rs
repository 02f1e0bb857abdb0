//! Google Cloud Dataproc provider for offload
//!
//! Implements [`offload_cloud::ProvisioningClient`] against the Dataproc
//! `v1` REST API.
//!
//! # Requirements
//!
//! - An OAuth access token in `GOOGLE_OAUTH_ACCESS_TOKEN`, or
//! - the `gcloud` CLI installed and authenticated
//!
//! # Example
//!
//! ```ignore
//! use offload_cloud::{CreateClusterRequest, WaitConfig, provision};
//! use offload_cloud_dataproc::{DataprocClient, TokenSource};
//!
//! let client = DataprocClient::new(TokenSource::from_env())?;
//! let request = CreateClusterRequest::new("us-central1", spec);
//! let cluster = provision(&client, &request, &WaitConfig::default()).await?;
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod gcloud;

pub use client::{DataprocClient, REQUEST_TIMEOUT};
pub use error::{DataprocError, Result};
pub use gcloud::{ACCESS_TOKEN_ENV, Gcloud, TokenSource};
