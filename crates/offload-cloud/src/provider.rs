//! Provisioning client trait definition

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use offload_core::ClusterSpecification;
use serde::Serialize;

/// Remote control plane that creates clusters.
///
/// Creation is asynchronous: [`submit`](Self::submit) returns a handle to a
/// long-running operation that is resolved by [`poll`](Self::poll).
#[async_trait]
pub trait ProvisioningClient: Send + Sync {
    /// Returns the client name (e.g., "dataproc")
    fn name(&self) -> &str;

    /// Whether a cluster with this name already exists in the project/region
    async fn cluster_exists(&self, project_id: &str, region: &str, cluster_name: &str)
    -> Result<bool>;

    /// Submit a creation request
    async fn submit(&self, request: &CreateClusterRequest) -> Result<OperationHandle>;

    /// Fetch the current state of a submitted operation
    async fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus>;
}

/// Cluster creation request addressed to a regional endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CreateClusterRequest {
    pub project_id: String,
    pub region: String,
    pub cluster: ClusterSpecification,
}

impl CreateClusterRequest {
    pub fn new(region: impl Into<String>, cluster: ClusterSpecification) -> Self {
        Self {
            project_id: cluster.project_id.clone(),
            region: region.into(),
            cluster,
        }
    }

    pub fn cluster_name(&self) -> &str {
        self.cluster.cluster_name.as_str()
    }
}

/// Handle to a long-running creation operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationHandle {
    /// Operation resource name
    pub name: String,

    pub cluster_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationStatus {
    Running,
    Done(ClusterResult),
    Failed { code: Option<i32>, message: String },
}

/// Completed cluster as reported by the service
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterResult {
    pub cluster_name: String,
    pub cluster_uuid: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl ClusterResult {
    pub fn new(cluster_name: impl Into<String>, cluster_uuid: Option<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            cluster_uuid,
            completed_at: Utc::now(),
        }
    }
}
