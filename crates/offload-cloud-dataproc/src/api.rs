//! Dataproc REST response shapes

use serde::Deserialize;

/// `google.longrunning.Operation`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,

    #[serde(default)]
    pub done: bool,

    pub error: Option<Status>,

    pub response: Option<ClusterInfo>,

    pub metadata: Option<OperationMetadata>,
}

/// `google.rpc.Status`
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,

    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMetadata {
    pub cluster_name: Option<String>,

    pub cluster_uuid: Option<String>,

    pub description: Option<String>,
}

/// The parts of a `Cluster` resource the client reports back
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    pub cluster_name: Option<String>,

    pub cluster_uuid: Option<String>,
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Status,
}
