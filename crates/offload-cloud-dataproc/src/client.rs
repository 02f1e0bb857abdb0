//! Dataproc REST client
//!
//! Talks to the regional `v1` endpoint with bearer token authentication.

use crate::api::{ErrorEnvelope, Operation};
use crate::error::{DataprocError, Result};
use crate::gcloud::TokenSource;
use async_trait::async_trait;
use offload_cloud::{
    ClusterResult, CreateClusterRequest, OperationHandle, OperationStatus, ProvisioningClient,
};
use reqwest::StatusCode;
use std::time::Duration;

/// Upper bound for a single REST call; operation waits are bounded separately
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct DataprocClient {
    client: reqwest::Client,
    tokens: TokenSource,
    endpoint: Option<String>,
}

impl DataprocClient {
    pub fn new(tokens: TokenSource) -> Result<Self> {
        Self::with_request_timeout(tokens, REQUEST_TIMEOUT)
    }

    pub fn with_request_timeout(tokens: TokenSource, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            tokens,
            endpoint: None,
        })
    }

    /// Send every request to `endpoint` instead of the regional one
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into().trim_end_matches('/').to_string());
        self
    }

    pub fn endpoint_for(&self, region: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.clone(),
            None => format!("https://{}-dataproc.googleapis.com:443", region),
        }
    }

    fn clusters_url(&self, project_id: &str, region: &str) -> String {
        format!(
            "{}/v1/projects/{}/regions/{}/clusters",
            self.endpoint_for(region),
            project_id,
            region
        )
    }

    /// Operation names embed their region: `projects/{p}/regions/{r}/operations/{id}`
    fn operation_url(&self, operation_name: &str) -> String {
        let region = operation_name
            .split('/')
            .skip_while(|segment| *segment != "regions")
            .nth(1)
            .unwrap_or("global");
        format!("{}/v1/{}", self.endpoint_for(region), operation_name)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Option<reqwest::Response>> {
        let token = self.tokens.token().await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = error_message(response).await;
            return Err(DataprocError::AuthenticationFailed(message));
        }
        if !status.is_success() {
            let code = Some(i32::from(status.as_u16()));
            let message = error_message(response).await;
            return Err(DataprocError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }
        Ok(Some(response))
    }

    pub async fn create_cluster(&self, request: &CreateClusterRequest) -> Result<Operation> {
        let url = self.clusters_url(&request.project_id, &request.region);
        tracing::debug!(url = %url, cluster = %request.cluster_name(), "POST cluster");

        let response = self
            .send(self.client.post(&url).json(&request.cluster))
            .await?
            .ok_or_else(|| DataprocError::Api {
                status: StatusCode::NOT_FOUND.as_u16(),
                code: Some(404),
                message: format!("project or region not found: {}", url),
            })?;
        Ok(response.json().await?)
    }

    pub async fn get_operation(&self, operation_name: &str) -> Result<Operation> {
        let url = self.operation_url(operation_name);
        let response = self
            .send(self.client.get(&url))
            .await?
            .ok_or_else(|| DataprocError::Api {
                status: StatusCode::NOT_FOUND.as_u16(),
                code: Some(404),
                message: format!("operation not found: {}", operation_name),
            })?;
        Ok(response.json().await?)
    }

    pub async fn get_cluster_exists(
        &self,
        project_id: &str,
        region: &str,
        cluster_name: &str,
    ) -> Result<bool> {
        let url = format!("{}/{}", self.clusters_url(project_id, region), cluster_name);
        Ok(self.send(self.client.get(&url)).await?.is_some())
    }
}

/// Remote diagnostic message, verbatim when the body follows the error envelope
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) if !envelope.error.message.is_empty() => envelope.error.message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status.to_string(),
    }
}

fn operation_status(op: Operation, cluster_name: &str) -> OperationStatus {
    if !op.done {
        return OperationStatus::Running;
    }
    if let Some(error) = op.error {
        return OperationStatus::Failed {
            code: Some(error.code),
            message: error.message,
        };
    }

    let response = op.response;
    let metadata = op.metadata;
    let name = response
        .as_ref()
        .and_then(|r| r.cluster_name.clone())
        .or_else(|| metadata.as_ref().and_then(|m| m.cluster_name.clone()))
        .unwrap_or_else(|| cluster_name.to_string());
    let uuid = response
        .and_then(|r| r.cluster_uuid)
        .or_else(|| metadata.and_then(|m| m.cluster_uuid));

    OperationStatus::Done(ClusterResult::new(name, uuid))
}

#[async_trait]
impl ProvisioningClient for DataprocClient {
    fn name(&self) -> &str {
        "dataproc"
    }

    async fn cluster_exists(
        &self,
        project_id: &str,
        region: &str,
        cluster_name: &str,
    ) -> offload_cloud::Result<bool> {
        Ok(self
            .get_cluster_exists(project_id, region, cluster_name)
            .await?)
    }

    async fn submit(&self, request: &CreateClusterRequest) -> offload_cloud::Result<OperationHandle> {
        let op = self.create_cluster(request).await?;

        // Creation can be rejected synchronously inside a finished operation
        if let OperationStatus::Failed { code, message } =
            operation_status(op.clone(), request.cluster_name())
        {
            return Err(offload_cloud::CloudError::Provisioning { code, message });
        }

        Ok(OperationHandle {
            name: op.name,
            cluster_name: request.cluster_name().to_string(),
        })
    }

    async fn poll(&self, handle: &OperationHandle) -> offload_cloud::Result<OperationStatus> {
        let op = self.get_operation(&handle.name).await?;
        if let Some(description) = op.metadata.as_ref().and_then(|m| m.description.as_deref()) {
            tracing::debug!(operation = %handle.name, done = op.done, "{}", description);
        }
        Ok(operation_status(op, &handle.cluster_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClusterInfo, Status};

    fn client() -> DataprocClient {
        DataprocClient::new(TokenSource::Static("token".to_string())).unwrap()
    }

    fn operation(done: bool) -> Operation {
        Operation {
            name: "projects/p/regions/europe-west1/operations/op".to_string(),
            done,
            error: None,
            response: None,
            metadata: None,
        }
    }

    #[test]
    fn test_regional_endpoint() {
        assert_eq!(
            client().endpoint_for("europe-west1"),
            "https://europe-west1-dataproc.googleapis.com:443"
        );
        assert_eq!(
            client().clusters_url("dtp-dev", "us-central1"),
            "https://us-central1-dataproc.googleapis.com:443/v1/projects/dtp-dev/regions/us-central1/clusters"
        );
    }

    #[test]
    fn test_endpoint_override() {
        let client = client().with_endpoint("http://127.0.0.1:8123/");
        assert_eq!(
            client.operation_url("projects/p/regions/r/operations/op"),
            "http://127.0.0.1:8123/v1/projects/p/regions/r/operations/op"
        );
    }

    #[test]
    fn test_operation_url_uses_operation_region() {
        assert_eq!(
            client().operation_url("projects/p/regions/asia-east1/operations/op"),
            "https://asia-east1-dataproc.googleapis.com:443/v1/projects/p/regions/asia-east1/operations/op"
        );
    }

    #[test]
    fn test_operation_status_mapping() {
        assert_eq!(operation_status(operation(false), "c"), OperationStatus::Running);

        let mut failed = operation(true);
        failed.error = Some(Status {
            code: 8,
            message: "Quota exceeded".to_string(),
        });
        assert_eq!(
            operation_status(failed, "c"),
            OperationStatus::Failed {
                code: Some(8),
                message: "Quota exceeded".to_string()
            }
        );

        let mut done = operation(true);
        done.response = Some(ClusterInfo {
            cluster_name: Some("cluster-a".to_string()),
            cluster_uuid: Some("uuid".to_string()),
        });
        match operation_status(done, "fallback") {
            OperationStatus::Done(result) => {
                assert_eq!(result.cluster_name, "cluster-a");
                assert_eq!(result.cluster_uuid.as_deref(), Some("uuid"));
            }
            other => panic!("Expected Done, got {:?}", other),
        }

        match operation_status(operation(true), "fallback") {
            OperationStatus::Done(result) => assert_eq!(result.cluster_name, "fallback"),
            other => panic!("Expected Done, got {:?}", other),
        }
    }
}
