//! Submit-and-wait flow for a single cluster

use crate::error::{CloudError, Result};
use crate::provider::{ClusterResult, CreateClusterRequest, ProvisioningClient};
use crate::waiter::{WaitConfig, wait_for_operation};
use offload_core::ClusterIdentifier;
use tracing::{info, warn};

/// Submit the request and wait for the resulting operation.
///
/// A rejected submission is returned as-is and never resubmitted: the same
/// name may already be half-created on the remote side.
pub async fn provision<C>(
    client: &C,
    request: &CreateClusterRequest,
    wait: &WaitConfig,
) -> Result<ClusterResult>
where
    C: ProvisioningClient + ?Sized,
{
    info!(
        client = client.name(),
        project = %request.project_id,
        region = %request.region,
        cluster = %request.cluster_name(),
        "Submitting cluster creation request"
    );

    let handle = client.submit(request).await?;
    info!(operation = %handle.name, "Creation request accepted");

    wait_for_operation(client, &handle, wait).await
}

/// Draw identifiers until one is not taken by an existing cluster
pub async fn reserve_cluster_name<C, F>(
    client: &C,
    project_id: &str,
    region: &str,
    attempts: u32,
    mut generate: F,
) -> Result<ClusterIdentifier>
where
    C: ProvisioningClient + ?Sized,
    F: FnMut() -> offload_core::Result<ClusterIdentifier>,
{
    let mut last = None;
    for attempt in 1..=attempts.max(1) {
        let candidate = generate()?;
        if !client
            .cluster_exists(project_id, region, candidate.as_str())
            .await?
        {
            return Ok(candidate);
        }
        warn!(cluster = %candidate, attempt, "Cluster name already taken, drawing a new suffix");
        last = Some(candidate);
    }

    let prefix = last
        .as_ref()
        .and_then(|id| id.as_str().rsplit_once("-f"))
        .map(|(prefix, _)| prefix.to_string())
        .unwrap_or_default();
    Err(CloudError::NameCollision {
        prefix,
        attempts: attempts.max(1),
    })
}
