//! Provision one cluster per descriptor file

use crate::report::{self, DescriptorReport, Outcome};
use futures_util::StreamExt;
use offload_cloud::{CreateClusterRequest, ProvisioningClient, WaitConfig, provision, reserve_cluster_name};
use offload_config::DescriptorFile;
use offload_core::{BuildDefaults, ClusterIdentifier, ClusterSpecBuilder, EnvironmentDescriptor};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub defaults: BuildDefaults,
    pub wait: WaitConfig,
    pub concurrency: usize,
    pub fail_fast: bool,
    pub name_attempts: u32,
}

/// Run every descriptor through the pipeline.
///
/// Reports come back in file order. With `fail_fast` a failure stops any
/// descriptor that has not started yet; descriptors already in flight run to
/// completion and are reported.
pub async fn handle<C>(
    files: &[DescriptorFile],
    client: &C,
    options: &RunOptions,
) -> Vec<DescriptorReport>
where
    C: ProvisioningClient + ?Sized,
{
    info!(
        descriptors = files.len(),
        concurrency = options.concurrency,
        client = client.name(),
        "Provisioning clusters"
    );

    let stop = AtomicBool::new(false);
    let stop = &stop;
    let stream = futures_util::stream::iter(files.iter().cloned().map(|file| async move {
        if stop.load(Ordering::SeqCst) {
            debug!(file = %file.name(), "Skipping descriptor after earlier failure");
            return None;
        }
        let result = create(&file, client, options).await;
        let report = DescriptorReport::new(file, result);
        if report.is_failure() && options.fail_fast {
            stop.store(true, Ordering::SeqCst);
        }
        Some(report)
    }))
    .buffered(options.concurrency.max(1));
    let mut stream = std::pin::pin!(stream);

    let mut reports = Vec::with_capacity(files.len());
    while let Some(slot) = stream.next().await {
        let Some(report) = slot else { continue };
        report::print_outcome(&report);
        if report.is_failure() && options.fail_fast {
            warn!(file = %report.file.name(), "Not starting further descriptors");
        }
        reports.push(report);
    }
    reports
}

#[tracing::instrument(skip_all, fields(file = %file.name()))]
async fn create<C>(file: &DescriptorFile, client: &C, options: &RunOptions) -> anyhow::Result<Outcome>
where
    C: ProvisioningClient + ?Sized,
{
    let raw = file.load()?;
    let descriptor = EnvironmentDescriptor::from_mapping(&raw)?;
    let placement = &descriptor.placement;

    let identifier = reserve_cluster_name(
        client,
        &placement.project_id,
        &placement.region,
        options.name_attempts,
        || ClusterIdentifier::random(&placement.workload, &placement.env),
    )
    .await?;

    let spec = ClusterSpecBuilder::new(&descriptor)
        .identifier(identifier)
        .defaults(options.defaults.clone())
        .build()?;
    let request = CreateClusterRequest::new(&placement.region, spec);

    let result = provision(client, &request, &options.wait).await?;
    Ok(Outcome::Created(result))
}
