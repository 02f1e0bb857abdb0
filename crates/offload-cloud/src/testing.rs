//! In-memory provisioning client for tests

use crate::error::{CloudError, Result};
use crate::provider::{
    ClusterResult, CreateClusterRequest, OperationHandle, OperationStatus, ProvisioningClient,
};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Report `Running` this many times, then `Done`
    CompleteAfter(usize),
    /// Reject every submission with this message
    RejectSubmit(String),
    /// Accept the submission; the operation then fails with this message
    FailOperation(String),
    NeverComplete,
}

pub struct StubProvisioningClient {
    behavior: StubBehavior,
    existing: Mutex<HashSet<String>>,
    submitted: Mutex<Vec<CreateClusterRequest>>,
    exists_calls: AtomicUsize,
    poll_calls: AtomicUsize,
}

impl StubProvisioningClient {
    pub fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            existing: Mutex::new(HashSet::new()),
            submitted: Mutex::new(Vec::new()),
            exists_calls: AtomicUsize::new(0),
            poll_calls: AtomicUsize::new(0),
        }
    }

    /// Cluster names reported as already taken
    pub fn with_existing<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.existing
            .lock()
            .unwrap()
            .extend(names.into_iter().map(Into::into));
        self
    }

    pub fn submitted(&self) -> Vec<CreateClusterRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submit_calls(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    pub fn exists_calls(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn poll_calls(&self) -> usize {
        self.poll_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProvisioningClient for StubProvisioningClient {
    fn name(&self) -> &str {
        "stub"
    }

    async fn cluster_exists(
        &self,
        _project_id: &str,
        _region: &str,
        cluster_name: &str,
    ) -> Result<bool> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.existing.lock().unwrap().contains(cluster_name))
    }

    async fn submit(&self, request: &CreateClusterRequest) -> Result<OperationHandle> {
        self.submitted.lock().unwrap().push(request.clone());

        if let StubBehavior::RejectSubmit(message) = &self.behavior {
            return Err(CloudError::Provisioning {
                code: Some(8),
                message: message.clone(),
            });
        }

        Ok(OperationHandle {
            name: format!(
                "projects/{}/regions/{}/operations/stub-{}",
                request.project_id,
                request.region,
                self.submit_calls()
            ),
            cluster_name: request.cluster_name().to_string(),
        })
    }

    async fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus> {
        let calls = self.poll_calls.fetch_add(1, Ordering::SeqCst);

        Ok(match &self.behavior {
            StubBehavior::CompleteAfter(n) if calls >= *n => OperationStatus::Done(
                ClusterResult::new(&handle.cluster_name, Some("stub-uuid".to_string())),
            ),
            StubBehavior::FailOperation(message) => OperationStatus::Failed {
                code: Some(3),
                message: message.clone(),
            },
            _ => OperationStatus::Running,
        })
    }
}
