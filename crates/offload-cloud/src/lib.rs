//! Offload Cloud
//!
//! Provisioning client abstraction for offload clusters.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  offload CLI                     │
//! └─────────────────┬───────────────────────────────┘
//!                   │ CreateClusterRequest
//! ┌─────────────────▼───────────────────────────────┐
//! │                offload-cloud                     │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  trait ProvisioningClient { ... }         │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────────────┐     │
//! │  │  provision   │  │  waiter (deadline)   │     │
//! │  └──────────────┘  └──────────────────────┘     │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │   dataproc    │
//!           │    client     │
//!           └───────────────┘
//! ```

pub mod error;
pub mod provider;
pub mod provision;
pub mod waiter;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-exports
pub use error::{CloudError, Result};
pub use provider::{
    ClusterResult, CreateClusterRequest, OperationHandle, OperationStatus, ProvisioningClient,
};
pub use provision::{provision, reserve_cluster_name};
pub use waiter::{WaitConfig, wait_for_operation};
