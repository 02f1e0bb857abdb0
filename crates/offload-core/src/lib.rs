//! Offload Core
//!
//! Turns an environment descriptor into a Dataproc cluster specification
//! that federates with an on-prem HDFS HA nameservice over a Kerberos
//! cross-realm trust.
//!
//! ```text
//! RawDescriptor (YAML mapping)
//!     │  EnvironmentDescriptor::from_mapping   (all missing keys at once)
//!     ▼
//! EnvironmentDescriptor ──► ClusterIdentifier (cluster-{workload}-data-offload-{env}-fNNN)
//!     │                         │
//!     ▼                         ▼
//! ClusterSpecBuilder ──► HdfsFederation (dfs.nameservices = {id},{on-prem ns})
//!     │
//!     ▼
//! ClusterSpecification (request body)
//! ```

pub mod builder;
pub mod descriptor;
pub mod error;
pub mod federation;
pub mod identifier;
pub mod model;

#[cfg(test)]
mod fixtures;

pub use builder::{BuildDefaults, ClusterSpecBuilder, build};
pub use descriptor::{EnvironmentDescriptor, REQUIRED_KEYS, RawDescriptor};
pub use error::{Result, SpecError};
pub use federation::HdfsFederation;
pub use identifier::ClusterIdentifier;
pub use model::{ClusterProperties, ClusterSpecification, Component};
