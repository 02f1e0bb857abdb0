//! Cluster identifier derivation
//!
//! Format: `cluster-{workload}-data-offload-{env}-f{NNN}` with `NNN` drawn
//! uniformly from 100..=999. The suffix only gives ~900 distinct values, so
//! callers that care about collisions must check against existing clusters.

use crate::error::{Result, SpecError};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;

pub const SUFFIX_RANGE: RangeInclusive<u16> = 100..=999;

/// Dataproc cluster names are limited to 51 characters
const MAX_CLUSTER_NAME_LEN: usize = 51;

/// Name of the cluster, and the nameservice label of its own HDFS
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClusterIdentifier(String);

impl ClusterIdentifier {
    pub fn generate<R: Rng>(workload: &str, env: &str, rng: &mut R) -> Result<Self> {
        let suffix = rng.gen_range(SUFFIX_RANGE);
        let name = format!("cluster-{}-data-offload-{}-f{}", workload, env, suffix);
        validate_name(workload, env, &name)?;
        Ok(Self(name))
    }

    pub fn random(workload: &str, env: &str) -> Result<Self> {
        Self::generate(workload, env, &mut rand::thread_rng())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The random numeric suffix
    pub fn suffix(&self) -> u16 {
        self.0
            .rsplit_once("-f")
            .and_then(|(_, digits)| digits.parse().ok())
            .unwrap_or_default()
    }
}

fn validate_name(workload: &str, env: &str, name: &str) -> Result<()> {
    for (key, part) in [("workload", workload), ("env", env)] {
        if let Some(bad) = part
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(SpecError::invalid(
                key,
                format!(
                    "'{}' contains '{}'; cluster names allow only lowercase letters, digits and '-'",
                    part, bad
                ),
            ));
        }
    }
    if name.len() > MAX_CLUSTER_NAME_LEN {
        return Err(SpecError::invalid(
            "workload",
            format!(
                "derived cluster name '{}' exceeds {} characters",
                name, MAX_CLUSTER_NAME_LEN
            ),
        ));
    }
    Ok(())
}

impl fmt::Display for ClusterIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClusterIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
