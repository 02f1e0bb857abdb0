//! Cluster specification tree
//!
//! Mirrors the Dataproc `Cluster` resource. Field names are the service's
//! proto field names and are serialized verbatim as the creation request body.

use crate::identifier::ClusterIdentifier;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterSpecification {
    pub project_id: String,
    pub cluster_name: ClusterIdentifier,
    pub config: ClusterConfig,
}

impl ClusterSpecification {
    /// Look up a software property by its prefixed key (e.g. `hdfs:dfs.nameservices`)
    pub fn property(&self, key: &str) -> Option<&str> {
        self.config.software_config.properties.get(key)
    }

    /// Serialized request body
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterConfig {
    pub config_bucket: String,
    pub temp_bucket: String,
    pub gce_cluster_config: GceClusterConfig,
    pub master_config: InstanceGroupConfig,
    pub worker_config: InstanceGroupConfig,
    pub software_config: SoftwareConfig,
    pub security_config: SecurityConfig,
    pub endpoint_config: EndpointConfig,
    pub lifecycle_config: LifecycleConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GceClusterConfig {
    pub service_account: String,
    pub tags: Vec<String>,
    pub zone_uri: String,
    pub internal_ip_only: bool,
    pub service_account_scopes: Vec<String>,
    pub subnetwork_uri: String,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceGroupConfig {
    pub num_instances: u32,
    pub machine_type_uri: String,
    pub disk_config: DiskConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskConfig {
    pub boot_disk_type: String,
    pub boot_disk_size_gb: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftwareConfig {
    pub image_version: String,
    pub properties: ClusterProperties,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityConfig {
    pub kerberos_config: KerberosConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KerberosConfig {
    pub enable_kerberos: bool,
    pub kms_key_uri: String,
    pub root_principal_password_uri: String,
    pub realm: String,
    #[serde(flatten)]
    pub cross_realm_trust: CrossRealmTrustConfig,
}

/// Trust block; lives inside `kerberos_config` on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossRealmTrustConfig {
    pub cross_realm_trust_admin_server: String,
    pub cross_realm_trust_kdc: String,
    pub cross_realm_trust_realm: String,
    pub cross_realm_trust_shared_password_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointConfig {
    pub enable_http_port_access: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LifecycleConfig {
    pub idle_delete_ttl: String,
}

/// Configuration file a software property is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    Core,
    Hdfs,
    Yarn,
    Dataproc,
}

impl Component {
    pub fn prefix(&self) -> &'static str {
        match self {
            Component::Core => "core",
            Component::Hdfs => "hdfs",
            Component::Yarn => "yarn",
            Component::Dataproc => "dataproc",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// `{component}:{key}` properties, kept sorted so serialization is stable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClusterProperties(BTreeMap<String, String>);

impl ClusterProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, component: Component, key: impl AsRef<str>, value: impl Into<String>) {
        self.0
            .insert(format!("{}:{}", component, key.as_ref()), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_prefixed_and_sorted() {
        let mut props = ClusterProperties::new();
        props.set(Component::Yarn, "yarn.scheduler.minimum-allocation-mb", "256");
        props.set(Component::Core, "hadoop.rpc.protection", "authentication");

        assert_eq!(props.get("core:hadoop.rpc.protection"), Some("authentication"));
        let keys: Vec<&String> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "core:hadoop.rpc.protection",
                "yarn:yarn.scheduler.minimum-allocation-mb"
            ]
        );
    }

    #[test]
    fn test_trust_block_flattened_into_kerberos_config() {
        let kerberos = KerberosConfig {
            enable_kerberos: true,
            kms_key_uri: "projects/p/locations/l/keyRings/r/cryptoKeys/k".to_string(),
            root_principal_password_uri: "gs://b/root".to_string(),
            realm: "LOCAL".to_string(),
            cross_realm_trust: CrossRealmTrustConfig {
                cross_realm_trust_admin_server: "kadmin".to_string(),
                cross_realm_trust_kdc: "kdc".to_string(),
                cross_realm_trust_realm: "REMOTE".to_string(),
                cross_realm_trust_shared_password_uri: "gs://b/trust".to_string(),
            },
        };

        let json = serde_json::to_value(&kerberos).unwrap();
        assert_eq!(json["cross_realm_trust_kdc"], "kdc");
        assert_eq!(json["realm"], "LOCAL");
        assert!(json.get("cross_realm_trust").is_none());
    }
}
