//! Environment descriptors
//!
//! A descriptor arrives as a flat YAML mapping and is validated in a single
//! pass into [`EnvironmentDescriptor`]. Every absent key is reported at once.

use crate::error::{Result, SpecError};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Untyped descriptor as parsed from a YAML document
pub type RawDescriptor = Mapping;

/// Every key a descriptor must carry, in declaration order
pub const REQUIRED_KEYS: [&str; 26] = [
    // identity / placement
    "env",
    "zone",
    "region",
    "workload",
    "dataproc_sa",
    "dtp_project_id",
    // on-prem federation
    "on_prem_name_node_1",
    "on_prem_name_node_2",
    "on_prem_hdfs_nameservice",
    // security material
    "key",
    "keyring_name",
    "keyring_location",
    "security_realm",
    "root_principal_password_uri",
    "cross_realm_trust_shared_password_uri",
    // cluster shape
    "data_proc_tags",
    "idle_delete_ttl",
    "worker_num_instances",
    "gcs_bucket_for_dataproc",
    "master_config_machine_type",
    "worker_config_machine_type",
    // cross-realm trust
    "cross_realm_trust_kdc",
    "cross_realm_trust_realm",
    "cross_realm_trust_admin_server",
    // network
    "subnetwork_uri_project",
    "subnetwork_uri_subnetworks",
];

/// Validated description of one target cluster environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentDescriptor {
    pub placement: Placement,
    pub on_prem: OnPremHdfs,
    pub security: SecurityMaterial,
    pub shape: ClusterShape,
    pub trust: CrossRealmTrust,
    pub network: NetworkPlacement,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub env: String,
    pub zone: String,
    pub region: String,
    pub workload: String,
    pub service_account: String,
    pub project_id: String,
}

/// On-prem HDFS HA pair the new cluster federates with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnPremHdfs {
    pub name_node_1: String,
    pub name_node_2: String,
    pub nameservice: String,
}

/// References to security material. Never dereferenced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityMaterial {
    pub key: String,
    pub keyring_name: String,
    pub keyring_location: String,
    pub realm: String,
    pub root_principal_password_uri: String,
    pub cross_realm_trust_shared_password_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterShape {
    pub tags: Vec<String>,
    /// Protobuf duration text, always `{seconds}s`
    pub idle_delete_ttl: String,
    pub worker_num_instances: u32,
    pub bucket: String,
    pub master_machine_type: String,
    pub worker_machine_type: String,
}

/// External KDC the cluster realm trusts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossRealmTrust {
    pub kdc: String,
    pub realm: String,
    pub admin_server: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkPlacement {
    pub subnetwork_project: String,
    pub subnetwork: String,
}

impl EnvironmentDescriptor {
    /// Validate a raw mapping into a typed descriptor.
    ///
    /// Presence of all required keys is checked first so that the error
    /// names every absent key, then each value is converted to its type.
    #[tracing::instrument(skip_all)]
    pub fn from_mapping(raw: &RawDescriptor) -> Result<Self> {
        let fields = Fields { raw };

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| fields.is_absent(key))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SpecError::MissingParameter { keys: missing });
        }

        for key in raw.keys().filter_map(Value::as_str) {
            if !REQUIRED_KEYS.contains(&key) {
                debug!(key, "Ignoring unknown descriptor key");
            }
        }

        Ok(Self {
            placement: Placement {
                env: fields.string("env")?,
                zone: fields.string("zone")?,
                region: fields.string("region")?,
                workload: fields.string("workload")?,
                service_account: fields.string("dataproc_sa")?,
                project_id: fields.string("dtp_project_id")?,
            },
            on_prem: OnPremHdfs {
                name_node_1: fields.string("on_prem_name_node_1")?,
                name_node_2: fields.string("on_prem_name_node_2")?,
                nameservice: fields.string("on_prem_hdfs_nameservice")?,
            },
            security: SecurityMaterial {
                key: fields.string("key")?,
                keyring_name: fields.string("keyring_name")?,
                keyring_location: fields.string("keyring_location")?,
                realm: fields.string("security_realm")?,
                root_principal_password_uri: fields.string("root_principal_password_uri")?,
                cross_realm_trust_shared_password_uri: fields
                    .string("cross_realm_trust_shared_password_uri")?,
            },
            shape: ClusterShape {
                tags: fields.tags("data_proc_tags")?,
                idle_delete_ttl: fields.seconds("idle_delete_ttl")?,
                worker_num_instances: fields.count("worker_num_instances")?,
                bucket: fields.string("gcs_bucket_for_dataproc")?,
                master_machine_type: fields.string("master_config_machine_type")?,
                worker_machine_type: fields.string("worker_config_machine_type")?,
            },
            trust: CrossRealmTrust {
                kdc: fields.string("cross_realm_trust_kdc")?,
                realm: fields.string("cross_realm_trust_realm")?,
                admin_server: fields.string("cross_realm_trust_admin_server")?,
            },
            network: NetworkPlacement {
                subnetwork_project: fields.string("subnetwork_uri_project")?,
                subnetwork: fields.string("subnetwork_uri_subnetworks")?,
            },
        })
    }
}

struct Fields<'a> {
    raw: &'a Mapping,
}

impl Fields<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key).map(untag)
    }

    /// Null values and blank strings count as absent
    fn is_absent(&self, key: &str) -> bool {
        match self.get(key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        }
    }

    fn value(&self, key: &str) -> Result<&Value> {
        self.get(key).ok_or_else(|| SpecError::MissingParameter {
            keys: vec![key.to_string()],
        })
    }

    /// Values are passed through verbatim; whitespace only matters for the blank check
    fn string(&self, key: &str) -> Result<String> {
        scalar_text(self.value(key)?)
            .ok_or_else(|| SpecError::invalid(key, "expected a scalar value"))
    }

    /// Positive whole seconds, bare or with an `s` suffix, as `{n}s`
    fn seconds(&self, key: &str) -> Result<String> {
        let text = self.string(key)?;
        let digits = text.trim();
        let digits = digits.strip_suffix('s').unwrap_or(digits);

        match digits.parse::<u64>() {
            Ok(n) if n > 0 && digits.chars().all(|c| c.is_ascii_digit()) => Ok(format!("{}s", n)),
            _ => Err(SpecError::invalid(
                key,
                format!("'{}' is not a positive number of seconds", text),
            )),
        }
    }

    fn tags(&self, key: &str) -> Result<Vec<String>> {
        let items: Vec<String> = match self.value(key)? {
            Value::Sequence(seq) => seq
                .iter()
                .map(|item| {
                    scalar_text(untag(item))
                        .ok_or_else(|| SpecError::invalid(key, "tags must be scalar values"))
                })
                .collect::<Result<_>>()?,
            Value::String(s) => s.split(',').map(str::to_string).collect(),
            _ => return Err(SpecError::invalid(key, "expected a list of tags")),
        };

        let mut tags: Vec<String> = Vec::with_capacity(items.len());
        for tag in items.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !tags.iter().any(|existing| existing == tag) {
                tags.push(tag.to_string());
            }
        }
        Ok(tags)
    }

    fn count(&self, key: &str) -> Result<u32> {
        let parsed: i64 = match self.value(key)? {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| SpecError::invalid(key, format!("'{}' is not a whole number", n)))?,
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| SpecError::invalid(key, format!("'{}' is not a number", s.trim())))?,
            _ => return Err(SpecError::invalid(key, "expected an integer")),
        };

        if parsed < 0 {
            return Err(SpecError::invalid(
                key,
                format!("must not be negative (got {})", parsed),
            ));
        }
        u32::try_from(parsed)
            .ok()
            .filter(|n| i32::try_from(*n).is_ok())
            .ok_or_else(|| SpecError::invalid(key, format!("{} is too large", parsed)))
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
