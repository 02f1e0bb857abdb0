//! Shared descriptor fixtures for unit tests

use crate::descriptor::RawDescriptor;
use serde_yaml::Value;

pub const SAMPLE_DESCRIPTOR: &str = r#"
env: dev
zone: us-central1-a
region: us-central1
workload: etl
dataproc_sa: dataproc@dtp-dev.iam.gserviceaccount.com
dtp_project_id: dtp-dev
on_prem_name_node_1: nn1.internal
on_prem_name_node_2: nn2.internal
on_prem_hdfs_nameservice: nsfed1
key: offload-key
keyring_name: offload-ring
keyring_location: us-central1
security_realm: DATAPROC.EXAMPLE.COM
root_principal_password_uri: gs://dtp-dev-secrets/root-password.encrypted
cross_realm_trust_shared_password_uri: gs://dtp-dev-secrets/trust-password.encrypted
data_proc_tags:
  - offload
  - hdfs
idle_delete_ttl: 3600s
worker_num_instances: 2
gcs_bucket_for_dataproc: dtp-dev-dataproc
master_config_machine_type: n1-standard-8
worker_config_machine_type: n1-highmem-16
cross_realm_trust_kdc: kdc.corp.example.com
cross_realm_trust_realm: CORP.EXAMPLE.COM
cross_realm_trust_admin_server: kadmin.corp.example.com
subnetwork_uri_project: shared-vpc-host
subnetwork_uri_subnetworks: offload-subnet
"#;

pub fn sample_mapping() -> RawDescriptor {
    serde_yaml::from_str(SAMPLE_DESCRIPTOR).unwrap()
}

/// Sample descriptor with some keys replaced by YAML fragments
pub fn sample_yaml(overrides: &[(&str, &str)]) -> RawDescriptor {
    let mut raw = sample_mapping();
    for (key, fragment) in overrides {
        let value: Value = serde_yaml::from_str(fragment).unwrap();
        raw.insert(Value::String(key.to_string()), value);
    }
    raw
}
