use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const DESCRIPTOR: &str = r#"
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
root_principal_password_uri: gs://secrets/root.encrypted
cross_realm_trust_shared_password_uri: gs://secrets/trust.encrypted
data_proc_tags: [offload, hdfs]
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

pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        Self { root }
    }

    pub fn write_descriptor(&self, name: &str, content: &str) {
        fs::write(self.root.path().join(name), content).unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }
}
