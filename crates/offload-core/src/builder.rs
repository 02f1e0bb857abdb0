//! Cluster specification builder
//!
//! Pure transformation from an [`EnvironmentDescriptor`] to a
//! [`ClusterSpecification`]. No I/O happens here.

use crate::descriptor::{EnvironmentDescriptor, RawDescriptor};
use crate::error::Result;
use crate::federation::{HdfsFederation, apply_security_hardening};
use crate::identifier::ClusterIdentifier;
use crate::model::{
    ClusterConfig, ClusterProperties, ClusterSpecification, Component, CrossRealmTrustConfig,
    DiskConfig, EndpointConfig, GceClusterConfig, InstanceGroupConfig, KerberosConfig,
    LifecycleConfig, SecurityConfig, SoftwareConfig,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const INIT_SCRIPTS_DIR: &str = "scripts/cluster-init-scripts";

/// Policy values that are not part of a descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDefaults {
    pub boot_disk_type: String,
    pub boot_disk_size_gb: u32,
    pub image_version: String,
    pub enable_http_port_access: bool,
    pub yarn_minimum_allocation_mb: u32,
}

impl Default for BuildDefaults {
    fn default() -> Self {
        Self {
            boot_disk_type: "pd-standard".to_string(),
            boot_disk_size_gb: 1024,
            image_version: "2.0.45-debian10".to_string(),
            enable_http_port_access: true,
            yarn_minimum_allocation_mb: 256,
        }
    }
}

/// Validate a raw descriptor and build its specification with a random identifier
pub fn build(raw: &RawDescriptor) -> Result<ClusterSpecification> {
    let descriptor = EnvironmentDescriptor::from_mapping(raw)?;
    ClusterSpecBuilder::new(&descriptor).build()
}

pub struct ClusterSpecBuilder<'a> {
    descriptor: &'a EnvironmentDescriptor,
    identifier: Option<ClusterIdentifier>,
    defaults: BuildDefaults,
}

impl<'a> ClusterSpecBuilder<'a> {
    pub fn new(descriptor: &'a EnvironmentDescriptor) -> Self {
        Self {
            descriptor,
            identifier: None,
            defaults: BuildDefaults::default(),
        }
    }

    /// Use a pre-derived identifier instead of drawing a random one
    pub fn identifier(mut self, identifier: ClusterIdentifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn defaults(mut self, defaults: BuildDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    #[tracing::instrument(
        skip(self),
        fields(
            workload = %self.descriptor.placement.workload,
            env = %self.descriptor.placement.env,
        )
    )]
    pub fn build(mut self) -> Result<ClusterSpecification> {
        let d = self.descriptor;
        let identifier = match self.identifier.take() {
            Some(id) => id,
            None => ClusterIdentifier::random(&d.placement.workload, &d.placement.env)?,
        };
        debug!(cluster = %identifier, "Derived cluster identifier");

        let bucket = &d.shape.bucket;
        let metadata = BTreeMap::from([
            (
                "startup-script-url".to_string(),
                format!("gs://{}/{}/startup.sh", bucket, INIT_SCRIPTS_DIR),
            ),
            (
                "shutdown-script-url".to_string(),
                format!("gs://{}/{}/shutdown.sh", bucket, INIT_SCRIPTS_DIR),
            ),
        ]);

        let gce_cluster_config = GceClusterConfig {
            service_account: d.placement.service_account.clone(),
            tags: d.shape.tags.clone(),
            zone_uri: d.placement.zone.clone(),
            internal_ip_only: true,
            service_account_scopes: vec![CLOUD_PLATFORM_SCOPE.to_string()],
            subnetwork_uri: format!(
                "projects/{}/regions/{}/subnetworks/{}",
                d.network.subnetwork_project, d.placement.region, d.network.subnetwork
            ),
            metadata,
        };

        let software_config = SoftwareConfig {
            image_version: self.defaults.image_version.clone(),
            properties: self.properties(&identifier),
        };

        let security_config = SecurityConfig {
            kerberos_config: KerberosConfig {
                enable_kerberos: true,
                kms_key_uri: format!(
                    "projects/{}/locations/{}/keyRings/{}/cryptoKeys/{}",
                    d.placement.project_id,
                    d.security.keyring_location,
                    d.security.keyring_name,
                    d.security.key
                ),
                root_principal_password_uri: d.security.root_principal_password_uri.clone(),
                realm: d.security.realm.clone(),
                cross_realm_trust: CrossRealmTrustConfig {
                    cross_realm_trust_admin_server: d.trust.admin_server.clone(),
                    cross_realm_trust_kdc: d.trust.kdc.clone(),
                    cross_realm_trust_realm: d.trust.realm.clone(),
                    cross_realm_trust_shared_password_uri: d
                        .security
                        .cross_realm_trust_shared_password_uri
                        .clone(),
                },
            },
        };

        let config = ClusterConfig {
            config_bucket: bucket.clone(),
            temp_bucket: bucket.clone(),
            gce_cluster_config,
            master_config: self.instance_group(1, &d.shape.master_machine_type),
            worker_config: self.instance_group(
                d.shape.worker_num_instances,
                &d.shape.worker_machine_type,
            ),
            software_config,
            security_config,
            endpoint_config: EndpointConfig {
                enable_http_port_access: self.defaults.enable_http_port_access,
            },
            lifecycle_config: LifecycleConfig {
                idle_delete_ttl: d.shape.idle_delete_ttl.clone(),
            },
        };

        info!(
            cluster = %identifier,
            workers = d.shape.worker_num_instances,
            nameservice = %d.on_prem.nameservice,
            "Cluster specification assembled"
        );

        Ok(ClusterSpecification {
            project_id: d.placement.project_id.clone(),
            cluster_name: identifier,
            config,
        })
    }

    fn instance_group(&self, num_instances: u32, machine_type: &str) -> InstanceGroupConfig {
        InstanceGroupConfig {
            num_instances,
            machine_type_uri: machine_type.to_string(),
            disk_config: DiskConfig {
                boot_disk_type: self.defaults.boot_disk_type.clone(),
                boot_disk_size_gb: self.defaults.boot_disk_size_gb,
            },
        }
    }

    fn properties(&self, identifier: &ClusterIdentifier) -> ClusterProperties {
        let mut props = ClusterProperties::new();
        props.set(Component::Dataproc, "dataproc.allow.zero.workers", "true");
        props.set(
            Component::Yarn,
            "yarn.scheduler.minimum-allocation-mb",
            self.defaults.yarn_minimum_allocation_mb.to_string(),
        );
        apply_security_hardening(&mut props);
        HdfsFederation::new(identifier, &self.descriptor.on_prem).apply(&mut props);
        props
    }
}
