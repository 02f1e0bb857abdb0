//! HDFS HA federation and Kerberos hardening properties

use crate::descriptor::OnPremHdfs;
use crate::identifier::ClusterIdentifier;
use crate::model::{ClusterProperties, Component};

pub const NAMENODE_RPC_PORT: u16 = 8020;
pub const NAMENODE_HTTP_PORT: u16 = 20101;
pub const FAILOVER_PROXY_PROVIDER: &str =
    "org.apache.hadoop.hdfs.server.namenode.ha.ConfiguredFailoverProxyProvider";

/// Name node ids inside the on-prem nameservice
const NAMENODE_IDS: [&str; 2] = ["nn1", "nn2"];

/// Maps `dataproc-*` service principals to `dataproc`, everything else to its short name
pub const AUTH_TO_LOCAL_RULES: &str = "RULE:[1:$1@$0](dataproc-.+@.*)s/.*/dataproc//\n    RULE:[1:$1](.*)s/(.*)/$1/g\n    RULE:[2:$1](.*)s/(.*)/$1/g\n    DEFAULT";

/// Client-side view of the on-prem HA nameservice.
///
/// Borrowing the local [`ClusterIdentifier`] is what ties the cluster name to
/// the first entry of `dfs.nameservices`.
#[derive(Debug, Clone, Copy)]
pub struct HdfsFederation<'a> {
    local: &'a ClusterIdentifier,
    nameservice: &'a str,
    name_nodes: [&'a str; 2],
}

impl<'a> HdfsFederation<'a> {
    pub fn new(local: &'a ClusterIdentifier, on_prem: &'a OnPremHdfs) -> Self {
        Self {
            local,
            nameservice: &on_prem.nameservice,
            name_nodes: [&on_prem.name_node_1, &on_prem.name_node_2],
        }
    }

    /// `{local},{on-prem}` value of `dfs.nameservices`
    pub fn nameservices(&self) -> String {
        format!("{},{}", self.local, self.nameservice)
    }

    pub fn apply(&self, props: &mut ClusterProperties) {
        let ns = self.nameservice;

        props.set(
            Component::Hdfs,
            format!("dfs.ha.namenodes.{}", ns),
            NAMENODE_IDS.join(","),
        );
        props.set(
            Component::Hdfs,
            format!("dfs.client.failover.proxy.provider.{}", ns),
            FAILOVER_PROXY_PROVIDER,
        );
        props.set(
            Component::Hdfs,
            format!("dfs.ha.automatic-failover.enabled.{}", ns),
            "true",
        );

        for (id, host) in NAMENODE_IDS.iter().zip(self.name_nodes) {
            props.set(
                Component::Hdfs,
                format!("dfs.namenode.rpc-address.{}.{}", ns, id),
                format!("{}:{}", host, NAMENODE_RPC_PORT),
            );
            props.set(
                Component::Hdfs,
                format!("dfs.namenode.http-address.{}.{}", ns, id),
                format!("{}:{}", host, NAMENODE_HTTP_PORT),
            );
        }

        props.set(Component::Hdfs, "dfs.nameservices", self.nameservices());
    }
}

/// RPC authentication and transfer authentication without wire encryption.
/// Only suitable inside a trusted network boundary.
pub fn apply_security_hardening(props: &mut ClusterProperties) {
    props.set(Component::Core, "hadoop.rpc.protection", "authentication");
    props.set(Component::Hdfs, "dfs.encrypt.data.transfer", "false");
    props.set(Component::Hdfs, "dfs.data.transfer.protection", "authentication");
    props.set(
        Component::Core,
        "hadoop.security.auth_to_local",
        AUTH_TO_LOCAL_RULES,
    );
}
