//! DataprocClient against an in-process fake of the regional REST endpoint

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use offload_cloud::{CloudError, CreateClusterRequest, ProvisioningClient, WaitConfig, provision};
use offload_cloud_dataproc::{DataprocClient, TokenSource};
use offload_core::{ClusterSpecBuilder, EnvironmentDescriptor};
use serde_json::{Value, json};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const DESCRIPTOR: &str = r#"
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
data_proc_tags: [offload]
idle_delete_ttl: 3600s
worker_num_instances: 0
gcs_bucket_for_dataproc: dtp-dev-dataproc
master_config_machine_type: n1-standard-8
worker_config_machine_type: n1-standard-8
cross_realm_trust_kdc: kdc.corp.example.com
cross_realm_trust_realm: CORP.EXAMPLE.COM
cross_realm_trust_admin_server: kdc.corp.example.com
subnetwork_uri_project: host-project
subnetwork_uri_subnetworks: offload-subnet
"#;

#[derive(Default)]
struct FakeState {
    reject_with: Option<(StatusCode, String)>,
    polls_until_done: usize,
    polls: usize,
    created: Vec<Value>,
    existing: HashSet<String>,
    authorization: Vec<String>,
    stall: Option<Duration>,
}

type Shared = Arc<Mutex<FakeState>>;

async fn create_cluster(
    State(state): State<Shared>,
    Path((project, region)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        state.authorization.push(auth.to_string());
    }
    if let Some((status, message)) = state.reject_with.clone() {
        let body = json!({"error": {"code": status.as_u16(), "message": message, "status": "RESOURCE_EXHAUSTED"}});
        return (status, Json(body)).into_response();
    }

    let cluster_name = body["cluster_name"].clone();
    state.created.push(body);
    Json(json!({
        "name": format!("projects/{}/regions/{}/operations/op-1", project, region),
        "metadata": {"clusterName": cluster_name, "description": "Create cluster"}
    }))
    .into_response()
}

async fn get_cluster(
    State(state): State<Shared>,
    Path((_project, _region, cluster)): Path<(String, String, String)>,
) -> Response {
    let stall = state.lock().unwrap().stall;
    if let Some(delay) = stall {
        tokio::time::sleep(delay).await;
    }

    let state = state.lock().unwrap();
    if state.existing.contains(&cluster) {
        Json(json!({"clusterName": cluster})).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"code": 404, "message": "Not found"}})),
        )
            .into_response()
    }
}

async fn get_operation(
    State(state): State<Shared>,
    Path((project, region, op)): Path<(String, String, String)>,
) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.polls += 1;
    let name = format!("projects/{}/regions/{}/operations/{}", project, region, op);
    let cluster_name = state
        .created
        .last()
        .map(|c| c["cluster_name"].clone())
        .unwrap_or(Value::Null);

    if state.polls > state.polls_until_done {
        Json(json!({
            "name": name,
            "done": true,
            "response": {"clusterName": cluster_name, "clusterUuid": "0f1e2d3c"}
        }))
    } else {
        Json(json!({"name": name, "metadata": {"clusterName": cluster_name}}))
    }
}

async fn spawn(state: Shared) -> String {
    let app = Router::new()
        .route(
            "/v1/projects/{project}/regions/{region}/clusters",
            post(create_cluster),
        )
        .route(
            "/v1/projects/{project}/regions/{region}/clusters/{cluster}",
            get(get_cluster),
        )
        .route(
            "/v1/projects/{project}/regions/{region}/operations/{op}",
            get(get_operation),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn request() -> CreateClusterRequest {
    let raw = serde_yaml::from_str(DESCRIPTOR).unwrap();
    let descriptor = EnvironmentDescriptor::from_mapping(&raw).unwrap();
    let spec = ClusterSpecBuilder::new(&descriptor).build().unwrap();
    CreateClusterRequest::new(&descriptor.placement.region, spec)
}

fn fast_wait() -> WaitConfig {
    WaitConfig {
        timeout: Duration::from_secs(5),
        initial_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(50),
        backoff_multiplier: 2.0,
    }
}

async fn client_for(state: &Shared) -> DataprocClient {
    let endpoint = spawn(state.clone()).await;
    DataprocClient::new(TokenSource::Static("test-token".to_string()))
        .unwrap()
        .with_endpoint(endpoint)
}

#[tokio::test]
async fn test_create_and_wait() {
    let state: Shared = Arc::new(Mutex::new(FakeState {
        polls_until_done: 2,
        ..Default::default()
    }));
    let client = client_for(&state).await;
    let request = request();

    let result = provision(&client, &request, &fast_wait()).await.unwrap();

    assert_eq!(result.cluster_name, request.cluster_name());
    assert_eq!(result.cluster_uuid.as_deref(), Some("0f1e2d3c"));

    let state = state.lock().unwrap();
    assert_eq!(state.polls, 3);
    assert_eq!(state.authorization, vec!["Bearer test-token"]);

    let body = &state.created[0];
    assert_eq!(body["project_id"], "dtp-dev");
    assert_eq!(body["config"]["worker_config"]["num_instances"], 0);
    assert_eq!(
        body["config"]["software_config"]["properties"]["hdfs:dfs.nameservices"],
        format!("{},nsfed1", request.cluster_name())
    );
    assert_eq!(
        body["config"]["security_config"]["kerberos_config"]["enable_kerberos"],
        true
    );
}

#[tokio::test]
async fn test_rejection_surfaces_remote_message() {
    let state: Shared = Arc::new(Mutex::new(FakeState {
        reject_with: Some((
            StatusCode::TOO_MANY_REQUESTS,
            "Insufficient 'CPUS' quota. Requested 136.0, available 24.0.".to_string(),
        )),
        ..Default::default()
    }));
    let client = client_for(&state).await;

    let err = provision(&client, &request(), &fast_wait())
        .await
        .unwrap_err();

    match err {
        CloudError::Provisioning { code, message } => {
            assert_eq!(code, Some(429));
            assert_eq!(
                message,
                "Insufficient 'CPUS' quota. Requested 136.0, available 24.0."
            );
        }
        other => panic!("Expected Provisioning error, got {:?}", other),
    }
    let state = state.lock().unwrap();
    assert_eq!(state.authorization.len(), 1);
    assert_eq!(state.polls, 0);
}

#[tokio::test]
async fn test_wait_deadline() {
    let state: Shared = Arc::new(Mutex::new(FakeState {
        polls_until_done: usize::MAX,
        ..Default::default()
    }));
    let client = client_for(&state).await;
    let wait = WaitConfig {
        timeout: Duration::from_millis(200),
        ..fast_wait()
    };

    let err = provision(&client, &request(), &wait).await.unwrap_err();

    assert!(matches!(err, CloudError::ProvisioningTimeout { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_cluster_exists() {
    let state: Shared = Arc::new(Mutex::new(FakeState::default()));
    state
        .lock()
        .unwrap()
        .existing
        .insert("cluster-etl-data-offload-dev-f500".to_string());
    let client = client_for(&state).await;

    assert!(
        client
            .cluster_exists("dtp-dev", "us-central1", "cluster-etl-data-offload-dev-f500")
            .await
            .unwrap()
    );
    assert!(
        !client
            .cluster_exists("dtp-dev", "us-central1", "cluster-etl-data-offload-dev-f501")
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_hung_request_is_cut_off() {
    let state: Shared = Arc::new(Mutex::new(FakeState {
        stall: Some(Duration::from_secs(30)),
        ..Default::default()
    }));
    let endpoint = spawn(state.clone()).await;
    let client = DataprocClient::with_request_timeout(
        TokenSource::Static("test-token".to_string()),
        Duration::from_millis(200),
    )
    .unwrap()
    .with_endpoint(endpoint);

    let started = Instant::now();
    let err = client
        .cluster_exists("dtp-dev", "us-central1", "cluster-etl-data-offload-dev-f500")
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(10));
    assert!(matches!(err, CloudError::ApiError(_)));
}
