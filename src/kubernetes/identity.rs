// Copyright 2026, The kquery authors
// SPDX-License-Identifier: Apache-2.0

//! Cluster identity resolution

use k8s_openapi::api::core::v1::Namespace;
use kube::{Api, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::config::ClientEnv;
use crate::constants;
use crate::error::{KqueryError, Result};

/// Stable identity of the cluster this process reports on.
///
/// The UID is the `kube-system` namespace UID, which survives for the
/// lifetime of the cluster. The name is a display string and may be empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterIdentity {
    pub uid: String,
    pub name: String,
}

/// Resolve the cluster identity.
///
/// When both identity overrides are present in the environment they are
/// returned directly and no API call is made. Otherwise the identity is
/// derived from the `kube-system` namespace: UID from its metadata, name
/// from its cluster-name annotation, falling back to the local hostname.
#[instrument(skip_all)]
pub async fn resolve_identity(client: &Client, env: &ClientEnv) -> Result<ClusterIdentity> {
    if let (Some(name), Some(uid)) = (env.cluster_name.as_ref(), env.cluster_uid.as_ref()) {
        debug!("Using cluster identity from environment overrides");
        return Ok(ClusterIdentity {
            uid: uid.clone(),
            name: name.clone(),
        });
    }

    let namespaces: Api<Namespace> = Api::all(client.clone());
    let ns = namespaces
        .get(constants::CLUSTER_ID_NAMESPACE)
        .await
        .map_err(|e| {
            KqueryError::IdentityFetch(format!(
                "Failed to get {} namespace: {}",
                constants::CLUSTER_ID_NAMESPACE, e
            ))
        })?;

    let uid = ns.metadata.uid.clone().unwrap_or_default();
    let name = annotated_cluster_name(&ns).unwrap_or_else(local_hostname);
    debug!("Resolved cluster identity: {} ({})", name, uid);

    Ok(ClusterIdentity { uid, name })
}

fn annotated_cluster_name(ns: &Namespace) -> Option<String> {
    ns.metadata
        .annotations
        .as_ref()
        .and_then(|a| a.get(constants::CLUSTER_NAME_ANNOTATION))
        .filter(|v| !v.is_empty())
        .cloned()
}

/// Best-effort hostname fallback; a lookup failure leaves the name empty
fn local_hostname() -> String {
    match hostname::get() {
        Ok(name) => name.to_string_lossy().into_owned(),
        Err(e) => {
            warn!("Unable to determine hostname: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{self, MockService};
    use http::{Request, Response};
    use kube::client::Body;

    fn override_env() -> ClientEnv {
        ClientEnv {
            cluster_name: Some("override-name".to_string()),
            cluster_uid: Some("override-uid".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn overrides_short_circuit_the_namespace_fetch() {
        // Every request against this client fails with 404, so a fetch
        // would surface as an error.
        let client = MockService::new().into_client();

        let identity = resolve_identity(&client, &override_env()).await.unwrap();

        assert_eq!(identity.uid, "override-uid");
        assert_eq!(identity.name, "override-name");
    }

    #[tokio::test]
    async fn identity_comes_from_namespace_metadata() {
        let (mock_service, mut handle) = tower_test::mock::pair::<Request<Body>, Response<Body>>();
        let server = tokio::spawn(async move {
            let (request, send) = handle.next_request().await.expect("namespace fetch");
            assert_eq!(request.uri().path(), "/api/v1/namespaces/kube-system");
            send.send_response(
                Response::builder()
                    .header("content-type", "application/json")
                    .body(Body::from(
                        test_utils::namespace_json("kube-system", "ns-uid-1234", Some("prod-east"))
                            .into_bytes(),
                    ))
                    .unwrap(),
            );
        });
        let client = Client::new(mock_service, "default");

        let identity = resolve_identity(&client, &ClientEnv::default())
            .await
            .unwrap();

        assert_eq!(identity.uid, "ns-uid-1234");
        assert_eq!(identity.name, "prod-east");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn single_override_is_ignored() {
        let client = MockService::new()
            .on_get(
                "/api/v1/namespaces/kube-system",
                200,
                &test_utils::namespace_json("kube-system", "ns-uid-1234", Some("prod-east")),
            )
            .into_client();
        let env = ClientEnv {
            cluster_name: Some("lonely-override".to_string()),
            ..Default::default()
        };

        let identity = resolve_identity(&client, &env).await.unwrap();

        assert_eq!(identity.uid, "ns-uid-1234");
        assert_eq!(identity.name, "prod-east");
    }

    #[tokio::test]
    async fn missing_annotation_falls_back_to_hostname() {
        let client = MockService::new()
            .on_get(
                "/api/v1/namespaces/kube-system",
                200,
                &test_utils::namespace_json("kube-system", "ns-uid-1234", None),
            )
            .into_client();

        let identity = resolve_identity(&client, &ClientEnv::default())
            .await
            .unwrap();

        let expected = hostname::get().unwrap().to_string_lossy().into_owned();
        assert_eq!(identity.uid, "ns-uid-1234");
        assert_eq!(identity.name, expected);
    }

    #[tokio::test]
    async fn empty_annotation_falls_back_to_hostname() {
        let client = MockService::new()
            .on_get(
                "/api/v1/namespaces/kube-system",
                200,
                &test_utils::namespace_json("kube-system", "ns-uid-1234", Some("")),
            )
            .into_client();

        let identity = resolve_identity(&client, &ClientEnv::default())
            .await
            .unwrap();

        let expected = hostname::get().unwrap().to_string_lossy().into_owned();
        assert_eq!(identity.name, expected);
    }

    #[tokio::test]
    async fn fetch_failure_is_fatal() {
        let client = MockService::new()
            .on_get(
                "/api/v1/namespaces/kube-system",
                500,
                &test_utils::server_error_json(),
            )
            .into_client();

        let err = resolve_identity(&client, &ClientEnv::default())
            .await
            .unwrap_err();

        match err {
            KqueryError::IdentityFetch(msg) => {
                assert!(msg.contains("kube-system"), "unexpected message: {}", msg);
            }
            other => panic!("expected identity fetch error, got {:?}", other),
        }
    }
}
