//! Common test utilities and helpers

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dbdeploy_api::config::DeployConfig;
use dbdeploy_api::kubernetes::error::{K8sError, K8sResult};
use dbdeploy_api::kubernetes::ClusterApi;
use dbdeploy_api::AppState;
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::Service;

pub const ASSIGNED_NODE_PORT: i32 = 31337;

/// One create call observed by the mock cluster
#[derive(Debug, Clone)]
pub enum Call {
    StatefulSet { namespace: String, object: StatefulSet },
    Service { namespace: String, object: Service },
}

/// In-memory stand-in for the Kubernetes API server
#[derive(Default)]
pub struct MockCluster {
    calls: Mutex<Vec<Call>>,
    /// Reject StatefulSet creation with this HTTP status
    fail_stateful_set: Option<u16>,
    /// Reject Service creation with this HTTP status
    fail_service: Option<u16>,
    /// Report the API server as unreachable
    unreachable: bool,
}

impl MockCluster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cluster that rejects every StatefulSet create with `code`
    pub fn failing_stateful_set(code: u16) -> Self {
        Self {
            fail_stateful_set: Some(code),
            ..Self::default()
        }
    }

    /// Cluster that rejects every Service create with `code`
    pub fn failing_service(code: u16) -> Self {
        Self {
            fail_service: Some(code),
            ..Self::default()
        }
    }

    /// Cluster whose API server never answers
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stateful_sets(&self) -> Vec<StatefulSet> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::StatefulSet { object, .. } => Some(object),
                _ => None,
            })
            .collect()
    }

    pub fn services(&self) -> Vec<Service> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Service { object, .. } => Some(object),
                _ => None,
            })
            .collect()
    }
}

pub fn api_error(code: u16) -> K8sError {
    K8sError::KubeError(kube::Error::Api(kube::core::ErrorResponse {
        status: "Failure".to_string(),
        message: format!("mock failure {}", code),
        reason: "Mock".to_string(),
        code,
    }))
}

#[async_trait]
impl ClusterApi for MockCluster {
    async fn create_stateful_set(
        &self,
        namespace: &str,
        stateful_set: &StatefulSet,
    ) -> K8sResult<StatefulSet> {
        if let Some(code) = self.fail_stateful_set {
            return Err(api_error(code));
        }

        self.calls.lock().unwrap().push(Call::StatefulSet {
            namespace: namespace.to_string(),
            object: stateful_set.clone(),
        });

        let mut stored = stateful_set.clone();
        stored.metadata.namespace = Some(namespace.to_string());
        Ok(stored)
    }

    async fn create_service(&self, namespace: &str, service: &Service) -> K8sResult<Service> {
        if let Some(code) = self.fail_service {
            return Err(api_error(code));
        }

        self.calls.lock().unwrap().push(Call::Service {
            namespace: namespace.to_string(),
            object: service.clone(),
        });

        let mut stored = service.clone();
        stored.metadata.namespace = Some(namespace.to_string());
        if let Some(ports) = stored.spec.as_mut().and_then(|s| s.ports.as_mut()) {
            for port in ports.iter_mut() {
                port.node_port = Some(ASSIGNED_NODE_PORT);
            }
        }
        Ok(stored)
    }

    async fn server_version(&self) -> K8sResult<String> {
        if self.unreachable {
            return Err(api_error(503));
        }
        Ok("v1.32.0".to_string())
    }
}

/// Application state wired to a mock cluster
pub fn test_state(cluster: Arc<MockCluster>) -> Arc<AppState> {
    test_state_with_config(cluster, &DeployConfig::default())
}

pub fn test_state_with_config(cluster: Arc<MockCluster>, config: &DeployConfig) -> Arc<AppState> {
    Arc::new(AppState::new(cluster, config))
}
