//! Kubernetes integration
//!
//! - Cluster connection (in-cluster, local kubeconfig, explicit kubeconfig)
//! - Manifest builders for database StatefulSets and their Services
//! - The [`ClusterApi`] seam used by the deployment sequence

pub mod client;
pub mod error;
pub mod manifests;

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::Service;

pub use client::K8sClient;
use error::K8sResult;

/// Cluster operations needed to provision a database
///
/// Implemented by [`K8sClient`] against a real API server and by test doubles.
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// Create a namespaced StatefulSet, returning the object as stored
    async fn create_stateful_set(
        &self,
        namespace: &str,
        stateful_set: &StatefulSet,
    ) -> K8sResult<StatefulSet>;

    /// Create a namespaced Service, returning the object as stored
    async fn create_service(&self, namespace: &str, service: &Service) -> K8sResult<Service>;

    /// API server git version, used as a reachability probe
    async fn server_version(&self) -> K8sResult<String>;
}
