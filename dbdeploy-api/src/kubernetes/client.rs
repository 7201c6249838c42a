//! Kubernetes client wrapper
//!
//! Wraps the kube-rs Client and implements [`ClusterApi`] on top of it.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::StatefulSet;
use k8s_openapi::api::core::v1::Service;
use kube::api::{Api, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};

use super::error::{K8sError, K8sResult};
use super::ClusterApi;
use crate::config::KubernetesConfig;

/// Wrapper around kube-rs Client
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    api_server: String,
}

impl K8sClient {
    /// Build a client from the `[kubernetes]` config section
    ///
    /// An explicit kubeconfig path wins; otherwise the in-cluster
    /// environment is tried before the local kubeconfig.
    pub async fn from_config(config: &KubernetesConfig) -> K8sResult<Self> {
        match &config.kubeconfig {
            Some(path) => {
                let yaml = tokio::fs::read_to_string(path).await.map_err(|e| {
                    K8sError::InvalidKubeconfig(format!(
                        "Failed to read kubeconfig {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::from_kubeconfig(&yaml, config.context.as_deref()).await
            }
            None => Self::connect(config.context.as_deref()).await,
        }
    }

    /// In-cluster configuration first, local kubeconfig as fallback
    pub async fn connect(context: Option<&str>) -> K8sResult<Self> {
        let config = match Config::incluster() {
            Ok(config) => {
                tracing::info!("Using in-cluster Kubernetes configuration");
                config
            }
            Err(incluster_err) => {
                tracing::debug!("In-cluster configuration unavailable: {}", incluster_err);

                let options = KubeConfigOptions {
                    context: context.map(String::from),
                    ..Default::default()
                };
                let config = Config::from_kubeconfig(&options).await.map_err(|e| {
                    tracing::error!("Local kubeconfig unavailable: {}", e);
                    K8sError::InvalidKubeconfig(
                        "Could not configure kubernetes client".to_string(),
                    )
                })?;
                tracing::info!("Using local kubeconfig");
                config
            }
        };

        Self::from_kube_config(config)
    }

    /// Create client from kubeconfig YAML with optional context
    pub async fn from_kubeconfig(kubeconfig_yaml: &str, context: Option<&str>) -> K8sResult<Self> {
        let kubeconfig = Kubeconfig::from_yaml(kubeconfig_yaml).map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to parse kubeconfig: {}", e))
        })?;

        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e)))?;

        Self::from_kube_config(config)
    }

    fn from_kube_config(config: Config) -> K8sResult<Self> {
        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            inner: client,
            api_server,
        })
    }

    /// Get API server URL
    pub fn api_server(&self) -> &str {
        &self.api_server
    }
}

#[async_trait]
impl ClusterApi for K8sClient {
    async fn create_stateful_set(
        &self,
        namespace: &str,
        stateful_set: &StatefulSet,
    ) -> K8sResult<StatefulSet> {
        let sts: Api<StatefulSet> = Api::namespaced(self.inner.clone(), namespace);
        Ok(sts.create(&PostParams::default(), stateful_set).await?)
    }

    async fn create_service(&self, namespace: &str, service: &Service) -> K8sResult<Service> {
        let services: Api<Service> = Api::namespaced(self.inner.clone(), namespace);
        Ok(services.create(&PostParams::default(), service).await?)
    }

    async fn server_version(&self) -> K8sResult<String> {
        let version = self.inner.apiserver_version().await?;
        Ok(version.git_version)
    }
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("api_server", &self.api_server)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUBECONFIG: &str = r#"
apiVersion: v1
kind: Config
current-context: test
clusters:
- name: test-cluster
  cluster:
    server: https://127.0.0.1:6443
    insecure-skip-tls-verify: true
contexts:
- name: test
  context:
    cluster: test-cluster
    user: test-user
users:
- name: test-user
  user:
    token: abc123
"#;

    #[tokio::test]
    async fn test_from_kubeconfig() {
        let client = K8sClient::from_kubeconfig(KUBECONFIG, None).await.unwrap();
        assert!(client.api_server().starts_with("https://127.0.0.1:6443"));
    }

    #[tokio::test]
    async fn test_from_kubeconfig_unknown_context() {
        let err = K8sClient::from_kubeconfig(KUBECONFIG, Some("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, K8sError::InvalidKubeconfig(_)));
    }

    #[tokio::test]
    async fn test_from_kubeconfig_garbage() {
        let err = K8sClient::from_kubeconfig(":: not yaml ::", None).await.unwrap_err();
        assert!(matches!(err, K8sError::InvalidKubeconfig(_)));
    }
}
