//! Database deployment sequencing
//!
//! One request runs: validate, resolve profile, generate password, create
//! StatefulSet, create Service, report node port. Nothing is rolled back:
//! a StatefulSet whose Service failed to create stays in the cluster.

use std::sync::Arc;

use dbdeploy_common::{DbType, DeployResponse};
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog;
use crate::config::{DeployConfig, StorageConfig};
use crate::error::ApiError;
use crate::kubernetes::error::K8sError;
use crate::kubernetes::{manifests, ClusterApi};
use crate::password::generate_password;
use crate::validation::validate_workload_name;

/// Failure of a deployment request
#[derive(Debug, Error)]
pub enum DeployError {
    /// Rejected before anything was sent to the cluster
    #[error(transparent)]
    Rejected(#[from] dbdeploy_common::Error),

    /// The cluster refused or failed a create call
    #[error(transparent)]
    Cluster(#[from] K8sError),
}

impl From<DeployError> for ApiError {
    fn from(err: DeployError) -> Self {
        match err {
            DeployError::Rejected(e) => e.into(),
            DeployError::Cluster(e) => e.into(),
        }
    }
}

/// Provisions database workloads through a [`ClusterApi`]
pub struct DeploymentManager {
    cluster: Arc<dyn ClusterApi>,
    namespace: String,
    storage: StorageConfig,
    password_length: usize,
}

impl DeploymentManager {
    pub fn new(cluster: Arc<dyn ClusterApi>, config: &DeployConfig) -> Self {
        Self {
            cluster,
            namespace: config.kubernetes.namespace.clone(),
            storage: config.storage.clone(),
            password_length: config.credentials.password_length,
        }
    }

    pub fn cluster(&self) -> &dyn ClusterApi {
        self.cluster.as_ref()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Deploy a database given its engine name as received from a client
    pub async fn deploy_named(&self, name: &str, db_type: &str) -> Result<DeployResponse, DeployError> {
        let db_type = db_type.parse::<DbType>()?;
        self.deploy(name, db_type).await
    }

    /// Create the StatefulSet and its NodePort Service for `name`
    pub async fn deploy(&self, name: &str, db_type: DbType) -> Result<DeployResponse, DeployError> {
        validate_workload_name(name)?;
        let profile = catalog::profile(db_type);
        let password = generate_password(self.password_length);

        let stateful_set = manifests::build_stateful_set(name, profile, &password, &self.storage);
        self.cluster
            .create_stateful_set(&self.namespace, &stateful_set)
            .await?;
        info!(
            name = %name,
            db_type = %db_type,
            namespace = %self.namespace,
            "StatefulSet created"
        );

        let service = manifests::build_service(name, &stateful_set)?;
        let created = match self.cluster.create_service(&self.namespace, &service).await {
            Ok(created) => created,
            Err(e) => {
                warn!(
                    name = %name,
                    namespace = %self.namespace,
                    error = %e,
                    "Service creation failed; StatefulSet left in place"
                );
                return Err(e.into());
            }
        };

        let port = manifests::node_port(&created);
        info!(
            name = %name,
            db_type = %db_type,
            namespace = %self.namespace,
            node_port = ?port,
            "Service created"
        );

        Ok(DeployResponse {
            message: format!("StatefulSet {} and its service created", name),
            db_type,
            username: profile.username.to_string(),
            password,
            database: profile.database.to_string(),
            port,
        })
    }
}
