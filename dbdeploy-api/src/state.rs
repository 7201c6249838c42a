//! Application State
//!
//! Shared state for the dbdeploy API server

use std::sync::Arc;

use crate::config::DeployConfig;
use crate::deploy::DeploymentManager;
use crate::health::HealthChecker;
use crate::kubernetes::ClusterApi;

/// Shared application state
pub struct AppState {
    pub deployment_manager: DeploymentManager,
    pub health_checker: HealthChecker,
}

impl AppState {
    pub fn new(cluster: Arc<dyn ClusterApi>, config: &DeployConfig) -> Self {
        Self {
            deployment_manager: DeploymentManager::new(cluster, config),
            health_checker: HealthChecker::new(env!("CARGO_PKG_VERSION")),
        }
    }
}
