//! Kubernetes error types and ApiError mapping
//!
//! Maps kube-rs errors to API errors for consistent error handling.

use crate::error::ApiError;
use thiserror::Error;

/// Kubernetes-specific errors
#[derive(Debug, Error)]
pub enum K8sError {
    /// Error from kube-rs client
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    /// No usable cluster configuration
    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    /// A built manifest is missing something the next step needs
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),
}

impl K8sError {
    /// HTTP status code reported by the API server, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            K8sError::KubeError(kube::Error::Api(response)) => Some(response.code),
            _ => None,
        }
    }
}

impl From<K8sError> for ApiError {
    fn from(err: K8sError) -> Self {
        match err.status_code() {
            Some(401) => return ApiError::AuthenticationFailed,
            Some(403) => return ApiError::Forbidden(err.to_string()),
            Some(404) => return ApiError::NotFound(err.to_string()),
            Some(409) => return ApiError::Conflict(err.to_string()),
            Some(422) => return ApiError::ValidationError(err.to_string()),
            _ => {}
        }

        match err {
            K8sError::KubeError(e) => ApiError::Internal(format!("Kubernetes error: {}", e)),
            K8sError::InvalidKubeconfig(msg) => ApiError::ServiceUnavailable(msg),
            K8sError::InvalidManifest(msg) => ApiError::Internal(format!("Invalid manifest: {}", msg)),
        }
    }
}

/// Result type alias for Kubernetes operations
pub type K8sResult<T> = std::result::Result<T, K8sError>;
