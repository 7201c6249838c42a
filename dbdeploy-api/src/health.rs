//! Health check and readiness probes
//!
//! The only dependency worth probing is the Kubernetes API server: without it
//! no deployment can succeed.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::kubernetes::ClusterApi;

pub const KUBERNETES_COMPONENT: &str = "kubernetes";

/// Overall system health status
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All components healthy
    Healthy,
    /// Some components degraded but functional
    Degraded,
    /// System is unhealthy
    Unhealthy,
}

/// Individual component health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
    pub latency_ms: Option<u64>,
}

/// Comprehensive health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub timestamp: i64,
    pub components: Vec<ComponentHealth>,
}

/// Liveness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub alive: bool,
    pub timestamp: i64,
}

/// Readiness probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub reason: Option<String>,
    pub timestamp: i64,
}

/// Health checker for system components
pub struct HealthChecker {
    start_time: Instant,
    version: String,
}

impl HealthChecker {
    pub fn new(version: &str) -> Self {
        Self {
            start_time: Instant::now(),
            version: version.to_string(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Simple liveness check - is the service running?
    pub fn liveness(&self) -> LivenessResponse {
        LivenessResponse {
            alive: true,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Check that the Kubernetes API server answers
    pub async fn check_kubernetes<C: ClusterApi + ?Sized>(&self, cluster: &C) -> ComponentHealth {
        let start = Instant::now();

        match cluster.server_version().await {
            Ok(version) => ComponentHealth {
                name: KUBERNETES_COMPONENT.to_string(),
                status: HealthStatus::Healthy,
                message: Some(format!("API server {}", version)),
                latency_ms: Some(start.elapsed().as_millis() as u64),
            },
            Err(e) => ComponentHealth {
                name: KUBERNETES_COMPONENT.to_string(),
                status: HealthStatus::Unhealthy,
                message: Some(format!("API server unreachable: {}", e)),
                latency_ms: Some(start.elapsed().as_millis() as u64),
            },
        }
    }

    /// Aggregate component health into overall status
    fn aggregate_status(components: &[ComponentHealth]) -> HealthStatus {
        let mut has_unhealthy = false;
        let mut has_degraded = false;

        for component in components {
            match component.status {
                HealthStatus::Unhealthy => has_unhealthy = true,
                HealthStatus::Degraded => has_degraded = true,
                HealthStatus::Healthy => {}
            }
        }

        if has_unhealthy {
            HealthStatus::Unhealthy
        } else if has_degraded {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        }
    }

    /// Build complete health response
    pub fn build_response(&self, components: Vec<ComponentHealth>) -> HealthResponse {
        let status = Self::aggregate_status(&components);

        HealthResponse {
            status,
            version: self.version.clone(),
            uptime_seconds: self.uptime_seconds(),
            timestamp: chrono::Utc::now().timestamp(),
            components,
        }
    }

    /// Check readiness (can the service accept traffic?)
    pub fn readiness(&self, components: &[ComponentHealth]) -> ReadinessResponse {
        let cluster = components.iter().find(|c| c.name == KUBERNETES_COMPONENT);

        match cluster {
            Some(c) if c.status == HealthStatus::Healthy => ReadinessResponse {
                ready: true,
                reason: None,
                timestamp: chrono::Utc::now().timestamp(),
            },
            Some(c) => ReadinessResponse {
                ready: false,
                reason: c.message.clone(),
                timestamp: chrono::Utc::now().timestamp(),
            },
            None => ReadinessResponse {
                ready: false,
                reason: Some("Kubernetes not checked".to_string()),
                timestamp: chrono::Utc::now().timestamp(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, status: HealthStatus) -> ComponentHealth {
        ComponentHealth {
            name: name.to_string(),
            status,
            message: None,
            latency_ms: Some(5),
        }
    }

    #[test]
    fn test_health_status_aggregation() {
        let healthy = vec![component(KUBERNETES_COMPONENT, HealthStatus::Healthy)];
        assert_eq!(HealthChecker::aggregate_status(&healthy), HealthStatus::Healthy);

        let degraded = vec![
            component(KUBERNETES_COMPONENT, HealthStatus::Healthy),
            component("logging", HealthStatus::Degraded),
        ];
        assert_eq!(HealthChecker::aggregate_status(&degraded), HealthStatus::Degraded);

        let unhealthy = vec![
            component(KUBERNETES_COMPONENT, HealthStatus::Unhealthy),
            component("logging", HealthStatus::Degraded),
        ];
        assert_eq!(HealthChecker::aggregate_status(&unhealthy), HealthStatus::Unhealthy);
    }

    #[test]
    fn test_readiness_follows_kubernetes() {
        let checker = HealthChecker::new("0.1.0");

        let ready = checker.readiness(&[component(KUBERNETES_COMPONENT, HealthStatus::Healthy)]);
        assert!(ready.ready);

        let not_ready =
            checker.readiness(&[component(KUBERNETES_COMPONENT, HealthStatus::Unhealthy)]);
        assert!(!not_ready.ready);

        let unchecked = checker.readiness(&[]);
        assert!(!unchecked.ready);
        assert!(unchecked.reason.is_some());
    }

    #[test]
    fn test_liveness() {
        let checker = HealthChecker::new("0.1.0");
        let response = checker.liveness();

        assert!(response.alive);
        assert!(response.timestamp > 0);
    }
}
