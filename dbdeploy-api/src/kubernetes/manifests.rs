//! Manifest builders for database workloads
//!
//! Pure functions: nothing here talks to a cluster.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::{StatefulSet, StatefulSetSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, PersistentVolumeClaim, PersistentVolumeClaimSpec,
    PodSpec, PodTemplateSpec, Service, ServicePort, ServiceSpec, VolumeMount,
    VolumeResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

use super::error::{K8sError, K8sResult};
use crate::catalog::DatabaseProfile;
use crate::config::StorageConfig;
use crate::validation::SERVICE_SUFFIX;

pub const APP_LABEL: &str = "app";
pub const MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
pub const MANAGED_BY_VALUE: &str = "dbdeploy";

pub fn volume_claim_name(name: &str) -> String {
    format!("{}-pvc", name)
}

pub fn service_name(name: &str) -> String {
    format!("{}{}", name, SERVICE_SUFFIX)
}

fn selector_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), name.to_string())])
}

fn object_labels(name: &str) -> BTreeMap<String, String> {
    let mut labels = selector_labels(name);
    labels.insert(MANAGED_BY_LABEL.to_string(), MANAGED_BY_VALUE.to_string());
    labels
}

/// Build a single-replica StatefulSet with one persistent volume claim
pub fn build_stateful_set(
    name: &str,
    profile: &DatabaseProfile,
    password: &str,
    storage: &StorageConfig,
) -> StatefulSet {
    let claim_name = volume_claim_name(name);

    let volume_claim_template = PersistentVolumeClaim {
        metadata: ObjectMeta {
            name: Some(claim_name.clone()),
            ..Default::default()
        },
        spec: Some(PersistentVolumeClaimSpec {
            access_modes: Some(vec!["ReadWriteOnce".to_string()]),
            storage_class_name: storage.storage_class.clone(),
            resources: Some(VolumeResourceRequirements {
                requests: Some(BTreeMap::from([(
                    "storage".to_string(),
                    Quantity(storage.size.clone()),
                )])),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    };

    let env: Vec<EnvVar> = profile
        .env_pairs(password)
        .into_iter()
        .map(|(name, value)| EnvVar {
            name,
            value: Some(value),
            ..Default::default()
        })
        .collect();

    let container = Container {
        name: name.to_string(),
        image: Some(profile.image.to_string()),
        env: Some(env),
        args: if profile.args.is_empty() {
            None
        } else {
            Some(profile.args.iter().map(|a| a.to_string()).collect())
        },
        ports: Some(vec![ContainerPort {
            container_port: profile.port,
            ..Default::default()
        }]),
        volume_mounts: Some(vec![VolumeMount {
            name: claim_name,
            mount_path: profile.mount_path.to_string(),
            ..Default::default()
        }]),
        ..Default::default()
    };

    StatefulSet {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            labels: Some(object_labels(name)),
            ..Default::default()
        },
        spec: Some(StatefulSetSpec {
            service_name: name.to_string(),
            replicas: Some(1),
            selector: LabelSelector {
                match_labels: Some(selector_labels(name)),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(object_labels(name)),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    ..Default::default()
                }),
            },
            volume_claim_templates: Some(vec![volume_claim_template]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Port of the first container of a workload
pub fn first_container_port(stateful_set: &StatefulSet) -> Option<i32> {
    stateful_set
        .spec
        .as_ref()?
        .template
        .spec
        .as_ref()?
        .containers
        .first()?
        .ports
        .as_ref()?
        .first()
        .map(|p| p.container_port)
}

/// Build the NodePort Service exposing a workload
///
/// Port and target port both come from the workload's first container port.
pub fn build_service(name: &str, stateful_set: &StatefulSet) -> K8sResult<Service> {
    let port = first_container_port(stateful_set).ok_or_else(|| {
        K8sError::InvalidManifest(format!("StatefulSet {} exposes no container port", name))
    })?;

    Ok(Service {
        metadata: ObjectMeta {
            name: Some(service_name(name)),
            labels: Some(object_labels(name)),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            type_: Some("NodePort".to_string()),
            selector: Some(selector_labels(name)),
            ports: Some(vec![ServicePort {
                port,
                target_port: Some(IntOrString::Int(port)),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// Node port the cluster assigned to the first service port
pub fn node_port(service: &Service) -> Option<i32> {
    service
        .spec
        .as_ref()?
        .ports
        .as_ref()?
        .first()?
        .node_port
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use dbdeploy_common::DbType;

    fn storage() -> StorageConfig {
        StorageConfig {
            size: "1Gi".to_string(),
            storage_class: None,
        }
    }

    fn container(sts: &StatefulSet) -> &Container {
        &sts.spec.as_ref().unwrap().template.spec.as_ref().unwrap().containers[0]
    }

    #[test]
    fn test_workload_matches_catalog() {
        for db_type in DbType::ALL {
            let profile = catalog::profile(db_type);
            let sts = build_stateful_set("db", profile, "pw", &storage());
            let c = container(&sts);

            assert_eq!(c.image.as_deref(), Some(profile.image));
            assert_eq!(c.ports.as_ref().unwrap()[0].container_port, profile.port);

            let mount = &c.volume_mounts.as_ref().unwrap()[0];
            assert_eq!(mount.mount_path, profile.mount_path);
            assert_eq!(mount.name, "db-pvc");
        }
    }

    #[test]
    fn test_stateful_set_shape() {
        let sts = build_stateful_set("orders", catalog::profile(DbType::Mysql), "pw", &storage());
        let spec = sts.spec.as_ref().unwrap();

        assert_eq!(sts.metadata.name.as_deref(), Some("orders"));
        assert_eq!(spec.replicas, Some(1));
        assert_eq!(spec.service_name, "orders");
        assert_eq!(
            spec.selector.match_labels.as_ref().unwrap().get("app").map(String::as_str),
            Some("orders")
        );

        let template_labels = spec.template.metadata.as_ref().unwrap().labels.as_ref().unwrap();
        assert_eq!(template_labels.get("app").map(String::as_str), Some("orders"));

        let claims = spec.volume_claim_templates.as_ref().unwrap();
        assert_eq!(claims.len(), 1);
        let claim = &claims[0];
        assert_eq!(claim.metadata.name.as_deref(), Some("orders-pvc"));
        let claim_spec = claim.spec.as_ref().unwrap();
        assert_eq!(claim_spec.access_modes.as_ref().unwrap(), &vec!["ReadWriteOnce".to_string()]);
        let requests = claim_spec.resources.as_ref().unwrap().requests.as_ref().unwrap();
        assert_eq!(requests.get("storage"), Some(&Quantity("1Gi".to_string())));
        assert!(claim_spec.storage_class_name.is_none());
    }

    #[test]
    fn test_storage_class_and_size() {
        let storage = StorageConfig {
            size: "20Gi".to_string(),
            storage_class: Some("fast-ssd".to_string()),
        };
        let sts = build_stateful_set("db", catalog::profile(DbType::Postgresql), "pw", &storage);
        let claim_spec = sts.spec.unwrap().volume_claim_templates.unwrap()[0]
            .spec
            .clone()
            .unwrap();
        assert_eq!(claim_spec.storage_class_name.as_deref(), Some("fast-ssd"));
        assert_eq!(
            claim_spec.resources.unwrap().requests.unwrap().get("storage"),
            Some(&Quantity("20Gi".to_string()))
        );
    }

    #[test]
    fn test_password_in_env() {
        let sts = build_stateful_set("db", catalog::profile(DbType::Mysql), "hunter22", &storage());
        let env = container(&sts).env.as_ref().unwrap();
        assert!(env
            .iter()
            .any(|e| e.name == "MYSQL_ROOT_PASSWORD" && e.value.as_deref() == Some("hunter22")));
    }

    #[test]
    fn test_redis_args() {
        let sts = build_stateful_set("cache", catalog::profile(DbType::Redis), "pw", &storage());
        let args = container(&sts).args.as_ref().unwrap();
        assert!(args.contains(&"--requirepass".to_string()));

        let sts = build_stateful_set("db", catalog::profile(DbType::Mysql), "pw", &storage());
        assert!(container(&sts).args.is_none());
    }

    #[test]
    fn test_service_derives_port_from_workload() {
        for db_type in DbType::ALL {
            let profile = catalog::profile(db_type);
            let sts = build_stateful_set("db", profile, "pw", &storage());
            let svc = build_service("db", &sts).unwrap();
            let spec = svc.spec.as_ref().unwrap();
            let port = &spec.ports.as_ref().unwrap()[0];

            assert_eq!(svc.metadata.name.as_deref(), Some("db-service"));
            assert_eq!(spec.type_.as_deref(), Some("NodePort"));
            assert_eq!(port.port, profile.port);
            assert_eq!(port.target_port, Some(IntOrString::Int(profile.port)));
            assert_eq!(
                spec.selector.as_ref().unwrap().get("app").map(String::as_str),
                Some("db")
            );
        }
    }

    #[test]
    fn test_service_requires_port() {
        let mut sts = build_stateful_set("db", catalog::profile(DbType::Mysql), "pw", &storage());
        if let Some(spec) = sts.spec.as_mut() {
            if let Some(pod) = spec.template.spec.as_mut() {
                pod.containers[0].ports = None;
            }
        }

        let err = build_service("db", &sts).unwrap_err();
        assert!(matches!(err, K8sError::InvalidManifest(_)));
    }

    #[test]
    fn test_node_port() {
        let sts = build_stateful_set("db", catalog::profile(DbType::Mysql), "pw", &storage());
        let mut svc = build_service("db", &sts).unwrap();
        assert_eq!(node_port(&svc), None);

        svc.spec.as_mut().unwrap().ports.as_mut().unwrap()[0].node_port = Some(31234);
        assert_eq!(node_port(&svc), Some(31234));
    }
}
