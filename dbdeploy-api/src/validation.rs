///! Input validation for workload and namespace names
///!
///! Kubernetes object names used here must be RFC 1123 DNS labels.

use dbdeploy_common::Error;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of a DNS label
pub const MAX_LABEL_LENGTH: usize = 63;

/// Suffix appended to the workload name for its Service
pub const SERVICE_SUFFIX: &str = "-service";

/// Longest workload name whose derived Service name is still a valid label
pub const MAX_WORKLOAD_NAME_LENGTH: usize = MAX_LABEL_LENGTH - SERVICE_SUFFIX.len();

static DNS_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?$").unwrap()
});

/// Validation result type
pub type ValidationResult<T> = Result<T, Error>;

fn validate_label(kind: &str, value: &str, max_len: usize) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(Error::Validation(format!("{} cannot be empty", kind)));
    }

    if value.len() > max_len {
        return Err(Error::Validation(format!(
            "{} too long (max {} characters)",
            kind, max_len
        )));
    }

    if !DNS_LABEL_REGEX.is_match(value) {
        return Err(Error::Validation(format!(
            "{} must consist of lowercase alphanumeric characters or '-', \
             and must start and end with an alphanumeric character",
            kind
        )));
    }

    Ok(())
}

/// Workload name validation
pub fn validate_workload_name(name: &str) -> ValidationResult<()> {
    validate_label("Workload name", name, MAX_WORKLOAD_NAME_LENGTH)
}

/// Namespace validation
pub fn validate_namespace(namespace: &str) -> ValidationResult<()> {
    validate_label("Namespace", namespace, MAX_LABEL_LENGTH)
}
