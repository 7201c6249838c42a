//! dbdeploy API Library
//!
//! Provisions single-instance database StatefulSets on Kubernetes. Exposed as
//! a library for the server binary and for integration tests.

// Core modules
pub mod config;
pub mod error;
pub mod validation;

// Application state
pub mod state;
pub use state::AppState;

// Database provisioning
pub mod catalog;
pub mod deploy;
pub mod password;

// Kubernetes integration
pub mod kubernetes;

// HTTP surface
pub mod routes;

// Logging configuration
pub mod logging;

// Health checks and readiness probes
pub mod health;

// Graceful shutdown handling
pub mod shutdown;
