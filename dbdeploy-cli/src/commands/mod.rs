///! CLI command implementations

pub mod databases;
pub mod deploy;
pub mod health;
