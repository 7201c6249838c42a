use crate::api::ApiClient;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Readiness {
    ready: bool,
    reason: Option<String>,
    timestamp: i64,
}

pub async fn handle_health_command(api: &ApiClient, output_format: OutputFormat) -> Result<()> {
    // 503 still carries a readiness body
    let (status, readiness): (_, Readiness) = api.get_with_status("/api/health/ready").await?;

    match output_format {
        OutputFormat::Json => output::print_json(&readiness)?,
        OutputFormat::Yaml => output::print_yaml(&readiness)?,
        OutputFormat::Table => {
            if readiness.ready {
                output::print_success("Server is ready");
            } else {
                let reason = readiness.reason.as_deref().unwrap_or("no reason given");
                output::print_warning(&format!("Server not ready ({}): {}", status, reason));
            }
        }
    }

    if !readiness.ready {
        anyhow::bail!("server not ready");
    }

    Ok(())
}
