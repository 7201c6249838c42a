use crate::api::ApiClient;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use dbdeploy_common::{DbType, DeployResponse};
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct CredentialRow {
    #[tabled(rename = "FIELD")]
    field: &'static str,
    #[tabled(rename = "VALUE")]
    value: String,
}

fn credential_rows(response: &DeployResponse) -> Vec<CredentialRow> {
    let port = response
        .port
        .map(|p| p.to_string())
        .unwrap_or_else(|| "pending".to_string());

    vec![
        CredentialRow { field: "Type", value: response.db_type.to_string() },
        CredentialRow { field: "Username", value: response.username.clone() },
        CredentialRow { field: "Password", value: response.password.clone() },
        CredentialRow { field: "Database", value: response.database.clone() },
        CredentialRow { field: "Node port", value: port },
    ]
}

pub async fn handle_deploy_command(
    name: &str,
    db_type: &str,
    api: &ApiClient,
    output_format: OutputFormat,
) -> Result<()> {
    // Unknown engines never reach the server
    let db_type: DbType = db_type.parse()?;

    let response: DeployResponse = api
        .post_query(
            "/deploy_stateful",
            &[("db_name", name), ("db_type", db_type.as_str())],
        )
        .await?;

    match output_format {
        OutputFormat::Table => {
            output::print_success(&response.message);
            output::print_table(credential_rows(&response));
            if response.port.is_none() {
                output::print_warning("The cluster did not report a node port yet");
            }
        }
        OutputFormat::Json => output::print_json(&response)?,
        OutputFormat::Yaml => output::print_yaml(&response)?,
    }

    Ok(())
}
