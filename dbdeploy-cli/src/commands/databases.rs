use crate::api::ApiClient;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use dbdeploy_common::DatabaseInfo;
use serde::Serialize;
use tabled::Tabled;

#[derive(Tabled, Serialize)]
struct DatabaseRow {
    #[tabled(rename = "TYPE")]
    db_type: String,
    #[tabled(rename = "IMAGE")]
    image: String,
    #[tabled(rename = "USER")]
    username: String,
    #[tabled(rename = "DATABASE")]
    database: String,
    #[tabled(rename = "PORT")]
    port: i32,
    #[tabled(rename = "MOUNT PATH")]
    mount_path: String,
}

impl From<DatabaseInfo> for DatabaseRow {
    fn from(info: DatabaseInfo) -> Self {
        Self {
            db_type: info.db_type.to_string(),
            image: info.image,
            username: info.username,
            database: info.database,
            port: info.port,
            mount_path: info.mount_path,
        }
    }
}

pub async fn handle_databases_command(api: &ApiClient, output_format: OutputFormat) -> Result<()> {
    let databases: Vec<DatabaseInfo> = api.get("/api/databases").await?;
    let rows: Vec<DatabaseRow> = databases.into_iter().map(DatabaseRow::from).collect();
    output::print_output(rows, output_format)
}
