///! dbdeploy CLI
///!
///! Command-line client for the dbdeploy provisioning server

mod api;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// API server address (defaults to the configured server)
    #[arg(short, long)]
    server: Option<String>,

    /// Output format (table, json, yaml)
    #[arg(short, long)]
    output: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy a database as a StatefulSet with a NodePort service
    Deploy {
        /// Workload name (lowercase DNS label)
        name: String,
        /// Database type (mongodb, mysql, postgresql, redis)
        #[arg(short = 't', long = "type", default_value = "mysql")]
        db_type: String,
    },
    /// List supported database types
    Databases,
    /// Show server readiness
    Health,
    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let config = config::Config::load().unwrap_or_default();
    let server = cli.server.unwrap_or(config.default_server);
    let output_format =
        output::OutputFormat::from_str(&cli.output.unwrap_or(config.default_output));

    // Initialize API client
    let api_client = api::ApiClient::new(&server);

    // Execute command
    let result = match cli.command {
        Commands::Deploy { name, db_type } => {
            commands::deploy::handle_deploy_command(&name, &db_type, &api_client, output_format)
                .await
        }
        Commands::Databases => {
            commands::databases::handle_databases_command(&api_client, output_format).await
        }
        Commands::Health => {
            commands::health::handle_health_command(&api_client, output_format).await
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    };

    if let Err(e) = result {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }

    Ok(())
}

/// Generate shell completions
fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    generate(shell, &mut cmd, name, &mut io::stdout());
}
