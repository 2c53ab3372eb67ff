//! MCS Client Management CLI Tool
//!
//! A command-line interface for managing machine credentials through the
//! MCS HTTP API: listing, creating, renaming, secret rotation, and
//! deletion of clients for one tenant account.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Create a client
//! mcs-client-management --base-url http://localhost:8080 \
//!   --account-id 3f5e8a6c create --name "Ingest Worker"
//!
//! # Rotate its secret
//! mcs-client-management --base-url http://localhost:8080 \
//!   --account-id 3f5e8a6c rotate-secret --client-id "client_id_here"
//! ```
//!
//! ## Environment Variables
//!
//! - `MCS_BASE_URL`: Base URL of the MCS server (alternative to --base-url)
//! - `MCS_ACCOUNT_ID`: Tenant account identifier (alternative to --account-id)
//!
//! The created/rotated secret is printed exactly once; it cannot be
//! retrieved again afterwards.

use clap::{Parser, Subcommand};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::env;
use std::process;

/// Header carrying the tenant identifier, normally set by the API gateway.
const ACCOUNT_ID_HEADER: &str = "X-Account-ID";

#[derive(Parser)]
#[command(
    name = "mcs-client-management",
    about = "Manage machine credentials through the MCS HTTP API"
)]
struct Cli {
    /// Base URL of the MCS server
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Tenant account identifier sent as the X-Account-ID header
    #[arg(long, global = true)]
    account_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all clients belonging to the account
    List,

    /// Create a new client; prints the one-time plaintext secret
    Create {
        /// Display name for the client
        #[arg(long)]
        name: String,
    },

    /// Get a single client
    Get {
        #[arg(long)]
        client_id: String,
    },

    /// Rename a client
    Rename {
        #[arg(long)]
        client_id: String,

        /// New display name
        #[arg(long)]
        name: String,
    },

    /// Rotate a client's secret; prints the new one-time plaintext secret
    RotateSecret {
        #[arg(long)]
        client_id: String,
    },

    /// Delete a client
    Delete {
        #[arg(long)]
        client_id: String,
    },
}

type CliResult = Result<Value, Box<dyn std::error::Error>>;

async fn finish(response: reqwest::Response) -> CliResult {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(json!({ "deleted": true }));
    }

    let body: Value = response.json().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(format!("server returned {}: {}", status, body).into())
    }
}

async fn run(http: &Client, base_url: &str, account_id: &str, command: Commands) -> CliResult {
    match command {
        Commands::List => {
            let response = http
                .get(format!("{base_url}/clients"))
                .header(ACCOUNT_ID_HEADER, account_id)
                .send()
                .await?;
            finish(response).await
        }
        Commands::Create { name } => {
            let response = http
                .post(format!("{base_url}/clients"))
                .header(ACCOUNT_ID_HEADER, account_id)
                .json(&json!({ "name": name }))
                .send()
                .await?;
            finish(response).await
        }
        Commands::Get { client_id } => {
            let response = http
                .get(format!("{base_url}/clients/{client_id}"))
                .header(ACCOUNT_ID_HEADER, account_id)
                .send()
                .await?;
            finish(response).await
        }
        Commands::Rename { client_id, name } => {
            let response = http
                .patch(format!("{base_url}/clients/{client_id}"))
                .header(ACCOUNT_ID_HEADER, account_id)
                .json(&json!({ "name": name }))
                .send()
                .await?;
            finish(response).await
        }
        Commands::RotateSecret { client_id } => {
            let response = http
                .patch(format!("{base_url}/clients/{client_id}/secret"))
                .header(ACCOUNT_ID_HEADER, account_id)
                .send()
                .await?;
            finish(response).await
        }
        Commands::Delete { client_id } => {
            let response = http
                .delete(format!("{base_url}/clients/{client_id}"))
                .header(ACCOUNT_ID_HEADER, account_id)
                .send()
                .await?;
            finish(response).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let base_url = cli
        .base_url
        .or_else(|| env::var("MCS_BASE_URL").ok())
        .unwrap_or_else(|| {
            eprintln!("Error: --base-url or MCS_BASE_URL must be provided");
            process::exit(1);
        });
    let base_url = base_url.trim_end_matches('/').to_string();

    let account_id = cli
        .account_id
        .or_else(|| env::var("MCS_ACCOUNT_ID").ok())
        .unwrap_or_else(|| {
            eprintln!("Error: --account-id or MCS_ACCOUNT_ID must be provided");
            process::exit(1);
        });

    let http = Client::new();

    match run(&http, &base_url, &account_id, cli.command).await {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(rendered) => println!("{rendered}"),
            Err(_) => println!("{value}"),
        },
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    }
}
