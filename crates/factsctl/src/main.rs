//! Facts Control - CLI client for the facts daemon.
//!
//! Submits lifecycle triggers and queries to factsd over HTTP and prints
//! the daemon's JSON responses.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Parser)]
#[command(name = "factsctl")]
#[command(about = "Fact lifecycle pipeline - control client", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the facts daemon
    #[arg(long, default_value = "http://127.0.0.1:7610")]
    daemon: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest text and extract facts from it
    Ingest {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        session_id: String,
        text: String,
    },

    /// Schedule verification of a fact against web evidence
    Verify { fact_id: String },

    /// Schedule confirmation scoring of a fact
    Score { fact_id: String },

    /// Schedule an index refresh for a fact
    Admit { fact_id: String },

    /// Schedule a decay-and-prune pass over all facts
    Prune,

    /// Answer a query from the fact corpus
    Query {
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Show fact counts by status
    Stats,

    /// Show daemon health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.daemon.trim_end_matches('/');

    let response = match cli.command {
        Commands::Ingest {
            user_id,
            session_id,
            text,
        } => {
            post(
                &client,
                &format!("{}/v1/ingest", base),
                json!({ "user_id": user_id, "session_id": session_id, "text": text }),
            )
            .await?
        }
        Commands::Verify { fact_id } => {
            post(
                &client,
                &format!("{}/v1/verify", base),
                json!({ "fact_id": fact_id }),
            )
            .await?
        }
        Commands::Score { fact_id } => {
            post(
                &client,
                &format!("{}/v1/score", base),
                json!({ "fact_id": fact_id }),
            )
            .await?
        }
        Commands::Admit { fact_id } => {
            post(
                &client,
                &format!("{}/v1/admit", base),
                json!({ "fact_id": fact_id }),
            )
            .await?
        }
        Commands::Prune => post(&client, &format!("{}/v1/prune", base), json!({})).await?,
        Commands::Query { query, top_k } => {
            post(
                &client,
                &format!("{}/v1/query", base),
                json!({ "query": query, "top_k": top_k }),
            )
            .await?
        }
        Commands::Stats => get(&client, &format!("{}/v1/stats", base)).await?,
        Commands::Health => get(&client, &format!("{}/v1/health", base)).await?,
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn post(
    client: &reqwest::Client,
    url: &str,
    body: serde_json::Value,
) -> Result<serde_json::Value> {
    let response = client.post(url).json(&body).send().await?;
    read_json(response).await
}

async fn get(client: &reqwest::Client, url: &str) -> Result<serde_json::Value> {
    let response = client.get(url).send().await?;
    read_json(response).await
}

async fn read_json(response: reqwest::Response) -> Result<serde_json::Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(anyhow!("daemon returned {}: {}", status, body));
    }
    Ok(response.json().await?)
}
