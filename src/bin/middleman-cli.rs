use std::path::PathBuf;

use aipex_middleman::routing::Operation;
use aipex_middleman::security::{token::DEFAULT_PREFIX, RotatingToken};
use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "middleman-cli")]
#[command(about = "Client for the Aipex Middleman", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Token prefix used when computing the token locally
    #[arg(long, default_value = DEFAULT_PREFIX)]
    prefix: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check middleman status
    Health,
    /// Show today's rotating token
    Token {
        /// Compute locally instead of asking the server
        #[arg(long)]
        local: bool,
    },
    /// Send a JSON shipment payload through the middleman
    Send {
        /// create, track or label
        operation: Operation,
        /// JSON payload file
        #[arg(short, long)]
        file: PathBuf,
        /// Carrier subscription key
        #[arg(short, long, env = "OCP_APIM_SUBSCRIPTION_KEY")]
        key: String,
        /// Token to present; defaults to today's locally computed token
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Token { local: true } => {
            let token = RotatingToken::current(&cli.prefix);
            println!("{}", serde_json::to_string_pretty(&token)?);
        }
        Commands::Token { local: false } => {
            let res = client
                .get(format!("{}/generate-token", cli.url))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Send {
            operation,
            file,
            key,
            token,
        } => {
            let payload: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let token = token.unwrap_or_else(|| RotatingToken::current(&cli.prefix).token);

            let res = client
                .post(format!("{}{}", cli.url, operation.path()))
                .header("X-Aipex-Token", token)
                .header("Ocp-Apim-Subscription-Key", key)
                .json(&payload)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: middleman returned status {}", status);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
