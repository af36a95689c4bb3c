use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use webhook_relay::http::{HEADER_HMAC, HEADER_SHOP_DOMAIN, HEADER_TOPIC};
use webhook_relay::security::compute_signature;

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Sign and send test webhooks to the relay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the base64 HMAC-SHA256 signature of a payload file
    Sign {
        #[arg(short, long, env = "SHOPIFY_SECRET")]
        secret: String,

        payload: PathBuf,
    },
    /// Post a signed payload file to a running relay
    Send {
        #[arg(short, long, default_value = "http://localhost:8080/webhooks")]
        url: String,

        #[arg(short, long, env = "SHOPIFY_SECRET")]
        secret: String,

        #[arg(long, default_value = "orders/fulfilled")]
        topic: String,

        #[arg(long, default_value = "example.myshopify.com")]
        shop: String,

        payload: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Sign { secret, payload } => {
            let body = std::fs::read(&payload)?;
            println!("{}", compute_signature(&body, &secret)?);
        }
        Commands::Send {
            url,
            secret,
            topic,
            shop,
            payload,
        } => {
            let body = std::fs::read(&payload)?;
            let signature = compute_signature(&body, &secret)?;

            let res = reqwest::Client::new()
                .post(&url)
                .header(CONTENT_TYPE, "application/json")
                .header(HEADER_HMAC, signature)
                .header(HEADER_TOPIC, topic)
                .header(HEADER_SHOP_DOMAIN, shop)
                .body(body)
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

    println!("Status: {}", status);
    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }

    if !status.is_success() {
        return Err(format!("relay returned {}", status).into());
    }
    Ok(())
}
