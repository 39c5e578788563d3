use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "stringsvc-cli")]
#[command(about = "Command-line client for the string service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Uppercase a string
    Uppercase { s: String },
    /// Count the bytes in a string
    Count { s: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let (path, s) = match cli.command {
        Commands::Uppercase { s } => ("uppercase", s),
        Commands::Count { s } => ("count", s),
    };

    let res = client
        .post(format!("{base}/{path}"))
        .json(&json!({ "s": s }))
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(format!("service returned status {status}: {text}").into());
    }

    let body: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if let Some(err) = body.get("err").and_then(Value::as_str).filter(|e| !e.is_empty()) {
        return Err(format!("service error: {err}").into());
    }
    Ok(())
}
