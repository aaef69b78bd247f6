use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "newscat-cli")]
#[command(about = "Command-line client for the newscat backend", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server status
    Health,
    /// Show the API description
    Docs,
    /// Search news by term
    News {
        /// Search term
        query: String,
    },
    /// Look up the image for an HTTP status code
    Cat {
        /// HTTP status code, e.g. 404
        code: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Health => client.get(format!("{base}/health")).send().await?,
        Commands::Docs => client.get(format!("{base}/api")).send().await?,
        Commands::News { query } => {
            client
                .get(format!("{base}/news"))
                .query(&[("q", query)])
                .send()
                .await?
        }
        Commands::Cat { code } => {
            // Segment-encode so odd input reaches the server's validation intact.
            let mut url = reqwest::Url::parse(base)?;
            url.path_segments_mut()
                .map_err(|_| "base URL cannot carry a path")?
                .pop_if_empty()
                .push("httpcat")
                .push(&code);
            client.get(url).send().await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
