use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

use newsdesk::config::{self, Categories};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Print the normalized tokens and category of a piece of text"
)]
struct Args {
    /// YAML config whose category rules to use; built-in rules when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text to categorize; reads stdin when omitted
    text: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let categories = match &args.config {
        Some(path) => config::load(Some(path))?.categories,
        None => Categories::default(),
    };
    let categorizer = categories.categorizer();

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        }
    };

    let tokens = categorizer.normalizer().normalize(&text);
    println!("tokens: {}", tokens.join(" "));
    println!("category: {}", categorizer.categorize_tokens(&tokens));
    Ok(())
}
