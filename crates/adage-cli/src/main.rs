//! `adage`: command-line client for the Adage quote service.
//!
//! # Usage
//!
//! ```text
//! adage random --author Twain --max-length 40
//! adage create --author Twain --text "Denial"
//! adage --url http://quotes.internal:8080 get 7
//! adage --config ~/.config/adage/config.toml delete 7
//! ```

mod client;

use std::path::PathBuf;

use adage_core::quote::Quote;
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "adage", about = "Command-line client for the Adage quote service")]
struct Args {
  /// Path to a TOML config file (url).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the adage server (default: http://localhost:8080).
  #[arg(long, env = "ADAGE_URL")]
  url: Option<String>,

  /// Print raw JSON instead of formatted quotes.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Fetch a random quote, optionally filtered.
  Random {
    #[arg(long)]
    author:     Option<String>,
    #[arg(long)]
    max_length: Option<u32>,
  },
  /// Fetch a quote by id.
  Get { id: i64 },
  /// Create a new quote.
  Create {
    #[arg(long)]
    author: String,
    #[arg(long)]
    text:   String,
  },
  /// Replace the author and/or text of a quote.
  Update {
    id:     i64,
    #[arg(long)]
    author: Option<String>,
    #[arg(long)]
    text:   Option<String>,
  },
  /// Delete a quote by id.
  Delete { id: i64 },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
  };
  tracing::debug!(base_url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Random { author, max_length } => {
      match client.random(author.as_deref(), max_length).await? {
        Some(quote) => print_quote(&quote, args.json)?,
        None if args.json => println!("null"),
        None => println!("no quote found"),
      }
    }
    Command::Get { id } => print_quote(&client.get(id).await?, args.json)?,
    Command::Create { author, text } => {
      print_quote(&client.create(&author, &text).await?, args.json)?;
    }
    Command::Update { id, author, text } => {
      if author.is_none() && text.is_none() {
        bail!("nothing to update: pass --author and/or --text");
      }
      let quote = client.update(id, author.as_deref(), text.as_deref()).await?;
      print_quote(&quote, args.json)?;
    }
    Command::Delete { id } => {
      client.delete(id).await?;
      if !args.json {
        println!("deleted quote {id}");
      }
    }
  }

  Ok(())
}

fn print_quote(quote: &Quote, json: bool) -> Result<()> {
  if json {
    println!("{}", serde_json::to_string_pretty(quote)?);
  } else {
    println!("#{} \"{}\"\n    ~ {}", quote.id, quote.text, quote.author);
  }
  Ok(())
}
