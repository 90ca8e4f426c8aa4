//! Server assembly for Adage.
//!
//! Wires the JSON API from `adage-api` to a store, adds request tracing, and
//! owns the configuration and startup seeding used by the `adage-server`
//! binary.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use adage_core::{quote::NewQuote, store::QuoteStore};
use anyhow::Context as _;
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration.
///
/// Layered as built-in defaults, then the TOML file, then `ADAGE_*`
/// environment variables (e.g. `ADAGE_STORE_PATH`, `ADAGE_PORT`).
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  /// SQLite database file; `:memory:` keeps everything in process.
  pub store_path: PathBuf,
  /// Optional JSON array of `{"author", "text"}` loaded into an empty store.
  pub seed_path:  Option<PathBuf>,
}

impl ServerConfig {
  /// Load configuration from `path` (which need not exist) and the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "adage.db")?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("ADAGE"))
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router for `store`, with HTTP request tracing.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: QuoteStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  adage_api::api_router(store).layer(TraceLayer::new_for_http())
}

// ─── Seeding ──────────────────────────────────────────────────────────────────

/// One entry of a seed file.
#[derive(Debug, Deserialize)]
struct SeedQuote {
  author: String,
  text:   String,
}

/// Load the quotes in the JSON file at `path` into `store` if it is empty.
///
/// Returns the number of quotes inserted; `0` when the store already holds
/// quotes. Every entry is validated before anything is written.
pub async fn seed_store<S>(store: &S, path: &Path) -> anyhow::Result<usize>
where
  S: QuoteStore,
{
  if store.max_id().await? > 0 {
    tracing::debug!(path = %path.display(), "store not empty, skipping seed");
    return Ok(0);
  }

  let raw = std::fs::read_to_string(path)
    .with_context(|| format!("reading seed file {}", path.display()))?;
  let entries: Vec<SeedQuote> =
    serde_json::from_str(&raw).context("parsing seed file")?;

  let quotes = entries
    .into_iter()
    .enumerate()
    .map(|(i, e)| {
      NewQuote::new(e.author, e.text).with_context(|| format!("seed entry {i} is invalid"))
    })
    .collect::<anyhow::Result<Vec<_>>>()?;

  let count = quotes.len();
  for quote in quotes {
    store.insert_quote(quote).await?;
  }
  Ok(count)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use adage_store_sqlite::SqliteStore;
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use tower::ServiceExt as _;

  fn temp_file(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("adage-server-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
  }

  // ── Config ──────────────────────────────────────────────────────────────────

  #[test]
  fn config_defaults_without_file() {
    let cfg = ServerConfig::load(Path::new("/nonexistent/adage.toml")).unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.address(), format!("{}:8080", cfg.host));
    assert!(cfg.seed_path.is_none());
  }

  #[test]
  fn config_file_overrides_defaults() {
    let path = temp_file(
      "config.toml",
      "port = 9123\nstore_path = \"/tmp/quotes.db\"\nseed_path = \"seed.json\"\n",
    );
    let cfg = ServerConfig::load(&path).unwrap();
    assert_eq!(cfg.port, 9123);
    assert_eq!(cfg.store_path, PathBuf::from("/tmp/quotes.db"));
    assert_eq!(cfg.seed_path, Some(PathBuf::from("seed.json")));
  }

  #[test]
  fn expand_tilde_leaves_plain_paths() {
    assert_eq!(expand_tilde(Path::new("data/adage.db")), PathBuf::from("data/adage.db"));
  }

  // ── Seeding ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn seed_fills_empty_store_once() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let path = temp_file(
      "seed.json",
      r#"[{"author":"Twain","text":"Denial"},{"author":"Wilde","text":"Art is useless."}]"#,
    );

    assert_eq!(seed_store(&store, &path).await.unwrap(), 2);
    assert_eq!(store.max_id().await.unwrap(), 2);

    assert_eq!(seed_store(&store, &path).await.unwrap(), 0);
    assert_eq!(store.max_id().await.unwrap(), 2);
  }

  #[tokio::test]
  async fn seed_with_invalid_entry_writes_nothing() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let path = temp_file(
      "bad-seed.json",
      r#"[{"author":"Twain","text":"Denial"},{"author":"","text":"anonymous"}]"#,
    );

    let err = seed_store(&store, &path).await.unwrap_err();
    assert!(format!("{err:#}").contains("seed entry 1"), "error: {err:#}");
    assert_eq!(store.max_id().await.unwrap(), 0);
  }

  // ── Router ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn router_serves_quotes_behind_trace_layer() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .insert_quote(NewQuote::new("Twain", "Denial").unwrap())
      .await
      .unwrap();

    let req = Request::builder().uri("/quotes/1").body(Body::empty()).unwrap();
    let resp = router(Arc::new(store)).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["author"], "Twain");
  }

  #[tokio::test]
  async fn unknown_route_returns_404() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let req = Request::builder().uri("/nope").body(Body::empty()).unwrap();
    let resp = router(Arc::new(store)).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
