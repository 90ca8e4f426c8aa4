//! Async HTTP client wrapping the Adage JSON API.

use std::time::Duration;

use adage_core::quote::Quote;
use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use serde::Serialize;

/// Connection settings for the Adage API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// Async HTTP client for the Adage JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

#[derive(Serialize)]
struct QuoteBody<'a> {
  #[serde(skip_serializing_if = "Option::is_none")]
  author: Option<&'a str>,
  #[serde(skip_serializing_if = "Option::is_none")]
  text:   Option<&'a str>,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// `GET /quotes[?author=..][&maxLength=..]`, `None` when nothing matched.
  pub async fn random(
    &self,
    author: Option<&str>,
    max_length: Option<u32>,
  ) -> Result<Option<Quote>> {
    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(a) = author {
      query.push(("author", a.to_owned()));
    }
    if let Some(n) = max_length {
      query.push(("maxLength", n.to_string()));
    }

    let resp = self
      .client
      .get(self.url("/quotes"))
      .query(&query)
      .send()
      .await
      .context("GET /quotes failed")?;

    check(resp, "GET /quotes")
      .await?
      .json()
      .await
      .context("deserialising random quote")
  }

  /// `GET /quotes/<id>`
  pub async fn get(&self, id: i64) -> Result<Quote> {
    let resp = self
      .client
      .get(self.url(&format!("/quotes/{id}")))
      .send()
      .await
      .with_context(|| format!("GET /quotes/{id} failed"))?;

    check(resp, &format!("GET /quotes/{id}"))
      .await?
      .json()
      .await
      .context("deserialising quote")
  }

  /// `POST /quotes/create`
  pub async fn create(&self, author: &str, text: &str) -> Result<Quote> {
    let resp = self
      .client
      .post(self.url("/quotes/create"))
      .json(&QuoteBody { author: Some(author), text: Some(text) })
      .send()
      .await
      .context("POST /quotes/create failed")?;

    check(resp, "POST /quotes/create")
      .await?
      .json()
      .await
      .context("deserialising created quote")
  }

  /// `PATCH /quotes/update/<id>`
  pub async fn update(
    &self,
    id: i64,
    author: Option<&str>,
    text: Option<&str>,
  ) -> Result<Quote> {
    let resp = self
      .client
      .patch(self.url(&format!("/quotes/update/{id}")))
      .json(&QuoteBody { author, text })
      .send()
      .await
      .with_context(|| format!("PATCH /quotes/update/{id} failed"))?;

    check(resp, &format!("PATCH /quotes/update/{id}"))
      .await?
      .json()
      .await
      .context("deserialising updated quote")
  }

  /// `DELETE /quotes/delete/<id>`
  pub async fn delete(&self, id: i64) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/quotes/delete/{id}")))
      .send()
      .await
      .with_context(|| format!("DELETE /quotes/delete/{id} failed"))?;

    check(resp, &format!("DELETE /quotes/delete/{id}")).await?;
    Ok(())
  }
}

/// Turn a non-2xx response into an error carrying the server's message.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }

  let message = resp
    .json::<serde_json::Value>()
    .await
    .ok()
    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
    .unwrap_or_default();
  Err(anyhow!("{what} → {status}: {message}"))
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use adage_store_sqlite::SqliteStore;
  use tokio::{net::TcpListener, sync::oneshot};

  use super::*;

  /// A live API server on an ephemeral port; stops when dropped.
  struct TestServer {
    base_url:     String,
    _shutdown_tx: oneshot::Sender<()>,
  }

  async fn spawn_server() -> TestServer {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = adage_api::api_router(Arc::new(store));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
      let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.await;
      });
      let _ = server.await;
    });

    TestServer { base_url: format!("http://{addr}"), _shutdown_tx: shutdown_tx }
  }

  fn client(server: &TestServer) -> ApiClient {
    ApiClient::new(ApiConfig { base_url: format!("{}/", server.base_url) }).unwrap()
  }

  #[tokio::test]
  async fn crud_roundtrip_over_http() {
    let server = spawn_server().await;
    let api = client(&server);

    let created = api.create("Twain", "Denial").await.unwrap();
    assert_eq!(created.length, 6);

    let fetched = api.get(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let updated = api
      .update(created.id, None, Some("Denial ain't just a river"))
      .await
      .unwrap();
    assert_eq!(updated.author, "Twain");
    assert_eq!(updated.length, 6);

    api.delete(created.id).await.unwrap();
    let err = api.get(created.id).await.unwrap_err();
    assert!(err.to_string().contains("404"), "error: {err}");
  }

  #[tokio::test]
  async fn random_reports_empty_store_as_none() {
    let server = spawn_server().await;
    let api = client(&server);
    assert!(api.random(None, None).await.unwrap().is_none());

    api.create("Wilde", "Art is useless.").await.unwrap();
    let quote = api.random(Some("Wilde"), Some(20)).await.unwrap().unwrap();
    assert_eq!(quote.author, "Wilde");
  }

  #[tokio::test]
  async fn server_error_message_is_surfaced() {
    let server = spawn_server().await;
    let api = client(&server);

    let err = api.create("", "Denial").await.unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("400"), "error: {msg}");
    assert!(msg.contains("author"), "error: {msg}");
  }
}
