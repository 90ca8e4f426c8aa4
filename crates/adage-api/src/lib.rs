//! JSON REST API for Adage.
//!
//! Exposes an axum [`Router`] backed by any [`adage_core::store::QuoteStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(adage_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod quotes;

use std::sync::Arc;

use adage_core::store::QuoteStore;
use axum::{
  Router,
  routing::{delete, get, patch, post},
};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: QuoteStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/quotes", get(quotes::random::<S>))
    .route("/quotes/{id}", get(quotes::get_one::<S>))
    .route("/quotes/create", post(quotes::create::<S>))
    .route("/quotes/update/{id}", patch(quotes::update::<S>))
    .route("/quotes/delete/{id}", delete(quotes::remove::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
