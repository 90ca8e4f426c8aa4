//! The `QuoteStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `adage-store-sqlite`).
//! Higher layers (`adage-api`, the selector) depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::quote::{NewQuote, Quote, QuoteFilter, QuoteUpdate};

/// Abstraction over a quote store backend.
///
/// Every mutating method persists before its future resolves; there is no
/// batching and no transaction spanning more than one call.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait QuoteStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Retrieve a quote by id. Returns `None` if not found.
  fn get_quote(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Quote>, Self::Error>> + Send + '_;

  /// Return every quote matching `filter`. Order is backend-defined.
  fn filter_quotes<'a>(
    &'a self,
    filter: &'a QuoteFilter,
  ) -> impl Future<Output = Result<Vec<Quote>, Self::Error>> + Send + 'a;

  /// The largest id currently stored, or `0` for an empty store.
  fn max_id(&self) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new quote and return it with its assigned id.
  fn insert_quote(
    &self,
    input: NewQuote,
  ) -> impl Future<Output = Result<Quote, Self::Error>> + Send + '_;

  /// Replace the fields set in `update`. Returns `None` if `id` is unknown.
  ///
  /// The stored `length` is never recomputed.
  fn update_quote(
    &self,
    id: i64,
    update: QuoteUpdate,
  ) -> impl Future<Output = Result<Option<Quote>, Self::Error>> + Send + '_;

  /// Delete a quote. Returns `false` if `id` was not present.
  fn remove_quote(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
