//! Handlers for `/quotes` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/quotes` | Optional `?author`, `?maxLength`; `null` when nothing matches |
//! | `GET`    | `/quotes/{id}` | 404 if not found |
//! | `POST`   | `/quotes/create` | Body: [`CreateQuoteBody`]; returns 201 + stored quote |
//! | `PATCH`  | `/quotes/update/{id}` | Body: [`UpdateQuoteBody`]; 404 if not found |
//! | `DELETE` | `/quotes/delete/{id}` | 204, or 404 if not found |

use std::sync::Arc;

use adage_core::{
  quote::{NewQuote, Quote, QuoteFilter, QuoteUpdate},
  select::select_random,
  store::QuoteStore,
};
use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;

use crate::error::ApiError;

// ─── Random ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct RandomParams {
  /// Exact author to draw from. Blank counts as absent.
  pub author:     Option<String>,
  /// Inclusive upper bound on the quote's recorded length. Blank counts as
  /// absent; bounds past `u32::MAX` are clamped since they match every quote.
  #[serde(rename = "maxLength")]
  pub max_length: Option<String>,
}

impl RandomParams {
  fn into_filter(self) -> Result<QuoteFilter, ApiError> {
    let max_length = match self.max_length.as_deref().map(str::trim) {
      None | Some("") => None,
      Some(raw) => Some(parse_max_length(raw)?),
    };
    Ok(QuoteFilter::new(self.author, max_length))
  }
}

fn parse_max_length(raw: &str) -> Result<u32, ApiError> {
  match raw.parse::<u64>() {
    Ok(0) | Err(_) => Err(ApiError::BadRequest(
      "maxLength must be a positive integer".to_owned(),
    )),
    Ok(n) => Ok(u32::try_from(n).unwrap_or(u32::MAX)),
  }
}

/// `GET /quotes[?author=<name>][&maxLength=<n>]`
///
/// Responds `200` with `null` when no quote can be found.
pub async fn random<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<RandomParams>, QueryRejection>,
) -> Result<Json<Option<Quote>>, ApiError>
where
  S: QuoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Query(params) = params?;
  let filter = params.into_filter()?;

  let quote = select_random(store.as_ref(), &filter)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(quote))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /quotes/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Quote>, ApiError>
where
  S: QuoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Path(id) = id?;
  let quote = store
    .get_quote(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("quote {id} not found")))?;
  Ok(Json(quote))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /quotes/create`.
///
/// Both fields are required; they are optional here so a missing field is
/// reported as a 400 naming the field rather than a generic decode failure.
#[derive(Debug, Deserialize)]
pub struct CreateQuoteBody {
  pub author: Option<String>,
  pub text:   Option<String>,
}

impl TryFrom<CreateQuoteBody> for NewQuote {
  type Error = adage_core::Error;

  fn try_from(b: CreateQuoteBody) -> Result<Self, Self::Error> {
    NewQuote::new(b.author.unwrap_or_default(), b.text.unwrap_or_default())
  }
}

/// `POST /quotes/create`: returns 201 + the stored [`Quote`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<CreateQuoteBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: QuoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Json(body) = body?;
  let input = NewQuote::try_from(body)?;

  let quote = store
    .insert_quote(input)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(id = quote.id, author = %quote.author, "created quote");
  Ok((StatusCode::CREATED, Json(quote)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `PATCH /quotes/update/{id}`. Absent or empty fields
/// are left unchanged.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateQuoteBody {
  pub author: Option<String>,
  pub text:   Option<String>,
}

impl From<UpdateQuoteBody> for QuoteUpdate {
  fn from(b: UpdateQuoteBody) -> Self { QuoteUpdate::new(b.author, b.text) }
}

/// `PATCH /quotes/update/{id}`
pub async fn update<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
  body: Result<Json<UpdateQuoteBody>, JsonRejection>,
) -> Result<Json<Quote>, ApiError>
where
  S: QuoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Path(id) = id?;
  let Json(body) = body?;

  let quote = store
    .update_quote(id, QuoteUpdate::from(body))
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("quote {id} not found")))?;
  Ok(Json(quote))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /quotes/delete/{id}`: 204 on success.
pub async fn remove<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError>
where
  S: QuoteStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let Path(id) = id?;
  let removed = store
    .remove_quote(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  if !removed {
    return Err(ApiError::NotFound(format!("quote {id} not found")));
  }
  tracing::info!(id, "deleted quote");
  Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(author: Option<&str>, max_length: Option<&str>) -> RandomParams {
    RandomParams {
      author:     author.map(str::to_owned),
      max_length: max_length.map(str::to_owned),
    }
  }

  #[test]
  fn non_positive_max_length_is_rejected() {
    for raw in ["0", "-3", "ten", "1.5"] {
      let result = params(None, Some(raw)).into_filter();
      assert!(matches!(result, Err(ApiError::BadRequest(_))), "maxLength={raw}");
    }
  }

  #[test]
  fn blank_params_are_ignored() {
    let filter = params(Some(""), Some("3")).into_filter().unwrap();
    assert_eq!(filter, QuoteFilter::by_max_length(3));

    let filter = params(Some("Twain"), Some("")).into_filter().unwrap();
    assert_eq!(filter, QuoteFilter::by_author("Twain".to_owned()));

    assert!(params(None, Some("  ")).into_filter().unwrap().is_unfiltered());
  }

  #[test]
  fn oversized_max_length_is_clamped() {
    let filter = params(None, Some("4294967296")).into_filter().unwrap();
    assert_eq!(filter, QuoteFilter::by_max_length(u32::MAX));

    let filter = params(None, Some("18446744073709551615")).into_filter().unwrap();
    assert_eq!(filter, QuoteFilter::by_max_length(u32::MAX));
  }

  #[test]
  fn create_body_requires_both_fields() {
    let body = CreateQuoteBody { author: Some("Twain".into()), text: None };
    assert_eq!(
      NewQuote::try_from(body),
      Err(adage_core::Error::MissingField("text"))
    );
  }
}
