//! Quote records and the inputs that create, patch and filter them.
//!
//! A quote's `length` is a snapshot of the character count of its text taken
//! when the quote is created. Later edits to `text` do not touch it.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Quote ───────────────────────────────────────────────────────────────────

/// A persisted quote. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
  pub id:     i64,
  pub author: String,
  pub text:   String,
  pub length: u32,
}

// ─── Creation ────────────────────────────────────────────────────────────────

/// A validated, not-yet-persisted quote.
///
/// Only constructible through [`NewQuote::new`], so every value that reaches a
/// store has a non-empty author and text and a correctly derived length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuote {
  author: String,
  text:   String,
  length: u32,
}

impl NewQuote {
  /// Validate `author` and `text` and derive the character length of `text`.
  pub fn new(author: impl Into<String>, text: impl Into<String>) -> Result<Self> {
    let author = author.into();
    let text = text.into();

    if author.trim().is_empty() {
      return Err(Error::MissingField("author"));
    }
    if text.trim().is_empty() {
      return Err(Error::MissingField("text"));
    }

    let chars = text.chars().count();
    let length = u32::try_from(chars).map_err(|_| Error::TextTooLong(chars))?;

    Ok(Self { author, text, length })
  }

  pub fn author(&self) -> &str { &self.author }

  pub fn text(&self) -> &str { &self.text }

  pub fn length(&self) -> u32 { self.length }

  /// Attach the store-assigned id.
  pub fn into_quote(self, id: i64) -> Quote {
    Quote { id, author: self.author, text: self.text, length: self.length }
  }
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// Fields to replace on an existing quote. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteUpdate {
  pub author: Option<String>,
  pub text:   Option<String>,
}

impl QuoteUpdate {
  /// Build an update, discarding fields that are absent or blank.
  pub fn new(author: Option<String>, text: Option<String>) -> Self {
    Self { author: non_blank(author), text: non_blank(text) }
  }

  pub fn is_empty(&self) -> bool { self.author.is_none() && self.text.is_none() }

  /// Apply this update to an in-memory quote. `length` is left as recorded.
  pub fn apply_to(&self, quote: &mut Quote) {
    if let Some(author) = &self.author {
      quote.author.clone_from(author);
    }
    if let Some(text) = &self.text {
      quote.text.clone_from(text);
    }
  }
}

// ─── Filter ──────────────────────────────────────────────────────────────────

/// Predicates for [`QuoteStore::filter_quotes`](crate::store::QuoteStore) and
/// the random selector. Set predicates are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFilter {
  /// Exact author match.
  pub author:     Option<String>,
  /// Inclusive upper bound on `length`.
  pub max_length: Option<u32>,
}

impl QuoteFilter {
  /// Build a filter, treating a blank author as no author filter.
  pub fn new(author: Option<String>, max_length: Option<u32>) -> Self {
    Self { author: non_blank(author), max_length }
  }

  pub fn by_author(author: impl Into<String>) -> Self {
    Self { author: Some(author.into()), max_length: None }
  }

  pub fn by_max_length(max_length: u32) -> Self {
    Self { author: None, max_length: Some(max_length) }
  }

  pub fn is_unfiltered(&self) -> bool {
    self.author.is_none() && self.max_length.is_none()
  }

  /// Whether `quote` satisfies every set predicate.
  pub fn matches(&self, quote: &Quote) -> bool {
    self.author.as_deref().is_none_or(|a| quote.author == a)
      && self.max_length.is_none_or(|max| quote.length <= max)
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}
