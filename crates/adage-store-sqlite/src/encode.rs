//! Conversions between SQLite rows and [`Quote`] values.

use adage_core::quote::Quote;

use crate::{Error, Result};

/// Column list shared by every `SELECT` so [`RawQuote::from_row`] can index by
/// position.
pub const QUOTE_COLUMNS: &str = "id, author, text, length";

/// A quote row as read from SQLite, before integer range checks.
#[derive(Debug)]
pub struct RawQuote {
  pub id:     i64,
  pub author: String,
  pub text:   String,
  pub length: i64,
}

impl RawQuote {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:     row.get(0)?,
      author: row.get(1)?,
      text:   row.get(2)?,
      length: row.get(3)?,
    })
  }

  pub fn into_quote(self) -> Result<Quote> {
    let length = u32::try_from(self.length)
      .map_err(|_| Error::Corrupt(format!("quote {} has length {}", self.id, self.length)))?;
    Ok(Quote { id: self.id, author: self.author, text: self.text, length })
  }
}

pub fn encode_length(length: u32) -> i64 { i64::from(length) }
