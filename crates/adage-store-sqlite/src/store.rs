//! [`SqliteStore`], the SQLite implementation of [`QuoteStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use adage_core::{
  quote::{NewQuote, Quote, QuoteFilter, QuoteUpdate},
  store::QuoteStore,
};

use crate::{
  Result,
  encode::{QUOTE_COLUMNS, RawQuote, encode_length},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Adage quote store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// The path `:memory:` opens a private in-memory database.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── QuoteStore impl ─────────────────────────────────────────────────────────

impl QuoteStore for SqliteStore {
  type Error = crate::Error;

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_quote(&self, id: i64) -> Result<Option<Quote>> {
    let raw: Option<RawQuote> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ?1"),
              rusqlite::params![id],
              RawQuote::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawQuote::into_quote).transpose()
  }

  async fn filter_quotes(&self, filter: &QuoteFilter) -> Result<Vec<Quote>> {
    let author = filter.author.clone();
    let max_length = filter.max_length.map(encode_length);

    let raws: Vec<RawQuote> = self
      .conn
      .call(move |conn| {
        // Unset predicates bind NULL and drop out of the WHERE clause.
        let mut stmt = conn.prepare(&format!(
          "SELECT {QUOTE_COLUMNS} FROM quotes
           WHERE (?1 IS NULL OR author = ?1)
             AND (?2 IS NULL OR length <= ?2)"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![author, max_length], RawQuote::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawQuote::into_quote).collect()
  }

  async fn max_id(&self) -> Result<i64> {
    let max: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COALESCE(MAX(id), 0) FROM quotes", [], |r| r.get(0))?)
      })
      .await?;
    Ok(max)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn insert_quote(&self, input: NewQuote) -> Result<Quote> {
    let author = input.author().to_owned();
    let text = input.text().to_owned();
    let length = encode_length(input.length());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO quotes (author, text, length) VALUES (?1, ?2, ?3)",
          rusqlite::params![author, text, length],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    Ok(input.into_quote(id))
  }

  async fn update_quote(&self, id: i64, update: QuoteUpdate) -> Result<Option<Quote>> {
    let QuoteUpdate { author, text } = update;

    let raw: Option<RawQuote> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // `length` keeps the value recorded at creation.
        let changed = tx.execute(
          "UPDATE quotes
           SET author = COALESCE(?2, author),
               text   = COALESCE(?3, text)
           WHERE id = ?1",
          rusqlite::params![id, author, text],
        )?;
        let raw = if changed == 0 {
          None
        } else {
          Some(tx.query_row(
            &format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = ?1"),
            rusqlite::params![id],
            RawQuote::from_row,
          )?)
        };
        tx.commit()?;
        Ok(raw)
      })
      .await?;

    raw.map(RawQuote::into_quote).transpose()
  }

  async fn remove_quote(&self, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM quotes WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(removed > 0)
  }
}
