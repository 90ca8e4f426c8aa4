//! Random quote selection with layered filter fallback.
//!
//! The filters a caller supplies decide which tiers are tried, most specific
//! first. The first tier with a non-empty candidate set wins and one candidate
//! is drawn uniformly. When no tier applies, or every tier comes back empty,
//! the selector draws a random id below the live maximum id instead.
//!
//! The id draw covers `1..=max_id` rather than `0..max_id`: store ids start at
//! 1, so a half-open range from 0 could never reach the newest quote and would
//! spend draws on an id that never exists. Ids freed by deletes still yield
//! `None`.
//!
//! | Filters supplied | Tiers tried, in order                     |
//! |------------------|-------------------------------------------|
//! | author + length  | author AND length, author, length         |
//! | author           | author                                    |
//! | length           | length                                    |
//! | none             | none (straight to the id draw)            |

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

use crate::{
  quote::{Quote, QuoteFilter},
  store::QuoteStore,
};

/// One level of the fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
  AuthorAndLength,
  Author,
  Length,
}

/// Expand `filter` into the ordered list of tier predicates to try.
pub fn tiers(filter: &QuoteFilter) -> Vec<(Tier, QuoteFilter)> {
  match (&filter.author, filter.max_length) {
    (Some(author), Some(max)) => vec![
      (Tier::AuthorAndLength, QuoteFilter::new(Some(author.clone()), Some(max))),
      (Tier::Author, QuoteFilter::by_author(author.clone())),
      (Tier::Length, QuoteFilter::by_max_length(max)),
    ],
    (Some(author), None) => vec![(Tier::Author, QuoteFilter::by_author(author.clone()))],
    (None, Some(max)) => vec![(Tier::Length, QuoteFilter::by_max_length(max))],
    (None, None) => Vec::new(),
  }
}

/// Pick a random quote using a fresh entropy-seeded generator.
pub async fn select_random<S: QuoteStore>(
  store: &S,
  filter: &QuoteFilter,
) -> Result<Option<Quote>, S::Error> {
  let mut rng = StdRng::from_entropy();
  select_random_with(store, filter, &mut rng).await
}

/// Pick a random quote, drawing from `rng`.
///
/// Returns `Ok(None)` when the store is empty or the fallback id draw lands on
/// a deleted id.
pub async fn select_random_with<S, R>(
  store: &S,
  filter: &QuoteFilter,
  rng: &mut R,
) -> Result<Option<Quote>, S::Error>
where
  S: QuoteStore,
  R: Rng,
{
  for (tier, predicate) in tiers(filter) {
    let candidates = store.filter_quotes(&predicate).await?;
    if let Some(quote) = candidates.choose(rng) {
      tracing::debug!(?tier, candidates = candidates.len(), id = quote.id, "selected quote");
      return Ok(Some(quote.clone()));
    }
  }

  // Ids start at 1; the maximum is read live so inserts and deletes since
  // startup are always reflected.
  let max_id = store.max_id().await?;
  if max_id < 1 {
    return Ok(None);
  }

  let id = rng.gen_range(1..=max_id);
  tracing::debug!(id, max_id, "falling back to unfiltered id draw");
  store.get_quote(id).await
}
