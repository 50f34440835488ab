// src/services/deck_matcher.rs
//
// Deck Matcher - ranks stored decklists by overlap with observed cards
//
// CRITICAL RULES:
// - Tier 1 joins on catalog card id; tier 2 joins on card name
// - Tier 2 runs only when tier 1 came back short
// - Tier 2 results are appended as-is (a deck may appear twice)
// - No observed cards means no storage access at all

use std::collections::BTreeSet;

use crate::domain::{CandidateDeck, ObservedCard};
use crate::error::AppResult;
use crate::repositories::{DeckSearchFilter, DeckStore};

/// Candidates returned per tier.
pub const DEFAULT_CANDIDATE_LIMIT: u32 = 3;

pub struct DeckMatcher<'a> {
    store: &'a dyn DeckStore,
    fallback_filter: DeckSearchFilter,
    limit: u32,
}

impl<'a> DeckMatcher<'a> {
    pub fn new(store: &'a dyn DeckStore) -> Self {
        Self {
            store,
            fallback_filter: DeckSearchFilter::default(),
            limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }

    pub fn with_fallback_filter(mut self, filter: DeckSearchFilter) -> Self {
        self.fallback_filter = filter;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn find_matching_decks(&self, observed: &[ObservedCard]) -> AppResult<Vec<CandidateDeck>> {
        if observed.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<String> = observed
            .iter()
            .map(|c| c.card.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut decks = self.store.find_decks_by_card_ids(&names, self.limit)?;
        log::trace!("Tier 1 matched {} decks for {} names", decks.len(), names.len());

        if (decks.len() as u32) < self.limit {
            let fallback =
                self.store
                    .find_decks_by_card_names(&names, &self.fallback_filter, self.limit)?;
            log::trace!("Tier 2 matched {} decks", fallback.len());
            decks.extend(fallback);
        }

        Ok(decks)
    }
}
