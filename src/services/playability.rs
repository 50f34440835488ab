// src/services/playability.rs
//
// Playability Enricher
//
// CRITICAL RULES:
// - Deck cards come from the id join; the name join is only a fallback
//   for decks whose id join is empty after filtering
// - Combo pieces never reach the view
// - current_count is 0 for cards not seen in the match

use std::collections::{BTreeMap, HashMap};

use crate::domain::{
    is_card_playable, parse_card_types, render_mana_cost, CandidateDeck, DeckCardRow,
    EnrichedCard, EnrichedDeck, ManaPool, RenderedManaCost,
};
use crate::error::AppResult;
use crate::repositories::DeckStore;

pub struct PlayabilityEnricher<'a> {
    store: &'a dyn DeckStore,
}

impl<'a> PlayabilityEnricher<'a> {
    pub fn new(store: &'a dyn DeckStore) -> Self {
        Self { store }
    }

    pub fn enrich_decks(
        &self,
        decks: Vec<CandidateDeck>,
        card_counts: &HashMap<String, u32>,
        pool: &ManaPool,
    ) -> AppResult<Vec<EnrichedDeck>> {
        decks
            .into_iter()
            .map(|deck| self.enrich_deck(deck, card_counts, pool))
            .collect()
    }

    fn enrich_deck(
        &self,
        deck: CandidateDeck,
        card_counts: &HashMap<String, u32>,
        pool: &ManaPool,
    ) -> AppResult<EnrichedDeck> {
        let mut rows = without_combo_pieces(self.store.cards_for_deck(deck.id)?);
        if rows.is_empty() {
            log::trace!("Deck {} has no id-joined cards, joining by name", deck.id);
            rows = without_combo_pieces(self.store.cards_for_deck_by_name(deck.id)?);
        }

        let cards = enrich_cards_with_playability(rows, card_counts, pool);
        let type_counts = type_counts(&cards);

        Ok(EnrichedDeck {
            deck,
            cards,
            type_counts,
        })
    }
}

fn without_combo_pieces(rows: Vec<DeckCardRow>) -> Vec<DeckCardRow> {
    rows.into_iter()
        .filter(|row| !row.component.is_combo_piece())
        .collect()
}

/// Annotate deck card rows against the live match.
pub fn enrich_cards_with_playability(
    rows: Vec<DeckCardRow>,
    card_counts: &HashMap<String, u32>,
    pool: &ManaPool,
) -> Vec<EnrichedCard> {
    rows.into_iter()
        .map(|row| {
            let mana_cost = row.mana_cost.as_deref().unwrap_or("");
            let RenderedManaCost { value, tags } = render_mana_cost(mana_cost);
            let is_playable = is_card_playable(mana_cost, pool);
            let types = parse_card_types(row.type_line.as_deref().unwrap_or(""));
            let current_count = card_counts.get(&row.name).copied().unwrap_or(0);

            EnrichedCard {
                row,
                types,
                mana_cost_value: value,
                mana_cost_tags: tags,
                current_count,
                is_playable,
            }
        })
        .collect()
}

/// Card rows per lowercased primary type. Rows without a type are skipped.
pub fn type_counts(cards: &[EnrichedCard]) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for key in cards.iter().filter_map(|card| card.types.type_key()) {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}
