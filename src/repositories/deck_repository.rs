// src/repositories/deck_repository.rs
//
// Deck storage queries.
//
// Two precision tiers exist for both candidate search and card listing:
// - by card id: deck_cards.card_id resolved against the catalog
// - by card name: for decks imported with name keys instead of catalog ids

use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, Row};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::placeholders;
use crate::domain::{CandidateDeck, CardComponent, DeckCardRow, DeckListing, DeckListingCard};
use crate::error::AppResult;

/// Restrictions applied to the name-join candidate search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckSearchFilter {
    pub format: String,
    pub max_deck_cards: u32,
    /// Allowed `decks.source` values; empty means any source
    pub sources: Vec<String>,
}

impl Default for DeckSearchFilter {
    fn default() -> Self {
        Self {
            format: "standard".to_string(),
            max_deck_cards: 100,
            sources: vec!["17lands.com".to_string(), "mtgazone.com".to_string()],
        }
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait DeckStore {
    /// Decks ranked by distinct catalog cards (joined by card id) whose name is in `card_names`.
    fn find_decks_by_card_ids(&self, card_names: &[String], limit: u32) -> AppResult<Vec<CandidateDeck>>;

    /// Same ranking joined on card name, restricted by `filter`.
    fn find_decks_by_card_names(
        &self,
        card_names: &[String],
        filter: &DeckSearchFilter,
        limit: u32,
    ) -> AppResult<Vec<CandidateDeck>>;

    fn cards_for_deck(&self, deck_id: i64) -> AppResult<Vec<DeckCardRow>>;

    fn cards_for_deck_by_name(&self, deck_id: i64) -> AppResult<Vec<DeckCardRow>>;

    /// Every deck with its non-combo-piece cards, newest first.
    fn list_decks(&self) -> AppResult<Vec<DeckListing>>;
}

pub struct SqliteDeckStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteDeckStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_candidate(row: &Row) -> rusqlite::Result<CandidateDeck> {
        Ok(CandidateDeck {
            id: row.get("id")?,
            name: row.get("name")?,
            source: row.get("source")?,
            url: row.get("url")?,
            matched_cards: row.get("matched_cards")?,
            total_deck_cards: row.get("total_deck_cards")?,
        })
    }

    fn row_to_deck_card(row: &Row) -> rusqlite::Result<DeckCardRow> {
        Ok(DeckCardRow {
            id: row.get("id")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            mana_cost: row.get("mana_cost")?,
            type_line: row.get("type_line")?,
            arena_id: row.get("arena_id")?,
            component: CardComponent::from_column(row.get("component")?),
        })
    }

    fn query_candidates(&self, sql: &str, values: Vec<Value>) -> AppResult<Vec<CandidateDeck>> {
        let mut stmt = self.conn.prepare(sql)?;
        let decks = stmt
            .query_map(params_from_iter(values.iter()), Self::row_to_candidate)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(decks)
    }

    fn query_deck_cards(&self, sql: &str, deck_id: i64) -> AppResult<Vec<DeckCardRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        let cards = stmt
            .query_map([deck_id], Self::row_to_deck_card)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(cards)
    }
}

fn text_values(values: &[String]) -> Vec<Value> {
    values.iter().map(|v| Value::Text(v.clone())).collect()
}

impl DeckStore for SqliteDeckStore<'_> {
    fn find_decks_by_card_ids(&self, card_names: &[String], limit: u32) -> AppResult<Vec<CandidateDeck>> {
        if card_names.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT d.id, d.name, d.source, d.url,
                    COUNT(DISTINCT dc.card_id) AS matched_cards,
                    (SELECT COUNT(*) FROM deck_cards WHERE deck_id = d.id) AS total_deck_cards
             FROM decks d
             INNER JOIN deck_cards dc ON d.id = dc.deck_id
             INNER JOIN cards c ON dc.card_id = c.id
             WHERE c.name IN ({})
             GROUP BY d.id
             ORDER BY matched_cards DESC, d.id ASC
             LIMIT ?",
            placeholders(card_names.len())
        );

        let mut values = text_values(card_names);
        values.push(Value::Integer(i64::from(limit)));
        self.query_candidates(&sql, values)
    }

    fn find_decks_by_card_names(
        &self,
        card_names: &[String],
        filter: &DeckSearchFilter,
        limit: u32,
    ) -> AppResult<Vec<CandidateDeck>> {
        if card_names.is_empty() {
            return Ok(Vec::new());
        }

        let source_clause = if filter.sources.is_empty() {
            String::new()
        } else {
            format!("AND d.source IN ({})", placeholders(filter.sources.len()))
        };

        let sql = format!(
            "SELECT d.id, d.name, d.source, d.url,
                    COUNT(DISTINCT dc.name) AS matched_cards,
                    (SELECT COUNT(*) FROM deck_cards WHERE deck_id = d.id) AS total_deck_cards
             FROM decks d
             INNER JOIN deck_cards dc ON d.id = dc.deck_id
             INNER JOIN cards c ON dc.name = c.name
             WHERE c.name IN ({})
               AND d.format = ?
               AND (SELECT COUNT(*) FROM deck_cards WHERE deck_id = d.id) <= ?
               {}
             GROUP BY d.id
             ORDER BY matched_cards DESC, d.id ASC
             LIMIT ?",
            placeholders(card_names.len()),
            source_clause
        );

        let mut values = text_values(card_names);
        values.push(Value::Text(filter.format.clone()));
        values.push(Value::Integer(i64::from(filter.max_deck_cards)));
        values.extend(text_values(&filter.sources));
        values.push(Value::Integer(i64::from(limit)));
        self.query_candidates(&sql, values)
    }

    fn cards_for_deck(&self, deck_id: i64) -> AppResult<Vec<DeckCardRow>> {
        self.query_deck_cards(
            "SELECT c.name, dc.quantity, c.mana_cost, c.type_line, c.arena_id, c.id, c.component
             FROM deck_cards dc
             JOIN cards c ON dc.card_id = c.id
             WHERE dc.deck_id = ?1
             ORDER BY c.name",
            deck_id,
        )
    }

    fn cards_for_deck_by_name(&self, deck_id: i64) -> AppResult<Vec<DeckCardRow>> {
        self.query_deck_cards(
            "SELECT c.name, dc.quantity, c.mana_cost, c.type_line, c.arena_id, c.id, c.component
             FROM deck_cards dc
             JOIN cards c ON dc.name = c.name
             WHERE dc.deck_id = ?1
             GROUP BY c.name
             ORDER BY c.name",
            deck_id,
        )
    }

    fn list_decks(&self) -> AppResult<Vec<DeckListing>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.id AS deck_id, d.name AS deck_name, d.source, d.url,
                    c.name, dc.quantity, c.mana_cost, c.type_line
             FROM decks d
             INNER JOIN deck_cards dc ON d.id = dc.deck_id
             INNER JOIN cards c ON dc.card_id = c.id
             WHERE c.component IS NULL OR c.component != 'combo_piece'
             ORDER BY d.added_at DESC, d.id DESC, c.name",
        )?;

        let rows = stmt.query_map([], |row| {
            let deck = DeckListing {
                id: row.get("deck_id")?,
                name: row.get("deck_name")?,
                source: row.get("source")?,
                url: row.get("url")?,
                cards: Vec::new(),
            };
            let card = DeckListingCard {
                name: row.get("name")?,
                quantity: row.get("quantity")?,
                mana_cost: row.get("mana_cost")?,
                type_line: row.get("type_line")?,
            };
            Ok((deck, card))
        })?;

        // Group consecutive rows while keeping the newest-first deck order.
        let mut order: Vec<i64> = Vec::new();
        let mut decks: BTreeMap<i64, DeckListing> = BTreeMap::new();
        for row in rows {
            let (deck, card) = row?;
            let entry = decks.entry(deck.id).or_insert_with(|| {
                order.push(deck.id);
                deck
            });
            entry.cards.push(card);
        }

        Ok(order
            .into_iter()
            .filter_map(|id| decks.remove(&id))
            .collect())
    }
}
