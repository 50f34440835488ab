// src/repositories/card_repository.rs

use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};

use super::placeholders;
use crate::domain::{ArenaId, CardComponent, CardRecord};
use crate::error::AppResult;

const CARD_COLUMNS: &str =
    "name, mana_cost, type_line, arena_id, id, printed_name, flavor_name, produced_mana, component";

/// Read-only access to the card catalog.
#[cfg_attr(test, mockall::automock)]
pub trait CardCatalog {
    /// Catalog rows whose arena id is any of `arena_ids`.
    fn find_by_arena_ids(&self, arena_ids: &[ArenaId]) -> AppResult<Vec<CardRecord>>;

    /// `(arena_id, name)` pairs from the legacy id table.
    fn find_legacy_names(&self, arena_ids: &[ArenaId]) -> AppResult<Vec<(ArenaId, String)>>;

    fn find_by_name(&self, name: &str) -> AppResult<Option<CardRecord>>;

    /// Match against printed or flavor name (SQL LIKE, case-insensitive).
    fn find_by_alias(&self, name: &str) -> AppResult<Option<CardRecord>>;
}

pub struct SqliteCardCatalog<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteCardCatalog<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    fn row_to_card(row: &Row) -> rusqlite::Result<CardRecord> {
        Ok(CardRecord {
            id: row.get("id")?,
            name: row.get("name")?,
            mana_cost: row.get("mana_cost")?,
            type_line: row.get("type_line")?,
            arena_id: row.get("arena_id")?,
            printed_name: row.get("printed_name")?,
            flavor_name: row.get("flavor_name")?,
            produced_mana: row.get("produced_mana")?,
            component: CardComponent::from_column(row.get("component")?),
        })
    }
}

impl CardCatalog for SqliteCardCatalog<'_> {
    fn find_by_arena_ids(&self, arena_ids: &[ArenaId]) -> AppResult<Vec<CardRecord>> {
        if arena_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT DISTINCT {} FROM cards WHERE arena_id IN ({})",
            CARD_COLUMNS,
            placeholders(arena_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let cards = stmt
            .query_map(params_from_iter(arena_ids.iter()), Self::row_to_card)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(cards)
    }

    fn find_legacy_names(&self, arena_ids: &[ArenaId]) -> AppResult<Vec<(ArenaId, String)>> {
        if arena_ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT DISTINCT id, name FROM legacy_cards WHERE id IN ({})",
            placeholders(arena_ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let names = stmt
            .query_map(params_from_iter(arena_ids.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(names)
    }

    fn find_by_name(&self, name: &str) -> AppResult<Option<CardRecord>> {
        let sql = format!("SELECT {} FROM cards WHERE name = ?1 LIMIT 1", CARD_COLUMNS);
        let card = self
            .conn
            .query_row(&sql, [name], Self::row_to_card)
            .optional()?;

        Ok(card)
    }

    fn find_by_alias(&self, name: &str) -> AppResult<Option<CardRecord>> {
        let sql = format!(
            "SELECT {} FROM cards WHERE printed_name LIKE ?1 OR flavor_name LIKE ?1 LIMIT 1",
            CARD_COLUMNS
        );
        let card = self
            .conn
            .query_row(&sql, [name], Self::row_to_card)
            .optional()?;

        Ok(card)
    }
}
