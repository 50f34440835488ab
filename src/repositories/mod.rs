// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO event emission
// - NO cross-repository calls
// - Explicit SQL only
//
// Repositories borrow a connection instead of owning the pool: a live match
// stream holds one connection for its whole lifetime and builds repositories
// over it on every tick.

pub mod card_repository;
pub mod deck_repository;

pub use card_repository::{CardCatalog, SqliteCardCatalog};
pub use deck_repository::{DeckSearchFilter, DeckStore, SqliteDeckStore};

#[cfg(test)]
pub use card_repository::MockCardCatalog;
#[cfg(test)]
pub use deck_repository::MockDeckStore;

/// `?, ?, ?` for an IN list of `count` values.
pub(crate) fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
