// src/db/fixtures.rs
//
// Seed helpers for storage-backed tests.

use rusqlite::{params, Connection};

use crate::db::{create_test_connection, initialize_database};
use crate::domain::CardRecord;

/// Fresh in-memory database with the schema applied.
pub fn test_database() -> Connection {
    let conn = create_test_connection().unwrap();
    initialize_database(&conn).unwrap();
    conn
}

pub fn card(id: &str, name: &str, mana_cost: &str, type_line: &str, arena_id: &str) -> CardRecord {
    CardRecord {
        id: id.to_string(),
        name: name.to_string(),
        mana_cost: (!mana_cost.is_empty()).then(|| mana_cost.to_string()),
        type_line: Some(type_line.to_string()),
        arena_id: (!arena_id.is_empty()).then(|| arena_id.to_string()),
        ..Default::default()
    }
}

pub fn land(id: &str, name: &str, produced_mana: &str, arena_id: &str) -> CardRecord {
    CardRecord {
        produced_mana: Some(produced_mana.to_string()),
        ..card(id, name, "", "Land", arena_id)
    }
}

pub fn insert_card(conn: &Connection, card: &CardRecord) {
    let component = card.component.to_string();
    conn.execute(
        "INSERT INTO cards (id, name, mana_cost, type_line, arena_id, printed_name, flavor_name, produced_mana, component)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            card.id,
            card.name,
            card.mana_cost,
            card.type_line,
            card.arena_id,
            card.printed_name,
            card.flavor_name,
            card.produced_mana,
            (!component.is_empty()).then_some(component),
        ],
    )
    .unwrap();
}

pub fn insert_legacy_card(conn: &Connection, id: &str, name: &str) {
    conn.execute(
        "INSERT INTO legacy_cards (id, name) VALUES (?1, ?2)",
        params![id, name],
    )
    .unwrap();
}

pub fn insert_deck(conn: &Connection, id: i64, name: &str, source: &str, format: &str) {
    conn.execute(
        "INSERT INTO decks (id, name, source, format, url) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, name, source, format, format!("https://{}/decks/{}", source, id)],
    )
    .unwrap();
}

pub fn insert_deck_card(conn: &Connection, deck_id: i64, card_id: &str, name: &str, quantity: u32) {
    conn.execute(
        "INSERT INTO deck_cards (deck_id, card_id, name, quantity) VALUES (?1, ?2, ?3, ?4)",
        params![deck_id, card_id, name, quantity],
    )
    .unwrap();
}
