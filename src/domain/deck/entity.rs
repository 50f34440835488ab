use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::card::{CardComponent, TypeLine};

/// A stored deck ranked by overlap with the observed cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateDeck {
    pub id: i64,
    pub name: String,
    pub source: Option<String>,
    pub url: Option<String>,

    /// Distinct catalog cards shared with the observed set
    pub matched_cards: u32,

    /// Rows in `deck_cards` for this deck
    pub total_deck_cards: u32,
}

/// A deck card row joined with its catalog record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckCardRow {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub arena_id: Option<String>,
    pub component: CardComponent,
}

/// A candidate deck's card, annotated against the live match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedCard {
    #[serde(flatten)]
    pub row: DeckCardRow,

    #[serde(flatten)]
    pub types: TypeLine,

    pub mana_cost_value: u32,
    pub mana_cost_tags: String,

    /// Copies of this card currently observed
    pub current_count: u32,

    /// Castable from the inferred opponent pool
    pub is_playable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedDeck {
    #[serde(flatten)]
    pub deck: CandidateDeck,
    pub cards: Vec<EnrichedCard>,

    /// Lowercased primary type string -> number of card rows
    pub type_counts: BTreeMap<String, u32>,
}

/// A stored deck with its card list, for the library view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckListing {
    pub id: i64,
    pub name: String,
    pub source: Option<String>,
    pub url: Option<String>,
    pub cards: Vec<DeckListingCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckListingCard {
    pub name: String,
    pub quantity: u32,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
}
