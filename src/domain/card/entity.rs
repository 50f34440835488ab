use serde::{Deserialize, Serialize};

use super::type_line::{parse_card_types, TypeLine};
use crate::domain::mana::{render_mana_cost, RenderedManaCost};

/// Opaque per-printing identifier emitted by the game client log.
pub type ArenaId = String;

/// Classification of a catalog row.
///
/// Combo pieces are supplementary rows (reprints, alternate art halves)
/// that must not show up in deck listings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CardComponent {
    #[default]
    Ordinary,
    ComboPiece,
    Other(String),
}

impl CardComponent {
    pub fn from_column(value: Option<String>) -> Self {
        match value.as_deref() {
            None | Some("") => CardComponent::Ordinary,
            Some("combo_piece") => CardComponent::ComboPiece,
            Some(other) => CardComponent::Other(other.to_string()),
        }
    }

    pub fn is_combo_piece(&self) -> bool {
        matches!(self, CardComponent::ComboPiece)
    }
}

impl std::fmt::Display for CardComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardComponent::Ordinary => write!(f, ""),
            CardComponent::ComboPiece => write!(f, "combo_piece"),
            CardComponent::Other(value) => write!(f, "{}", value),
        }
    }
}

impl Serialize for CardComponent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CardComponent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(CardComponent::from_column(value))
    }
}

/// Canonical catalog entry. Immutable reference data owned by ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Catalog primary key (what `deck_cards.card_id` points at)
    pub id: String,
    pub name: String,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub arena_id: Option<ArenaId>,
    pub printed_name: Option<String>,
    pub flavor_name: Option<String>,
    /// Comma-separated color tokens, e.g. `W,U`
    pub produced_mana: Option<String>,
    pub component: CardComponent,
}

impl CardRecord {
    /// A card known only from the legacy id table, with no catalog match.
    pub fn from_legacy(arena_id: ArenaId, name: String) -> Self {
        Self {
            name,
            arena_id: Some(arena_id),
            ..Default::default()
        }
    }

    pub fn mana_cost_str(&self) -> &str {
        self.mana_cost.as_deref().unwrap_or("")
    }

    pub fn type_line_str(&self) -> &str {
        self.type_line.as_deref().unwrap_or("")
    }

    /// Produced-mana tokens, trimmed, empties dropped.
    pub fn produced_mana_tokens(&self) -> Vec<&str> {
        self.produced_mana
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect()
    }
}

/// A catalog card seen in the current log line, with view annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservedCard {
    #[serde(flatten)]
    pub card: CardRecord,

    /// Occurrences of `card.arena_id` in the observed id list
    pub count: u32,

    #[serde(flatten)]
    pub types: TypeLine,

    pub mana_cost_value: u32,
    pub mana_cost_tags: String,
}

impl ObservedCard {
    pub fn new(card: CardRecord, count: u32) -> Self {
        let types = parse_card_types(card.type_line_str());
        let RenderedManaCost { value, tags } = render_mana_cost(card.mana_cost_str());
        Self {
            card,
            count,
            types,
            mana_cost_value: value,
            mana_cost_tags: tags,
        }
    }

    pub fn is_land(&self) -> bool {
        self.types.types == "Land"
    }
}
