// src/domain/mod.rs
//
// Domain Root
//
// Pure card, deck and mana models. Nothing in here touches storage,
// the filesystem or the clock.

pub mod card;
pub mod deck;
pub mod mana;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Card Domain
pub use card::{
    parse_card_types, ArenaId, CardComponent, CardRecord, ObservedCard, TypeLine, TypeLineParser,
};

// Deck Domain
pub use deck::{
    CandidateDeck, DeckCardRow, DeckListing, DeckListingCard, EnrichedCard, EnrichedDeck,
};

// Mana Domain
pub use mana::{is_card_playable, render_mana_cost, ManaColor, ManaCost, ManaPool, RenderedManaCost};
