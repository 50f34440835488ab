pub mod entity;

pub use entity::{
    CandidateDeck, DeckCardRow, DeckListing, DeckListingCard, EnrichedCard, EnrichedDeck,
};
