// src/services/mod.rs
//
// Services Module - Orchestration Layer
//
// Leaf services (resolver, matcher, inference, enricher) borrow their
// repositories; the match engine composes them for one tick and the match
// stream drives the engine from a background task.

pub mod card_resolver;
pub mod deck_matcher;
pub mod mana_inference;
pub mod match_engine;
pub mod match_stream;
pub mod playability;

pub use card_resolver::{card_count_by_name, CardResolver, ResolvedCards};

pub use deck_matcher::{DeckMatcher, DEFAULT_CANDIDATE_LIMIT};

pub use mana_inference::infer_opponent_mana;

pub use playability::{enrich_cards_with_playability, type_counts, PlayabilityEnricher};

pub use match_engine::{MatchEngine, MatchSettings, MatchSnapshot};

pub use match_stream::{
    FragmentRenderer,
    MatchStream,
    StreamConfig,
    StreamEvent,
    StreamSession,
    TickPhase,
    LOG_UPDATE_EVENT,
};
