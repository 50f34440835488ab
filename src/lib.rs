// src/lib.rs
// Deckwatch - live opponent deck inference from game client logs
//
// Architecture:
// - Domain-centric: card, deck and mana rules live in pure domain modules
// - Repositories: explicit SQL over a borrowed SQLite connection
// - Services: resolver, matcher, inference and enricher composed per tick
// - Event-driven: pipeline facts are published on a synchronous event bus
// - Application Layer: HTTP/SSE boundary and HTML rendering

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod infrastructure;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{
    is_card_playable,
    parse_card_types,
    render_mana_cost,
    ArenaId,
    // Deck
    CandidateDeck,
    // Card
    CardComponent,
    CardRecord,
    DeckCardRow,
    DeckListing,
    DeckListingCard,
    EnrichedCard,
    EnrichedDeck,
    // Mana
    ManaColor,
    ManaCost,
    ManaPool,
    ObservedCard,
    RenderedManaCost,
    TypeLine,
    TypeLineParser,
};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Configuration
// ============================================================================

pub use config::{CliArgs, TrackerConfig};

// ============================================================================
// PUBLIC API - Events
// ============================================================================

pub use events::{
    create_event_bus,
    ArenaIdsUnresolved,
    CandidateDecksRanked,
    DomainEvent,
    EventBus,
    EventLogEntry,
    LogLineDetected,
    MatchTickFailed,
    StreamSessionEnded,
    StreamSessionStarted,
};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{CardCatalog, DeckSearchFilter, DeckStore, SqliteCardCatalog, SqliteDeckStore};

// ============================================================================
// PUBLIC API - Infrastructure & Integrations
// ============================================================================

pub use infrastructure::{LineCountTracker, LogTail, LogTailer};
pub use integrations::parse_arena_ids_from_log;

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    card_count_by_name,
    enrich_cards_with_playability,
    infer_opponent_mana,
    CardResolver,
    DeckMatcher,
    MatchEngine,
    MatchSettings,
    MatchSnapshot,
    MatchStream,
    PlayabilityEnricher,
    ResolvedCards,
    StreamConfig,
    StreamEvent,
    StreamSession,
    TickPhase,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{render_match_fragment, router, AppState};
