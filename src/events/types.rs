// events/types.rs
//
// Domain events of the match pipeline.
// Each event represents an immutable fact that has already occurred.
//
// CRITICAL RULES:
// - Events are facts, not commands
// - Events are immutable
// - Events carry only the data needed to react
// - No business logic in event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trait that all domain events must implement
pub trait DomainEvent: std::fmt::Debug + Clone {
    /// Unique identifier for this event instance
    fn event_id(&self) -> Uuid;

    /// When this event occurred
    fn occurred_at(&self) -> DateTime<Utc>;

    /// Human-readable event type name
    fn event_type(&self) -> &'static str;
}

macro_rules! domain_event {
    ($name:ident) => {
        impl DomainEvent for $name {
            fn event_id(&self) -> Uuid {
                self.event_id
            }
            fn occurred_at(&self) -> DateTime<Utc> {
                self.occurred_at
            }
            fn event_type(&self) -> &'static str {
                stringify!($name)
            }
        }
    };
}

// ============================================================================
// STREAM SESSION EVENTS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSessionStarted {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub session_id: Uuid,
}

impl StreamSessionStarted {
    pub fn new(session_id: Uuid) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            session_id,
        }
    }
}

domain_event!(StreamSessionStarted);

/// Emitted when a session stops because its subscriber went away
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamSessionEnded {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub session_id: Uuid,
    pub ticks_processed: u64,
}

impl StreamSessionEnded {
    pub fn new(session_id: Uuid, ticks_processed: u64) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            session_id,
            ticks_processed,
        }
    }
}

domain_event!(StreamSessionEnded);

// ============================================================================
// MATCH PIPELINE EVENTS
// ============================================================================

/// Emitted when the log's line count changed and the last line was parsed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLineDetected {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub line_count: u64,
    pub arena_id_count: usize,
}

impl LogLineDetected {
    pub fn new(line_count: u64, arena_id_count: usize) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            line_count,
            arena_id_count,
        }
    }
}

domain_event!(LogLineDetected);

/// Emitted when some arena ids matched neither the catalog nor the legacy table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaIdsUnresolved {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub missing_ids: Vec<String>,
}

impl ArenaIdsUnresolved {
    pub fn new(missing_ids: Vec<String>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            missing_ids,
        }
    }
}

domain_event!(ArenaIdsUnresolved);

/// Emitted after the deck matcher ranked candidates for the observed cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDecksRanked {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub observed_cards: usize,
    pub deck_ids: Vec<i64>,
}

impl CandidateDecksRanked {
    pub fn new(observed_cards: usize, deck_ids: Vec<i64>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            observed_cards,
            deck_ids,
        }
    }
}

domain_event!(CandidateDecksRanked);

/// Emitted when a tick failed; the session keeps running
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchTickFailed {
    pub event_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    pub reason: String,
}

impl MatchTickFailed {
    pub fn new(reason: String) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: Utc::now(),
            reason,
        }
    }
}

domain_event!(MatchTickFailed);
