// src/services/match_stream.rs
//
// Match Stream - background session pushing live-match updates
//
// CRITICAL RULES:
// - One tokio task per subscriber
// - Fixed sleep after every poll, however long the tick took
// - Each session owns a dedicated connection, never one from the HTTP pool
// - Log reads and storage work run on the blocking pool, never on a worker
// - A failed tick is logged and skipped; the session keeps polling
// - A closed channel ends the session

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rusqlite::Connection;
use serde::Serialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::db::{default_database_path, open_session_connection};
use crate::error::{AppError, AppResult};
use crate::events::{
    EventBus, LogLineDetected, MatchTickFailed, StreamSessionEnded, StreamSessionStarted,
};
use crate::infrastructure::{LineCountTracker, LogTailer};
use crate::integrations::parse_arena_ids_from_log;
use crate::repositories::{SqliteCardCatalog, SqliteDeckStore};
use crate::services::match_engine::{MatchEngine, MatchSettings, MatchSnapshot};

pub const LOG_UPDATE_EVENT: &str = "log-update";

/// Where a session is in its current poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickPhase {
    Idle,
    Detected,
    Resolving,
    Matching,
    Inferring,
    Rendering,
    Disconnected,
}

/// One push to the subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamEvent {
    pub event: String,
    pub data: String,
}

impl StreamEvent {
    /// Newlines are flattened so the fragment fits a single SSE data line.
    pub fn log_update(fragment: &str) -> Self {
        Self {
            event: LOG_UPDATE_EVENT.to_string(),
            data: fragment.replace('\n', " "),
        }
    }
}

/// Turns a snapshot into the fragment pushed to subscribers.
pub type FragmentRenderer = Arc<dyn Fn(&MatchSnapshot) -> String + Send + Sync>;

#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub database_path: PathBuf,
    pub log_path: PathBuf,
    pub poll_interval_ms: u64,
    pub per_session_change_detection: bool,
    pub matching: MatchSettings,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path()
                .unwrap_or_else(|_| PathBuf::from("deckwatch.db")),
            log_path: crate::config::default_log_path(),
            poll_interval_ms: 1000,
            per_session_change_detection: false,
            matching: MatchSettings::default(),
        }
    }
}

/// A running session. Dropping `events` stops it at its next poll.
pub struct StreamSession {
    pub session_id: Uuid,
    pub events: UnboundedReceiver<StreamEvent>,
    pub task: JoinHandle<()>,
}

pub struct MatchStream {
    event_bus: Arc<EventBus>,
    shared_tracker: Arc<LineCountTracker>,
    render: FragmentRenderer,
    config: StreamConfig,
}

impl MatchStream {
    pub fn new(
        event_bus: Arc<EventBus>,
        shared_tracker: Arc<LineCountTracker>,
        render: FragmentRenderer,
        config: StreamConfig,
    ) -> Self {
        Self {
            event_bus,
            shared_tracker,
            render,
            config,
        }
    }

    /// Start a session on the current tokio runtime.
    ///
    /// Fails only when the session's database connection cannot be opened.
    pub async fn open_session(&self) -> AppResult<StreamSession> {
        let db_path = self.config.database_path.clone();
        let conn = tokio::task::spawn_blocking(move || open_session_connection(&db_path))
            .await
            .map_err(|e| AppError::Other(format!("Blocking task failed: {}", e)))??;
        let (sender, events) = mpsc::unbounded_channel();

        let tracker = if self.config.per_session_change_detection {
            Arc::new(LineCountTracker::new())
        } else {
            Arc::clone(&self.shared_tracker)
        };

        let session_id = Uuid::new_v4();
        let worker = SessionWorker {
            conn,
            tailer: LogTailer::new(self.config.log_path.clone()),
            tracker,
            event_bus: Arc::clone(&self.event_bus),
            render: Arc::clone(&self.render),
            matching: self.config.matching.clone(),
        };
        let session = SessionContext {
            session_id,
            sender,
            event_bus: Arc::clone(&self.event_bus),
            interval: Duration::from_millis(self.config.poll_interval_ms),
        };

        let task = tokio::spawn(session.run(worker));

        Ok(StreamSession {
            session_id,
            events,
            task,
        })
    }
}

struct SessionContext {
    session_id: Uuid,
    sender: UnboundedSender<StreamEvent>,
    event_bus: Arc<EventBus>,
    interval: Duration,
}

impl SessionContext {
    async fn run(self, mut worker: SessionWorker) {
        let mut ticks = 0u64;

        log::info!(
            "Match stream {} started on {}",
            self.session_id,
            worker.tailer.path().display()
        );
        self.event_bus.emit(StreamSessionStarted::new(self.session_id));

        loop {
            if self.sender.is_closed() {
                break;
            }

            // The worker, and with it the connection, travels to the blocking
            // pool for one poll and comes back with the outcome.
            let polled = tokio::task::spawn_blocking(move || {
                let outcome = worker.poll();
                (worker, outcome)
            })
            .await;

            let outcome = match polled {
                Ok((returned, outcome)) => {
                    worker = returned;
                    outcome
                }
                Err(e) => {
                    log::error!("Match stream {} poll aborted: {}", self.session_id, e);
                    break;
                }
            };

            match outcome {
                PollOutcome::Unchanged => {}
                PollOutcome::Rendered(fragment) => {
                    ticks += 1;
                    if self.sender.send(StreamEvent::log_update(&fragment)).is_err() {
                        break;
                    }
                }
                PollOutcome::Failed(e) => {
                    ticks += 1;
                    log::error!("Match stream {} tick failed: {}", self.session_id, e);
                    self.event_bus.emit(MatchTickFailed::new(e.to_string()));
                }
            }

            tokio::time::sleep(self.interval).await;
        }

        log::trace!("{:?} -> {:?}", TickPhase::Idle, TickPhase::Disconnected);
        log::info!(
            "Match stream {} stopped after {} ticks",
            self.session_id,
            ticks
        );
        self.event_bus
            .emit(StreamSessionEnded::new(self.session_id, ticks));
    }
}

enum PollOutcome {
    Unchanged,
    Rendered(String),
    Failed(AppError),
}

/// Blocking half of a session: owns the connection and the log tailer.
struct SessionWorker {
    conn: Connection,
    tailer: LogTailer,
    tracker: Arc<LineCountTracker>,
    event_bus: Arc<EventBus>,
    render: FragmentRenderer,
    matching: MatchSettings,
}

impl SessionWorker {
    fn poll(&self) -> PollOutcome {
        let latest = self.tailer.read();
        if let Some(tail) = &latest {
            self.tracker.observe(tail.line_count);
        }

        if !self.tracker.take_change() {
            return PollOutcome::Unchanged;
        }

        let line = latest.and_then(|tail| tail.last_line).unwrap_or_default();
        let mut phase = TickPhase::Idle;
        let outcome = match self.tick(&line, &mut phase) {
            Ok(fragment) => PollOutcome::Rendered(fragment),
            Err(e) => PollOutcome::Failed(e),
        };
        transition(&mut phase, TickPhase::Idle);
        outcome
    }

    fn tick(&self, line: &str, phase: &mut TickPhase) -> AppResult<String> {
        transition(phase, TickPhase::Detected);

        let arena_ids = parse_arena_ids_from_log(line);
        self.event_bus
            .emit(LogLineDetected::new(self.tracker.last_seen(), arena_ids.len()));

        let catalog = SqliteCardCatalog::new(&self.conn);
        let store = SqliteDeckStore::new(&self.conn);
        let engine = MatchEngine::new(&catalog, &store, &self.event_bus, self.matching.clone());

        let snapshot = engine.evaluate_traced(&arena_ids, &mut |next| transition(phase, next))?;

        transition(phase, TickPhase::Rendering);
        Ok((self.render)(&snapshot))
    }
}

fn transition(phase: &mut TickPhase, next: TickPhase) {
    log::trace!("{:?} -> {:?}", phase, next);
    *phase = next;
}
