// src/application/state.rs

use std::sync::Arc;

use crate::config::TrackerConfig;
use crate::db::ConnectionPool;
use crate::events::EventBus;
use crate::infrastructure::LineCountTracker;
use crate::services::{FragmentRenderer, MatchStream};

use super::render::render_match_fragment;

/// Shared state handed to every HTTP handler.
/// Cloning is cheap: everything is pooled or Arc-wrapped.
/// The pool serves plain requests; match streams open their own connections.
#[derive(Clone)]
pub struct AppState {
    pub pool: ConnectionPool,
    pub event_bus: Arc<EventBus>,
    pub match_stream: Arc<MatchStream>,
    pub config: Arc<TrackerConfig>,
}

impl AppState {
    /// Streams share the process-wide change detector unless the config
    /// asks for one per session.
    pub fn new(pool: ConnectionPool, config: TrackerConfig) -> Self {
        Self::with_tracker(pool, config, LineCountTracker::process_wide())
    }

    pub fn with_tracker(
        pool: ConnectionPool,
        config: TrackerConfig,
        tracker: Arc<LineCountTracker>,
    ) -> Self {
        let event_bus = Arc::new(EventBus::new());
        let render: FragmentRenderer = Arc::new(render_match_fragment);

        let match_stream = Arc::new(MatchStream::new(
            Arc::clone(&event_bus),
            tracker,
            render,
            config.stream_config(),
        ));

        Self {
            pool,
            event_bus,
            match_stream,
            config: Arc::new(config),
        }
    }
}
