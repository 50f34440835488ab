// src/config.rs
//
// Tracker configuration
//
// PRINCIPLES:
// - Every field has a working default
// - A JSON file may override defaults; CLI flags override the file
// - Invalid values are rejected at startup, never mid-session

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::db::default_database_path;
use crate::error::{AppError, AppResult};
use crate::repositories::DeckSearchFilter;
use crate::services::{MatchSettings, StreamConfig, DEFAULT_CANDIDATE_LIMIT};

/// Default location of the game client's match log.
pub fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".seventeenlands")
        .join("fake_seventeenlands.log")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub database_path: PathBuf,
    pub log_path: PathBuf,
    pub poll_interval_ms: u64,
    pub bind_addr: SocketAddr,

    /// Candidate decks per matching tier
    pub max_candidate_decks: u32,

    pub fallback_format: String,
    pub fallback_max_deck_cards: u32,

    /// Deck sources the name-join tier accepts. Empty means any source.
    pub fallback_sources: Vec<String>,

    /// Give each stream its own change detector instead of the shared one
    pub per_session_change_detection: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let filter = DeckSearchFilter::default();
        Self {
            database_path: default_database_path()
                .unwrap_or_else(|_| PathBuf::from("deckwatch.db")),
            log_path: default_log_path(),
            poll_interval_ms: 1000,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            max_candidate_decks: DEFAULT_CANDIDATE_LIMIT,
            fallback_format: filter.format,
            fallback_max_deck_cards: filter.max_deck_cards,
            fallback_sources: filter.sources,
            per_session_change_detection: false,
        }
    }
}

impl TrackerConfig {
    /// Defaults, overridden by the JSON file at `path` when given.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AppError::Config(format!("Cannot read config {}: {}", path.display(), e))
                })?;
                serde_json::from_str(&raw)?
            }
            None => Self::default(),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(AppError::Config("poll_interval_ms must be positive".to_string()));
        }
        if self.max_candidate_decks == 0 {
            return Err(AppError::Config("max_candidate_decks must be positive".to_string()));
        }
        if self.fallback_format.trim().is_empty() {
            return Err(AppError::Config("fallback_format must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn deck_search_filter(&self) -> DeckSearchFilter {
        DeckSearchFilter {
            format: self.fallback_format.clone(),
            max_deck_cards: self.fallback_max_deck_cards,
            sources: self.fallback_sources.clone(),
        }
    }

    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig {
            database_path: self.database_path.clone(),
            log_path: self.log_path.clone(),
            poll_interval_ms: self.poll_interval_ms,
            per_session_change_detection: self.per_session_change_detection,
            matching: MatchSettings {
                candidate_limit: self.max_candidate_decks,
                fallback_filter: self.deck_search_filter(),
            },
        }
    }

    /// Apply command-line overrides.
    pub fn apply_cli(mut self, args: &CliArgs) -> AppResult<Self> {
        if let Some(database) = &args.database {
            self.database_path = database.clone();
        }
        if let Some(log_file) = &args.log_file {
            self.log_path = log_file.clone();
        }
        if let Some(bind) = args.bind {
            self.bind_addr = bind;
        }
        if let Some(interval) = args.poll_interval_ms {
            self.poll_interval_ms = interval;
        }
        if args.per_session_change_detection {
            self.per_session_change_detection = true;
        }

        self.validate()?;
        Ok(self)
    }
}

/// CLI arguments for the tracker server.
#[derive(Debug, Parser)]
#[command(name = "deckwatch")]
#[command(about = "Live opponent deck inference from game client logs")]
pub struct CliArgs {
    /// JSON configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// SQLite database holding the card catalog and decks.
    #[arg(long)]
    pub database: Option<PathBuf>,

    /// Match log to tail.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// HTTP listen address.
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Delay between log polls, in milliseconds.
    #[arg(long)]
    pub poll_interval_ms: Option<u64>,

    /// Track log changes per stream instead of process-wide.
    #[arg(long, default_value = "false")]
    pub per_session_change_detection: bool,
}

impl CliArgs {
    pub fn to_tracker_config(&self) -> AppResult<TrackerConfig> {
        TrackerConfig::load(self.config.as_deref())?.apply_cli(self)
    }
}
