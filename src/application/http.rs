// src/application/http.rs
//
// HTTP surface
//
// ROUTES:
// - GET /check-logs  Server-Sent Events, one "log-update" per log change
// - GET /decks       stored deck library as JSON
// - GET /health      schema version and row counts
//
// Storage work for plain requests runs on the blocking pool with a pooled
// connection; the SSE route hands its work to a match stream session, which
// holds its own connection.

use std::convert::Infallible;
use std::path::PathBuf;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use axum::{Json, Router};
use rusqlite::Connection;
use serde::Serialize;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::{Stream, StreamExt};

use crate::db::{get_connection, get_database_stats, ConnectionPool, DatabaseStats};
use crate::domain::DeckListing;
use crate::error::{AppError, AppResult};
use crate::repositories::{DeckStore, SqliteDeckStore};

use super::error_handling::ApiError;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/check-logs", get(check_logs))
        .route("/decks", get(list_decks))
        .route("/health", get(health))
        .with_state(state)
}

async fn check_logs(
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let session = state.match_stream.open_session().await?;
    log::debug!("Client subscribed to match stream {}", session.session_id);

    let events = UnboundedReceiverStream::new(session.events)
        .map(|update| Ok::<_, Infallible>(Event::default().event(update.event).data(update.data)));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

async fn list_decks(State(state): State<AppState>) -> Result<Json<Vec<DeckListing>>, ApiError> {
    let decks = with_connection(state.pool.clone(), |conn| {
        SqliteDeckStore::new(conn).list_decks()
    })
    .await?;

    Ok(Json(decks))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: DatabaseStats,
    pub log_path: PathBuf,
    pub log_present: bool,
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let database = with_connection(state.pool.clone(), get_database_stats).await?;
    let log_path = state.config.log_path.clone();

    Ok(Json(HealthResponse {
        status: "ok",
        database,
        log_present: log_path.is_file(),
        log_path,
    }))
}

async fn with_connection<T, F>(pool: ConnectionPool, work: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = get_connection(&pool)?;
        work(&conn)
    })
    .await
    .map_err(|e| AppError::Other(format!("Blocking task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::db::fixtures::*;
    use crate::db::{create_connection_pool, initialize_database};
    use crate::infrastructure::LineCountTracker;
    use crate::services::MatchStream;
    use std::io::Write;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::time::timeout;

    struct TestServer {
        _dir: tempfile::TempDir,
        addr: SocketAddr,
        log_path: PathBuf,
        match_stream: Arc<MatchStream>,
    }

    async fn serve() -> TestServer {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_connection_pool(&dir.path().join("deckwatch.db")).unwrap();
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
            insert_card(&conn, &land("l1", "Plains", "W", "1"));
            insert_card(&conn, &card("c1", "Azorius Charm", "{W}{U}", "Instant", "10"));
            insert_deck(&conn, 1, "Azorius Control", "17lands.com", "standard");
            insert_deck_card(&conn, 1, "l1", "Plains", 8);
            insert_deck_card(&conn, 1, "c1", "Azorius Charm", 4);
        }

        let log_path = dir.path().join("match.log");
        let config = TrackerConfig {
            database_path: dir.path().join("deckwatch.db"),
            log_path: log_path.clone(),
            poll_interval_ms: 10,
            ..Default::default()
        };
        let state = AppState::with_tracker(pool, config, Arc::new(LineCountTracker::new()));
        let match_stream = Arc::clone(&state.match_stream);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(state)).await.unwrap();
        });

        TestServer {
            _dir: dir,
            addr,
            log_path,
            match_stream,
        }
    }

    async fn request(addr: SocketAddr, path: &str) -> TcpStream {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!(
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        stream
    }

    async fn fetch(addr: SocketAddr, path: &str) -> String {
        let mut stream = request(addr, path).await;
        let mut response = String::new();
        timeout(Duration::from_secs(5), stream.read_to_string(&mut response))
            .await
            .unwrap()
            .unwrap();
        response
    }

    #[tokio::test]
    async fn test_health_reports_counts() {
        let server = serve().await;
        let response = fetch(server.addr, "/health").await;

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("\"card_count\":2"));
        assert!(response.contains("\"deck_count\":1"));
        assert!(response.contains("\"log_present\":false"));
    }

    #[tokio::test]
    async fn test_decks_listing() {
        let server = serve().await;
        let response = fetch(server.addr, "/decks").await;

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("\"name\":\"Azorius Control\""));
        assert!(response.contains("\"name\":\"Azorius Charm\""));
    }

    #[tokio::test]
    async fn test_check_logs_streams_updates() {
        let server = serve().await;
        let mut log = std::fs::File::create(&server.log_path).unwrap();
        writeln!(log, "a::b::Cards: [1, 10]").unwrap();

        let mut stream = request(server.addr, "/check-logs").await;
        let mut received = String::new();
        let mut buf = [0u8; 4096];

        timeout(Duration::from_secs(5), async {
            while !received.contains("Azorius Charm") {
                let read = stream.read(&mut buf).await.unwrap();
                assert!(read > 0, "stream closed early");
                received.push_str(&String::from_utf8_lossy(&buf[..read]));
            }
        })
        .await
        .unwrap();

        assert!(received.contains("text/event-stream"));
        assert!(received.contains("event: log-update"));
        assert!(received.contains("ms-w ms-cost"));
    }

    #[tokio::test]
    async fn test_requests_served_while_many_streams_open() {
        let server = serve().await;
        std::fs::write(&server.log_path, "a::b::Cards: [1]\n").unwrap();

        let mut sessions = Vec::new();
        for _ in 0..12 {
            sessions.push(server.match_stream.open_session().await.unwrap());
        }

        let response = fetch(server.addr, "/decks").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("\"name\":\"Azorius Control\""));

        let response = fetch(server.addr, "/health").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert_eq!(sessions.len(), 12);
    }
}
