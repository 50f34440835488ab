// src/db/mod.rs
//
// Database module
//
// Provides:
// - Connection pooling
// - Schema migrations
// - Database utilities

pub mod connection;
pub mod migrations;

#[cfg(test)]
pub mod fixtures;

pub use connection::{
    create_connection_pool, create_test_connection, default_database_path, get_connection,
    open_session_connection, ConnectionPool, PooledConn,
};

pub use migrations::{
    get_database_stats, get_schema_version, initialize_database, verify_database_integrity,
    DatabaseStats,
};
