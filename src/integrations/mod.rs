// src/integrations/mod.rs
//
// External Integrations Module
//
// Formats owned by systems outside this crate.

pub mod arena_log;

pub use arena_log::parse_arena_ids_from_log;
