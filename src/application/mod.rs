// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Boundary between HTTP clients and the services
// - Renders snapshots for presentation; never computes match data itself
// - Translates AppError into HTTP responses

pub mod error_handling;
pub mod http;
pub mod render;
pub mod state;

pub use error_handling::{ApiError, ErrorResponse, ErrorType};
pub use http::{router, HealthResponse};
pub use render::render_match_fragment;
pub use state::AppState;
