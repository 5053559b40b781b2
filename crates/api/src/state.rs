use std::sync::{Arc, Mutex};

use ridgeline_core::dedup::PendingDedup;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ridgeline_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// In-flight deduplication for customer response submissions.
    pub pending: Arc<Mutex<PendingDedup>>,
}
