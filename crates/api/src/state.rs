use std::sync::Arc;

use crate::config::ServerConfig;
use crate::notifications::Notifier;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: kerbside_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Confirmation notification sink. Dispatch runs off the critical path.
    pub notifier: Arc<dyn Notifier>,
}
