use std::sync::Arc;

use stockroom_cloud::CloudServices;
use stockroom_core::activity::{ActivityEntry, ActivityLevel, ActivitySink};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every field is a pool handle or behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stockroom_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Object storage, recognition, embeddings, vector index, barcode and SMS.
    pub cloud: CloudServices,
    /// Recent-activity feed served by `GET /logs`.
    pub activity: Arc<dyn ActivitySink>,
}

impl AppState {
    /// Record an activity entry and mirror it to the tracing log.
    pub fn record_activity(&self, entry: ActivityEntry) {
        match entry.level {
            ActivityLevel::Error => {
                tracing::warn!(source = %entry.source, details = ?entry.details, "{}", entry.message)
            }
            _ => tracing::info!(source = %entry.source, "{}", entry.message),
        }
        self.activity.record(entry);
    }
}
