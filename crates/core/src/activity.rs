//! Recent-activity feed shown on the dashboard.
//!
//! Each pipeline step (upload, recognition, embedding, lookup, ...) reports
//! under a `source` name, optionally on behalf of a tenant. Only the latest
//! entry per (tenant, source) is kept, up to [`ACTIVITY_CAPACITY`] keys, and
//! entries are read back newest first.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use serde::Serialize;

use crate::tenant::Tenant;
use crate::types::{DbId, Timestamp};

/// Maximum number of sources retained by [`BoundedActivityLog`].
pub const ACTIVITY_CAPACITY: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub source: String,
    pub level: ActivityLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip)]
    pub owner_id: Option<DbId>,
    pub recorded_at: Timestamp,
}

impl ActivityEntry {
    pub fn new(source: impl Into<String>, level: ActivityLevel, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            level,
            message: message.into(),
            details: None,
            owner_id: None,
            recorded_at: Utc::now(),
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn for_tenant(mut self, tenant: &Tenant) -> Self {
        self.owner_id = Some(tenant.user_id());
        self
    }

    pub fn is_visible_to(&self, tenant: &Tenant) -> bool {
        self.owner_id.is_none_or(|id| id == tenant.user_id())
    }

    fn key(&self) -> (Option<DbId>, String) {
        (self.owner_id, self.source.clone())
    }
}

/// Destination for activity entries.
pub trait ActivitySink: Send + Sync {
    fn record(&self, entry: ActivityEntry);

    /// Entries newest first.
    fn recent(&self) -> Vec<ActivityEntry>;
}

/// In-memory [`ActivitySink`] keeping the latest entry per (tenant, source).
#[derive(Debug)]
pub struct BoundedActivityLog {
    capacity: usize,
    entries: Mutex<HashMap<(Option<DbId>, String), ActivityEntry>>,
}

impl BoundedActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for BoundedActivityLog {
    fn default() -> Self {
        Self::new(ACTIVITY_CAPACITY)
    }
}

impl ActivitySink for BoundedActivityLog {
    fn record(&self, entry: ActivityEntry) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(entry.key(), entry);

        while entries.len() > self.capacity {
            let oldest = entries.values().min_by_key(|e| e.recorded_at).map(ActivityEntry::key);
            match oldest {
                Some(key) => entries.remove(&key),
                None => break,
            };
        }
    }

    fn recent(&self) -> Vec<ActivityEntry> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut out: Vec<ActivityEntry> = entries.values().cloned().collect();
        out.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        out
    }
}
