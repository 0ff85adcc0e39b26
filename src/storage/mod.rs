//! Persistence for collected announcements.
//!
//! A single JSON snapshot file holds the latest bounded batch:
//!
//! ```text
//! data/
//! └── exam_schedule.json    # {updated_at, announcements[]}, newest first
//! ```
//!
//! The snapshot is the hand-off point between collection and the digest
//! stage, so digests can be re-rendered without scraping again.

pub mod local;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Announcement;

// Re-export for convenience
pub use local::LocalCache;

/// Upper bound on announcements kept in the snapshot.
pub const CACHE_LIMIT: usize = 1000;

/// Snapshot of the latest collected batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeCache {
    /// ISO 8601 timestamp of last update
    pub updated_at: DateTime<Utc>,
    /// The announcements array, newest first
    pub announcements: Vec<Announcement>,
}

impl ScrapeCache {
    pub fn new(announcements: Vec<Announcement>) -> Self {
        Self {
            updated_at: Utc::now(),
            announcements,
        }
    }
}
