//! File-backed cache implementation.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::Announcement;
use crate::storage::{CACHE_LIMIT, ScrapeCache};

/// File-backed announcement cache.
#[derive(Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    /// Create a cache backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists.
    async fn ensure_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, bytes: &[u8]) -> Result<()> {
        self.ensure_dir().await?;

        let tmp = self.path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Load the cached snapshot, `None` when no cache file exists yet.
    pub async fn load(&self) -> Result<Option<ScrapeCache>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Persist a batch as the new snapshot, replacing any previous one.
    ///
    /// Records are sorted newest first and the snapshot is truncated to
    /// [`CACHE_LIMIT`] entries so the file stays bounded.
    pub async fn store(&self, announcements: &[Announcement]) -> Result<ScrapeCache> {
        let mut batch = announcements.to_vec();
        batch.sort_by(|a, b| b.found_at.cmp(&a.found_at));
        batch.truncate(CACHE_LIMIT);

        let snapshot = ScrapeCache::new(batch);
        let bytes = serde_json::to_vec_pretty(&snapshot)?;
        self.write_bytes(&bytes).await?;

        log::info!(
            "Cache: {} announcement(s) written to {}",
            snapshot.announcements.len(),
            self.path.display()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;

    fn record(title: &str, url: &str, age_secs: i64) -> Announcement {
        let mut record = Announcement::new("深圳", title, url);
        record.found_at = Utc::now() - Duration::seconds(age_secs);
        record
    }

    #[tokio::test]
    async fn test_store_and_load() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path().join("cache.json"));

        let batch = vec![
            record("旧教师招聘公告", "https://example.com/a", 60),
            record("新教师招聘公告", "https://example.com/b", 0),
        ];
        cache.store(&batch).await.unwrap();

        let loaded = cache.load().await.unwrap().unwrap();
        assert_eq!(loaded.announcements.len(), 2);
        // Newest first after store.
        assert_eq!(loaded.announcements[0].title, "新教师招聘公告");
        assert_eq!(loaded.announcements[1].title, "旧教师招聘公告");
    }

    #[tokio::test]
    async fn test_load_missing_returns_none() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path().join("nope.json"));

        assert!(cache.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path().join("data").join("cache.json"));

        cache.store(&[record("某区教师招聘公告", "https://example.com/a", 0)])
            .await
            .unwrap();
        assert!(cache.path().exists());
    }

    #[tokio::test]
    async fn test_store_truncates_to_limit() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path().join("cache.json"));

        let batch: Vec<Announcement> = (0..1200)
            .map(|i| record(&format!("公告{i}"), &format!("https://example.com/{i}"), i))
            .collect();
        let before = Utc::now();
        let snapshot = cache.store(&batch).await.unwrap();

        assert_eq!(snapshot.announcements.len(), CACHE_LIMIT);
        assert!(snapshot.updated_at >= before);
        // The newest records survive the cut.
        assert_eq!(snapshot.announcements[0].title, "公告0");
        assert_eq!(snapshot.announcements[999].title, "公告999");
    }

    #[tokio::test]
    async fn test_store_replaces_previous_snapshot() {
        let tmp = TempDir::new().unwrap();
        let cache = LocalCache::new(tmp.path().join("cache.json"));

        cache.store(&[record("第一批公告", "https://example.com/1", 0)])
            .await
            .unwrap();
        cache.store(&[record("第二批公告", "https://example.com/2", 0)])
            .await
            .unwrap();

        let loaded = cache.load().await.unwrap().unwrap();
        assert_eq!(loaded.announcements.len(), 1);
        assert_eq!(loaded.announcements[0].title, "第二批公告");
    }
}
