//! Disk cache for archive responses.
//!
//! The archive adapter treats this as an opaque collaborator: initialized once
//! at process start, consulted before every upstream request, and never
//! coordinated with from above. Entries are JSON bodies keyed by the md5 of
//! the request URL. Past seasons never change, so their entries effectively
//! live forever; current-season entries get a short TTL.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Outcome of a cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult {
    Hit(String),
    Expired,
    Miss,
}

/// File-backed response cache.
#[derive(Debug, Clone)]
pub struct CacheService {
    dir: PathBuf,
    enabled: bool,
}

impl CacheService {
    /// Create a cache rooted at `dir`. Pass `enabled = false` to turn every
    /// lookup into a miss (used by `--no-cache`).
    pub fn new(dir: PathBuf, enabled: bool) -> Self {
        Self { dir, enabled }
    }

    /// Default cache directory under the platform cache root.
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("f1-stats-mcp")
    }

    /// Create the backing directory if needed.
    pub fn initialize(&self) -> std::io::Result<()> {
        if self.enabled {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    fn path_for(&self, url: &str) -> PathBuf {
        let digest = md5::compute(url.as_bytes());
        self.dir.join(format!("{:x}.json", digest))
    }

    /// Look up a cached body for `url`, honoring `ttl` (None = never expires).
    pub fn get(&self, url: &str, ttl: Option<Duration>) -> CacheResult {
        if !self.enabled {
            return CacheResult::Miss;
        }
        let path = self.path_for(url);
        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(_) => return CacheResult::Miss,
        };
        if let Some(ttl) = ttl {
            let age = metadata
                .modified()
                .ok()
                .and_then(|m| SystemTime::now().duration_since(m).ok());
            match age {
                Some(age) if age > ttl => return CacheResult::Expired,
                None => return CacheResult::Miss,
                _ => {}
            }
        }
        match fs::read_to_string(&path) {
            Ok(body) => CacheResult::Hit(body),
            Err(_) => CacheResult::Miss,
        }
    }

    /// Store a body for `url`. Failures are logged and swallowed; the cache is
    /// best-effort.
    pub fn set(&self, url: &str, body: &str) {
        if !self.enabled {
            return;
        }
        let path = self.path_for(url);
        if let Err(e) = fs::write(&path, body) {
            tracing::debug!("cache write failed for {}: {}", url, e);
        }
    }

    /// Remove every cached entry.
    pub fn clear(&self) -> std::io::Result<()> {
        if !self.dir.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.path().extension().is_some_and(|e| e == "json") {
                fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        fs::read_dir(&self.dir)
            .map(|entries| entries.filter_map(|e| e.ok()).count())
            .unwrap_or(0)
    }

    /// Whether the cache currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The backing directory.
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CacheService::new(tmp.path().to_path_buf(), true);
        cache.initialize().unwrap();

        assert_eq!(cache.get("http://example.com/a", None), CacheResult::Miss);
        cache.set("http://example.com/a", "[1,2,3]");
        assert_eq!(
            cache.get("http://example.com/a", None),
            CacheResult::Hit("[1,2,3]".into())
        );
    }

    #[test]
    fn test_disabled_cache_never_hits() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CacheService::new(tmp.path().to_path_buf(), false);
        cache.initialize().unwrap();
        cache.set("http://example.com/a", "[]");
        assert_eq!(cache.get("http://example.com/a", None), CacheResult::Miss);
    }

    #[test]
    fn test_ttl_expiry() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CacheService::new(tmp.path().to_path_buf(), true);
        cache.initialize().unwrap();
        cache.set("http://example.com/b", "{}");
        assert_eq!(
            cache.get("http://example.com/b", Some(Duration::ZERO)),
            CacheResult::Expired
        );
        assert_eq!(
            cache.get("http://example.com/b", Some(Duration::from_secs(3600))),
            CacheResult::Hit("{}".into())
        );
    }

    #[test]
    fn test_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = CacheService::new(tmp.path().to_path_buf(), true);
        cache.initialize().unwrap();
        cache.set("a", "1");
        cache.set("b", "2");
        assert!(!cache.is_empty());
        cache.clear().unwrap();
        assert!(cache.is_empty());
    }
}
