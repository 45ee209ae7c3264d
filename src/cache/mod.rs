//! Build cache for skipping unchanged regenerations
//!
//! The site is small enough that generation is a single pass, so the cache
//! answers one question: did any input change since the last build? Inputs
//! are the config file, every file under the source directory (markdown and
//! copied assets alike) and the embedded theme version. Any difference
//! triggers a full regeneration.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::Quill;

/// Cache file location relative to the site root
const CACHE_FILE: &str = ".quill-cache/db.json";

/// Cache database persisted between builds
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CacheDb {
    /// Version of the cache format
    pub version: u32,
    /// Crate version that produced the build; the theme ships in the
    /// binary, so a new binary means new output
    #[serde(default)]
    pub theme_version: String,
    /// Hash of the site config (changes trigger rebuild)
    pub config_hash: u64,
    /// Content hash per source file, keyed by path relative to the site root
    pub entries: HashMap<String, u64>,
    /// Total source file count (for detecting additions/deletions)
    pub count: usize,
}

impl CacheDb {
    /// Current cache format version
    const VERSION: u32 = 1;

    /// Load cache from disk, or return an empty cache
    pub fn load(base_dir: &Path) -> Self {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Ok(content) = fs::read_to_string(&cache_path) {
            if let Ok(cache) = serde_json::from_str::<CacheDb>(&content) {
                if cache.version == Self::VERSION {
                    return cache;
                }
                tracing::info!("Cache version mismatch, rebuilding");
            }
        }
        Self::default()
    }

    /// Save cache to disk
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let cache_path = base_dir.join(CACHE_FILE);
        if let Some(parent) = cache_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(cache_path, content)?;
        Ok(())
    }

    /// Capture the current state of a site's inputs
    pub fn snapshot(app: &Quill) -> Result<Self> {
        let config_path = app.base_dir.join("config.yml");
        let config_hash = if config_path.exists() {
            hash_file(&config_path)?
        } else {
            0
        };

        // Every source file counts: markdown becomes pages, everything
        // else is copied into the output verbatim
        let mut entries = HashMap::new();
        if app.source_dir.exists() {
            for entry in WalkDir::new(&app.source_dir)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
            {
                let path = entry.path();
                let key = path
                    .strip_prefix(&app.base_dir)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .to_string();
                entries.insert(key, hash_file(path)?);
            }
        }

        Ok(Self {
            version: Self::VERSION,
            theme_version: env!("CARGO_PKG_VERSION").to_string(),
            config_hash,
            count: entries.len(),
            entries,
        })
    }

    /// Whether a build with this snapshot can be skipped
    pub fn is_current(&self, current: &CacheDb) -> bool {
        self.version == Self::VERSION
            && self.theme_version == current.theme_version
            && self.config_hash == current.config_hash
            && self.count == current.count
            && self.entries == current.entries
    }
}

/// Calculate a hash for raw bytes
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}

/// Calculate a hash for string content
pub fn hash_content(content: &str) -> u64 {
    hash_bytes(content.as_bytes())
}

/// Calculate a hash for a file on disk; reads bytes so binary assets work
pub fn hash_file(path: &Path) -> Result<u64> {
    let content = fs::read(path)?;
    Ok(hash_bytes(&content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site_with_post(body: &str) -> (TempDir, Quill) {
        let dir = TempDir::new().unwrap();
        let posts = dir.path().join("source/_posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(posts.join("a.md"), body).unwrap();
        let app = Quill::new(dir.path()).unwrap();
        (dir, app)
    }

    #[test]
    fn test_hash_content_stable() {
        assert_eq!(hash_content("abc"), hash_content("abc"));
        assert_ne!(hash_content("abc"), hash_content("abd"));
    }

    #[test]
    fn test_snapshot_roundtrip_and_is_current() {
        let (_dir, app) = site_with_post("---\ntitle: A\n---\nbody\n");
        let snap = CacheDb::snapshot(&app).unwrap();
        snap.save(&app.base_dir).unwrap();

        let loaded = CacheDb::load(&app.base_dir);
        let fresh = CacheDb::snapshot(&app).unwrap();
        assert!(loaded.is_current(&fresh));
    }

    #[test]
    fn test_content_change_invalidates() {
        let (dir, app) = site_with_post("---\ntitle: A\n---\nbody\n");
        let snap = CacheDb::snapshot(&app).unwrap();

        fs::write(
            dir.path().join("source/_posts/a.md"),
            "---\ntitle: A\n---\nedited\n",
        )
        .unwrap();
        let fresh = CacheDb::snapshot(&app).unwrap();
        assert!(!snap.is_current(&fresh));
    }

    #[test]
    fn test_new_file_invalidates() {
        let (dir, app) = site_with_post("---\ntitle: A\n---\nbody\n");
        let snap = CacheDb::snapshot(&app).unwrap();

        fs::write(
            dir.path().join("source/_posts/b.md"),
            "---\ntitle: B\n---\nmore\n",
        )
        .unwrap();
        let fresh = CacheDb::snapshot(&app).unwrap();
        assert!(!snap.is_current(&fresh));
    }

    #[test]
    fn test_asset_change_invalidates() {
        let (dir, app) = site_with_post("---\ntitle: A\n---\nbody\n");
        let avatar = dir.path().join("source/avatar.png");
        fs::write(&avatar, [0x89u8, 0x50, 0x4e, 0x47, 0x01]).unwrap();
        let snap = CacheDb::snapshot(&app).unwrap();

        fs::write(&avatar, [0x89u8, 0x50, 0x4e, 0x47, 0x02]).unwrap();
        let fresh = CacheDb::snapshot(&app).unwrap();
        assert!(!snap.is_current(&fresh));
    }

    #[test]
    fn test_theme_version_mismatch_invalidates() {
        let (_dir, app) = site_with_post("---\ntitle: A\n---\nbody\n");
        let mut snap = CacheDb::snapshot(&app).unwrap();
        snap.theme_version = "0.0.0".to_string();

        let fresh = CacheDb::snapshot(&app).unwrap();
        assert!(!snap.is_current(&fresh));
    }

    #[test]
    fn test_empty_cache_never_current() {
        let (_dir, app) = site_with_post("---\ntitle: A\n---\nbody\n");
        let fresh = CacheDb::snapshot(&app).unwrap();
        assert!(!CacheDb::default().is_current(&fresh));
    }
}
