//! Durable on-disk cache provider.
//!
//! Entries live under `<root>/geometries/` as `<sha256(key)>.json`, with the
//! original key in a `<sha256(key)>.key` sidecar so keys can be listed.
//! Writes go through a per-writer temporary file and a rename, so a reader
//! never sees a partially written entry and racing writers of one key do not
//! disturb each other. The layout is versioned; see
//! [`schema`](crate::cache::schema).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::schema::{
    self, entries_dir, entry_file_stem, SchemaReport, ENTRY_EXTENSION, KEY_EXTENSION,
};
use crate::cache::traits::{BoxFuture, Cache, CacheError};

/// On-disk cache provider.
pub struct DiskCacheProvider {
    root: PathBuf,
    entries: PathBuf,

    /// Total bytes of entry files.
    size: AtomicU64,

    /// Number of entries.
    count: AtomicU64,

    /// Serializes renames and removals with the counter updates they imply.
    publish: Mutex<()>,
}

impl DiskCacheProvider {
    /// Opens (creating or migrating as needed) the cache at `root`.
    ///
    /// # Errors
    ///
    /// Fails if the directory cannot be created, a migration fails, or the
    /// directory was written by a newer layout version.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();

        let prepare_root = root.clone();
        let (report, (size, count)) = tokio::task::spawn_blocking(
            move || -> Result<(SchemaReport, (u64, u64)), CacheError> {
                let report = schema::prepare(&prepare_root)?;
                let totals = scan_entries(&entries_dir(&prepare_root))?;
                Ok((report, totals))
            },
        )
        .await
        .map_err(|e| CacheError::Task(e.to_string()))??;

        if report.entries_migrated > 0 {
            info!(
                dir = %root.display(),
                from = ?report.found,
                entries = report.entries_migrated,
                "Cache directory migrated"
            );
        }
        debug!(dir = %root.display(), entries = count, bytes = size, "Disk cache opened");

        Ok(Self {
            entries: entries_dir(&root),
            root,
            size: AtomicU64::new(size),
            count: AtomicU64::new(count),
            publish: Mutex::new(()),
        })
    }

    /// Root directory of the cache.
    pub fn directory(&self) -> &Path {
        &self.root
    }

    fn data_path(&self, key: &str) -> PathBuf {
        self.entries
            .join(format!("{}.{}", entry_file_stem(key), ENTRY_EXTENSION))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.entries
            .join(format!("{}.{}", entry_file_stem(key), KEY_EXTENSION))
    }

    fn record_replaced(&self, previous: Option<u64>, written: u64) {
        match previous {
            Some(previous) => {
                let _ = self
                    .size
                    .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
                        Some(s.saturating_sub(previous) + written)
                    });
            }
            None => {
                self.size.fetch_add(written, Ordering::Relaxed);
                self.count.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    fn record_removed(&self, bytes: u64) {
        let _ = self
            .size
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
                Some(s.saturating_sub(bytes))
            });
        let _ = self
            .count
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |c| {
                Some(c.saturating_sub(1))
            });
    }
}

/// Sums the sizes and count of entry files under `entries`.
fn scan_entries(entries: &Path) -> Result<(u64, u64), CacheError> {
    let mut size = 0;
    let mut count = 0;
    for entry in std::fs::read_dir(entries)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
            size += entry.metadata().map(|m| m.len()).unwrap_or(0);
            count += 1;
        }
    }
    Ok((size, count))
}

async fn file_len(path: &Path) -> Option<u64> {
    tokio::fs::metadata(path).await.ok().map(|m| m.len())
}

impl Cache for DiskCacheProvider {
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>> {
        let key = key.to_string();
        let data_path = self.data_path(&key);
        let key_path = self.key_path(&key);
        Box::pin(async move {
            let written = value.len() as u64;

            let (staged_data, staged_key) = {
                let data_path = data_path.clone();
                let key_path = key_path.clone();
                tokio::task::spawn_blocking(move || -> std::io::Result<(PathBuf, PathBuf)> {
                    let staged_key = schema::write_temp(&key_path, key.as_bytes())?;
                    match schema::write_temp(&data_path, &value) {
                        Ok(staged_data) => Ok((staged_data, staged_key)),
                        Err(e) => {
                            let _ = std::fs::remove_file(&staged_key);
                            Err(e)
                        }
                    }
                })
                .await
                .map_err(|e| CacheError::Task(e.to_string()))??
            };

            let _publish = self.publish.lock().await;
            let previous = file_len(&data_path).await;
            let renamed = match tokio::fs::rename(&staged_key, &key_path).await {
                Ok(()) => tokio::fs::rename(&staged_data, &data_path).await,
                Err(e) => Err(e),
            };
            if let Err(e) = renamed {
                let _ = tokio::fs::remove_file(&staged_key).await;
                let _ = tokio::fs::remove_file(&staged_data).await;
                return Err(CacheError::Io(e));
            }

            self.record_replaced(previous, written);
            Ok(())
        })
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>> {
        let path = self.data_path(key);
        Box::pin(async move {
            match tokio::fs::read(&path).await {
                Ok(data) => Ok(Some(data)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(CacheError::Io(e)),
            }
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let data_path = self.data_path(key);
        let key_path = self.key_path(key);
        Box::pin(async move {
            let _publish = self.publish.lock().await;
            let previous = file_len(&data_path).await;
            let existed = match tokio::fs::remove_file(&data_path).await {
                Ok(()) => true,
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => return Err(CacheError::Io(e)),
            };
            match tokio::fs::remove_file(&key_path).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(CacheError::Io(e)),
            }

            if existed {
                self.record_removed(previous.unwrap_or(0));
            }
            Ok(existed)
        })
    }

    fn contains(&self, key: &str) -> BoxFuture<'_, Result<bool, CacheError>> {
        let path = self.data_path(key);
        Box::pin(async move { Ok(tokio::fs::try_exists(&path).await?) })
    }

    fn keys(&self) -> BoxFuture<'_, Result<Vec<String>, CacheError>> {
        Box::pin(async move {
            let mut keys = Vec::new();
            let mut dir = tokio::fs::read_dir(&self.entries).await?;
            while let Some(entry) = dir.next_entry().await? {
                let path = entry.path();
                if !path.extension().is_some_and(|ext| ext == KEY_EXTENSION) {
                    continue;
                }
                // Sidecar without data: interrupted write, not an entry.
                if !tokio::fs::try_exists(path.with_extension(ENTRY_EXTENSION)).await? {
                    continue;
                }
                match tokio::fs::read_to_string(&path).await {
                    Ok(key) => keys.push(key),
                    Err(e) => warn!(path = %path.display(), error = %e, "Unreadable cache key file"),
                }
            }
            keys.sort();
            Ok(keys)
        })
    }

    fn clear(&self) -> BoxFuture<'_, Result<u64, CacheError>> {
        Box::pin(async move {
            let _publish = self.publish.lock().await;
            let mut removed = 0;
            let mut dir = tokio::fs::read_dir(&self.entries).await?;
            while let Some(entry) = dir.next_entry().await? {
                let path = entry.path();
                if !entry.file_type().await?.is_file() {
                    continue;
                }
                // Temporary files belong to writers still staging.
                if path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                    removed += 1;
                } else if !path.extension().is_some_and(|ext| ext == KEY_EXTENSION) {
                    continue;
                }
                tokio::fs::remove_file(&path).await?;
            }

            self.size.store(0, Ordering::Relaxed);
            self.count.store(0, Ordering::Relaxed);
            info!(dir = %self.root.display(), entries = removed, "Disk cache cleared");
            Ok(removed)
        })
    }

    fn size_bytes(&self) -> u64 {
        self.size.load(Ordering::Relaxed)
    }

    fn entry_count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}
