//! On-disk cache layout versioning and migration.
//!
//! # Layouts
//!
//! - **v1** (unversioned): one `<key>.json` file per collection directly in
//!   the cache directory, no `schema.json`.
//! - **v2**: `schema.json` holding `{"version": 2}`; entries live under
//!   `geometries/` as `<sha256(key)>.json` with the key itself in a
//!   `<sha256(key)>.key` sidecar.
//!
//! Opening a directory runs every registered step from its version up to
//! [`CURRENT_SCHEMA_VERSION`]. These functions block and are run through
//! `spawn_blocking` by the disk provider.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::traits::CacheError;
use crate::feature::CollectionKind;

/// Layout version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Name of the version marker file.
pub const SCHEMA_FILE: &str = "schema.json";

/// Directory holding v2 entries.
pub const ENTRIES_DIR: &str = "geometries";

/// Extension of entry data files.
pub const ENTRY_EXTENSION: &str = "json";

/// Extension of key sidecar files.
pub const KEY_EXTENSION: &str = "key";

#[derive(Debug, Serialize, Deserialize)]
struct SchemaMarker {
    version: u32,
}

/// One step that raises the layout version by one.
pub struct Migration {
    pub from: u32,
    pub description: &'static str,
    apply: fn(&Path) -> Result<u64, CacheError>,
}

/// Registered migrations, ordered by source version.
pub const MIGRATIONS: &[Migration] = &[Migration {
    from: 1,
    description: "move flat <key>.json files into hashed geometries/ entries",
    apply: migrate_v1_to_v2,
}];

/// What [`prepare`] did to a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaReport {
    /// Version found on disk, `None` for a fresh directory.
    pub found: Option<u32>,
    /// Version after preparation.
    pub version: u32,
    /// Entries moved by migrations.
    pub entries_migrated: u64,
}

/// File stem used for a key's entry and sidecar files.
pub fn entry_file_stem(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Directory holding the entries of a v2 cache rooted at `root`.
pub fn entries_dir(root: &Path) -> PathBuf {
    root.join(ENTRIES_DIR)
}

/// Distinguishes temporary files of concurrent writers in one process.
static TEMP_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Writes `data` to a fresh temporary file next to `path`.
///
/// The name is unique per process and call, so writers racing on the same
/// `path` never share a temporary file. The caller renames it into place.
pub(crate) fn write_temp(path: &Path, data: &[u8]) -> std::io::Result<PathBuf> {
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(format!(
        ".{}.{}.tmp",
        std::process::id(),
        TEMP_SEQUENCE.fetch_add(1, Ordering::Relaxed)
    ));
    let temp_path = PathBuf::from(temp_name);

    let written = fs::File::create(&temp_path).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(temp_path)
}

/// Writes `data` to `path` through a temporary file and a rename.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let temp_path = write_temp(path, data)?;
    fs::rename(&temp_path, path).inspect_err(|_| {
        let _ = fs::remove_file(&temp_path);
    })
}

/// The members of a cached collection needed to recognise one.
#[derive(Deserialize)]
struct CollectionHeader {
    #[serde(rename = "type")]
    _kind: CollectionKind,
    name: String,
}

fn is_json_file(path: &Path) -> bool {
    path.is_file()
        && path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION)
        && path.file_name().is_some_and(|name| name != SCHEMA_FILE)
}

/// Returns the key of a flat `<key>.json` entry.
///
/// The file must hold a feature collection named after its own stem, which
/// is how unversioned caches stored entries. Anything else is not ours.
fn legacy_entry_key(path: &Path) -> Result<String, CacheError> {
    let foreign = |reason: String| {
        CacheError::Migration(format!(
            "'{}' is not a cached feature collection ({}); refusing to migrate",
            path.display(),
            reason
        ))
    };

    let key = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| foreign("file name is not UTF-8".to_string()))?;
    let header: CollectionHeader =
        serde_json::from_slice(&fs::read(path)?).map_err(|e| foreign(e.to_string()))?;
    if header.name != key {
        return Err(foreign(format!("collection is named '{}'", header.name)));
    }
    Ok(key.to_string())
}

/// Every flat entry directly under `root`, validated before anything moves.
fn legacy_entries(root: &Path) -> Result<Vec<(PathBuf, String)>, CacheError> {
    let mut found = Vec::new();
    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if is_json_file(&path) {
            let key = legacy_entry_key(&path)?;
            found.push((path, key));
        }
    }
    Ok(found)
}

/// Reads the layout version of `root`.
///
/// A directory without a marker is v1 if it holds flat entry files and
/// fresh otherwise.
///
/// # Errors
///
/// A markerless directory holding JSON files that are not cached
/// collections is rejected with [`CacheError::Migration`] so that it is
/// never rearranged.
pub fn read_version(root: &Path) -> Result<Option<u32>, CacheError> {
    let marker_path = root.join(SCHEMA_FILE);
    if marker_path.exists() {
        let marker: SchemaMarker = serde_json::from_slice(&fs::read(&marker_path)?)?;
        return Ok(Some(marker.version));
    }

    if !root.exists() {
        return Ok(None);
    }

    if legacy_entries(root)?.is_empty() {
        Ok(None)
    } else {
        Ok(Some(1))
    }
}

fn write_version(root: &Path, version: u32) -> Result<(), CacheError> {
    let data = serde_json::to_vec(&SchemaMarker { version })?;
    write_atomic(&root.join(SCHEMA_FILE), &data)?;
    Ok(())
}

/// Brings `root` to the current layout, creating it if needed.
pub fn prepare(root: &Path) -> Result<SchemaReport, CacheError> {
    fs::create_dir_all(root)?;
    let found = read_version(root)?;

    let mut report = SchemaReport {
        found,
        version: CURRENT_SCHEMA_VERSION,
        entries_migrated: 0,
    };

    let Some(mut version) = found else {
        fs::create_dir_all(entries_dir(root))?;
        write_version(root, CURRENT_SCHEMA_VERSION)?;
        debug!(dir = %root.display(), version = CURRENT_SCHEMA_VERSION, "Initialized cache directory");
        return Ok(report);
    };

    if version > CURRENT_SCHEMA_VERSION {
        return Err(CacheError::UnsupportedSchema {
            found: version,
            supported: CURRENT_SCHEMA_VERSION,
        });
    }

    while version < CURRENT_SCHEMA_VERSION {
        let step = MIGRATIONS
            .iter()
            .find(|m| m.from == version)
            .ok_or_else(|| {
                CacheError::Migration(format!("no migration registered from version {}", version))
            })?;

        info!(
            dir = %root.display(),
            from = version,
            to = version + 1,
            step = step.description,
            "Migrating cache directory"
        );
        report.entries_migrated += (step.apply)(root)?;
        version += 1;
        write_version(root, version)?;
    }

    fs::create_dir_all(entries_dir(root))?;
    Ok(report)
}

fn migrate_v1_to_v2(root: &Path) -> Result<u64, CacheError> {
    let entries = entries_dir(root);
    fs::create_dir_all(&entries)?;

    let mut moved = 0;
    for (path, key) in legacy_entries(root)? {
        let stem = entry_file_stem(&key);
        let data_path = entries.join(format!("{}.{}", stem, ENTRY_EXTENSION));
        let key_path = entries.join(format!("{}.{}", stem, KEY_EXTENSION));

        write_atomic(&key_path, key.as_bytes())?;
        fs::rename(&path, &data_path)
            .map_err(|e| CacheError::Migration(format!("moving '{}': {}", key, e)))?;
        moved += 1;
    }

    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_entry_file_stem_is_sha256_hex() {
        let stem = entry_file_stem("trails-0");
        assert_eq!(stem.len(), 64);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(stem, entry_file_stem("trails-0"));
        assert_ne!(stem, entry_file_stem("trails-1"));
    }

    #[test]
    fn test_prepare_fresh_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("cache");

        let report = prepare(&root).unwrap();

        assert_eq!(report.found, None);
        assert_eq!(report.version, CURRENT_SCHEMA_VERSION);
        assert!(entries_dir(&root).is_dir());
        assert_eq!(read_version(&root).unwrap(), Some(CURRENT_SCHEMA_VERSION));
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        prepare(temp_dir.path()).unwrap();

        let report = prepare(temp_dir.path()).unwrap();
        assert_eq!(report.found, Some(CURRENT_SCHEMA_VERSION));
        assert_eq!(report.entries_migrated, 0);
    }

    fn legacy_collection(name: &str) -> String {
        format!(
            r#"{{"type":"FeatureCollection","name":"{}","crs":{{"type":"name","properties":{{"name":"EPSG:4326"}}}},"features":[]}}"#,
            name
        )
    }

    #[test]
    fn test_migrates_v1_layout() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let legacy = legacy_collection("trails-0");
        fs::write(root.join("trails-0.json"), &legacy).unwrap();
        fs::write(root.join("notes.txt"), b"ignored").unwrap();

        assert_eq!(read_version(root).unwrap(), Some(1));
        let report = prepare(root).unwrap();

        assert_eq!(report.found, Some(1));
        assert_eq!(report.entries_migrated, 1);
        assert!(!root.join("trails-0.json").exists());
        assert!(root.join("notes.txt").exists());

        let stem = entry_file_stem("trails-0");
        let entries = entries_dir(root);
        assert_eq!(
            fs::read_to_string(entries.join(format!("{}.json", stem))).unwrap(),
            legacy
        );
        assert_eq!(
            fs::read_to_string(entries.join(format!("{}.key", stem))).unwrap(),
            "trails-0"
        );
        assert_eq!(read_version(root).unwrap(), Some(2));
    }

    #[test]
    fn test_unrelated_json_blocks_migration() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("package.json"), br#"{"name":"web-app"}"#).unwrap();

        let result = prepare(root);

        assert!(matches!(result, Err(CacheError::Migration(_))));
        assert!(root.join("package.json").exists());
        assert!(!root.join(SCHEMA_FILE).exists());
        assert!(!entries_dir(root).exists());
    }

    #[test]
    fn test_misnamed_collection_blocks_migration() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("trails-0.json"), legacy_collection("trails-0")).unwrap();
        fs::write(root.join("export.json"), legacy_collection("trails-1")).unwrap();

        assert!(matches!(prepare(root), Err(CacheError::Migration(_))));
        assert!(root.join("trails-0.json").exists());
        assert!(root.join("export.json").exists());
        assert!(!root.join(SCHEMA_FILE).exists());
    }

    #[test]
    fn test_newer_schema_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(SCHEMA_FILE), br#"{"version":9}"#).unwrap();

        match prepare(temp_dir.path()) {
            Err(CacheError::UnsupportedSchema { found, supported }) => {
                assert_eq!(found, 9);
                assert_eq!(supported, CURRENT_SCHEMA_VERSION);
            }
            other => panic!("Expected UnsupportedSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_migrations_cover_every_older_version() {
        for version in 1..CURRENT_SCHEMA_VERSION {
            assert!(MIGRATIONS.iter().any(|m| m.from == version));
        }
    }

    fn temp_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "tmp"))
            .collect()
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entry.json");

        write_atomic(&path, b"{}").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"{}");
        assert!(temp_files(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_concurrent_writers_to_one_path_all_succeed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("entry.json");

        std::thread::scope(|scope| {
            let writers: Vec<_> = (0..8u8)
                .map(|i| {
                    let path = &path;
                    scope.spawn(move || write_atomic(path, &[i; 64]))
                })
                .collect();
            for writer in writers {
                writer.join().unwrap().unwrap();
            }
        });

        let data = fs::read(&path).unwrap();
        assert_eq!(data.len(), 64);
        assert!(data.iter().all(|&b| b == data[0]));
        assert!(temp_files(temp_dir.path()).is_empty());
    }
}
