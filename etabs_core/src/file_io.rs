//! # File I/O Module
//!
//! Persistence for offline sessions:
//! - **Model snapshots**: an [`InMemoryModel`] wrapped with a schema version,
//!   saved atomically (write `.tmp`, sync, rename)
//! - **File locking**: one writer per snapshot, also across machines on a
//!   shared drive
//! - **Settings and node input**: plain JSON documents
//!
//! ## Example
//!
//! ```rust,no_run
//! use etabs_core::file_io::{load_snapshot, save_snapshot, FileLock, ModelSnapshot};
//! use etabs_core::memory_model::InMemoryModel;
//! use std::path::Path;
//!
//! let path = Path::new("model.json");
//! let lock = FileLock::acquire(path, "engineer@company.com").unwrap();
//!
//! save_snapshot(&ModelSnapshot::new(InMemoryModel::new()), path).unwrap();
//! let snapshot = load_snapshot(path).unwrap();
//!
//! // Lock is released when dropped
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::{AdapterError, AdapterResult};
use crate::memory_model::InMemoryModel;
use crate::node::Node;
use crate::settings::AdapterSettings;

/// Current schema version for model snapshot files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// An offline model as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// When the snapshot was last written
    pub saved: DateTime<Utc>,

    pub model: InMemoryModel,
}

impl ModelSnapshot {
    pub fn new(model: InMemoryModel) -> Self {
        ModelSnapshot {
            version: SCHEMA_VERSION.to_string(),
            saved: Utc::now(),
            model,
        }
    }
}

/// Lock file metadata stored in `.lock` files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// File lock guard that releases the lock when dropped.
///
/// Holds an OS-level lock (via fs2) and writes a `.lock` file with
/// [`LockInfo`] so other users can see who holds it.
pub struct FileLock {
    target_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on `path`.
    ///
    /// Fails with [`AdapterError::FileLocked`] if a live lock is held by
    /// someone else. Stale locks are taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> AdapterResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_json::<LockInfo>(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(AdapterError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
                tracing::info!(
                    path = %lock_path.display(),
                    holder = %existing.user_id,
                    "taking over stale lock"
                );
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                let path = lock_path.display().to_string();
                AdapterError::file_error("create lock", path, e.to_string())
            })?;

        lock_file.try_lock_exclusive().map_err(|_| {
            AdapterError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json = serde_json::to_string_pretty(&info)?;
        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            AdapterError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;
        lock_file.sync_all().map_err(|e| {
            AdapterError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            target_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_json::<LockInfo>(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// Path of the locked file
    pub fn target_path(&self) -> &Path {
        &self.target_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // OS lock goes with _lock_file
        let _ = fs::remove_file(&self.lock_path);
    }
}

/// `<file>.<ext>.lock` next to the locked file
fn lock_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, "lock")
}

fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut out = path.to_path_buf();
    let extension = out
        .extension()
        .map(|e| format!("{}.{}", e.to_string_lossy(), suffix))
        .unwrap_or_else(|| suffix.to_string());
    out.set_extension(extension);
    out
}

/// A lock is stale when its process is gone (same machine) or it is older
/// than 24 hours.
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

fn read_json<T: DeserializeOwned>(path: &Path) -> AdapterResult<T> {
    let mut file = File::open(path).map_err(|e| {
        AdapterError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        AdapterError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    serde_json::from_str(&contents).map_err(|e| {
        AdapterError::serialization(format!("Invalid JSON in {}: {}", path.display(), e))
    })
}

/// Save a snapshot with atomic write semantics.
///
/// The `saved` timestamp is stamped at write time.
pub fn save_snapshot(snapshot: &ModelSnapshot, path: &Path) -> AdapterResult<()> {
    let stamped = ModelSnapshot {
        version: snapshot.version.clone(),
        saved: Utc::now(),
        model: snapshot.model.clone(),
    };
    let json = serde_json::to_string_pretty(&stamped)?;

    let tmp_path = sibling_with_suffix(path, "tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        AdapterError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        AdapterError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    tmp_file.sync_all().map_err(|e| {
        AdapterError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        AdapterError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    tracing::debug!(
        path = %path.display(),
        points = snapshot.model.points().len(),
        "saved snapshot"
    );
    Ok(())
}

/// Load a snapshot, rejecting incompatible schema versions.
pub fn load_snapshot(path: &Path) -> AdapterResult<ModelSnapshot> {
    let snapshot: ModelSnapshot = read_json(path)?;
    validate_version(&snapshot.version)?;
    Ok(snapshot)
}

/// Load a snapshot together with the lock currently held on it, if any.
pub fn load_snapshot_with_lock_check(
    path: &Path,
) -> AdapterResult<(ModelSnapshot, Option<LockInfo>)> {
    let snapshot = load_snapshot(path)?;
    let lock_info = FileLock::check(path);
    Ok((snapshot, lock_info))
}

/// Load and validate adapter settings.
pub fn load_settings(path: &Path) -> AdapterResult<AdapterSettings> {
    let settings: AdapterSettings = read_json(path)?;
    settings.validate()?;
    Ok(settings)
}

/// Load a JSON array of nodes.
pub fn load_nodes(path: &Path) -> AdapterResult<Vec<Node>> {
    read_json(path)
}

/// Same major version; for 0.x the file's minor must not be newer.
fn validate_version(file_version: &str) -> AdapterResult<()> {
    let mismatch = || AdapterError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}
