//! JSON-file-based storage backend.
//!
//! Stores each record in a separate JSON file under a configurable
//! directory (default: `$XDG_DATA_HOME/printhub-rs/`).

use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::{CachedPosition, DistanceCache};
use crate::error::{PrintHubError, Result};
use crate::models::{Notification, OrderId};

/// Application name used for the XDG data directory.
const APP_NAME: &str = "printhub-rs";

/// File name for the last device position.
const POSITION_FILE: &str = "position.json";
/// File name for the distance cache.
const DISTANCES_FILE: &str = "distance_cache.json";
/// File name for the notification list.
const NOTIFICATIONS_FILE: &str = "notifications.json";
/// File name for opened notification ids.
const READ_IDS_FILE: &str = "notifications_read.json";
/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "storage.lock";

/// File-backed storage that persists client state as JSON files.
///
/// Each record is stored in a separate `.json` file. A file whose contents
/// cannot be parsed is logged and treated as absent, so a corrupt cache
/// degrades to a cold start instead of an error.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process safety is achieved via an advisory file lock
/// on `storage.lock` (using [`std::fs::File::lock`] /
/// [`std::fs::File::lock_shared`]).
///
/// Read operations acquire a shared lock (allowing concurrent readers),
/// while write operations acquire an exclusive lock.
///
/// # File layout
///
/// ```text
/// <dir>/
///   storage.lock              (cross-process lock sentinel)
///   position.json
///   distance_cache.json
///   notifications.json
///   notifications_read.json
/// ```
#[derive(Debug)]
pub struct FileStorage {
    /// Root directory containing all JSON files.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

impl FileStorage {
    /// Creates a new file storage rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist. Also
    /// opens (or creates) the `storage.lock` sentinel file used for
    /// cross-process advisory locking.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this application.
    ///
    /// On Linux: `$XDG_DATA_HOME/printhub-rs/` (typically
    /// `~/.local/share/printhub-rs/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                PrintHubError::Storage("could not determine platform data directory".into())
            })
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Returns the full path for a given file name.
    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Acquires an in-process mutex guard and a shared (read) file lock,
    /// executes `op`, then releases the file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        // Only surface the unlock error when the operation succeeded;
        // otherwise the original error is more useful.
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires an in-process mutex guard and an exclusive (write) file
    /// lock, executes `op`, then releases the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Reads and deserializes a JSON file.
    ///
    /// Returns `None` if the file does not exist or does not parse.
    fn read_record<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let path = self.path(name);
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(value) => Ok(Some(value)),
                Err(err) => {
                    tracing::warn!(file = name, error = %err, "discarding malformed record");
                    Ok(None)
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Atomically writes a serialized JSON file (write-to-tmp then rename).
    fn write_record<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path(name);
        let tmp_path = self.path(&format!("{name}.tmp"));
        let json = serde_json::to_string_pretty(value).map_err(PrintHubError::from)?;
        fs::write(&tmp_path, json).map_err(storage_io_error)?;
        fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
        Ok(())
    }

    /// Deletes a file, ignoring a missing one.
    fn remove_record(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Reads a record under a shared lock.
    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        self.with_shared_lock(|| self.read_record(name))
    }

    /// Reads a list record under a shared lock, empty when absent.
    fn load_list<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>> {
        Ok(self.load(name)?.unwrap_or_default())
    }

    /// Writes a record under an exclusive lock.
    fn store<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        self.with_exclusive_lock(|| self.write_record(name, value))
    }

    /// Deletes a record under an exclusive lock.
    fn delete(&self, name: &str) -> Result<()> {
        self.with_exclusive_lock(|| self.remove_record(name))
    }

    /// Deletes all record files.
    ///
    /// The `storage.lock` sentinel is preserved.
    fn clear_all(&self) -> Result<()> {
        self.with_exclusive_lock(|| {
            for name in [POSITION_FILE, DISTANCES_FILE, NOTIFICATIONS_FILE, READ_IDS_FILE] {
                self.remove_record(name)?;
            }
            Ok(())
        })
    }
}

// ── Free-standing helpers ───────────────────────────────────────────────

/// Wraps an I/O error into a [`PrintHubError::Storage`].
fn storage_io_error(err: std::io::Error) -> PrintHubError {
    PrintHubError::Storage(Box::new(err))
}

/// Wraps a mutex poison error into a [`PrintHubError::Storage`].
fn lock_poison_error<T>(err: &std::sync::PoisonError<T>) -> PrintHubError {
    PrintHubError::Storage(err.to_string().into())
}

// ── BlockingStorage implementation ──────────────────────────────────────

#[cfg(feature = "blocking")]
impl super::BlockingStorage for FileStorage {
    #[inline]
    fn position(&self) -> Result<Option<CachedPosition>> {
        self.load(POSITION_FILE)
    }

    #[inline]
    fn set_position(&self, position: CachedPosition) -> Result<()> {
        self.store(POSITION_FILE, &position)
    }

    #[inline]
    fn distance_cache(&self) -> Result<Option<DistanceCache>> {
        self.load(DISTANCES_FILE)
    }

    #[inline]
    fn set_distance_cache(&self, cache: DistanceCache) -> Result<()> {
        self.store(DISTANCES_FILE, &cache)
    }

    #[inline]
    fn clear_distance_cache(&self) -> Result<()> {
        self.delete(DISTANCES_FILE)
    }

    #[inline]
    fn notifications(&self) -> Result<Vec<Notification>> {
        self.load_list(NOTIFICATIONS_FILE)
    }

    #[inline]
    fn set_notifications(&self, items: Vec<Notification>) -> Result<()> {
        self.store(NOTIFICATIONS_FILE, &items)
    }

    #[inline]
    fn read_notification_ids(&self) -> Result<Vec<OrderId>> {
        self.load_list(READ_IDS_FILE)
    }

    #[inline]
    fn set_read_notification_ids(&self, ids: Vec<OrderId>) -> Result<()> {
        self.store(READ_IDS_FILE, &ids)
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.clear_all()
    }
}

// ── Storage (async) implementation ──────────────────────────────────────

#[cfg(feature = "async")]
impl super::Storage for FileStorage {
    #[inline]
    fn position(&self) -> impl Future<Output = Result<Option<CachedPosition>>> + Send {
        core::future::ready(self.load(POSITION_FILE))
    }

    #[inline]
    fn set_position(&self, position: CachedPosition) -> impl Future<Output = Result<()>> + Send {
        core::future::ready(self.store(POSITION_FILE, &position))
    }

    #[inline]
    fn distance_cache(&self) -> impl Future<Output = Result<Option<DistanceCache>>> + Send {
        core::future::ready(self.load(DISTANCES_FILE))
    }

    #[inline]
    fn set_distance_cache(&self, cache: DistanceCache) -> impl Future<Output = Result<()>> + Send {
        core::future::ready(self.store(DISTANCES_FILE, &cache))
    }

    #[inline]
    fn clear_distance_cache(&self) -> impl Future<Output = Result<()>> + Send {
        core::future::ready(self.delete(DISTANCES_FILE))
    }

    #[inline]
    fn notifications(&self) -> impl Future<Output = Result<Vec<Notification>>> + Send {
        core::future::ready(self.load_list(NOTIFICATIONS_FILE))
    }

    #[inline]
    fn set_notifications(
        &self,
        items: Vec<Notification>,
    ) -> impl Future<Output = Result<()>> + Send {
        core::future::ready(self.store(NOTIFICATIONS_FILE, &items))
    }

    #[inline]
    fn read_notification_ids(&self) -> impl Future<Output = Result<Vec<OrderId>>> + Send {
        core::future::ready(self.load_list(READ_IDS_FILE))
    }

    #[inline]
    fn set_read_notification_ids(
        &self,
        ids: Vec<OrderId>,
    ) -> impl Future<Output = Result<()>> + Send {
        core::future::ready(self.store(READ_IDS_FILE, &ids))
    }

    #[inline]
    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        core::future::ready(self.clear_all())
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::geo::Coordinates;
    use crate::models::{Distance, ShopId};

    /// Helper to create a [`FileStorage`] in a temporary directory.
    fn temp_storage() -> (FileStorage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf()).unwrap();
        (storage, dir)
    }

    fn position() -> CachedPosition {
        CachedPosition::new(
            Coordinates::new(10.7769, 106.7009),
            DateTime::from_timestamp_millis(1_700_000_000_250).unwrap(),
        )
    }

    fn cache() -> DistanceCache {
        let mut cache = DistanceCache::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
        let _old = cache.entries.insert(
            ShopId::from("7"),
            Distance {
                distance_km: 0.42,
                minutes: 3,
            },
        );
        cache
    }

    #[cfg(feature = "blocking")]
    mod blocking {
        use super::*;
        use crate::storage::BlockingStorage;

        #[test]
        fn position_initially_none() {
            let (storage, _dir) = temp_storage();
            assert!(storage.position().unwrap().is_none());
        }

        #[test]
        fn position_persists_across_instances() {
            let (storage, dir) = temp_storage();
            storage.set_position(position()).unwrap();
            drop(storage);
            let reopened = FileStorage::new(dir.path().to_path_buf()).unwrap();
            assert_eq!(reopened.position().unwrap(), Some(position()));
        }

        #[test]
        fn distance_cache_write_and_clear() {
            let (storage, dir) = temp_storage();
            storage.set_distance_cache(cache()).unwrap();
            assert!(dir.path().join(DISTANCES_FILE).exists());
            assert_eq!(storage.distance_cache().unwrap(), Some(cache()));
            storage.clear_distance_cache().unwrap();
            assert!(storage.distance_cache().unwrap().is_none());
            // Clearing twice is fine.
            storage.clear_distance_cache().unwrap();
        }

        #[test]
        fn malformed_record_is_treated_as_missing() {
            let (storage, dir) = temp_storage();
            fs::write(dir.path().join(DISTANCES_FILE), "{not json").unwrap();
            fs::write(dir.path().join(NOTIFICATIONS_FILE), "[1, 2").unwrap();
            assert!(storage.distance_cache().unwrap().is_none());
            assert!(storage.notifications().unwrap().is_empty());
        }

        #[test]
        fn read_ids_roundtrip() {
            let (storage, _dir) = temp_storage();
            storage
                .set_read_notification_ids(vec![OrderId::from("1"), OrderId::from("4")])
                .unwrap();
            assert_eq!(storage.read_notification_ids().unwrap().len(), 2);
        }

        #[test]
        fn clear_keeps_lock_file() {
            let (storage, dir) = temp_storage();
            storage.set_position(position()).unwrap();
            storage.set_distance_cache(cache()).unwrap();
            storage.clear().unwrap();
            assert!(!dir.path().join(POSITION_FILE).exists());
            assert!(!dir.path().join(DISTANCES_FILE).exists());
            assert!(dir.path().join(LOCK_FILE).exists());
        }

        #[test]
        fn no_tmp_files_left_behind() {
            let (storage, dir) = temp_storage();
            storage.set_position(position()).unwrap();
            let leftovers = fs::read_dir(dir.path())
                .unwrap()
                .filter_map(core::result::Result::ok)
                .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
                .count();
            assert_eq!(leftovers, 0);
        }
    }

    #[cfg(feature = "async")]
    mod async_tests {
        use super::*;
        use crate::storage::Storage;

        #[tokio::test]
        async fn position_initially_none() {
            let (storage, _dir) = temp_storage();
            assert!(storage.position().await.unwrap().is_none());
        }

        #[tokio::test]
        async fn distance_cache_roundtrip() {
            let (storage, _dir) = temp_storage();
            storage.set_distance_cache(cache()).await.unwrap();
            assert_eq!(storage.distance_cache().await.unwrap(), Some(cache()));
        }
    }
}
