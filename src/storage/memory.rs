//! In-memory storage backend for testing.
//!
//! Provides [`InMemoryStorage`], a thread-safe in-memory implementation of
//! the storage traits. Ideal for unit tests and short-lived sessions where
//! nothing should touch the disk.

use std::sync::Mutex;

#[cfg(feature = "async")]
use core::future::{self, Future};

use crate::cache::{CachedPosition, DistanceCache};
use crate::error::{PrintHubError, Result};
use crate::models::{Notification, OrderId};

/// Thread-safe in-memory storage.
///
/// This type implements both [`super::Storage`] (async) and
/// [`super::BlockingStorage`] (blocking) traits, providing a zero-setup
/// storage backend for tests.
///
/// # Example
///
/// ```rust
/// use printhub_rs::storage::InMemoryStorage;
///
/// let storage = InMemoryStorage::new();
/// // Use with the PrintHub or PrintHubBlocking builders:
/// // PrintHubBlocking::builder().storage(storage).build()
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    /// All state behind a single mutex for thread-safe interior mutability.
    inner: Mutex<Inner>,
}

/// Inner mutable state.
#[derive(Debug, Default)]
struct Inner {
    /// Last device position.
    position: Option<CachedPosition>,
    /// Distance cache.
    distances: Option<DistanceCache>,
    /// Notification list.
    notifications: Vec<Notification>,
    /// Opened notification ids.
    read_ids: Vec<OrderId>,
}

impl InMemoryStorage {
    /// Creates a new empty in-memory storage.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the inner lock and applies a closure.
    fn with_lock<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> Result<R> {
        let mut inner = self.inner.lock().map_err(|err| lock_error(&err))?;
        Ok(f(&mut inner))
    }
}

/// Wraps a mutex poison error into a [`PrintHubError::Storage`].
fn lock_error<T>(err: &std::sync::PoisonError<T>) -> PrintHubError {
    PrintHubError::Storage(err.to_string().into())
}

// ── BlockingStorage implementation ──────────────────────────────────────

#[cfg(feature = "blocking")]
impl super::BlockingStorage for InMemoryStorage {
    #[inline]
    fn position(&self) -> Result<Option<CachedPosition>> {
        self.with_lock(|inner| inner.position)
    }

    #[inline]
    fn set_position(&self, position: CachedPosition) -> Result<()> {
        self.with_lock(|inner| inner.position = Some(position))
    }

    #[inline]
    fn distance_cache(&self) -> Result<Option<DistanceCache>> {
        self.with_lock(|inner| inner.distances.clone())
    }

    #[inline]
    fn set_distance_cache(&self, cache: DistanceCache) -> Result<()> {
        self.with_lock(|inner| inner.distances = Some(cache))
    }

    #[inline]
    fn clear_distance_cache(&self) -> Result<()> {
        self.with_lock(|inner| inner.distances = None)
    }

    #[inline]
    fn notifications(&self) -> Result<Vec<Notification>> {
        self.with_lock(|inner| inner.notifications.clone())
    }

    #[inline]
    fn set_notifications(&self, items: Vec<Notification>) -> Result<()> {
        self.with_lock(|inner| inner.notifications = items)
    }

    #[inline]
    fn read_notification_ids(&self) -> Result<Vec<OrderId>> {
        self.with_lock(|inner| inner.read_ids.clone())
    }

    #[inline]
    fn set_read_notification_ids(&self, ids: Vec<OrderId>) -> Result<()> {
        self.with_lock(|inner| inner.read_ids = ids)
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.with_lock(|inner| *inner = Inner::default())
    }
}

// ── Storage (async) implementation ──────────────────────────────────────

#[cfg(feature = "async")]
impl super::Storage for InMemoryStorage {
    #[inline]
    fn position(&self) -> impl Future<Output = Result<Option<CachedPosition>>> + Send {
        future::ready(self.with_lock(|inner| inner.position))
    }

    #[inline]
    fn set_position(&self, position: CachedPosition) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| inner.position = Some(position)))
    }

    #[inline]
    fn distance_cache(&self) -> impl Future<Output = Result<Option<DistanceCache>>> + Send {
        future::ready(self.with_lock(|inner| inner.distances.clone()))
    }

    #[inline]
    fn set_distance_cache(&self, cache: DistanceCache) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| inner.distances = Some(cache)))
    }

    #[inline]
    fn clear_distance_cache(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| inner.distances = None))
    }

    #[inline]
    fn notifications(&self) -> impl Future<Output = Result<Vec<Notification>>> + Send {
        future::ready(self.with_lock(|inner| inner.notifications.clone()))
    }

    #[inline]
    fn set_notifications(
        &self,
        items: Vec<Notification>,
    ) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| inner.notifications = items))
    }

    #[inline]
    fn read_notification_ids(&self) -> impl Future<Output = Result<Vec<OrderId>>> + Send {
        future::ready(self.with_lock(|inner| inner.read_ids.clone()))
    }

    #[inline]
    fn set_read_notification_ids(
        &self,
        ids: Vec<OrderId>,
    ) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| inner.read_ids = ids))
    }

    #[inline]
    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.with_lock(|inner| *inner = Inner::default()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::geo::Coordinates;
    use crate::models::{Distance, ShopId};

    // ── Test helpers ───────────────────────────────────────────────────

    fn position() -> CachedPosition {
        CachedPosition::new(
            Coordinates::new(21.0, 105.8),
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        )
    }

    fn cache() -> DistanceCache {
        let mut cache = DistanceCache::new(DateTime::from_timestamp(1_700_000_000, 0).unwrap());
        let _old = cache.entries.insert(
            ShopId::from("1"),
            Distance {
                distance_km: 1.5,
                minutes: 9,
            },
        );
        cache
    }

    fn notification(id: &str) -> Notification {
        Notification {
            id: OrderId::from(id),
            shop_name: "In Nhanh".to_owned(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            date: None,
        }
    }

    // ── Blocking tests ─────────────────────────────────────────────────

    #[cfg(feature = "blocking")]
    mod blocking {
        use super::*;
        use crate::storage::BlockingStorage;

        #[test]
        fn position_lifecycle() {
            let s = InMemoryStorage::new();
            assert!(s.position().unwrap().is_none());
            s.set_position(position()).unwrap();
            assert_eq!(s.position().unwrap(), Some(position()));
        }

        #[test]
        fn distance_cache_set_and_clear() {
            let s = InMemoryStorage::new();
            s.set_distance_cache(cache()).unwrap();
            assert_eq!(s.distance_cache().unwrap().unwrap().len(), 1);
            s.clear_distance_cache().unwrap();
            assert!(s.distance_cache().unwrap().is_none());
        }

        #[test]
        fn notifications_and_read_ids() {
            let s = InMemoryStorage::new();
            s.set_notifications(vec![notification("1"), notification("2")])
                .unwrap();
            s.set_read_notification_ids(vec![OrderId::from("2")]).unwrap();
            assert_eq!(s.notifications().unwrap().len(), 2);
            assert_eq!(s.read_notification_ids().unwrap(), vec![OrderId::from("2")]);
        }

        #[test]
        fn clear_resets_everything() {
            let s = InMemoryStorage::new();
            s.set_position(position()).unwrap();
            s.set_distance_cache(cache()).unwrap();
            s.set_notifications(vec![notification("1")]).unwrap();
            s.clear().unwrap();
            assert!(s.position().unwrap().is_none());
            assert!(s.distance_cache().unwrap().is_none());
            assert!(s.notifications().unwrap().is_empty());
        }
    }

    // ── Async tests ────────────────────────────────────────────────────

    #[cfg(feature = "async")]
    mod async_tests {
        use super::*;
        use crate::storage::Storage;

        #[tokio::test]
        async fn position_lifecycle() {
            let s = InMemoryStorage::new();
            assert!(s.position().await.unwrap().is_none());
            s.set_position(position()).await.unwrap();
            assert_eq!(s.position().await.unwrap(), Some(position()));
        }

        #[tokio::test]
        async fn distance_cache_roundtrip() {
            let s = InMemoryStorage::new();
            s.set_distance_cache(cache()).await.unwrap();
            assert_eq!(s.distance_cache().await.unwrap(), Some(cache()));
            s.clear().await.unwrap();
            assert!(s.distance_cache().await.unwrap().is_none());
        }

        #[tokio::test]
        async fn notifications_roundtrip() {
            let s = InMemoryStorage::new();
            s.set_notifications(vec![notification("9")]).await.unwrap();
            assert_eq!(s.notifications().await.unwrap(), vec![notification("9")]);
        }
    }
}
