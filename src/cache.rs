//! Time-boxed cache records persisted through [`crate::storage`].
//!
//! Both records carry an embedded timestamp and expire after
//! [`CACHE_TTL_HOURS`]. Invalidation on movement is driven by
//! [`crate::geo::reconcile_position`]; this module only knows about age.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;
use crate::models::{Distance, ShopId};

/// Lifetime of cached positions and distances.
pub const CACHE_TTL_HOURS: i64 = 24;

/// Returns the default cache lifetime.
#[inline]
#[must_use]
pub fn default_ttl() -> TimeDelta {
    TimeDelta::hours(CACHE_TTL_HOURS)
}

/// Returns `true` if `timestamp` is younger than `ttl` at `now`.
fn within_ttl(timestamp: DateTime<Utc>, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
    now.signed_duration_since(timestamp) < ttl
}

/// Last known user position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CachedPosition {
    /// Observed coordinates.
    #[serde(flatten)]
    pub coords: Coordinates,
    /// When the position was observed (epoch milliseconds on the wire).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl CachedPosition {
    /// Creates a cached position observed at `timestamp`.
    #[inline]
    #[must_use]
    pub const fn new(coords: Coordinates, timestamp: DateTime<Utc>) -> Self {
        Self { coords, timestamp }
    }

    /// Returns `true` if the position may still be reused at `now`.
    #[inline]
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        within_ttl(self.timestamp, now, ttl)
    }
}

/// Walking distances keyed by shop, sharing a single timestamp.
///
/// The timestamp is refreshed on every merge, so the whole cache expires
/// together once no lookups have succeeded for [`CACHE_TTL_HOURS`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceCache {
    /// Time of the most recent merge (epoch milliseconds on the wire).
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Resolved distances by shop.
    #[serde(default)]
    pub entries: HashMap<ShopId, Distance>,
}

impl DistanceCache {
    /// Creates an empty cache stamped at `now`.
    #[inline]
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            timestamp: now,
            entries: HashMap::new(),
        }
    }

    /// Returns `true` if the cache may still be used at `now`.
    #[inline]
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: TimeDelta) -> bool {
        within_ttl(self.timestamp, now, ttl)
    }

    /// Returns the cached distance for a shop.
    #[inline]
    #[must_use]
    pub fn get(&self, id: &ShopId) -> Option<Distance> {
        self.entries.get(id).copied()
    }

    /// Merges resolved distances (last write wins per shop) and refreshes
    /// the shared timestamp.
    pub fn merge<I>(&mut self, resolved: I, now: DateTime<Utc>)
    where
        I: IntoIterator<Item = (ShopId, Distance)>,
    {
        for (id, distance) in resolved {
            let _old = self.entries.insert(id, distance);
        }
        self.timestamp = now;
    }

    /// Number of cached shops.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no distance is cached.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Loads the usable part of a persisted cache: an empty map when the
    /// record is missing or stale.
    #[must_use]
    pub fn usable_entries(
        cache: Option<Self>,
        now: DateTime<Utc>,
        ttl: TimeDelta,
    ) -> HashMap<ShopId, Distance> {
        cache
            .filter(|cache| cache.is_fresh(now, ttl))
            .map(|cache| cache.entries)
            .unwrap_or_default()
    }
}
