//! Batched walking-distance lookups.
//!
//! Routing calls are issued in small batches. Calls inside a batch run
//! concurrently, each after a short random delay, and batches are spaced
//! apart so the public routing instance is not flooded. The facades in
//! [`crate::print_hub`] drive the rounds; this module runs a single batch.

use core::time::Duration;
use std::collections::HashMap;

use rand::Rng as _;

use crate::geo::Coordinates;
use crate::models::{Distance, ShopId};

/// Pacing of distance lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceSettings {
    /// Lookups issued concurrently per batch; 0 behaves as 1.
    pub batch_size: usize,
    /// Upper bound of the random delay before each lookup.
    pub max_jitter: Duration,
    /// Pause between consecutive batches.
    pub batch_delay: Duration,
    /// Pause before retrying failed lookups.
    pub retry_cooldown: Duration,
    /// Extra rounds for lookups that failed.
    pub retry_rounds: u32,
}

impl DistanceSettings {
    /// Settings without any pauses, for tests and local routing servers.
    #[inline]
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            batch_size: 2,
            max_jitter: Duration::ZERO,
            batch_delay: Duration::ZERO,
            retry_cooldown: Duration::ZERO,
            retry_rounds: 1,
        }
    }

    /// Effective batch size.
    #[inline]
    #[must_use]
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }
}

impl Default for DistanceSettings {
    #[inline]
    fn default() -> Self {
        Self {
            batch_size: 2,
            max_jitter: Duration::from_millis(200),
            batch_delay: Duration::from_secs(1),
            retry_cooldown: Duration::from_secs(5),
            retry_rounds: 1,
        }
    }
}

/// Outcome of resolving distances for a set of shops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistanceReport {
    /// Distances known after the call, cached or freshly resolved.
    pub resolved: HashMap<ShopId, Distance>,
    /// Shops whose distance came from the cache.
    pub from_cache: usize,
    /// Shops still unresolved after every retry round.
    pub failed: Vec<ShopId>,
}

impl DistanceReport {
    /// Returns `true` when every requested shop has a distance.
    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A random delay in `[0, max]`, drawn per lookup.
#[must_use]
pub fn jitter(max: Duration) -> Duration {
    let max_ms = u64::try_from(max.as_millis()).unwrap_or(u64::MAX);
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
}

/// Runs one batch of lookups concurrently on the tokio runtime.
///
/// Returns the distances that resolved; failures are logged and left out.
#[cfg(feature = "async")]
#[tracing::instrument(skip_all, fields(batch = batch.len()))]
pub(crate) async fn resolve_batch(
    routing: &crate::client::RoutingClient,
    origin: Coordinates,
    batch: Vec<(ShopId, Coordinates)>,
    max_jitter: Duration,
) -> HashMap<ShopId, Distance> {
    let mut tasks = tokio::task::JoinSet::new();
    for (id, destination) in batch {
        let client = routing.clone();
        let delay = jitter(max_jitter);
        let _handle = tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            let result = client.distance(origin, destination).await;
            (id, result)
        });
    }
    let mut resolved = HashMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((id, Ok(distance))) => {
                let _old = resolved.insert(id, distance);
            }
            Ok((id, Err(err))) => {
                tracing::debug!(shop = %id, error = %err, "distance lookup failed");
            }
            Err(err) => tracing::warn!(error = %err, "distance task aborted"),
        }
    }
    resolved
}

/// Runs one batch of lookups concurrently on scoped threads.
///
/// Returns the distances that resolved; failures are logged and left out.
#[cfg(feature = "blocking")]
#[tracing::instrument(skip_all, fields(batch = batch.len()))]
pub(crate) fn resolve_batch_blocking(
    routing: &crate::client::RoutingBlockingClient,
    origin: Coordinates,
    batch: Vec<(ShopId, Coordinates)>,
    max_jitter: Duration,
) -> HashMap<ShopId, Distance> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = batch
            .into_iter()
            .map(|(id, destination)| {
                let delay = jitter(max_jitter);
                scope.spawn(move || {
                    std::thread::sleep(delay);
                    let result = routing.distance(origin, destination);
                    (id, result)
                })
            })
            .collect();
        let mut resolved = HashMap::new();
        for handle in handles {
            match handle.join() {
                Ok((id, Ok(distance))) => {
                    let _old = resolved.insert(id, distance);
                }
                Ok((id, Err(err))) => {
                    tracing::debug!(shop = %id, error = %err, "distance lookup failed");
                }
                Err(_panic) => tracing::warn!("distance thread panicked"),
            }
        }
        resolved
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_pace_lookups() {
        let settings = DistanceSettings::default();
        assert_eq!(settings.batch_size, 2);
        assert_eq!(settings.max_jitter, Duration::from_millis(200));
        assert_eq!(settings.batch_delay, Duration::from_secs(1));
        assert_eq!(settings.retry_cooldown, Duration::from_secs(5));
        assert_eq!(settings.retry_rounds, 1);
    }

    #[test]
    fn zero_batch_size_is_one() {
        let settings = DistanceSettings {
            batch_size: 0,
            ..DistanceSettings::immediate()
        };
        assert_eq!(settings.effective_batch_size(), 1);
    }

    #[test]
    fn jitter_stays_within_bound() {
        for _ in 0..100 {
            assert!(jitter(Duration::from_millis(200)) <= Duration::from_millis(200));
        }
        assert_eq!(jitter(Duration::ZERO), Duration::ZERO);
    }
}
