//! Coordinates, great-circle distance, polyline decoding and position
//! resolution.
//!
//! The position pipeline is split in two: a [`Locator`] produces a raw
//! observation (or fails), and [`reconcile_position`] combines that
//! observation with the last cached position to decide which coordinates
//! to use and whether the user has moved far enough to invalidate cached
//! distances.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::CachedPosition;
use crate::error::{PrintHubError, Result};

/// Mean Earth radius in metres.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Moving further than this (in metres) marks the position as changed.
pub const POSITION_CHANGE_THRESHOLD_M: f64 = 100.0;

/// Position used when no observation and no cached position are available
/// (Hanoi city centre).
pub const DEFAULT_POSITION: Coordinates = Coordinates::new(21.0285, 105.8542);

/// Precision of polylines produced by the routing service.
pub const ROUTE_POLYLINE_PRECISION: u32 = 6;

/// A WGS-84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[inline]
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns the great-circle distance to `other` in metres.
    #[inline]
    #[must_use]
    pub fn distance_m(self, other: Self) -> f64 {
        haversine_m(self, other)
    }
}

/// Great-circle distance between two coordinates in metres (haversine).
#[must_use]
pub fn haversine_m(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();
    let half_chord = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());
    EARTH_RADIUS_M * angle
}

/// Decodes an encoded polyline into coordinates.
///
/// `precision` is the number of decimal digits the encoder kept (5 for the
/// classic format, 6 for the routing service).
///
/// # Errors
///
/// Returns [`PrintHubError::Polyline`] if the input contains characters
/// outside the encoding alphabet, ends in the middle of a value, or sums to
/// a coordinate outside the `i64` range.
pub fn decode_polyline(encoded: &str, precision: u32) -> Result<Vec<Coordinates>> {
    let factor = 10_f64.powi(i32::try_from(precision).map_err(|err| PrintHubError::Polyline(err.to_string()))?);
    let mut bytes = encoded.bytes().peekable();
    let mut points = Vec::new();
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while bytes.peek().is_some() {
        lat = lat
            .checked_add(next_polyline_value(&mut bytes)?)
            .ok_or_else(|| PrintHubError::Polyline("latitude overflow".to_owned()))?;
        lon = lon
            .checked_add(next_polyline_value(&mut bytes)?)
            .ok_or_else(|| PrintHubError::Polyline("longitude overflow".to_owned()))?;
        #[allow(clippy::cast_precision_loss, reason = "polyline deltas are far below 2^52")]
        points.push(Coordinates::new(lat as f64 / factor, lon as f64 / factor));
    }
    Ok(points)
}

/// Reads one zig-zag encoded signed value from the byte stream.
fn next_polyline_value<I: Iterator<Item = u8>>(bytes: &mut I) -> Result<i64> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;
    loop {
        let byte = bytes
            .next()
            .ok_or_else(|| PrintHubError::Polyline("truncated value".to_owned()))?;
        let chunk = i64::from(byte)
            .checked_sub(63)
            .filter(|chunk| (0..64).contains(chunk))
            .ok_or_else(|| PrintHubError::Polyline(format!("invalid character {:?}", char::from(byte))))?;
        if shift > 60 {
            return Err(PrintHubError::Polyline("value overflow".to_owned()));
        }
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    Ok(if result & 1 == 1 { !(result >> 1) } else { result >> 1 })
}

/// A single-shot position source.
///
/// Implementations may block; callers bound the wait (see the facade's
/// `locate`).
pub trait Locator: core::fmt::Debug + Send + Sync + 'static {
    /// Returns the current position.
    ///
    /// # Errors
    ///
    /// Returns an error if the position is unavailable.
    fn locate(&self) -> Result<Coordinates>;
}

/// A locator that always reports the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Coordinates);

impl Locator for FixedLocator {
    #[inline]
    fn locate(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}

/// A locator for environments without any position source.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableLocator;

impl Locator for UnavailableLocator {
    #[inline]
    fn locate(&self) -> Result<Coordinates> {
        Err(PrintHubError::Locate("position source unsupported".to_owned()))
    }
}

/// Runs the locator on the blocking pool, giving up after `timeout`.
///
/// Failures and timeouts yield `None`; the locator call itself cannot be
/// cancelled and finishes in the background.
#[cfg(feature = "async")]
#[tracing::instrument(skip_all)]
pub async fn locate_within(
    locator: std::sync::Arc<dyn Locator>,
    timeout: core::time::Duration,
) -> Option<Coordinates> {
    let task = tokio::task::spawn_blocking(move || locator.locate());
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(Ok(coords))) => Some(coords),
        Ok(Ok(Err(err))) => {
            tracing::debug!(error = %err, "locator failed");
            None
        }
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "locator task aborted");
            None
        }
        Err(_elapsed) => {
            tracing::debug!(?timeout, "locator timed out");
            None
        }
    }
}

/// Runs the locator on a worker thread, giving up after `timeout`.
///
/// Failures and timeouts yield `None`; a timed-out worker is detached.
#[cfg(feature = "blocking")]
#[tracing::instrument(skip_all)]
pub fn locate_within_blocking(
    locator: std::sync::Arc<dyn Locator>,
    timeout: core::time::Duration,
) -> Option<Coordinates> {
    let (sender, receiver) = std::sync::mpsc::channel();
    let _worker = std::thread::spawn(move || {
        let _sent = sender.send(locator.locate());
    });
    match receiver.recv_timeout(timeout) {
        Ok(Ok(coords)) => Some(coords),
        Ok(Err(err)) => {
            tracing::debug!(error = %err, "locator failed");
            None
        }
        Err(err) => {
            tracing::debug!(error = %err, "locator timed out");
            None
        }
    }
}

/// Where a resolved position came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSource {
    /// A fresh observation from the locator.
    Device,
    /// The last cached position (locator failed or timed out).
    Cached,
    /// The fixed default position.
    Fallback,
}

/// Outcome of resolving the user's position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionUpdate {
    /// Coordinates to use for distance calculations.
    pub coords: Coordinates,
    /// Whether previously cached distances must be discarded.
    pub changed: bool,
    /// Origin of the coordinates.
    pub source: PositionSource,
}

/// Combines a fresh observation with the cached position.
///
/// A cached position older than `ttl` is ignored. An observation further
/// than [`POSITION_CHANGE_THRESHOLD_M`] from a fresh cached position, or
/// with no usable cache at all, is reported as changed. Falling back to
/// [`DEFAULT_POSITION`] only counts as a change when the last stored
/// reference, stale or not, was elsewhere.
#[must_use]
pub fn reconcile_position(
    observed: Option<Coordinates>,
    cached: Option<&CachedPosition>,
    now: DateTime<Utc>,
    ttl: TimeDelta,
) -> PositionUpdate {
    let fresh = cached.filter(|pos| pos.is_fresh(now, ttl));
    match (observed, fresh) {
        (Some(coords), Some(prior)) => PositionUpdate {
            coords,
            changed: haversine_m(prior.coords, coords) > POSITION_CHANGE_THRESHOLD_M,
            source: PositionSource::Device,
        },
        (Some(coords), None) => PositionUpdate {
            coords,
            changed: true,
            source: PositionSource::Device,
        },
        (None, Some(prior)) => PositionUpdate {
            coords: prior.coords,
            changed: false,
            source: PositionSource::Cached,
        },
        (None, None) => PositionUpdate {
            coords: DEFAULT_POSITION,
            changed: cached
                .is_none_or(|prior| haversine_m(prior.coords, DEFAULT_POSITION) > POSITION_CHANGE_THRESHOLD_M),
            source: PositionSource::Fallback,
        },
    }
}
