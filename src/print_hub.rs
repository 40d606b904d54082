//! High-level PrintHub client with integrated storage.
//!
//! Combines the backend, routing and upload clients with a [`Storage`] /
//! [`BlockingStorage`] backend and a [`Locator`] to provide the
//! storefront's workflows: nearby shops with walking distances, order
//! submission, notifications, receipts and order history.
//!
//! [`Storage`]: crate::storage::Storage
//! [`BlockingStorage`]: crate::storage::BlockingStorage
//! [`Locator`]: crate::geo::Locator

use core::time::Duration;

use crate::distance::DistanceReport;
use crate::error::PrintHubError;
use crate::geo::PositionUpdate;
use crate::order::OrderErrors;
use crate::shop_list::ShopListing;

/// Default bound on waiting for the locator.
pub const DEFAULT_LOCATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Shops with walking distances from the resolved position.
#[derive(Debug, Clone)]
pub struct NearbyShops {
    /// Listing over all shops, with distances merged in.
    pub listing: ShopListing,
    /// Position the distances were computed from.
    pub position: PositionUpdate,
    /// Distance resolution outcome.
    pub report: DistanceReport,
}

/// Wraps a failed upload or order creation as a submission error.
fn submit_error(stage: &str, err: &PrintHubError) -> PrintHubError {
    tracing::warn!(stage, error = %err, "order submission failed");
    PrintHubError::InvalidOrder(OrderErrors::submit(format!("{stage}: {err}")))
}

/// Message prefix for a failed upload.
const UPLOAD_FAILED: &str = "Tải file lên thất bại";

/// Message prefix for a failed order creation.
const CREATE_FAILED: &str = "Đặt hàng thất bại";

/// Generates a high-level client (async or blocking) with builder and methods.
macro_rules! define_print_hub {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        api_client: $api:ty,
        routing_client: $routing:ty,
        upload_client: $upload:ty,
        storage_trait: $storage_trait:ident,
        resolve_batch: $resolve_batch:path,
        locate: $locate:path,
        sleep: $sleep:path,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder<S: $storage_trait> {
            /// Backend base URL override.
            api_url: Option<String>,
            /// Routing service base URL override.
            routing_url: Option<String>,
            /// Upload service base URL override.
            upload_url: Option<String>,
            /// Upload cloud name override.
            cloud_name: Option<String>,
            /// Upload preset override.
            upload_preset: Option<String>,
            /// Storage backend.
            storage: Option<S>,
            /// Position source.
            locator: Option<Arc<dyn Locator>>,
            /// Customer placing orders.
            user_id: Option<UserId>,
            /// Pacing of distance lookups.
            distance_settings: DistanceSettings,
            /// Bound on waiting for the locator.
            locate_timeout: Duration,
            /// Per-request routing timeout override.
            route_timeout: Option<Duration>,
        }

        impl<S: $storage_trait> $builder<S> {
            /// Overrides the backend base URL.
            #[inline]
            #[must_use]
            pub fn api_url<T: Into<String>>(mut self, url: T) -> Self {
                self.api_url = Some(url.into());
                self
            }

            /// Overrides the routing service base URL.
            #[inline]
            #[must_use]
            pub fn routing_url<T: Into<String>>(mut self, url: T) -> Self {
                self.routing_url = Some(url.into());
                self
            }

            /// Overrides the upload service base URL.
            #[inline]
            #[must_use]
            pub fn upload_url<T: Into<String>>(mut self, url: T) -> Self {
                self.upload_url = Some(url.into());
                self
            }

            /// Sets the upload cloud name.
            #[inline]
            #[must_use]
            pub fn cloud_name<T: Into<String>>(mut self, name: T) -> Self {
                self.cloud_name = Some(name.into());
                self
            }

            /// Sets the unsigned upload preset.
            #[inline]
            #[must_use]
            pub fn upload_preset<T: Into<String>>(mut self, preset: T) -> Self {
                self.upload_preset = Some(preset.into());
                self
            }

            /// Sets the storage backend.
            #[inline]
            #[must_use]
            pub fn storage(mut self, storage: S) -> Self {
                self.storage = Some(storage);
                self
            }

            /// Sets the position source. Without one, positions come from
            /// the cache or the default coordinates.
            #[inline]
            #[must_use]
            pub fn locator<L: Locator>(mut self, locator: L) -> Self {
                self.locator = Some(Arc::new(locator));
                self
            }

            /// Sets the customer attached to submitted orders.
            #[inline]
            #[must_use]
            pub fn user_id(mut self, user_id: UserId) -> Self {
                self.user_id = Some(user_id);
                self
            }

            /// Sets the pacing of distance lookups.
            #[inline]
            #[must_use]
            pub const fn distance_settings(mut self, settings: DistanceSettings) -> Self {
                self.distance_settings = settings;
                self
            }

            /// Sets the bound on waiting for the locator.
            #[inline]
            #[must_use]
            pub const fn locate_timeout(mut self, timeout: Duration) -> Self {
                self.locate_timeout = timeout;
                self
            }

            /// Bounds each routing request.
            #[inline]
            #[must_use]
            pub const fn route_timeout(mut self, timeout: Duration) -> Self {
                self.route_timeout = Some(timeout);
                self
            }

            /// Builds the high-level client.
            ///
            /// # Errors
            ///
            /// Returns [`PrintHubError::Storage`] if no storage was provided.
            /// Returns [`PrintHubError::Http`] if an HTTP client fails to build.
            #[inline]
            pub fn build(self) -> Result<$client<S>> {
                let storage = self.storage.ok_or_else(|| {
                    PrintHubError::Storage("storage backend is required".into())
                })?;

                let mut api = <$api>::builder();
                if let Some(url) = self.api_url {
                    api = api.base_url(url);
                }
                let mut routing = <$routing>::builder();
                if let Some(url) = self.routing_url {
                    routing = routing.base_url(url);
                }
                if let Some(timeout) = self.route_timeout {
                    routing = routing.timeout(timeout);
                }
                let mut upload = <$upload>::builder();
                if let Some(url) = self.upload_url {
                    upload = upload.base_url(url);
                }
                if let Some(name) = self.cloud_name {
                    upload = upload.cloud_name(name);
                }
                if let Some(preset) = self.upload_preset {
                    upload = upload.upload_preset(preset);
                }

                Ok($client {
                    api: api.build()?,
                    routing: routing.build()?,
                    upload: upload.build()?,
                    storage,
                    locator: self
                        .locator
                        .unwrap_or_else(|| Arc::new(UnavailableLocator)),
                    user_id: self.user_id,
                    distance_settings: self.distance_settings,
                    locate_timeout: self.locate_timeout,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client<S: $storage_trait> {
            /// Backend client.
            api: $api,
            /// Routing client.
            routing: $routing,
            /// Upload client.
            upload: $upload,
            /// Storage backend.
            storage: S,
            /// Position source.
            locator: Arc<dyn Locator>,
            /// Customer placing orders.
            user_id: Option<UserId>,
            /// Pacing of distance lookups.
            distance_settings: DistanceSettings,
            /// Bound on waiting for the locator.
            locate_timeout: Duration,
        }

        impl<S: $storage_trait> $client<S> {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub fn builder() -> $builder<S> {
                $builder {
                    api_url: None,
                    routing_url: None,
                    upload_url: None,
                    cloud_name: None,
                    upload_preset: None,
                    storage: None,
                    locator: None,
                    user_id: None,
                    distance_settings: DistanceSettings::default(),
                    locate_timeout: DEFAULT_LOCATE_TIMEOUT,
                    route_timeout: None,
                }
            }

            /// Returns the backend client.
            #[inline]
            #[must_use]
            pub const fn api(&self) -> &$api {
                &self.api
            }

            /// Returns the routing client.
            #[inline]
            #[must_use]
            pub const fn routing(&self) -> &$routing {
                &self.routing
            }

            /// Returns the storage backend.
            #[inline]
            #[must_use]
            pub const fn storage(&self) -> &S {
                &self.storage
            }

            /// Returns the pacing of distance lookups.
            #[inline]
            #[must_use]
            pub const fn distance_settings(&self) -> DistanceSettings {
                self.distance_settings
            }

            // ── Shops ───────────────────────────────────────────────

            /// Fetches every shop from the backend.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails.
            #[inline]
            pub $($async_kw)? fn shops(&self) -> Result<Vec<Shop>> {
                self.api.shops() $( .$await_ext )?
            }

            /// Searches shops on the backend.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails.
            #[inline]
            pub $($async_kw)? fn search_shops(&self, query: &str) -> Result<Vec<Shop>> {
                self.api.search_shops(query) $( .$await_ext )?
            }

            /// Fetches one shop from the backend.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails.
            #[inline]
            pub $($async_kw)? fn shop(&self, id: &ShopId) -> Result<Shop> {
                self.api.shop(id) $( .$await_ext )?
            }

            // ── Position and distances ──────────────────────────────

            /// Resolves the user's position.
            ///
            /// Asks the locator (bounded by the locate timeout) and
            /// reconciles the answer with the cached position. A new
            /// reference position, observed or fallback, is persisted and
            /// the distance cache is dropped.
            ///
            /// # Errors
            ///
            /// Returns an error if the storage backend fails. Locator
            /// failures never surface.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn locate(&self) -> Result<PositionUpdate> {
                let observed = $locate(Arc::clone(&self.locator), self.locate_timeout)
                    $( .$await_ext )?;
                let now = Utc::now();
                let cached = self.storage.position() $( .$await_ext )? ?;
                let update = reconcile_position(observed, cached.as_ref(), now, default_ttl());
                tracing::debug!(
                    source = ?update.source,
                    changed = update.changed,
                    "position resolved"
                );
                if update.changed {
                    tracing::debug!("position changed, dropping cached distances");
                    self.storage.clear_distance_cache() $( .$await_ext )? ?;
                    if update.source != PositionSource::Cached {
                        self.storage
                            .set_position(CachedPosition::new(update.coords, now))
                            $( .$await_ext )? ?;
                    }
                }
                Ok(update)
            }

            /// Returns the cached distances, or nothing when the cache is
            /// missing or stale.
            ///
            /// # Errors
            ///
            /// Returns an error if the storage backend fails to read.
            #[inline]
            pub $($async_kw)? fn cached_distances(&self) -> Result<HashMap<ShopId, Distance>> {
                let cache = self.storage.distance_cache() $( .$await_ext )? ?;
                Ok(DistanceCache::usable_entries(cache, Utc::now(), default_ttl()))
            }

            /// Resolves walking distances from `origin` to every shop.
            ///
            /// Shops already in the fresh cache are not looked up again. The
            /// rest are looked up in paced batches; each batch's successes
            /// are merged into the cache right away. Failed lookups are
            /// retried after a cooldown and never fail the call.
            ///
            /// # Errors
            ///
            /// Returns an error if the storage backend fails.
            #[tracing::instrument(skip_all, fields(shops = shops.len()))]
            pub $($async_kw)? fn resolve_distances(
                &self,
                origin: Coordinates,
                shops: &[Shop],
            ) -> Result<DistanceReport> {
                let settings = self.distance_settings;
                let mut report = DistanceReport::default();
                let cached = self.cached_distances() $( .$await_ext )? ?;
                let mut pending: Vec<(ShopId, Coordinates)> = Vec::new();
                for shop in shops {
                    if let Some(distance) = cached.get(&shop.id) {
                        let _old = report.resolved.insert(shop.id.clone(), *distance);
                        report.from_cache += 1;
                    } else {
                        pending.push((shop.id.clone(), shop.coordinates()));
                    }
                }
                tracing::debug!(cached = report.from_cache, pending = pending.len(), "resolving distances");

                let mut round: u32 = 0;
                while !pending.is_empty() {
                    if round > 0 {
                        tracing::debug!(round, failed = pending.len(), "retrying failed lookups");
                        $sleep(settings.retry_cooldown) $( .$await_ext )?;
                    }
                    let mut failed: Vec<(ShopId, Coordinates)> = Vec::new();
                    for (index, batch) in pending.chunks(settings.effective_batch_size()).enumerate() {
                        if index > 0 {
                            $sleep(settings.batch_delay) $( .$await_ext )?;
                        }
                        let found = $resolve_batch(&self.routing, origin, batch.to_vec(), settings.max_jitter)
                            $( .$await_ext )?;
                        failed.extend(batch.iter().filter(|pair| !found.contains_key(&pair.0)).cloned());
                        if !found.is_empty() {
                            report.resolved.extend(found.iter().map(|(id, distance)| (id.clone(), *distance)));
                            self.merge_distances(found) $( .$await_ext )? ?;
                        }
                    }
                    pending = failed;
                    if round >= settings.retry_rounds {
                        break;
                    }
                    round += 1;
                }
                report.failed = pending.into_iter().map(|(id, _)| id).collect();
                if !report.failed.is_empty() {
                    tracing::warn!(failed = report.failed.len(), "some distances stay unresolved");
                }
                Ok(report)
            }

            /// Fetches the walking route from `origin` to `shop` and records
            /// its distance in the cache.
            ///
            /// # Errors
            ///
            /// Returns an error if the routing request fails or the storage
            /// backend fails.
            #[tracing::instrument(skip_all, fields(shop = %shop.id))]
            pub $($async_kw)? fn route_to(&self, origin: Coordinates, shop: &Shop) -> Result<Route> {
                let route = self.routing.route(origin, shop.coordinates()) $( .$await_ext )? ?;
                let resolved = HashMap::from([(shop.id.clone(), route.distance)]);
                self.merge_distances(resolved) $( .$await_ext )? ?;
                Ok(route)
            }

            /// Fetches all shops, resolves the position and the walking
            /// distance to each shop, and returns a listing over them.
            ///
            /// # Errors
            ///
            /// Returns an error if fetching shops or the storage backend
            /// fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn nearby_shops(&self) -> Result<NearbyShops> {
                let shops = self.shops() $( .$await_ext )? ?;
                let position = self.locate() $( .$await_ext )? ?;
                let report = self.resolve_distances(position.coords, &shops) $( .$await_ext )? ?;
                let mut listing = ShopListing::new(shops);
                listing.merge_distances(report.resolved.clone());
                Ok(NearbyShops {
                    listing,
                    position,
                    report,
                })
            }

            /// Read-modify-write merge into the persisted distance cache.
            $($async_kw)? fn merge_distances(&self, resolved: HashMap<ShopId, Distance>) -> Result<()> {
                let now = Utc::now();
                let existing = self.storage.distance_cache() $( .$await_ext )? ?;
                let mut cache = existing
                    .filter(|cache| cache.is_fresh(now, default_ttl()))
                    .unwrap_or_else(|| DistanceCache::new(now));
                cache.merge(resolved, now);
                tracing::trace!(entries = cache.len(), "storing distance cache");
                self.storage.set_distance_cache(cache) $( .$await_ext )?
            }

            // ── Orders ──────────────────────────────────────────────

            /// Uploads the draft's files, creates the order and records a
            /// notification for it.
            ///
            /// # Errors
            ///
            /// Returns [`PrintHubError::InvalidOrder`] when the draft does
            /// not validate, a file upload fails, or the backend rejects the
            /// order (the last two carry a `submit` message). Storage
            /// failures while recording the notification are returned as is.
            #[tracing::instrument(skip_all, fields(shop = %shop.id, files = draft.files().len()))]
            pub $($async_kw)? fn submit_order(&self, shop: &Shop, draft: &OrderDraft) -> Result<Order> {
                draft.validate().map_err(PrintHubError::InvalidOrder)?;
                if draft.shop_id() != &shop.id {
                    return Err(PrintHubError::InvalidOrder(OrderErrors::submit(format!(
                        "draft is for shop {}, not {}",
                        draft.shop_id(),
                        shop.id
                    ))));
                }
                let mut uploaded = Vec::with_capacity(draft.files().len());
                for file in draft.files() {
                    let hosted = self
                        .upload
                        .upload(file.name(), file.bytes().to_vec())
                        $( .$await_ext )?
                        .map_err(|err| submit_error(UPLOAD_FAILED, &err))?;
                    uploaded.push(hosted);
                }
                let now = Utc::now();
                let payload = draft.to_new_order(&uploaded, self.user_id.clone(), now)?;
                let order = self
                    .api
                    .create_order(&payload)
                    $( .$await_ext )?
                    .map_err(|err| submit_error(CREATE_FAILED, &err))?;
                tracing::info!(order = %order.id, total = order.total_amount, "order created");
                let notification = Notification {
                    id: order.id.clone(),
                    shop_name: shop.name.clone(),
                    created_at: now,
                    date: Some(order.pickup_date),
                };
                let mut center = self.notification_center() $( .$await_ext )? ?;
                center.push(notification, now);
                self.save_notifications(&center) $( .$await_ext )? ?;
                Ok(order)
            }

            /// Fetches an order and its shop for display.
            ///
            /// # Errors
            ///
            /// Returns an error if either request fails.
            #[tracing::instrument(skip_all, fields(order = %id))]
            pub $($async_kw)? fn receipt(&self, id: &OrderId) -> Result<Receipt> {
                let order = self.api.order(id) $( .$await_ext )? ?;
                let shop = self.api.shop(&order.shop_id) $( .$await_ext )? ?;
                Ok(Receipt { order, shop })
            }

            /// Sets an order's status on the backend.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails.
            #[inline]
            pub $($async_kw)? fn update_order_status(
                &self,
                id: &OrderId,
                status: OrderStatus,
            ) -> Result<Order> {
                self.api.update_order_status(id, status) $( .$await_ext )?
            }

            /// Lists the orders this client placed that match `filter`.
            ///
            /// History is built from the stored notifications, newest first.
            /// Each order is fetched by id; a failed fetch leaves the entry
            /// without detail, so it has no files.
            ///
            /// # Errors
            ///
            /// Returns an error if the storage backend fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn order_history(&self, filter: &HistoryFilter) -> Result<Vec<HistoryEntry>> {
                let center = self.notification_center() $( .$await_ext )? ?;
                let mut entries: Vec<HistoryEntry> = Vec::with_capacity(center.items().len());
                for notification in center.items() {
                    let order = match self.api.order(&notification.id) $( .$await_ext )? {
                        Ok(order) => Some(order),
                        Err(err) => {
                            tracing::debug!(order = %notification.id, error = %err, "order detail unavailable");
                            None
                        }
                    };
                    entries.push(HistoryEntry::new(notification.clone(), order));
                }
                Ok(filter.apply(entries))
            }

            // ── Notifications ───────────────────────────────────────

            /// Loads the notification list, pruning expired entries and
            /// persisting the result.
            ///
            /// # Errors
            ///
            /// Returns an error if the storage backend fails.
            pub $($async_kw)? fn notification_center(&self) -> Result<NotificationCenter> {
                let items = self.storage.notifications() $( .$await_ext )? ?;
                let read = self.storage.read_notification_ids() $( .$await_ext )? ?;
                let before = items.len();
                let center = NotificationCenter::load(items, read, Utc::now());
                if center.items().len() != before {
                    self.save_notifications(&center) $( .$await_ext )? ?;
                }
                Ok(center)
            }

            /// Marks a notification read and returns its receipt.
            ///
            /// # Errors
            ///
            /// Returns an error if the storage backend or a receipt request
            /// fails.
            #[tracing::instrument(skip_all, fields(order = %id))]
            pub $($async_kw)? fn open_notification(&self, id: &OrderId) -> Result<Receipt> {
                let mut center = self.notification_center() $( .$await_ext )? ?;
                if center.mark_read(id, Utc::now()) {
                    self.save_notifications(&center) $( .$await_ext )? ?;
                }
                self.receipt(id) $( .$await_ext )?
            }

            /// Drops every notification and read mark.
            ///
            /// # Errors
            ///
            /// Returns an error if the storage backend fails.
            #[inline]
            pub $($async_kw)? fn clear_notifications(&self) -> Result<()> {
                self.save_notifications(&NotificationCenter::default()) $( .$await_ext )?
            }

            /// Deletes every locally stored record.
            ///
            /// # Errors
            ///
            /// Returns an error if the storage backend fails.
            #[inline]
            pub $($async_kw)? fn clear_local_data(&self) -> Result<()> {
                self.storage.clear() $( .$await_ext )?
            }

            /// Persists a notification center.
            $($async_kw)? fn save_notifications(&self, center: &NotificationCenter) -> Result<()> {
                self.storage.set_notifications(center.items().to_vec()) $( .$await_ext )? ?;
                self.storage.set_read_notification_ids(center.read_ids()) $( .$await_ext )?
            }
        }
    };
}

// ── Async variant ───────────────────────────────────────────────────────

#[cfg(feature = "async")]
mod async_print_hub {
    //! Async high-level client.

    use core::time::Duration;
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::Utc;

    use super::{CREATE_FAILED, DEFAULT_LOCATE_TIMEOUT, NearbyShops, UPLOAD_FAILED, submit_error};
    use crate::cache::{CachedPosition, DistanceCache, default_ttl};
    use crate::client::{ApiClient, RoutingClient, UploadClient};
    use crate::distance::{DistanceReport, DistanceSettings};
    use crate::error::{PrintHubError, Result};
    use crate::geo::{
        Coordinates, Locator, PositionSource, PositionUpdate, UnavailableLocator, reconcile_position,
    };
    use crate::models::{
        Distance, Notification, Order, OrderId, OrderStatus, Route, Shop, ShopId, UserId,
    };
    use crate::notifications::{HistoryEntry, HistoryFilter, NotificationCenter, Receipt};
    use crate::order::{OrderDraft, OrderErrors};
    use crate::shop_list::ShopListing;
    use crate::storage::Storage;

    define_print_hub! {
        client_name: PrintHub,
        builder_name: PrintHubBuilder,
        api_client: ApiClient,
        routing_client: RoutingClient,
        upload_client: UploadClient,
        storage_trait: Storage,
        resolve_batch: crate::distance::resolve_batch,
        locate: crate::geo::locate_within,
        sleep: tokio::time::sleep,
        client_doc: "High-level async PrintHub client with integrated storage.\n\nUse [`PrintHub::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`PrintHub`] client.",
        async_kw: async,
        await_kw: await,
    }
}

// ── Blocking variant ────────────────────────────────────────────────────

#[cfg(feature = "blocking")]
mod blocking_print_hub {
    //! Blocking high-level client.

    use core::time::Duration;
    use std::collections::HashMap;
    use std::sync::Arc;

    use chrono::Utc;

    use super::{CREATE_FAILED, DEFAULT_LOCATE_TIMEOUT, NearbyShops, UPLOAD_FAILED, submit_error};
    use crate::cache::{CachedPosition, DistanceCache, default_ttl};
    use crate::client::{ApiBlockingClient, RoutingBlockingClient, UploadBlockingClient};
    use crate::distance::{DistanceReport, DistanceSettings};
    use crate::error::{PrintHubError, Result};
    use crate::geo::{
        Coordinates, Locator, PositionSource, PositionUpdate, UnavailableLocator, reconcile_position,
    };
    use crate::models::{
        Distance, Notification, Order, OrderId, OrderStatus, Route, Shop, ShopId, UserId,
    };
    use crate::notifications::{HistoryEntry, HistoryFilter, NotificationCenter, Receipt};
    use crate::order::{OrderDraft, OrderErrors};
    use crate::shop_list::ShopListing;
    use crate::storage::BlockingStorage;

    define_print_hub! {
        client_name: PrintHubBlocking,
        builder_name: PrintHubBlockingBuilder,
        api_client: ApiBlockingClient,
        routing_client: RoutingBlockingClient,
        upload_client: UploadBlockingClient,
        storage_trait: BlockingStorage,
        resolve_batch: crate::distance::resolve_batch_blocking,
        locate: crate::geo::locate_within_blocking,
        sleep: std::thread::sleep,
        client_doc: "High-level blocking PrintHub client with integrated storage.\n\nUse [`PrintHubBlocking::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`PrintHubBlocking`] client.",
    }
}

#[cfg(feature = "async")]
pub use async_print_hub::{PrintHub, PrintHubBuilder};
#[cfg(feature = "blocking")]
pub use blocking_print_hub::{PrintHubBlocking, PrintHubBlockingBuilder};
