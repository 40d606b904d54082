//! Pluggable storage backends for locally persisted client state.
//!
//! This module defines the [`Storage`] (async) and [`BlockingStorage`]
//! (blocking) traits via a shared macro, mirroring the client generation
//! pattern in [`crate::client`]. Backends hold four independent records:
//! the last known position, the distance cache, the notification list and
//! the ids of opened notifications.

#[cfg(feature = "storage-file")]
mod file;
mod memory;

#[cfg(feature = "storage-file")]
pub use file::FileStorage;
pub use memory::InMemoryStorage;

/// Generates a storage trait (async or blocking) with all record methods.
///
/// Uses `@methods` to define the method list once, and `@method` to render
/// each method in async (`impl Future + Send`) or blocking (`fn`) style.
macro_rules! define_storage {
    // ── Entry points ────────────────────────────────────────────────
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: async_mode,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_storage!(@methods async_mode);
        }
    };
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: blocking,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_storage!(@methods blocking);
        }
    };

    // ── Single method list (shared between both variants) ───────────
    (@methods $mode:ident) => {
        // Position
        define_storage!(@method $mode, position,
            "Returns the last persisted device position.\n\nReturns `Ok(None)` if none was stored or the record is unreadable.\n\n# Errors\n\nReturns an error if the storage backend fails to read.",
            -> Result<Option<CachedPosition>>);
        define_storage!(@method $mode, set_position,
            "Persists the device position with its timestamp.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            position: CachedPosition, -> Result<()>);

        // Distance cache
        define_storage!(@method $mode, distance_cache,
            "Returns the persisted distance cache, fresh or not.\n\nReturns `Ok(None)` if none was stored or the record is unreadable.\n\n# Errors\n\nReturns an error if the storage backend fails to read.",
            -> Result<Option<DistanceCache>>);
        define_storage!(@method $mode, set_distance_cache,
            "Replaces the persisted distance cache.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            cache: DistanceCache, -> Result<()>);
        define_storage!(@method $mode, clear_distance_cache,
            "Drops the persisted distance cache.\n\n# Errors\n\nReturns an error if the storage backend fails to delete.",
            -> Result<()>);

        // Notifications
        define_storage!(@method $mode, notifications,
            "Returns the persisted notification list.\n\n# Errors\n\nReturns an error if the storage backend fails to read.",
            -> Result<Vec<Notification>>);
        define_storage!(@method $mode, set_notifications,
            "Replaces the persisted notification list.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            items: Vec<Notification>, -> Result<()>);
        define_storage!(@method $mode, read_notification_ids,
            "Returns the ids of notifications the user opened.\n\n# Errors\n\nReturns an error if the storage backend fails to read.",
            -> Result<Vec<OrderId>>);
        define_storage!(@method $mode, set_read_notification_ids,
            "Replaces the ids of opened notifications.\n\n# Errors\n\nReturns an error if the storage backend fails to write.",
            ids: Vec<OrderId>, -> Result<()>);

        // Clear
        define_storage!(@method $mode, clear,
            "Deletes every stored record.\n\n# Errors\n\nReturns an error if the storage backend fails to delete.",
            -> Result<()>);
    };

    // ── Blocking method renderer ────────────────────────────────────
    (@method blocking, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*) -> $ret;
    };

    // ── Async method renderer (returns impl Future + Send) ──────────
    (@method async_mode, $name:ident, $doc:expr,
     $($param:ident: $param_ty:ty,)* -> $ret:ty) => {
        #[doc = $doc]
        fn $name(&self $(, $param: $param_ty)*)
            -> impl core::future::Future<Output = $ret> + Send;
    };
}

#[cfg(feature = "async")]
mod async_storage {
    //! Async storage trait definition.

    use crate::cache::{CachedPosition, DistanceCache};
    use crate::error::Result;
    use crate::models::{Notification, OrderId};

    define_storage! {
        trait_name: Storage,
        trait_doc: "Async storage backend for persisted client state.\n\nAll methods take `&self`; implementations use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: async_mode,
    }
}

#[cfg(feature = "blocking")]
mod blocking_storage {
    //! Blocking storage trait definition.

    use crate::cache::{CachedPosition, DistanceCache};
    use crate::error::Result;
    use crate::models::{Notification, OrderId};

    define_storage! {
        trait_name: BlockingStorage,
        trait_doc: "Blocking storage backend for persisted client state.\n\nAll methods take `&self`; implementations use interior mutability\n(e.g. `Mutex`) for thread-safe mutation.",
        mode: blocking,
    }
}

#[cfg(feature = "async")]
pub use async_storage::Storage;
#[cfg(feature = "blocking")]
pub use blocking_storage::BlockingStorage;
