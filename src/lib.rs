//! Rust client library for the `PrintHub` print-shop marketplace.
//!
//! `PrintHub` lists local print shops, ranks them by walking distance from
//! the customer and takes print orders with uploaded files. This crate
//! provides:
//!
//! - typed clients for the marketplace backend, the pedestrian routing
//!   service and the file-upload service ([`client`]);
//! - shop search, filtering and pagination ([`shop_list`]);
//! - page estimation and pricing of print files ([`pricing`], [`order`]);
//! - order notifications and history filtering ([`notifications`]);
//! - a high-level facade tying them to local storage ([`print_hub`]).
//!
//! # Features
//!
//! - `async` (default): tokio-based clients and the [`PrintHub`] facade.
//! - `blocking`: synchronous clients and the [`PrintHubBlocking`] facade.
//! - `storage-file` (default): JSON file storage in the user's data dir.
//! - `cli` (default): the `printhub` command-line tool.

pub mod cache;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod client;
pub mod distance;
pub mod error;
pub mod geo;
pub mod models;
pub mod notifications;
pub mod order;
pub mod pricing;
#[cfg(any(feature = "async", feature = "blocking"))]
pub mod print_hub;
pub mod shop_list;
pub mod storage;

pub use error::{PrintHubError, Result};
#[cfg(feature = "async")]
pub use print_hub::{PrintHub, PrintHubBuilder};
#[cfg(feature = "blocking")]
pub use print_hub::{PrintHubBlocking, PrintHubBlockingBuilder};
