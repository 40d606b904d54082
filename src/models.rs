//! Data models for PrintHub backend and third-party service payloads.
//!
//! This module contains strongly-typed representations of shops, orders,
//! routing responses, upload responses and local notifications, newtype
//! ID wrappers, and enumeration types for constrained values.

mod enums;
mod ids;
mod notification;
mod order;
mod route;
mod shop;
mod upload;

pub use chrono::{NaiveDate, NaiveTime};
pub use enums::{ColorMode, OrderStatus, PaperSize};
pub use ids::{OrderId, ShopId, UserId};
pub use notification::Notification;
pub use order::{NewOrder, Order, OrderFile, StatusUpdate};
pub use route::{
    DirectionsOptions, Distance, Leg, Location, Maneuver, Route, RouteRequest, RouteResponse,
    Summary, Trip,
};
pub use shop::Shop;
pub use upload::{UploadResponse, UploadedFile};
