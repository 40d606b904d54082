//! Order models exchanged with the backend.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ColorMode, OrderId, OrderStatus, PaperSize, Shop, ShopId, UserId};

/// Serde adapter storing pickup times as `HH:MM`.
mod pickup_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Wire format of pickup times.
    const FORMAT: &str = "%H:%M";

    /// Serializes a time as `HH:MM`.
    pub(super) fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    /// Accepts `HH:MM` or `HH:MM:SS`.
    pub(super) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// A printed file within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFile {
    /// Display name.
    pub name: String,
    /// Hosted file URL.
    #[serde(default)]
    pub url: String,
    /// Number of copies.
    pub quantity: u32,
    /// Paper size.
    pub size: PaperSize,
    /// Color mode.
    pub format: ColorMode,
    /// Estimated page count.
    #[serde(default)]
    pub pages: u32,
    /// Computed price in VND.
    #[serde(default)]
    pub price: u64,
}

/// Payload of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Shop receiving the order.
    pub shop_id: ShopId,
    /// Ordering customer, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Files to print.
    pub files: Vec<OrderFile>,
    /// Pickup date.
    #[serde(rename = "date")]
    pub pickup_date: NaiveDate,
    /// Pickup time.
    #[serde(rename = "time", with = "pickup_time")]
    pub pickup_time: NaiveTime,
    /// Free-form note for the shop.
    #[serde(default)]
    pub note: String,
    /// Sum of file prices in VND.
    pub total_amount: u64,
    /// Initial status.
    pub status: OrderStatus,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// An order as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Backend-assigned identifier.
    pub id: OrderId,
    /// Shop receiving the order.
    pub shop_id: ShopId,
    /// Ordering customer, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    /// Printed files.
    #[serde(default)]
    pub files: Vec<OrderFile>,
    /// Pickup date.
    #[serde(rename = "date")]
    pub pickup_date: NaiveDate,
    /// Pickup time.
    #[serde(rename = "time", with = "pickup_time")]
    pub pickup_time: NaiveTime,
    /// Free-form note for the shop.
    #[serde(default)]
    pub note: String,
    /// Sum of file prices in VND.
    #[serde(default)]
    pub total_amount: u64,
    /// Processing state.
    #[serde(default)]
    pub status: OrderStatus,
    /// Submission time, when the backend keeps it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Expanded shop record (`?_expand=shop`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop: Option<Shop>,
}

/// Body of `PUT /orders/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// New status.
    pub status: OrderStatus,
}
