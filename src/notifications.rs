//! Order notifications, read state and order-history filtering.
//!
//! Notifications live for 24 hours. [`NotificationCenter`] prunes expired
//! entries whenever it is loaded or mutated; callers persist
//! [`NotificationCenter::items`] and [`NotificationCenter::read_ids`]
//! after every mutation.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::models::{Notification, Order, OrderFile, OrderId, Shop};

/// Hours a notification stays listed.
pub const NOTIFICATION_TTL_HOURS: i64 = 24;

/// Seconds a new notification is surfaced as a toast.
pub const TOAST_SECONDS: i64 = 3;

/// In-memory notification list with read tracking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationCenter {
    /// Notifications, newest first.
    items: Vec<Notification>,
    /// Ids of notifications the user opened.
    read: HashSet<OrderId>,
}

impl NotificationCenter {
    /// Builds a center from persisted state, dropping expired entries and
    /// read ids that no longer refer to a listed notification.
    #[must_use]
    pub fn load(items: Vec<Notification>, read: Vec<OrderId>, now: DateTime<Utc>) -> Self {
        let mut center = Self {
            items,
            read: read.into_iter().collect(),
        };
        center.items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let _pruned = center.prune(now);
        center
    }

    /// Removes notifications older than 24 hours.
    ///
    /// Returns the number of entries removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - TimeDelta::hours(NOTIFICATION_TTL_HOURS);
        let before = self.items.len();
        self.items.retain(|item| item.created_at > cutoff);
        let items = &self.items;
        self.read.retain(|id| items.iter().any(|item| &item.id == id));
        let removed = before - self.items.len();
        if removed > 0 {
            tracing::debug!(removed, "pruned expired notifications");
        }
        removed
    }

    /// Adds a notification at the front of the list.
    ///
    /// An existing notification for the same order is replaced.
    pub fn push(&mut self, notification: Notification, now: DateTime<Utc>) {
        self.items.retain(|item| item.id != notification.id);
        self.items.insert(0, notification);
        let _removed = self.prune(now);
    }

    /// Marks a notification as read. Returns `false` if it is not listed.
    pub fn mark_read(&mut self, id: &OrderId, now: DateTime<Utc>) -> bool {
        let _removed = self.prune(now);
        if self.items.iter().any(|item| &item.id == id) {
            let _new = self.read.insert(id.clone());
            true
        } else {
            false
        }
    }

    /// Returns `true` if the notification was opened.
    #[inline]
    #[must_use]
    pub fn is_read(&self, id: &OrderId) -> bool {
        self.read.contains(id)
    }

    /// Number of listed notifications not yet opened.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| !self.read.contains(&item.id))
            .count()
    }

    /// Returns the newest notification if it was created less than three
    /// seconds before `now`.
    #[must_use]
    pub fn toast(&self, now: DateTime<Utc>) -> Option<&Notification> {
        self.items.first().filter(|item| {
            let age = now - item.created_at;
            age >= TimeDelta::zero() && age < TimeDelta::seconds(TOAST_SECONDS)
        })
    }

    /// Notifications, newest first.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    /// Read ids in a stable order for persistence.
    #[must_use]
    pub fn read_ids(&self) -> Vec<OrderId> {
        let mut ids: Vec<OrderId> = self.read.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Drops every notification and read mark.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
        self.read.clear();
    }
}

/// Filter over past orders.
///
/// Empty criteria match everything. Dates and shop names compare against
/// the notification recorded at submission; file names match on a
/// case-insensitive substring of the fetched order's files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    /// Pickup date to match.
    pub date: Option<NaiveDate>,
    /// Exact shop name to match.
    pub shop_name: Option<String>,
    /// Substring of any file name.
    pub file_name: Option<String>,
}

impl HistoryFilter {
    /// Tests one history entry against the filter.
    #[must_use]
    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        if let Some(date) = self.date
            && entry.notification.date != Some(date)
        {
            return false;
        }
        if let Some(name) = self.shop_name.as_deref()
            && !name.is_empty()
            && entry.notification.shop_name != name
        {
            return false;
        }
        match self.file_name.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let lowered = needle.to_lowercase();
                entry
                    .files()
                    .iter()
                    .any(|file| file.name.to_lowercase().contains(&lowered))
            }
            _ => true,
        }
    }

    /// Keeps the entries that match.
    #[must_use]
    pub fn apply(&self, entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
        entries.into_iter().filter(|entry| self.matches(entry)).collect()
    }
}

/// An order this client placed, as recorded in its notification.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Notification written when the order was submitted.
    pub notification: Notification,
    /// Order detail, when it could be fetched.
    pub order: Option<Order>,
}

impl HistoryEntry {
    /// Pairs a notification with its fetched order.
    #[inline]
    #[must_use]
    pub const fn new(notification: Notification, order: Option<Order>) -> Self {
        Self { notification, order }
    }

    /// Files of the order; empty when the detail is missing.
    #[must_use]
    pub fn files(&self) -> &[OrderFile] {
        self.order.as_ref().map_or(&[], |order| order.files.as_slice())
    }
}

/// An order with its shop, as shown after opening a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// The order.
    pub order: Order,
    /// The shop printing it.
    pub shop: Shop,
}

impl Receipt {
    /// Total number of printed copies across all files.
    #[must_use]
    pub fn copies(&self) -> u32 {
        self.order.files.iter().map(|file| file.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;
    use crate::models::{ColorMode, OrderFile, OrderStatus, PaperSize, ShopId};

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_750_000_000 + seconds, 0).unwrap()
    }

    fn note(id: &str, created: DateTime<Utc>) -> Notification {
        Notification {
            id: OrderId::from(id),
            shop_name: format!("Shop {id}"),
            created_at: created,
            date: None,
        }
    }

    fn order(id: &str, date: (i32, u32, u32), files: &[&str]) -> Order {
        Order {
            id: OrderId::from(id),
            shop_id: ShopId::from("1"),
            user_id: None,
            files: files
                .iter()
                .map(|name| OrderFile {
                    name: (*name).to_owned(),
                    url: String::new(),
                    quantity: 1,
                    size: PaperSize::A4,
                    format: ColorMode::Color,
                    pages: 1,
                    price: 1000,
                })
                .collect(),
            pickup_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            pickup_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            note: String::new(),
            total_amount: 1000,
            status: OrderStatus::Pending,
            created_at: None,
            shop: None,
        }
    }

    #[test]
    fn load_prunes_entries_older_than_a_day() {
        let now = at(100_000);
        let center = NotificationCenter::load(
            vec![note("old", at(0)), note("new", at(99_000))],
            vec![OrderId::from("old")],
            now,
        );
        assert_eq!(center.items().len(), 1);
        assert_eq!(center.items()[0].id, OrderId::from("new"));
        assert!(center.read_ids().is_empty());
    }

    #[test]
    fn items_are_newest_first() {
        let center = NotificationCenter::load(
            vec![note("a", at(10)), note("b", at(20))],
            Vec::new(),
            at(30),
        );
        assert_eq!(center.items()[0].id, OrderId::from("b"));
    }

    #[test]
    fn unread_count_tracks_read_marks() {
        let mut center = NotificationCenter::default();
        center.push(note("1", at(0)), at(0));
        center.push(note("2", at(1)), at(1));
        assert_eq!(center.unread_count(), 2);
        assert!(center.mark_read(&OrderId::from("1"), at(2)));
        assert!(!center.mark_read(&OrderId::from("missing"), at(2)));
        assert_eq!(center.unread_count(), 1);
        assert!(center.is_read(&OrderId::from("1")));
        assert_eq!(center.read_ids(), vec![OrderId::from("1")]);
    }

    #[test]
    fn push_replaces_same_order() {
        let mut center = NotificationCenter::default();
        center.push(note("1", at(0)), at(0));
        center.push(note("1", at(5)), at(5));
        assert_eq!(center.items().len(), 1);
        assert_eq!(center.items()[0].created_at, at(5));
    }

    #[test]
    fn toast_shows_for_three_seconds() {
        let mut center = NotificationCenter::default();
        center.push(note("1", at(0)), at(0));
        assert!(center.toast(at(2)).is_some());
        assert!(center.toast(at(3)).is_none());
    }

    fn entry(id: &str, shop: &str, date: (i32, u32, u32), files: Option<&[&str]>) -> HistoryEntry {
        let pickup = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        let notification = Notification {
            id: OrderId::from(id),
            shop_name: shop.to_owned(),
            created_at: at(0),
            date: Some(pickup),
        };
        HistoryEntry::new(notification, files.map(|names| order(id, date, names)))
    }

    #[test]
    fn history_filter_by_date_shop_and_file() {
        let entries = vec![
            entry("1", "In Nhanh", (2025, 6, 1), Some(&["Thesis.PDF"])),
            entry("2", "Copy 24h", (2025, 6, 2), Some(&["photo.png"])),
        ];

        let by_file = HistoryFilter {
            file_name: Some("thesis".to_owned()),
            ..HistoryFilter::default()
        };
        let found = by_file.apply(entries.clone());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].notification.id, OrderId::from("1"));

        let by_shop = HistoryFilter {
            shop_name: Some("Copy 24h".to_owned()),
            ..HistoryFilter::default()
        };
        assert_eq!(by_shop.apply(entries.clone())[0].notification.id, OrderId::from("2"));

        let by_date = HistoryFilter {
            date: NaiveDate::from_ymd_opt(2025, 6, 2),
            ..HistoryFilter::default()
        };
        let dated = by_date.apply(entries.clone());
        assert_eq!(dated.len(), 1);
        assert_eq!(dated[0].notification.id, OrderId::from("2"));

        let no_date = HistoryFilter {
            date: NaiveDate::from_ymd_opt(2025, 6, 3),
            ..HistoryFilter::default()
        };
        assert!(no_date.apply(entries.clone()).is_empty());

        assert_eq!(HistoryFilter::default().apply(entries).len(), 2);
    }

    #[test]
    fn date_filter_uses_notification_date() {
        let mut undated = entry("1", "In Nhanh", (2025, 6, 1), Some(&[]));
        undated.notification.date = None;
        let filter = HistoryFilter {
            date: NaiveDate::from_ymd_opt(2025, 6, 1),
            ..HistoryFilter::default()
        };
        assert!(!filter.matches(&undated));
    }

    #[test]
    fn file_filter_excludes_orders_without_detail() {
        let missing = entry("1", "In Nhanh", (2025, 6, 1), None);
        assert!(missing.files().is_empty());
        let filter = HistoryFilter {
            file_name: Some("a".to_owned()),
            ..HistoryFilter::default()
        };
        assert!(!filter.matches(&missing));
        assert!(HistoryFilter::default().matches(&missing));
    }
}
