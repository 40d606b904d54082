//! Search, sort and pagination of the shop list.
//!
//! [`ShopListing`] is pure view state: it owns the fetched shops, the
//! latest known distances and the user's search/filter/page selection,
//! and recomputes the visible list whenever any of them changes.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;
use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization as _;
use unicode_normalization::char::is_combining_mark;

use crate::models::{Distance, Shop, ShopId};

/// Number of shops shown per page.
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Active sort/filter chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShopFilter {
    /// "Tất cả": keep fetch order.
    #[default]
    All,
    /// "Gần đây": nearest first, unknown distances last.
    Nearby,
    /// "Đánh giá cao": best rated first, ties broken by distance.
    TopRated,
}

impl ShopFilter {
    /// All filters in display order.
    pub const ALL: [Self; 3] = [Self::All, Self::Nearby, Self::TopRated];

    /// Returns the label shown on the filter chip.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "Tất cả",
            Self::Nearby => "Gần đây",
            Self::TopRated => "Đánh giá cao",
        }
    }
}

impl fmt::Display for ShopFilter {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ShopFilter {
    type Err = String;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        match wanted.to_lowercase().as_str() {
            "all" => return Ok(Self::All),
            "nearby" | "near" => return Ok(Self::Nearby),
            "top-rated" | "top" | "rating" => return Ok(Self::TopRated),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|filter| filter.label() == wanted)
            .ok_or_else(|| format!("unknown filter: {s}"))
    }
}

/// Lowercases `text` and strips Vietnamese diacritics (`đ`/`Đ` become `d`).
#[must_use]
pub fn fold_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .map(|ch| match ch {
            'đ' | 'Đ' => 'd',
            other => other,
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns `true` if the shop's name or address matches the search term,
/// either literally (case-insensitive) or with diacritics folded away.
#[must_use]
pub fn matches_search(shop: &Shop, term: &str) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return true;
    }
    let lower = term.to_lowercase();
    let folded = fold_diacritics(term);
    [shop.name.as_str(), shop.address.as_str()]
        .into_iter()
        .any(|field| field.to_lowercase().contains(&lower) || fold_diacritics(field).contains(&folded))
}

/// A shop together with its latest known distance.
#[derive(Debug, Clone, PartialEq)]
pub struct ListedShop {
    /// The shop record.
    pub shop: Shop,
    /// Latest resolved distance, if any.
    pub distance: Option<Distance>,
}

/// Sort key for distances; unknown distances sort last.
fn distance_key(distance: Option<Distance>) -> f64 {
    distance.map_or(f64::INFINITY, |d| d.distance_km)
}

/// Orders two listed shops by distance, nearest first.
fn by_distance(a: &ListedShop, b: &ListedShop) -> Ordering {
    distance_key(a.distance).total_cmp(&distance_key(b.distance))
}

/// Filters and sorts shops for display.
#[must_use]
pub fn derive_listing(
    shops: &[Shop],
    search: &str,
    filter: ShopFilter,
    distances: &HashMap<ShopId, Distance>,
) -> Vec<ListedShop> {
    let mut listed: Vec<ListedShop> = shops
        .iter()
        .filter(|shop| matches_search(shop, search))
        .map(|shop| ListedShop {
            shop: shop.clone(),
            distance: distances.get(&shop.id).copied(),
        })
        .collect();
    match filter {
        ShopFilter::All => {}
        ShopFilter::Nearby => listed.sort_by(by_distance),
        ShopFilter::TopRated => listed.sort_by(|a, b| {
            b.shop
                .rating
                .total_cmp(&a.shop.rating)
                .then_with(|| by_distance(a, b))
        }),
    }
    listed
}

/// Page cursor over a list of known length.
///
/// Pages are 1-based. The current page always stays within
/// `1..=max(1, page_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Items per page.
    page_size: usize,
    /// Current 1-based page.
    current: usize,
    /// Number of items being paged.
    total: usize,
}

impl Pagination {
    /// Creates a cursor on page 1 with [`DEFAULT_PAGE_SIZE`].
    #[inline]
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            current: 1,
            total,
        }
    }

    /// Overrides the page size (minimum 1) and returns to page 1.
    #[inline]
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self.current = 1;
        self
    }

    /// Items per page.
    #[inline]
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages, `ceil(total / page_size)`.
    #[inline]
    #[must_use]
    pub const fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    /// Current 1-based page.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Whether page controls should be shown at all.
    #[inline]
    #[must_use]
    pub const fn controls_visible(&self) -> bool {
        self.page_count() > 1
    }

    /// Jumps to `page`, clamped to the valid range.
    #[inline]
    pub fn go_to(&mut self, page: usize) {
        self.current = page.clamp(1, self.page_count().max(1));
    }

    /// Moves to the next page, staying on the last one.
    #[inline]
    pub fn next(&mut self) {
        self.go_to(self.current.saturating_add(1));
    }

    /// Moves to the previous page, staying on the first one.
    #[inline]
    pub fn previous(&mut self) {
        self.go_to(self.current.saturating_sub(1));
    }

    /// Returns to page 1.
    #[inline]
    pub const fn reset(&mut self) {
        self.current = 1;
    }

    /// Updates the item count, clamping the current page.
    #[inline]
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.go_to(self.current);
    }

    /// Index range of the current page within the paged list.
    #[inline]
    #[must_use]
    pub fn range(&self) -> core::ops::Range<usize> {
        let start = self
            .current
            .saturating_sub(1)
            .saturating_mul(self.page_size)
            .min(self.total);
        let end = start.saturating_add(self.page_size).min(self.total);
        start..end
    }
}

/// View state of the shop list.
#[derive(Debug, Clone, PartialEq)]
pub struct ShopListing {
    /// Shops in fetch order.
    shops: Vec<Shop>,
    /// Latest known distances.
    distances: HashMap<ShopId, Distance>,
    /// Current search term.
    search: String,
    /// Active filter.
    filter: ShopFilter,
    /// Page cursor over `visible`.
    pagination: Pagination,
    /// Derived list: filtered and sorted.
    visible: Vec<ListedShop>,
}

impl ShopListing {
    /// Creates a listing over `shops` with no search, no filter and no
    /// known distances.
    #[must_use]
    pub fn new(shops: Vec<Shop>) -> Self {
        let mut listing = Self {
            shops,
            distances: HashMap::new(),
            search: String::new(),
            filter: ShopFilter::All,
            pagination: Pagination::new(0),
            visible: Vec::new(),
        };
        listing.recompute();
        listing
    }

    /// Overrides the page size.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.pagination = self.pagination.with_page_size(page_size);
        self
    }

    /// Replaces the shop list, keeping the current page when possible.
    pub fn set_shops(&mut self, shops: Vec<Shop>) {
        self.shops = shops;
        self.recompute();
    }

    /// Sets the search term and returns to page 1.
    pub fn set_search<T: Into<String>>(&mut self, search: T) {
        self.search = search.into();
        self.pagination.reset();
        self.recompute();
    }

    /// Sets the active filter and returns to page 1.
    pub fn set_filter(&mut self, filter: ShopFilter) {
        self.filter = filter;
        self.pagination.reset();
        self.recompute();
    }

    /// Merges newly resolved distances (last write wins).
    pub fn merge_distances<I>(&mut self, resolved: I)
    where
        I: IntoIterator<Item = (ShopId, Distance)>,
    {
        self.distances.extend(resolved);
        self.recompute();
    }

    /// Drops every known distance, e.g. after the user moved.
    pub fn clear_distances(&mut self) {
        self.distances.clear();
        self.recompute();
    }

    /// Jumps to a page (clamped).
    #[inline]
    pub fn go_to_page(&mut self, page: usize) {
        self.pagination.go_to(page);
    }

    /// Moves to the next page (clamped).
    #[inline]
    pub fn next_page(&mut self) {
        self.pagination.next();
    }

    /// Moves to the previous page (clamped).
    #[inline]
    pub fn previous_page(&mut self) {
        self.pagination.previous();
    }

    /// Current search term.
    #[inline]
    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Active filter.
    #[inline]
    #[must_use]
    pub const fn filter(&self) -> ShopFilter {
        self.filter
    }

    /// Page cursor.
    #[inline]
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Latest known distance of a shop.
    #[inline]
    #[must_use]
    pub fn distance(&self, id: &ShopId) -> Option<Distance> {
        self.distances.get(id).copied()
    }

    /// Shops in fetch order.
    #[inline]
    #[must_use]
    pub fn shops(&self) -> &[Shop] {
        &self.shops
    }

    /// Every shop matching the search, in display order.
    #[inline]
    #[must_use]
    pub fn results(&self) -> &[ListedShop] {
        &self.visible
    }

    /// Shops on the current page.
    #[inline]
    #[must_use]
    pub fn page_items(&self) -> &[ListedShop] {
        self.visible.get(self.pagination.range()).unwrap_or_default()
    }

    /// Recomputes the derived list after any input changed.
    fn recompute(&mut self) {
        self.visible = derive_listing(&self.shops, &self.search, self.filter, &self.distances);
        self.pagination.set_total(self.visible.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shop(id: &str, name: &str, address: &str, rating: f64) -> Shop {
        Shop {
            id: ShopId::from(id),
            name: name.to_owned(),
            address: address.to_owned(),
            latitude: 21.0,
            longitude: 105.8,
            rating,
            review_count: 0,
            image: None,
            phone: None,
            email: None,
            open_time: None,
        }
    }

    fn km(distance_km: f64) -> Distance {
        Distance {
            distance_km,
            minutes: 1,
        }
    }

    fn ids(listed: &[ListedShop]) -> Vec<&str> {
        listed.iter().map(|l| l.shop.id.as_inner()).collect()
    }

    #[test]
    fn fold_strips_vietnamese_marks() {
        assert_eq!(fold_diacritics("Hà Nội"), "ha noi");
        assert_eq!(fold_diacritics("Đống Đa"), "dong da");
        assert_eq!(fold_diacritics("Trường Đại học Bách khoa"), "truong dai hoc bach khoa");
    }

    #[test]
    fn search_matches_without_diacritics() {
        let s = shop("1", "In Ấn Hà Nội", "Số 1 Đại Cồ Việt", 4.0);
        assert!(matches_search(&s, "ha noi"));
        assert!(matches_search(&s, "Ha Noi"));
        assert!(matches_search(&s, "hà nội"));
        assert!(matches_search(&s, "dai co viet"));
        assert!(matches_search(&s, "  "));
        assert!(!matches_search(&s, "sai gon"));
    }

    #[test]
    fn default_filter_keeps_fetch_order() {
        let shops = vec![shop("b", "B", "", 1.0), shop("a", "A", "", 5.0)];
        let listed = derive_listing(&shops, "", ShopFilter::All, &HashMap::new());
        assert_eq!(ids(&listed), ["b", "a"]);
    }

    #[test]
    fn nearby_sorts_unknown_last() {
        let shops = vec![
            shop("1", "A", "", 4.0),
            shop("2", "B", "", 4.0),
            shop("3", "C", "", 4.0),
        ];
        let distances = HashMap::from([(ShopId::from("2"), km(0.4)), (ShopId::from("3"), km(1.2))]);
        let listed = derive_listing(&shops, "", ShopFilter::Nearby, &distances);
        assert_eq!(ids(&listed), ["2", "3", "1"]);
    }

    #[test]
    fn top_rated_breaks_ties_by_distance() {
        let shops = vec![
            shop("1", "A", "", 4.0),
            shop("2", "B", "", 4.8),
            shop("3", "C", "", 4.0),
            shop("4", "D", "", 3.5),
        ];
        let distances = HashMap::from([(ShopId::from("1"), km(2.0)), (ShopId::from("3"), km(0.5))]);
        let listed = derive_listing(&shops, "", ShopFilter::TopRated, &distances);
        assert_eq!(ids(&listed), ["2", "3", "1", "4"]);
        for pair in listed.windows(2) {
            assert!(pair[0].shop.rating >= pair[1].shop.rating);
            if (pair[0].shop.rating - pair[1].shop.rating).abs() < f64::EPSILON {
                assert!(distance_key(pair[0].distance) <= distance_key(pair[1].distance));
            }
        }
    }

    #[test]
    fn filter_parses_labels_and_aliases() {
        assert_eq!("Gần đây".parse::<ShopFilter>().unwrap(), ShopFilter::Nearby);
        assert_eq!("top-rated".parse::<ShopFilter>().unwrap(), ShopFilter::TopRated);
        assert_eq!("Tất cả".parse::<ShopFilter>().unwrap(), ShopFilter::All);
        assert!("Giá thấp".parse::<ShopFilter>().is_err());
    }

    #[test]
    fn pagination_nine_items() {
        let mut pages = Pagination::new(9);
        assert_eq!(pages.page_count(), 3);
        assert!(pages.controls_visible());
        pages.go_to(3);
        assert_eq!(pages.range().len(), 1);
        pages.next();
        assert_eq!(pages.current(), 3);
        pages.go_to(0);
        assert_eq!(pages.current(), 1);
        pages.previous();
        assert_eq!(pages.current(), 1);
    }

    #[test]
    fn pagination_hidden_for_single_page() {
        assert!(!Pagination::new(4).controls_visible());
        let mut empty = Pagination::new(0);
        assert_eq!(empty.page_count(), 0);
        empty.go_to(5);
        assert_eq!(empty.current(), 1);
        assert!(empty.range().is_empty());
    }

    #[test]
    fn listing_pages_nine_shops() {
        let shops = (1..=9).map(|i| shop(&i.to_string(), "S", "", 4.0)).collect();
        let mut listing = ShopListing::new(shops);
        assert_eq!(listing.pagination().page_count(), 3);
        listing.go_to_page(3);
        assert_eq!(listing.page_items().len(), 1);
        assert_eq!(listing.page_items()[0].shop.id, ShopId::from("9"));
    }

    #[test]
    fn changing_filter_or_search_resets_page() {
        let shops = (1..=9).map(|i| shop(&i.to_string(), "Hà Nội", "", 4.0)).collect();
        let mut listing = ShopListing::new(shops);
        listing.go_to_page(2);
        listing.set_filter(ShopFilter::Nearby);
        assert_eq!(listing.pagination().current(), 1);
        listing.go_to_page(3);
        listing.set_search("ha noi");
        assert_eq!(listing.pagination().current(), 1);
        assert_eq!(listing.results().len(), 9);
    }

    #[test]
    fn merging_distances_reorders_nearby() {
        let shops = vec![shop("1", "A", "", 4.0), shop("2", "B", "", 4.0)];
        let mut listing = ShopListing::new(shops);
        listing.set_filter(ShopFilter::Nearby);
        assert_eq!(ids(listing.results()), ["1", "2"]);
        listing.merge_distances([(ShopId::from("2"), km(0.1))]);
        assert_eq!(ids(listing.results()), ["2", "1"]);
        assert_eq!(listing.distance(&ShopId::from("2")), Some(km(0.1)));
        listing.clear_distances();
        assert_eq!(ids(listing.results()), ["1", "2"]);
    }

    #[test]
    fn shrinking_results_clamps_page() {
        let shops = (1..=9).map(|i| shop(&i.to_string(), &format!("Shop {i}"), "", 4.0)).collect();
        let mut listing = ShopListing::new(shops);
        listing.go_to_page(3);
        listing.set_shops(vec![shop("1", "A", "", 1.0)]);
        assert_eq!(listing.pagination().current(), 1);
        assert_eq!(listing.page_items().len(), 1);
    }
}
