//! Print shop model.

use serde::{Deserialize, Serialize};

use super::ShopId;
use crate::geo::Coordinates;

/// A print-service storefront as listed by the backend.
///
/// Shops are read-only from the client's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    /// Unique identifier.
    pub id: ShopId,
    /// Display name.
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Latitude in degrees.
    #[serde(alias = "lat")]
    pub latitude: f64,
    /// Longitude in degrees.
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
    /// Average rating, 0 to 5.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews behind the rating.
    #[serde(default)]
    pub review_count: u32,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Free-form opening hours.
    #[serde(default, alias = "openHours", skip_serializing_if = "Option::is_none")]
    pub open_time: Option<String>,
}

impl Shop {
    /// Returns the shop's location.
    #[inline]
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_shop() {
        let json = r#"{
            "id": 3,
            "name": "In Nhanh Bách Khoa",
            "address": "1 Đại Cồ Việt, Hai Bà Trưng, Hà Nội",
            "latitude": 21.0056,
            "longitude": 105.8433,
            "rating": 4.5,
            "reviewCount": 120,
            "image": "https://example.com/shop.jpg",
            "phone": "0909123456",
            "email": "shop@example.com",
            "openTime": "07:00 - 21:00"
        }"#;
        let shop: Shop = serde_json::from_str(json).unwrap();
        assert_eq!(shop.id, ShopId::from("3"));
        assert_eq!(shop.review_count, 120);
        assert_eq!(shop.open_time.as_deref(), Some("07:00 - 21:00"));
        assert_eq!(shop.coordinates(), Coordinates::new(21.0056, 105.8433));
    }

    #[test]
    fn deserialize_minimal_shop_with_short_coordinates() {
        let json = r#"{"id": "s1", "name": "Copy", "lat": 21.0, "lng": 105.0}"#;
        let shop: Shop = serde_json::from_str(json).unwrap();
        assert!(shop.address.is_empty());
        assert!(shop.rating.abs() < f64::EPSILON);
        assert!(shop.image.is_none());
        assert!((shop.longitude - 105.0).abs() < f64::EPSILON);
    }

    #[test]
    fn serialize_uses_camel_case() {
        let shop = Shop {
            id: ShopId::from("1"),
            name: "A".to_owned(),
            address: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            rating: 0.0,
            review_count: 2,
            image: None,
            phone: None,
            email: None,
            open_time: None,
        };
        let json = serde_json::to_string(&shop).unwrap();
        assert!(json.contains(r#""reviewCount":2"#));
        assert!(!json.contains("image"));
    }
}
