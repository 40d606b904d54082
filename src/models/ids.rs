//! Newtype wrappers for entity identifiers.
//!
//! These prevent accidentally mixing up IDs of different entity types
//! at compile time. The backend is a JSON document store that may emit
//! identifiers either as strings or as integers, so every ID accepts both
//! on the wire and is normalized to a string.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Macro to define a newtype ID wrapping a `String` inner type.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from the given string.
            #[inline]
            #[must_use]
            pub const fn new(value: String) -> Self {
                Self(value)
            }

            /// Returns a reference to the inner string.
            #[inline]
            #[must_use]
            pub fn as_inner(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner string.
            #[inline]
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<String> for $name {
            #[inline]
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            #[inline]
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            #[inline]
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserializer.deserialize_any(LenientIdVisitor).map(Self)
            }
        }
    };
}

/// Accepts a JSON string or integer and yields its string form.
struct LenientIdVisitor;

impl Visitor<'_> for LenientIdVisitor {
    type Value = String;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a string or integer identifier")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(value.to_owned())
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(value)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(value.to_string())
    }
}

define_string_id! {
    /// Unique identifier for a print shop.
    ShopId
}

define_string_id! {
    /// Unique identifier for an order (also the notification ID).
    OrderId
}

define_string_id! {
    /// Unique identifier for a customer.
    UserId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_id_accepts_string() {
        let id: ShopId = serde_json::from_str(r#""shop-7""#).unwrap();
        assert_eq!(id.as_inner(), "shop-7");
    }

    #[test]
    fn string_id_accepts_integer() {
        let id: OrderId = serde_json::from_str("42").unwrap();
        assert_eq!(id, OrderId::from("42"));
    }

    #[test]
    fn string_id_rejects_other_types() {
        assert!(serde_json::from_str::<UserId>("true").is_err());
        assert!(serde_json::from_str::<UserId>("1.5").is_err());
    }

    #[test]
    fn string_id_serializes_as_string() {
        let json = serde_json::to_string(&ShopId::from("9")).unwrap();
        assert_eq!(json, r#""9""#);
    }

    #[test]
    fn string_id_as_map_key() {
        let mut map = std::collections::HashMap::new();
        let _old = map.insert(ShopId::from("1"), 2_u32);
        let json = serde_json::to_string(&map).unwrap();
        let back: std::collections::HashMap<ShopId, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get(&ShopId::from("1")), Some(&2));
    }

    #[test]
    fn display_shows_inner() {
        assert_eq!(OrderId::new("ord-1".to_owned()).to_string(), "ord-1");
    }
}
