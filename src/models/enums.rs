//! Enumeration types for constrained API values.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Paper size offered by print shops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PaperSize {
    /// ISO A4 (the default).
    #[default]
    A4,
    /// ISO A5.
    A5,
    /// ISO A3.
    A3,
}

impl PaperSize {
    /// All sizes in display order.
    pub const ALL: [Self; 3] = [Self::A4, Self::A5, Self::A3];

    /// Returns the label shown to customers.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A5 => "A5",
            Self::A3 => "A3",
        }
    }
}

impl fmt::Display for PaperSize {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PaperSize {
    type Err = String;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown paper size: {s}"))
    }
}

/// Whether a file is printed in color or black and white.
///
/// Serialized with the Vietnamese labels the backend stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorMode {
    /// Full color ("Màu").
    #[default]
    #[serde(rename = "Màu")]
    Color,
    /// Black and white ("Đen trắng").
    #[serde(rename = "Đen trắng")]
    Monochrome,
}

impl ColorMode {
    /// Returns the label shown to customers.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Color => "Màu",
            Self::Monochrome => "Đen trắng",
        }
    }

    /// Price multiplier relative to monochrome.
    #[inline]
    #[must_use]
    pub const fn multiplier(self) -> u64 {
        match self {
            Self::Color => 2,
            Self::Monochrome => 1,
        }
    }
}

impl fmt::Display for ColorMode {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ColorMode {
    type Err = String;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "color" | "colour" | "màu" => Ok(Self::Color),
            "mono" | "monochrome" | "bw" | "đen trắng" => Ok(Self::Monochrome),
            other => Err(format!("unknown color mode: {other}")),
        }
    }
}

/// Processing state of an order, owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Received, not yet started.
    #[default]
    Pending,
    /// Being printed.
    Processing,
    /// Ready or picked up.
    Completed,
    /// Cancelled by the shop or customer.
    Cancelled,
    /// A state this client does not know about.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// Returns the label shown to customers.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Chờ xử lý",
            Self::Processing => "Đang in",
            Self::Completed => "Hoàn thành",
            Self::Cancelled => "Đã hủy",
            Self::Unknown => "Không rõ",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_size_serde_and_parse() {
        assert_eq!(serde_json::to_string(&PaperSize::A3).unwrap(), r#""A3""#);
        assert_eq!("a5".parse::<PaperSize>().unwrap(), PaperSize::A5);
        assert!("B4".parse::<PaperSize>().is_err());
    }

    #[test]
    fn color_mode_uses_vietnamese_labels() {
        assert_eq!(
            serde_json::to_string(&ColorMode::Monochrome).unwrap(),
            r#""Đen trắng""#
        );
        let mode: ColorMode = serde_json::from_str(r#""Màu""#).unwrap();
        assert_eq!(mode, ColorMode::Color);
    }

    #[test]
    fn color_mode_parses_aliases() {
        assert_eq!("bw".parse::<ColorMode>().unwrap(), ColorMode::Monochrome);
        assert_eq!("Color".parse::<ColorMode>().unwrap(), ColorMode::Color);
        assert_eq!(ColorMode::Color.multiplier(), 2);
    }

    #[test]
    fn order_status_tolerates_unknown() {
        let status: OrderStatus = serde_json::from_str(r#""shipped""#).unwrap();
        assert_eq!(status, OrderStatus::Unknown);
        let done: OrderStatus = serde_json::from_str(r#""completed""#).unwrap();
        assert_eq!(done, OrderStatus::Completed);
    }
}
