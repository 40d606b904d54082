//! File storage upload response.

use serde::{Deserialize, Serialize};

/// Response of the file storage upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// HTTPS URL of the hosted file.
    pub secure_url: String,
    /// Storage-side identifier.
    #[serde(default)]
    pub public_id: String,
    /// File name as uploaded, without extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    /// Display name chosen by the storage service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Stored size in bytes.
    #[serde(default)]
    pub bytes: u64,
}

/// A file hosted in file storage, ready to reference from an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Hosted URL.
    pub url: String,
    /// Display name.
    pub name: String,
}

impl UploadResponse {
    /// Converts the response into an [`UploadedFile`], naming it
    /// `fallback_name` when the service did not report a display name.
    #[inline]
    #[must_use]
    pub fn into_uploaded(self, fallback_name: &str) -> UploadedFile {
        let name = self
            .display_name
            .or(self.original_filename)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| fallback_name.to_owned());
        UploadedFile {
            url: self.secure_url,
            name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_preferred() {
        let resp: UploadResponse = serde_json::from_str(
            r#"{"secure_url": "https://x/a.pdf", "display_name": "a", "original_filename": "orig"}"#,
        )
        .unwrap();
        let file = resp.into_uploaded("a.pdf");
        assert_eq!(file.name, "a");
        assert_eq!(file.url, "https://x/a.pdf");
    }

    #[test]
    fn fallback_name_used_when_missing() {
        let resp: UploadResponse =
            serde_json::from_str(r#"{"secure_url": "https://x/b.pdf"}"#).unwrap();
        assert_eq!(resp.into_uploaded("b.pdf").name, "b.pdf");
    }
}
