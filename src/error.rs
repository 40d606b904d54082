//! Error types for the PrintHub client library.

use crate::order::OrderErrors;

/// All errors that can occur when using the PrintHub client.
#[derive(Debug, thiserror::Error)]
pub enum PrintHubError {
    /// The underlying HTTP request failed.
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A service answered with a non-success status code.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or a placeholder when it could not be read.
        message: String,
    },

    /// JSON serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage backend failed.
    #[error("storage error: {0}")]
    Storage(Box<dyn core::error::Error + Send + Sync>),

    /// An encoded route polyline could not be decoded.
    #[error("invalid polyline: {0}")]
    Polyline(String),

    /// The routing service answered without any route leg.
    #[error("routing service returned no route")]
    NoRoute,

    /// A file could not be uploaded to file storage.
    #[error("upload failed: {0}")]
    Upload(String),

    /// An order draft failed validation or submission.
    #[error("order rejected: {0}")]
    InvalidOrder(OrderErrors),

    /// A document could not be parsed for page counting.
    #[error("document error: {0}")]
    Document(String),

    /// The position source failed or timed out.
    #[error("position unavailable: {0}")]
    Locate(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, PrintHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_from_serde_json() {
        let serde_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err = PrintHubError::from(serde_err);
        assert!(matches!(err, PrintHubError::Serialization(_)));
        assert!(err.to_string().contains("serialization error"));
    }

    #[test]
    fn error_storage_display() {
        let inner = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = PrintHubError::Storage(Box::new(inner));
        let msg = err.to_string();
        assert!(msg.contains("storage error"));
        assert!(msg.contains("file missing"));
    }

    #[test]
    fn error_api_display() {
        let err = PrintHubError::Api {
            status: 404,
            message: "not found".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("not found"));
    }

    #[test]
    fn error_invalid_order_lists_fields() {
        let errors = OrderErrors {
            files: Some("Vui lòng chọn ít nhất 1 file.".to_owned()),
            ..OrderErrors::default()
        };
        let err = PrintHubError::InvalidOrder(errors);
        assert!(err.to_string().contains("files"));
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PrintHubError>();
    }
}
