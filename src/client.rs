//! HTTP clients for the PrintHub backend and the third-party services it
//! relies on.
//!
//! Three clients are provided, each in async and blocking variants behind
//! feature flags:
//!
//! - [`ApiClient`] talks to the REST backend (shops and orders).
//! - [`RoutingClient`] asks the pedestrian routing service for walking
//!   distances and routes.
//! - [`UploadClient`] uploads order files to Cloudinary.

/// Base URL of the PrintHub REST backend.
pub const DEFAULT_API_URL: &str = "https://itss-2-be-sigma.vercel.app";

/// Base URL of the pedestrian routing service.
pub const DEFAULT_ROUTING_URL: &str = "https://valhalla1.openstreetmap.de";

/// Default bound on a single routing request.
pub const DEFAULT_ROUTE_TIMEOUT: core::time::Duration = core::time::Duration::from_secs(2);

/// Base URL of the file-upload service.
pub const DEFAULT_UPLOAD_URL: &str = "https://api.cloudinary.com";

/// Cloudinary cloud receiving uploads.
pub const DEFAULT_CLOUD_NAME: &str = "dhmbivnr2";

/// Unsigned upload preset.
pub const DEFAULT_UPLOAD_PRESET: &str = "ml_default";

/// Checks a response's status and deserializes its JSON body.
///
/// Non-success statuses become [`crate::error::PrintHubError::Api`] carrying
/// the response text.
macro_rules! parse_response {
    ($response:expr $(, $await_ext:tt)?) => {{
        let response = $response;
        let status = response.status();
        tracing::debug!(status = %status, "received response");
        if status.is_success() {
            let body = response.text() $( .$await_ext )? ?;
            tracing::trace!(body_len = body.len(), "parsing response body");
            serde_json::from_str(&body).map_err(PrintHubError::from)
        } else {
            let message = response
                .text()
                $( .$await_ext )?
                .unwrap_or_else(|_| "unknown error".to_owned());
            tracing::debug!(status = status.as_u16(), message = %message, "API error");
            Err(PrintHubError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }};
}

mod api;
mod routing;
mod upload;

#[cfg(feature = "async")]
pub use api::{ApiClient, ApiClientBuilder};
#[cfg(feature = "blocking")]
pub use api::{ApiBlockingClient, ApiBlockingClientBuilder};
#[cfg(feature = "async")]
pub use routing::{RoutingClient, RoutingClientBuilder};
#[cfg(feature = "blocking")]
pub use routing::{RoutingBlockingClient, RoutingBlockingClientBuilder};
#[cfg(feature = "async")]
pub use upload::{UploadClient, UploadClientBuilder};
#[cfg(feature = "blocking")]
pub use upload::{UploadBlockingClient, UploadBlockingClientBuilder};
