//! Client for the pedestrian routing service.

/// Route endpoint path.
const ROUTE_PATH: &str = "/route";

/// Generates a routing client (async or blocking) with builder, methods, and tests.
macro_rules! define_routing_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Base URL override (for testing or a self-hosted instance).
            base_url: Option<String>,
            /// Per-request timeout.
            timeout: Duration,
        }

        impl $builder {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Bounds each routing request; a timed-out request fails with
            /// [`PrintHubError::Http`].
            #[inline]
            #[must_use]
            pub const fn timeout(mut self, timeout: Duration) -> Self {
                self.timeout = timeout;
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`PrintHubError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let base_url = self
                    .base_url
                    .unwrap_or_else(|| DEFAULT_ROUTING_URL.to_owned())
                    .trim_end_matches('/')
                    .to_owned();
                tracing::debug!(base_url = %base_url, "building routing client");
                let http = <$http_type>::builder().timeout(self.timeout).build()?;
                Ok($client { http, base_url })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug, Clone)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Routing service base URL.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder {
                    base_url: None,
                    timeout: DEFAULT_ROUTE_TIMEOUT,
                }
            }

            /// Returns the configured base URL.
            #[inline]
            #[must_use]
            pub fn base_url(&self) -> &str {
                &self.base_url
            }

            /// Computes the walking distance and display time between two
            /// points.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, the response cannot be deserialized, or it
            /// carries no usable summary ([`PrintHubError::NoRoute`]).
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn distance(
                &self,
                origin: Coordinates,
                destination: Coordinates,
            ) -> Result<Distance> {
                let response = self.request_route(origin, destination) $( .$await_ext )? ?;
                response
                    .summary()
                    .and_then(Distance::from_summary)
                    .ok_or(PrintHubError::NoRoute)
            }

            /// Fetches the full walking route between two points, with decoded
            /// geometry and turn-by-turn instructions.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, the response cannot be deserialized, or the
            /// geometry is malformed.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn route(
                &self,
                origin: Coordinates,
                destination: Coordinates,
            ) -> Result<Route> {
                let response = self.request_route(origin, destination) $( .$await_ext )? ?;
                Route::try_from(response)
            }

            /// Posts a pedestrian route request.
            $($async_kw)? fn request_route(
                &self,
                origin: Coordinates,
                destination: Coordinates,
            ) -> Result<RouteResponse> {
                let url = format!("{}{ROUTE_PATH}", self.base_url);
                let request = RouteRequest::pedestrian(origin, destination);
                tracing::trace!(url = %url, "sending route request");
                let response: $resp_type = self
                    .http
                    .post(&url)
                    .header(CONTENT_TYPE, "application/json")
                    .json(&request)
                    .send()
                    $( .$await_ext )?
                    ?;
                parse_response!(response $(, $await_ext)?)
            }
        }

    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async routing client.

    use reqwest::header::CONTENT_TYPE;

    use core::time::Duration;

    use super::ROUTE_PATH;
    use crate::client::{DEFAULT_ROUTE_TIMEOUT, DEFAULT_ROUTING_URL};
    use crate::error::{PrintHubError, Result};
    use crate::geo::Coordinates;
    use crate::models::{Distance, Route, RouteRequest, RouteResponse};

    define_routing_client! {
        client_name: RoutingClient,
        builder_name: RoutingClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        client_doc: "Async client for the pedestrian routing service.\n\nCheap to clone; clones share one connection pool.",
        builder_doc: "Builder for constructing a [`RoutingClient`].",
        async_kw: async,
        await_kw: await,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) routing client.

    use reqwest::header::CONTENT_TYPE;

    use core::time::Duration;

    use super::ROUTE_PATH;
    use crate::client::{DEFAULT_ROUTE_TIMEOUT, DEFAULT_ROUTING_URL};
    use crate::error::{PrintHubError, Result};
    use crate::geo::Coordinates;
    use crate::models::{Distance, Route, RouteRequest, RouteResponse};

    define_routing_client! {
        client_name: RoutingBlockingClient,
        builder_name: RoutingBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the pedestrian routing service.\n\nCheap to clone; clones share one connection pool.",
        builder_doc: "Builder for constructing a [`RoutingBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{RoutingClient, RoutingClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{RoutingBlockingClient, RoutingBlockingClientBuilder};
