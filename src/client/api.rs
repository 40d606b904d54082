//! Client for the PrintHub REST backend.

/// Shops collection path.
const SHOPS_PATH: &str = "/shops";

/// Orders collection path.
const ORDERS_PATH: &str = "/orders";

/// Generates a backend client (async or blocking) with builder, methods, and tests.
macro_rules! define_api_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
        $(send_bound: $send_bound:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Base URL override (for testing or another deployment).
            base_url: Option<String>,
        }

        impl $builder {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
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
                    .unwrap_or_else(|| DEFAULT_API_URL.to_owned())
                    .trim_end_matches('/')
                    .to_owned();
                tracing::debug!(base_url = %base_url, "building backend client");
                let http = <$http_type>::builder().build()?;
                Ok($client { http, base_url })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug, Clone)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Backend base URL.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder { base_url: None }
            }

            /// Returns the configured base URL.
            #[inline]
            #[must_use]
            pub fn base_url(&self) -> &str {
                &self.base_url
            }

            /// Lists all shops via `GET /shops`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn shops(&self) -> Result<Vec<Shop>> {
                self.get_json(SHOPS_PATH, &[]) $( .$await_ext )?
            }

            /// Searches shops on the server via `GET /shops?q=`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(query = %query))]
            pub $($async_kw)? fn search_shops(&self, query: &str) -> Result<Vec<Shop>> {
                self.get_json(SHOPS_PATH, &[("q", query)]) $( .$await_ext )?
            }

            /// Fetches one shop via `GET /shops/{id}`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(shop = %id))]
            pub $($async_kw)? fn shop(&self, id: &ShopId) -> Result<Shop> {
                self.get_json(&format!("{SHOPS_PATH}/{id}"), &[]) $( .$await_ext )?
            }

            /// Creates an order via `POST /orders`.
            ///
            /// Returns the stored order with its backend-assigned id.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(shop = %order.shop_id))]
            pub $($async_kw)? fn create_order(&self, order: &NewOrder) -> Result<Order> {
                tracing::debug!(files = order.files.len(), total = order.total_amount, "creating order");
                self.send_json(Method::POST, ORDERS_PATH, order) $( .$await_ext )?
            }

            /// Lists orders with their shops expanded via
            /// `GET /orders?_expand=shop`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn orders(&self) -> Result<Vec<Order>> {
                self.get_json(ORDERS_PATH, &[("_expand", "shop")]) $( .$await_ext )?
            }

            /// Fetches one order via `GET /orders/{id}`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(order = %id))]
            pub $($async_kw)? fn order(&self, id: &OrderId) -> Result<Order> {
                self.get_json(&format!("{ORDERS_PATH}/{id}"), &[]) $( .$await_ext )?
            }

            /// Sets an order's status via `PUT /orders/{id}`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all, fields(order = %id, status = ?status))]
            pub $($async_kw)? fn update_order_status(
                &self,
                id: &OrderId,
                status: OrderStatus,
            ) -> Result<Order> {
                let body = StatusUpdate { status };
                self.send_json(Method::PUT, &format!("{ORDERS_PATH}/{id}"), &body) $( .$await_ext )?
            }

            /// Sends a GET request and deserializes the JSON response.
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn get_json<Resp: serde::de::DeserializeOwned>(
                &self,
                path: &str,
                query: &[(&str, &str)],
            ) -> Result<Resp> {
                let url = format!("{}{path}", self.base_url);
                tracing::trace!(url = %url, "sending GET request");
                let mut request = self.http.get(&url);
                if !query.is_empty() {
                    request = request.query(query);
                }
                let response: $resp_type = request.send() $( .$await_ext )? ?;
                parse_response!(response $(, $await_ext)?)
            }

            /// Sends a JSON body with `method` and deserializes the response.
            #[tracing::instrument(skip_all, fields(path = %path, method = %method))]
            $($async_kw)? fn send_json<
                Req: serde::Serialize $(+ $send_bound)?,
                Resp: serde::de::DeserializeOwned,
            >(
                &self,
                method: Method,
                path: &str,
                request: &Req,
            ) -> Result<Resp> {
                let url = format!("{}{path}", self.base_url);
                tracing::trace!(url = %url, "sending JSON request");
                let response: $resp_type = self
                    .http
                    .request(method, &url)
                    .header(CONTENT_TYPE, "application/json")
                    .json(request)
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
    //! Async backend client.

    use reqwest::Method;
    use reqwest::header::CONTENT_TYPE;

    use super::{ORDERS_PATH, SHOPS_PATH};
    use crate::client::DEFAULT_API_URL;
    use crate::error::{PrintHubError, Result};
    use crate::models::{NewOrder, Order, OrderId, OrderStatus, Shop, ShopId, StatusUpdate};

    define_api_client! {
        client_name: ApiClient,
        builder_name: ApiClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        client_doc: "Async client for the PrintHub REST backend.\n\nUse [`ApiClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing an [`ApiClient`].",
        async_kw: async,
        await_kw: await,
        send_bound: Sync,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) backend client.

    use reqwest::Method;
    use reqwest::header::CONTENT_TYPE;

    use super::{ORDERS_PATH, SHOPS_PATH};
    use crate::client::DEFAULT_API_URL;
    use crate::error::{PrintHubError, Result};
    use crate::models::{NewOrder, Order, OrderId, OrderStatus, Shop, ShopId, StatusUpdate};

    define_api_client! {
        client_name: ApiBlockingClient,
        builder_name: ApiBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the PrintHub REST backend.\n\nUse [`ApiBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing an [`ApiBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{ApiClient, ApiClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{ApiBlockingClient, ApiBlockingClientBuilder};

#[cfg(all(test, feature = "async"))]
mod wire_tests {
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::ApiClient;
    use crate::error::PrintHubError;
    use crate::models::{OrderId, OrderStatus, ShopId};

    async fn client(server: &MockServer) -> ApiClient {
        ApiClient::builder().base_url(server.uri()).build().unwrap()
    }

    #[tokio::test]
    async fn shops_parses_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shops"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "In Nhanh", "latitude": 21.0, "longitude": 105.8, "rating": 4.5},
                {"id": "2", "name": "Copy 24h", "lat": 21.01, "lng": 105.81}
            ])))
            .mount(&server)
            .await;
        let shops = client(&server).await.shops().await.unwrap();
        assert_eq!(shops.len(), 2);
        assert_eq!(shops[0].id, ShopId::from("1"));
        assert!((shops[1].longitude - 105.81).abs() < 1e-9);
    }

    #[tokio::test]
    async fn search_sends_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shops"))
            .and(query_param("q", "in nhanh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;
        let shops = client(&server).await.search_shops("in nhanh").await.unwrap();
        assert!(shops.is_empty());
    }

    #[tokio::test]
    async fn error_status_maps_to_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shops/9"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;
        let err = client(&server)
            .await
            .shop(&ShopId::from("9"))
            .await
            .unwrap_err();
        assert!(matches!(err, PrintHubError::Api { status: 404, ref message } if message == "not found"));
    }

    #[tokio::test]
    async fn update_status_puts_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/orders/5"))
            .and(body_json(serde_json::json!({"status": "completed"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 5, "shopId": 1, "date": "2025-06-20", "time": "10:00", "status": "completed"
            })))
            .mount(&server)
            .await;
        let order = client(&server)
            .await
            .update_order_status(&OrderId::from("5"), OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
    }

    #[tokio::test]
    async fn orders_expand_shop() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orders"))
            .and(query_param("_expand", "shop"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "id": 5, "shopId": 1, "date": "2025-06-20", "time": "10:00",
                "shop": {"id": 1, "name": "In Nhanh", "latitude": 21.0, "longitude": 105.8}
            }])))
            .mount(&server)
            .await;
        let orders = client(&server).await.orders().await.unwrap();
        assert_eq!(orders[0].shop.as_ref().unwrap().name, "In Nhanh");
    }
}
