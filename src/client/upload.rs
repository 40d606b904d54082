//! Client for the Cloudinary file-upload service.

/// Generates an upload client (async or blocking) with builder, methods, and tests.
macro_rules! define_upload_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        form_type: $form_type:ty,
        part_type: $part_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Base URL override (for testing).
            base_url: Option<String>,
            /// Cloud name override.
            cloud_name: Option<String>,
            /// Upload preset override.
            upload_preset: Option<String>,
        }

        impl $builder {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Sets the cloud receiving uploads.
            #[inline]
            #[must_use]
            pub fn cloud_name<T: Into<String>>(mut self, name: T) -> Self {
                self.cloud_name = Some(name.into());
                self
            }

            /// Sets the unsigned upload preset.
            #[inline]
            #[must_use]
            pub fn upload_preset<T: Into<String>>(mut self, preset: T) -> Self {
                self.upload_preset = Some(preset.into());
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
                    .unwrap_or_else(|| DEFAULT_UPLOAD_URL.to_owned())
                    .trim_end_matches('/')
                    .to_owned();
                let cloud_name = self
                    .cloud_name
                    .unwrap_or_else(|| DEFAULT_CLOUD_NAME.to_owned());
                let upload_preset = self
                    .upload_preset
                    .unwrap_or_else(|| DEFAULT_UPLOAD_PRESET.to_owned());
                let upload_url = format!("{base_url}/v1_1/{cloud_name}/upload");
                tracing::debug!(upload_url = %upload_url, "building upload client");
                let http = <$http_type>::builder().build()?;
                Ok($client {
                    http,
                    upload_url,
                    upload_preset,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug, Clone)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Full upload endpoint URL.
            upload_url: String,
            /// Unsigned upload preset.
            upload_preset: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder {
                    base_url: None,
                    cloud_name: None,
                    upload_preset: None,
                }
            }

            /// Returns the upload endpoint URL.
            #[inline]
            #[must_use]
            pub fn upload_url(&self) -> &str {
                &self.upload_url
            }

            /// Uploads one file and returns its hosted URL and display name.
            ///
            /// # Errors
            ///
            /// Returns [`PrintHubError::Http`] if the request fails and
            /// [`PrintHubError::Upload`] if the service rejects the file or
            /// answers with an unreadable body.
            #[inline]
            #[tracing::instrument(skip_all, fields(file = %name, bytes = bytes.len()))]
            pub $($async_kw)? fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<UploadedFile> {
                let part = <$part_type>::bytes(bytes).file_name(name.to_owned());
                let form = <$form_type>::new()
                    .text("upload_preset", self.upload_preset.clone())
                    .part("file", part);
                tracing::trace!(url = %self.upload_url, "sending upload");
                let response: $resp_type = self
                    .http
                    .post(&self.upload_url)
                    .multipart(form)
                    .send()
                    $( .$await_ext )?
                    ?;
                let parsed: Result<UploadResponse> = parse_response!(response $(, $await_ext)?);
                match parsed {
                    Ok(uploaded) => {
                        tracing::debug!(public_id = %uploaded.public_id, "file uploaded");
                        Ok(uploaded.into_uploaded(name))
                    }
                    Err(PrintHubError::Api { status, message }) => {
                        Err(PrintHubError::Upload(format!("{name}: HTTP {status}: {message}")))
                    }
                    Err(PrintHubError::Serialization(err)) => {
                        Err(PrintHubError::Upload(format!("{name}: {err}")))
                    }
                    Err(other) => Err(other),
                }
            }
        }

    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async upload client.

    use crate::client::{DEFAULT_CLOUD_NAME, DEFAULT_UPLOAD_PRESET, DEFAULT_UPLOAD_URL};
    use crate::error::{PrintHubError, Result};
    use crate::models::{UploadResponse, UploadedFile};

    define_upload_client! {
        client_name: UploadClient,
        builder_name: UploadClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        form_type: reqwest::multipart::Form,
        part_type: reqwest::multipart::Part,
        client_doc: "Async client for the file-upload service.\n\nUse [`UploadClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing an [`UploadClient`].",
        async_kw: async,
        await_kw: await,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) upload client.

    use crate::client::{DEFAULT_CLOUD_NAME, DEFAULT_UPLOAD_PRESET, DEFAULT_UPLOAD_URL};
    use crate::error::{PrintHubError, Result};
    use crate::models::{UploadResponse, UploadedFile};

    define_upload_client! {
        client_name: UploadBlockingClient,
        builder_name: UploadBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        form_type: reqwest::blocking::multipart::Form,
        part_type: reqwest::blocking::multipart::Part,
        client_doc: "Blocking (synchronous) client for the file-upload service.\n\nUse [`UploadBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing an [`UploadBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{UploadClient, UploadClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{UploadBlockingClient, UploadBlockingClientBuilder};
