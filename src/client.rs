//! The verb helpers.
//!
//! A [`Client`] pairs one set of [`GlobalSettings`] with an [`HttpClient`].
//! Every call merges the settings with its own [`RequestOptions`], sends one
//! request, and resolves to a [`Response`] for a 2xx status or to a
//! [`RequestError`] otherwise.

use std::sync::Arc;

use bytes::Bytes;
use http::{HeaderValue, Method, Request, header::CONTENT_TYPE};
use serde::Serialize;
use snafu::prelude::*;

use crate::{
    GlobalSettings, RequestOptions,
    base_url::{self, ResolveUrlError},
    http::{HttpClient, HttpResponse},
    options::{Merged, merge},
    response::{RequestConfig, Response},
};

/// The error type of calls made through a `Client<C>`.
pub type ClientError<C> =
    RequestError<<C as HttpClient>::Error, <<C as HttpClient>::Response as HttpResponse>::Error>;

/// HTTP verb helpers bound to a fixed set of [`GlobalSettings`].
///
/// Cloning is cheap when `C` is cheap to clone; the settings are shared.
#[derive(Debug, Clone)]
pub struct Client<C> {
    settings: Arc<GlobalSettings>,
    http_client: C,
}

impl<C: HttpClient> Client<C> {
    /// Creates a client that applies `settings` to every call it makes.
    pub fn configure(settings: GlobalSettings, http_client: C) -> Self {
        Self {
            settings: Arc::new(settings),
            http_client,
        }
    }

    /// The settings this client was configured with.
    #[must_use]
    pub fn settings(&self) -> &GlobalSettings {
        &self.settings
    }

    /// The underlying HTTP client.
    #[must_use]
    pub fn http_client(&self) -> &C {
        &self.http_client
    }

    /// Sends a `GET` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn get(
        &self,
        url: &str,
        options: Option<&RequestOptions>,
    ) -> Result<Response, ClientError<C>> {
        self.request::<()>(Method::GET, url, None, options).await
    }

    /// Sends a `POST` request with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: Option<&RequestOptions>,
    ) -> Result<Response, ClientError<C>> {
        self.request(Method::POST, url, Some(body), options).await
    }

    /// Sends a `PUT` request with `body` encoded as JSON.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn put<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: Option<&RequestOptions>,
    ) -> Result<Response, ClientError<C>> {
        self.request(Method::PUT, url, Some(body), options).await
    }

    /// Sends a `DELETE` request.
    ///
    /// # Errors
    ///
    /// See [`Client::request`].
    pub async fn delete(
        &self,
        url: &str,
        options: Option<&RequestOptions>,
    ) -> Result<Response, ClientError<C>> {
        self.request::<()>(Method::DELETE, url, None, options).await
    }

    /// Sends a request with any method.
    ///
    /// `url` is used as is when absolute and joined to the base URL
    /// otherwise. Headers and query parameters from `options` replace those
    /// of the same name in the settings.
    ///
    /// # Errors
    ///
    /// - [`RequestError::Url`] if the URL cannot be resolved.
    /// - [`RequestError::EncodeBody`] if `body` cannot be encoded as JSON.
    /// - [`RequestError::Request`] or [`RequestError::ResponseBody`] if the
    ///   HTTP client fails.
    /// - [`RequestError::Status`] if the server answers with a non-2xx
    ///   status. The error still carries the full [`Response`].
    pub async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> Result<Response, ClientError<C>> {
        let Merged {
            mut headers,
            params,
        } = merge(&self.settings, options);

        let uri = base_url::resolve(self.settings.base_url(), url, &params).context(UrlSnafu)?;

        let body = match body {
            Some(body) => {
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                Bytes::from(serde_json::to_vec(body).context(EncodeBodySnafu)?)
            }
            None => Bytes::new(),
        };

        let config = RequestConfig {
            method,
            url: uri,
            headers,
            params,
        };

        let (mut parts, ()) = Request::new(()).into_parts();
        parts.method = config.method.clone();
        parts.uri = config.url.clone();
        parts.headers = config.headers.clone();
        let request = Request::from_parts(parts, body);

        tracing::debug!(method = %config.method, path = config.url.path(), "sending request");

        let response = self
            .http_client
            .execute(request)
            .await
            .context(RequestSnafu)?;
        let status = response.status();
        let headers = response.headers();
        let body = response.body().await.context(ResponseBodySnafu)?;

        let response = Response::new(status, headers, &body, config);

        if status.is_success() {
            tracing::debug!(
                status = status.as_u16(),
                path = response.config.url.path(),
                "request succeeded"
            );
            Ok(response)
        } else {
            tracing::warn!(
                status = status.as_u16(),
                path = response.config.url.path(),
                "request failed"
            );
            StatusSnafu {
                response: Box::new(response),
            }
            .fail()
        }
    }
}

/// Errors that can occur when making a call.
#[derive(Debug, Snafu)]
pub enum RequestError<HttpReqErr: crate::Error + 'static, HttpRespErr: crate::Error + 'static> {
    /// The request URL could not be resolved.
    #[snafu(display("Failed to resolve request URL"))]
    Url {
        /// The underlying error.
        source: ResolveUrlError,
    },
    /// The body could not be encoded as JSON.
    #[snafu(display("Failed to encode request body"))]
    EncodeBody {
        /// The underlying error.
        source: serde_json::Error,
    },
    /// The HTTP client failed to complete the exchange.
    #[snafu(display("Failed to make HTTP request"))]
    Request {
        /// The underlying error.
        source: HttpReqErr,
    },
    /// The response body could not be read.
    #[snafu(display("Failed to read response body"))]
    ResponseBody {
        /// The underlying error.
        source: HttpRespErr,
    },
    /// The server answered with a non-2xx status.
    #[snafu(display("Request failed with status code {}", response.status.as_u16()))]
    Status {
        /// The full response, including the effective request config.
        response: Box<Response>,
    },
}

impl<HttpReqErr: crate::Error, HttpRespErr: crate::Error> RequestError<HttpReqErr, HttpRespErr> {
    /// The response behind a [`RequestError::Status`] failure.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Status { response } => Some(response),
            _ => None,
        }
    }

    /// The effective request config, when the failure got as far as a response.
    #[must_use]
    pub fn config(&self) -> Option<&RequestConfig> {
        self.response().map(|r| &r.config)
    }
}

impl<HttpReqErr: crate::Error, HttpRespErr: crate::Error> crate::Error
    for RequestError<HttpReqErr, HttpRespErr>
{
    fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Status { response } => Some(response.status),
            Self::Request { source } => source.status(),
            Self::ResponseBody { source } => source.status(),
            Self::Url { .. } | Self::EncodeBody { .. } => None,
        }
    }
}
