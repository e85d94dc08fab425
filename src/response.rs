//! The result of a completed call.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// The effective description of a call after merging settings and options.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    /// The HTTP method.
    pub method: Method,
    /// The resolved URL, including merged query parameters.
    pub url: Uri,
    /// The merged headers, as sent.
    pub headers: HeaderMap,
    /// The merged query parameters.
    pub params: BTreeMap<String, String>,
}

/// A completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct Response {
    /// The status code.
    pub status: StatusCode,
    /// The response headers.
    pub headers: HeaderMap,
    /// The decoded body.
    ///
    /// An empty body is `null`; a JSON body is its parsed value; any other
    /// body is a string holding its text.
    pub data: Value,
    /// The configuration the call was made with.
    pub config: RequestConfig,
}

impl Response {
    pub(crate) fn new(
        status: StatusCode,
        headers: HeaderMap,
        body: &Bytes,
        config: RequestConfig,
    ) -> Self {
        Self {
            status,
            headers,
            data: decode_body(body),
            config,
        }
    }

    /// Deserializes [`Response::data`] into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the data does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data)
    }

    /// Returns true for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

fn decode_body(body: &Bytes) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
