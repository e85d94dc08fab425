//! Process-level request defaults.
//!
//! [`GlobalSettings`] holds the base URL, headers and query parameters that
//! every call made through a [`Client`](crate::Client) starts from. Settings
//! are fixed once the client is configured; per-call
//! [`RequestOptions`](crate::RequestOptions) layer on top without touching
//! them.

use std::collections::BTreeMap;

use bon::Builder;
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::{BaseUrl, IntoBaseUrl};

/// Default configuration applied to every request.
#[derive(Debug, Clone, Default, PartialEq, Builder, Serialize, Deserialize)]
#[builder(state_mod(name = "builder"))]
#[serde(default)]
pub struct GlobalSettings {
    /// Prefix for relative request URLs.
    #[builder(setters(name = "base_url_value"))]
    #[serde(alias = "baseURL", alias = "baseUrl", skip_serializing_if = "Option::is_none")]
    base_url: Option<BaseUrl>,

    /// Headers sent with every request unless a call overrides them.
    #[builder(default)]
    #[serde(with = "crate::serde_utils::header_map")]
    headers: HeaderMap,

    /// Query parameters appended to every request URL.
    #[builder(default, into)]
    params: BTreeMap<String, String>,
}

impl GlobalSettings {
    /// Parses settings from a JSON value, which must be an object.
    ///
    /// Accepts `baseURL`, `baseUrl` or `base_url` for the base URL. Keys this
    /// library does not use are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::NotAMapping`] if `value` is not an object, or
    /// [`SettingsError::Invalid`] if a known field has the wrong shape.
    pub fn from_json(value: serde_json::Value) -> Result<Self, SettingsError> {
        ensure!(
            value.is_object(),
            NotAMappingSnafu {
                found: json_kind(&value)
            }
        );
        serde_json::from_value(value).context(InvalidSnafu)
    }

    /// Parses settings from JSON text. See [`GlobalSettings::from_json`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Parse`] if `text` is not JSON, otherwise the
    /// errors of [`GlobalSettings::from_json`].
    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        let value = serde_json::from_str(text).context(ParseSnafu)?;
        Self::from_json(value)
    }

    /// The configured base URL, exactly as it was given.
    #[must_use]
    pub fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }

    /// The default headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The default query parameters.
    #[must_use]
    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }
}

impl<S: builder::State> GlobalSettingsBuilder<S> {
    /// Sets the base URL.
    ///
    /// Accepts any type that implements [`IntoBaseUrl`], including `&str`,
    /// [`String`], [`Url`](url::Url) and [`BaseUrl`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn base_url<U: IntoBaseUrl>(
        self,
        url: U,
    ) -> Result<GlobalSettingsBuilder<builder::SetBaseUrl<S>>, U::Error>
    where
        S::BaseUrl: builder::IsUnset,
    {
        Ok(self.base_url_value(url.into_base_url()?))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Errors that can occur when loading [`GlobalSettings`].
#[derive(Debug, Snafu)]
pub enum SettingsError {
    /// The settings were not a key/value mapping.
    #[snafu(display("Settings must be a mapping, found {found}"))]
    NotAMapping {
        /// What was supplied instead.
        found: &'static str,
    },
    /// A field had an invalid value.
    #[snafu(display("Invalid settings"))]
    Invalid {
        /// The underlying error.
        source: serde_json::Error,
    },
    /// The settings text was not JSON.
    #[snafu(display("Settings are not valid JSON"))]
    Parse {
        /// The underlying error.
        source: serde_json::Error,
    },
}

impl crate::Error for SettingsError {
    fn status(&self) -> Option<http::StatusCode> {
        None
    }
}
