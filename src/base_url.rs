//! Base URL handling and request URL resolution.
//!
//! [`BaseUrl`] is a validated base URL that keeps the exact text it was
//! given, so reading a configured value back returns it unchanged. It can
//! be constructed from common string and URL types via [`IntoBaseUrl`].

use std::collections::BTreeMap;
use std::convert::Infallible;

use http::{Uri, uri::InvalidUri};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;
use url::Url;

/// A validated base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl(String);

impl Serialize for BaseUrl {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.into_base_url().map_err(serde::de::Error::custom)
    }
}

impl BaseUrl {
    /// Returns the URL exactly as it was configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins a relative path onto this base.
    ///
    /// One trailing `/` or `//` is dropped from the base and every leading
    /// `/` from the path, then the two are joined with a single `/`.
    #[must_use]
    pub fn join(&self, relative: &str) -> String {
        if relative.is_empty() {
            return self.0.clone();
        }
        let base = self
            .0
            .strip_suffix("//")
            .or_else(|| self.0.strip_suffix('/'))
            .unwrap_or(&self.0);
        format!("{base}/{}", relative.trim_start_matches('/'))
    }
}

impl std::fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Conversion trait for types that can be turned into a [`BaseUrl`].
pub trait IntoBaseUrl {
    /// The error type returned if the conversion fails.
    type Error;

    /// Attempts to convert this value into a [`BaseUrl`].
    fn into_base_url(self) -> Result<BaseUrl, Self::Error>;
}

impl IntoBaseUrl for BaseUrl {
    type Error = Infallible;

    fn into_base_url(self) -> Result<BaseUrl, Self::Error> {
        Ok(self)
    }
}

impl IntoBaseUrl for Url {
    type Error = Infallible;

    fn into_base_url(self) -> Result<BaseUrl, Self::Error> {
        Ok(BaseUrl(self.into()))
    }
}

impl IntoBaseUrl for &str {
    type Error = url::ParseError;

    fn into_base_url(self) -> Result<BaseUrl, Self::Error> {
        Url::parse(self)?;
        Ok(BaseUrl(self.to_owned()))
    }
}

impl IntoBaseUrl for String {
    type Error = url::ParseError;

    fn into_base_url(self) -> Result<BaseUrl, Self::Error> {
        Url::parse(&self)?;
        Ok(BaseUrl(self))
    }
}

/// Errors that can occur when resolving the URL of a single call.
#[derive(Debug, Snafu)]
pub enum ResolveUrlError {
    /// The URL is relative and no base URL is configured.
    #[snafu(display("Relative URL `{url}` used without a configured base URL"))]
    MissingBase {
        /// The relative URL.
        url: String,
    },
    /// The query parameters could not be form-encoded.
    #[snafu(display("Failed to encode query parameters"))]
    EncodeParams {
        /// The underlying error.
        source: serde_html_form::ser::Error,
    },
    /// The URL could not be parsed.
    #[snafu(display("Invalid request URL `{url}`"))]
    InvalidUrl {
        /// The URL that failed to parse.
        url: String,
        /// The underlying error.
        source: url::ParseError,
    },
    /// The parsed URL could not be carried as an HTTP request target.
    #[snafu(display("Request URL `{url}` is not a valid request target"))]
    InvalidUri {
        /// The URL that failed to parse.
        url: String,
        /// The underlying error.
        source: InvalidUri,
    },
}

impl crate::Error for ResolveUrlError {
    fn status(&self) -> Option<http::StatusCode> {
        None
    }
}

/// Returns true for `scheme://...` and protocol-relative `//...` URLs.
pub(crate) fn is_absolute(url: &str) -> bool {
    let rest = match url.find(':') {
        Some(idx) => {
            let scheme = &url[..idx];
            let valid_scheme = scheme
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
            if !valid_scheme {
                return false;
            }
            &url[idx + 1..]
        }
        None => url,
    };
    rest.starts_with("//")
}

/// Resolves `url` against `base` and merges `params` into its query.
///
/// The result is percent-encoded and carries no fragment.
pub(crate) fn resolve(
    base: Option<&BaseUrl>,
    url: &str,
    params: &BTreeMap<String, String>,
) -> Result<Uri, ResolveUrlError> {
    let mut parsed = if url.starts_with("//") {
        let base = base.context(MissingBaseSnafu { url })?;
        Url::parse(base.as_str())
            .and_then(|b| b.join(url))
            .context(InvalidUrlSnafu { url })?
    } else {
        let full = if is_absolute(url) {
            url.to_owned()
        } else {
            base.context(MissingBaseSnafu { url })?.join(url)
        };
        Url::parse(&full).context(InvalidUrlSnafu { url: full.clone() })?
    };
    parsed.set_fragment(None);

    if !params.is_empty() {
        let encoded = serde_html_form::to_string(params).context(EncodeParamsSnafu)?;
        let query = match parsed.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
            _ => encoded,
        };
        parsed.set_query(Some(&query));
    }

    parsed
        .as_str()
        .parse::<Uri>()
        .context(InvalidUriSnafu { url: parsed.as_str() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> BaseUrl {
        "https://jsonplaceholder.typicode.com"
            .into_base_url()
            .unwrap()
    }

    #[test]
    fn test_keeps_configured_text() {
        assert_eq!(base().as_str(), "https://jsonplaceholder.typicode.com");
    }

    #[test]
    fn test_rejects_unparseable_base() {
        assert!("not a url".into_base_url().is_err());
    }

    #[test]
    fn test_join_collapses_slashes() {
        let base = "https://example.com/api/".into_base_url().unwrap();
        assert_eq!(base.join("/posts/1"), "https://example.com/api/posts/1");
        assert_eq!(base.join("posts"), "https://example.com/api/posts");
    }

    #[test]
    fn test_join_drops_one_trailing_pair() {
        let base = "https://example.com/api//".into_base_url().unwrap();
        assert_eq!(base.join("posts"), "https://example.com/api/posts");

        let base = "https://example.com/api///".into_base_url().unwrap();
        assert_eq!(base.join("posts"), "https://example.com/api//posts");
    }

    #[test]
    fn test_absolute_detection() {
        assert!(is_absolute("https://example.com/posts"));
        assert!(is_absolute("//cdn.example.com/a.js"));
        assert!(!is_absolute("/posts"));
        assert!(!is_absolute("posts?x=http://y"));
        assert!(!is_absolute("1http://bad"));
    }

    #[test]
    fn test_absolute_url_ignores_base() {
        let uri = resolve(Some(&base()), "http://other.test/x", &BTreeMap::new()).unwrap();
        assert_eq!(uri.to_string(), "http://other.test/x");
    }

    #[test]
    fn test_relative_url_needs_base() {
        let err = resolve(None, "/posts", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, ResolveUrlError::MissingBase { .. }));
    }

    #[test]
    fn test_params_appended() {
        let params = BTreeMap::from([
            ("userId".to_owned(), "1".to_owned()),
            ("q".to_owned(), "a b".to_owned()),
        ]);
        let uri = resolve(Some(&base()), "/posts", &params).unwrap();
        assert_eq!(
            uri.to_string(),
            "https://jsonplaceholder.typicode.com/posts?q=a+b&userId=1"
        );

        let uri = resolve(Some(&base()), "/posts?page=2", &params).unwrap();
        assert_eq!(uri.query(), Some("page=2&q=a+b&userId=1"));
    }

    #[test]
    fn test_params_land_before_fragment() {
        let params = BTreeMap::from([("userId".to_owned(), "1".to_owned())]);
        let uri = resolve(Some(&base()), "/posts#top", &params).unwrap();
        assert_eq!(
            uri.to_string(),
            "https://jsonplaceholder.typicode.com/posts?userId=1"
        );

        let uri = resolve(Some(&base()), "/posts?page=2#top", &params).unwrap();
        assert_eq!(uri.query(), Some("page=2&userId=1"));
    }

    #[test]
    fn test_unencoded_characters_are_escaped() {
        let uri = resolve(Some(&base()), "/search?q=hello world", &BTreeMap::new()).unwrap();
        assert_eq!(uri.path(), "/search");
        assert_eq!(uri.query(), Some("q=hello%20world"));

        let uri = resolve(Some(&base()), "/my posts/1", &BTreeMap::new()).unwrap();
        assert_eq!(uri.path(), "/my%20posts/1");
    }

    #[test]
    fn test_protocol_relative_takes_base_scheme() {
        let uri = resolve(Some(&base()), "//cdn.example.com/a.js", &BTreeMap::new()).unwrap();
        assert_eq!(uri.to_string(), "https://cdn.example.com/a.js");

        let err = resolve(None, "//cdn.example.com/a.js", &BTreeMap::new()).unwrap_err();
        assert!(matches!(err, ResolveUrlError::MissingBase { .. }));
    }
}
