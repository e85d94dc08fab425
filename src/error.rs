//! Error types and the [`Error`] trait.
//!
//! All errors in this library implement the [`Error`] trait, which extends
//! [`std::error::Error`] with the HTTP status the failure carries, if any.
//! [`BoxedError`] provides type-erased error handling while keeping that
//! status reachable.

use std::convert::Infallible;

use http::StatusCode;
use snafu::{AsErrorSource, Snafu};

use crate::platform::MaybeSendSync;

/// Errors that may occur in the library.
pub trait Error: std::error::Error + AsErrorSource + MaybeSendSync + 'static {
    /// The HTTP status attached to this failure.
    ///
    /// `None` when the failure happened before a status line was received
    /// (bad URL, connection refused, body encoding).
    fn status(&self) -> Option<StatusCode>;
}

impl Error for Infallible {
    fn status(&self) -> Option<StatusCode> {
        match *self {}
    }
}

/// A boxed error that can be used without type parameters.
#[derive(Debug, Snafu)]
#[snafu(transparent)]
pub struct BoxedError {
    source: Box<dyn Error>,
}

impl BoxedError {
    /// Create a new boxed error from a generic `Error`.
    pub fn from_err<E: Error + 'static>(err: E) -> Self {
        Self {
            source: Box::new(err),
        }
    }
}

impl Error for BoxedError {
    fn status(&self) -> Option<StatusCode> {
        self.source.status()
    }
}
