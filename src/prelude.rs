//! Imports for syntax extensions.

pub use crate::HttpHost as _;
pub use crate::IntoBaseUrl as _;
