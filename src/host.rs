//! Verb helpers on application types.
//!
//! Implementing [`HttpHost`] for a type that holds a [`Client`] gives that
//! type `get`, `post`, `put` and `delete` methods which forward to the
//! client. The client is injected by whoever builds the host; there is no
//! shared global to install into.
//!
//! ```
//! use quickhttp::{Client, GlobalSettings, HttpHost};
//!
//! struct PostsView {
//!     http: Client<reqwest::Client>,
//! }
//!
//! impl HttpHost for PostsView {
//!     type HttpClient = reqwest::Client;
//!
//!     fn http(&self) -> &Client<reqwest::Client> {
//!         &self.http
//!     }
//! }
//!
//! let view = PostsView {
//!     http: Client::configure(GlobalSettings::default(), reqwest::Client::new()),
//! };
//! let _pending = view.get("https://jsonplaceholder.typicode.com/posts", None);
//! ```

use serde::Serialize;

use crate::{
    Client, RequestOptions, Response,
    client::ClientError,
    http::HttpClient,
    platform::{MaybeSend, MaybeSync},
};

/// A type that owns a [`Client`] and exposes its verbs.
pub trait HttpHost {
    /// The HTTP client behind the host's [`Client`].
    type HttpClient: HttpClient;

    /// The client the verbs forward to.
    fn http(&self) -> &Client<Self::HttpClient>;

    /// Forwards to [`Client::get`].
    fn get(
        &self,
        url: &str,
        options: Option<&RequestOptions>,
    ) -> impl Future<Output = Result<Response, ClientError<Self::HttpClient>>> + MaybeSend {
        self.http().get(url, options)
    }

    /// Forwards to [`Client::post`].
    fn post<B: Serialize + MaybeSync + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: Option<&RequestOptions>,
    ) -> impl Future<Output = Result<Response, ClientError<Self::HttpClient>>> + MaybeSend {
        self.http().post(url, body, options)
    }

    /// Forwards to [`Client::put`].
    fn put<B: Serialize + MaybeSync + ?Sized>(
        &self,
        url: &str,
        body: &B,
        options: Option<&RequestOptions>,
    ) -> impl Future<Output = Result<Response, ClientError<Self::HttpClient>>> + MaybeSend {
        self.http().put(url, body, options)
    }

    /// Forwards to [`Client::delete`].
    fn delete(
        &self,
        url: &str,
        options: Option<&RequestOptions>,
    ) -> impl Future<Output = Result<Response, ClientError<Self::HttpClient>>> + MaybeSend {
        self.http().delete(url, options)
    }
}
