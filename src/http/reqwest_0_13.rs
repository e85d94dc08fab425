use std::sync::LazyLock;

use super::{HttpClient, HttpResponse};

use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};

fn to_reqwest(
    client: &reqwest::Client,
    request: Request<Bytes>,
) -> Result<reqwest::Request, reqwest::Error> {
    let (parts, body) = request.into_parts();
    client
        .request(parts.method, parts.uri.to_string())
        .headers(parts.headers)
        .body(body)
        .build()
}

impl HttpClient for reqwest::Client {
    type Response = reqwest::Response;
    type Error = reqwest::Error;

    /// Converts the `http::Request` into a `reqwest::Request` and sends it.
    ///
    /// `reqwest` does not fail on error statuses unless asked to, so 4xx and
    /// 5xx responses come back as `Ok`.
    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        let reqwest_request = to_reqwest(self, request)?;
        reqwest::Client::execute(self, reqwest_request).await
    }
}

impl HttpClient for LazyLock<reqwest::Client> {
    type Response = reqwest::Response;
    type Error = reqwest::Error;

    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        let reqwest_request = to_reqwest(self, request)?;
        reqwest::Client::execute(self, reqwest_request).await
    }
}

impl HttpResponse for reqwest::Response {
    type Error = reqwest::Error;

    fn status(&self) -> StatusCode {
        self.status()
    }

    fn headers(&self) -> HeaderMap {
        self.headers().clone()
    }

    async fn body(self) -> Result<Bytes, Self::Error> {
        self.bytes().await
    }
}

impl crate::Error for reqwest::Error {
    fn status(&self) -> Option<StatusCode> {
        reqwest::Error::status(self)
    }
}
