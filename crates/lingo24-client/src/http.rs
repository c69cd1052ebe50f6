//! Authenticated JSON transport.
//!
//! Every request resolves its path against the API base URL. Authenticated
//! requests carry `Authorization: Bearer <token>`; a 401 forces one token
//! refresh and one resend, never more.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::StatusCode;
use reqwest::blocking::Response;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Authenticator;
use crate::error::{Error, Result};

fn application_json() -> HeaderValue {
    HeaderValue::from_static("application/json")
}

/// Per-request options.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Attach a bearer token (and retry once on 401).
    pub authenticate: bool,
    /// Extra request headers.
    pub headers: HeaderMap,
    /// Raw request body.
    pub body: Option<Vec<u8>>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            authenticate: true,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    /// Options for an endpoint that needs no token.
    pub fn unauthenticated() -> Self {
        Self {
            authenticate: false,
            ..Default::default()
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set the raw body.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Expect a JSON response.
    pub fn accept_json(self) -> Self {
        self.with_header(ACCEPT, application_json())
    }

    /// Send `body` as JSON and expect JSON back.
    pub fn with_json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        Ok(self
            .accept_json()
            .with_header(CONTENT_TYPE, application_json())
            .with_body(serde_json::to_vec(body)?))
    }
}

/// Blocking HTTP client bound to one API base URL and one authenticator.
///
/// Cheap to clone; clones share the connection pool and token state.
#[derive(Clone)]
pub struct HttpClient {
    inner: Arc<HttpInner>,
}

struct HttpInner {
    http: reqwest::blocking::Client,
    authenticator: Authenticator,
    base_url: Url,
}

impl HttpClient {
    /// Create a client for `base_url`.
    pub fn new(authenticator: Authenticator, base_url: Url, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(format!("lingo24-client/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpInner {
                http,
                authenticator,
                base_url,
            }),
        })
    }

    /// The authenticator supplying bearer tokens.
    pub fn authenticator(&self) -> &Authenticator {
        &self.inner.authenticator
    }

    /// Base URL all paths resolve against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve `path` against the base URL. Absolute URLs pass through.
    pub fn url(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Whether two handles share the same underlying client.
    pub fn same_client(&self, other: &HttpClient) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Send a request, refreshing the token and resending once on 401.
    ///
    /// Fails with [`Error::Status`] for any non-2xx final response and
    /// [`Error::Http`] for transport failures.
    pub fn request(&self, method: Method, path: &str, options: RequestOptions) -> Result<Response> {
        let url = self.url(path)?;

        let mut response = self.send(&method, &url, &options)?;
        if response.status() == StatusCode::UNAUTHORIZED && options.authenticate {
            tracing::warn!(%method, %url, "Request unauthorized, refreshing access token");
            self.inner.authenticator.refresh_access_token()?;
            response = self.send(&method, &url, &options)?;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::status(status, url.as_str(), body));
        }
        Ok(response)
    }

    fn send(&self, method: &Method, url: &Url, options: &RequestOptions) -> Result<Response> {
        let mut request = self
            .inner
            .http
            .request(method.clone(), url.clone())
            .headers(options.headers.clone());

        if options.authenticate {
            request = request.bearer_auth(self.inner.authenticator.access_token()?);
        }
        if let Some(body) = &options.body {
            request = request.body(body.clone());
        }

        let response = request.send()?;
        tracing::debug!(%method, %url, status = response.status().as_u16(), "API response");
        Ok(response)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Raw verbs
    // ─────────────────────────────────────────────────────────────────────────

    /// GET `path`.
    pub fn get(&self, path: &str) -> Result<Response> {
        self.request(Method::GET, path, RequestOptions::default())
    }

    /// PUT a raw body to `path`.
    pub fn put(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<Response> {
        self.request(Method::PUT, path, RequestOptions::default().with_body(body))
    }

    /// POST a raw body to `path`.
    pub fn post(&self, path: &str, body: impl Into<Vec<u8>>) -> Result<Response> {
        self.request(Method::POST, path, RequestOptions::default().with_body(body))
    }

    /// DELETE `path`.
    pub fn delete(&self, path: &str) -> Result<Response> {
        self.request(Method::DELETE, path, RequestOptions::default())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // JSON verbs
    // ─────────────────────────────────────────────────────────────────────────

    /// GET `path` and decode the JSON body.
    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_json_with(path, RequestOptions::default())
    }

    /// GET `path` with explicit options and decode the JSON body.
    pub fn get_json_with<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T> {
        decode_json(self.request(Method::GET, path, options.accept_json())?)
    }

    /// PUT `body` as JSON and decode the JSON response.
    pub fn put_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::default().with_json(body)?;
        decode_json(self.request(Method::PUT, path, options)?)
    }

    /// POST `body` as JSON and decode the JSON response.
    pub fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let options = RequestOptions::default().with_json(body)?;
        decode_json(self.request(Method::POST, path, options)?)
    }
}

impl PartialEq for HttpClient {
    fn eq(&self, other: &Self) -> bool {
        self.same_client(other)
    }
}

impl Eq for HttpClient {}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("endpoint", self.inner.authenticator.endpoint())
            .finish()
    }
}

/// Decode a JSON body. An empty body decodes as `null`.
fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.bytes()?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;

    fn client(base: &str) -> HttpClient {
        let auth = Authenticator::builder(Credentials::new("xxx", "yyy", "https://e.com/cb"))
            .build()
            .unwrap();
        HttpClient::new(auth, Url::parse(base).unwrap(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_resolution() {
        let client = client("https://api-demo.lingo24.com/docs/v1/");
        assert_eq!(
            client.url("abc/def").unwrap().as_str(),
            "https://api-demo.lingo24.com/docs/v1/abc/def"
        );
        assert_eq!(
            client.url("domains/?page=1&size=25").unwrap().as_str(),
            "https://api-demo.lingo24.com/docs/v1/domains/?page=1&size=25"
        );
    }

    #[test]
    fn test_absolute_url_passes_through() {
        let client = client("https://api-demo.lingo24.com/docs/v1/");
        let next = "https://api-demo.lingo24.com/docs/v1/projects/?page=2&size=4";
        assert_eq!(client.url(next).unwrap().as_str(), next);
    }

    #[test]
    fn test_json_options_set_headers() {
        let options = RequestOptions::default()
            .with_json(&serde_json::json!({"name": "x"}))
            .unwrap();
        assert!(options.authenticate);
        assert_eq!(options.headers.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(options.headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(options.body.as_deref(), Some(br#"{"name":"x"}"#.as_slice()));
    }

    #[test]
    fn test_unauthenticated_options() {
        let options = RequestOptions::unauthenticated().accept_json();
        assert!(!options.authenticate);
        assert!(options.body.is_none());
    }

    #[test]
    fn test_clone_shares_client() {
        let a = client("https://api.lingo24.com/docs/v1/");
        let b = a.clone();
        let c = client("https://api.lingo24.com/docs/v1/");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
