//! Common test utilities for integration tests.
//!
//! The client is blocking, so every test drives it from
//! [`tokio::task::spawn_blocking`] while the mock server runs on the test
//! runtime. Clients are built and dropped inside the blocking closure.

#![allow(dead_code)]

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lingo24_client::{Authenticator, Client, Credentials, Endpoint, MemoryTokenStore, TokenSet};

/// Page size used by the paged fixtures.
pub const PER_PAGE: u32 = 4;

/// API path prefix on the mock server.
pub const API_PREFIX: &str = "/docs/v1";

/// A mock Lingo24 deployment.
pub struct TestApi {
    pub server: MockServer,
}

impl TestApi {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Absolute URL of an API path, as the server would put in a link.
    pub fn url(&self, api_path: &str) -> String {
        format!("{}{API_PREFIX}/{api_path}", self.server.uri())
    }

    /// Mount `mock` on the server.
    pub async fn mount(&self, mock: Mock) {
        mock.mount(&self.server).await;
    }

    /// Mount the three-page (4, 4, 2) listing of `Name1`..`Name10` under
    /// `collection` (e.g. `"domains/"`).
    pub async fn mount_three_pages(&self, collection: &str) {
        let sizes = [(0, 1..=4), (1, 5..=8), (2, 9..=10)];
        for (number, ids) in sizes {
            let content: Vec<Value> = ids.map(|id| json!({"id": id, "name": format!("Name{id}")})).collect();
            let next = (number < 2).then(|| {
                self.url(&format!("{collection}?page={}&size={PER_PAGE}", number + 1))
            });
            self.mount(
                Mock::given(method("GET"))
                    .and(path(format!("{API_PREFIX}/{collection}")))
                    .and(query_param("page", number.to_string()))
                    .and(query_param("size", PER_PAGE.to_string()))
                    .respond_with(
                        ResponseTemplate::new(200).set_body_json(page_body(content, number, 10, 3, next)),
                    ),
            )
            .await;
        }
    }

    /// Mount a listing with no items; any later page is a 404.
    pub async fn mount_empty(&self, collection: &str) {
        self.mount(
            Mock::given(method("GET"))
                .and(path(format!("{API_PREFIX}/{collection}")))
                .and(query_param("page", "0"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "content": [],
                    "page": {"size": 0, "totalElements": 0, "totalPages": 0, "number": 0}
                }))),
        )
        .await;
        self.mount(
            Mock::given(method("GET"))
                .and(path(format!("{API_PREFIX}/{collection}")))
                .and(query_param("page", "1"))
                .respond_with(ResponseTemplate::new(404)),
        )
        .await;
    }
}

/// List response body.
pub fn page_body(
    content: Vec<Value>,
    number: u64,
    total_elements: u64,
    total_pages: u64,
    next: Option<String>,
) -> Value {
    let mut links = vec![];
    if let Some(href) = next {
        links.push(json!({"rel": "next", "href": href}));
    }
    json!({
        "links": links,
        "content": content,
        "page": {
            "size": PER_PAGE,
            "totalElements": total_elements,
            "totalPages": total_pages,
            "number": number,
        }
    })
}

/// Endpoint pointing both hosts at the mock server.
pub fn endpoint(uri: &str) -> Endpoint {
    Endpoint::custom(uri, &format!("{uri}{API_PREFIX}/")).expect("valid mock endpoint")
}

pub fn credentials() -> Credentials {
    Credentials::new("xxx", "yyy", "https://www.example.com/callback")
}

/// Authenticator against the mock server holding `tokens`.
pub fn authenticator(uri: &str, tokens: TokenSet) -> Authenticator {
    Authenticator::builder(credentials())
        .endpoint(endpoint(uri))
        .store(MemoryTokenStore::with_tokens(tokens))
        .build()
        .expect("authenticator")
}

/// Access token `aaa`, refresh token `bbb`, no recorded expiry.
pub fn tokens() -> TokenSet {
    TokenSet {
        access_token: Some("aaa".into()),
        refresh_token: Some("bbb".into()),
        expires_in: None,
        expires_at: None,
    }
}

/// Client with page size [`PER_PAGE`] and valid tokens.
pub fn client(uri: &str) -> Client {
    Client::builder(authenticator(uri, tokens()))
        .per_page(PER_PAGE)
        .build()
        .expect("client")
}

/// Token endpoint response body.
pub fn token_body(access_token: &str, refresh_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "expires_in": 3600,
    })
}

/// Run blocking client code off the async runtime.
pub async fn blocking<F, R>(f: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking test body panicked")
}
