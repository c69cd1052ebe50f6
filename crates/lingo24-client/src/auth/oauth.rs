//! OAuth2 authorization-code and refresh-token flows.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::{DATE, HeaderMap};
use serde::Deserialize;
use url::Url;

use super::store::{MemoryTokenStore, TokenSet, TokenStore};
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};

/// Default timeout for token requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// OAuth2 client registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_url: redirect_url.into(),
        }
    }
}

/// Grant sent to the token endpoint.
#[derive(Debug, Clone, Copy)]
enum Grant<'a> {
    AuthorizationCode(&'a str),
    RefreshToken(&'a str),
}

impl<'a> Grant<'a> {
    fn params(&self) -> [(&'static str, &'a str); 2] {
        match *self {
            Grant::AuthorizationCode(code) => [("grant_type", "authorization_code"), ("code", code)],
            Grant::RefreshToken(token) => {
                [("grant_type", "refresh_token"), ("refresh_token", token)]
            }
        }
    }
}

/// Token endpoint response body.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
}

/// Produces a currently-valid access token, refreshing it when it expires.
///
/// The authenticator owns its [`TokenStore`]. Token state is replaced
/// wholesale on each successful exchange.
#[derive(Debug)]
pub struct Authenticator {
    credentials: Credentials,
    endpoint: Endpoint,
    store: Box<dyn TokenStore>,
    http: reqwest::blocking::Client,
}

impl Authenticator {
    /// Create an authenticator for the live endpoint with an in-memory store.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_url: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(Credentials::new(client_id, client_secret, redirect_url)).build()
    }

    /// Start building an authenticator.
    pub fn builder(credentials: Credentials) -> AuthenticatorBuilder {
        AuthenticatorBuilder::new(credentials)
    }

    /// The deployment this authenticator talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// The client registration in use.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Snapshot of the stored token set.
    pub fn token_set(&self) -> TokenSet {
        self.store.get()
    }

    /// The backing token store.
    pub fn store(&self) -> &dyn TokenStore {
        self.store.as_ref()
    }

    /// URL the user visits to log in and grant access.
    ///
    /// After consenting, Lingo24 redirects to the registered redirect URL
    /// with a `code` query parameter; pass that to
    /// [`request_access_token`](Self::request_access_token).
    pub fn authorization_url(&self) -> Result<Url> {
        let mut url = self.endpoint.ease_url().join("oauth/authorize")?;
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.credentials.client_id)
            .append_pair("redirect_uri", &self.credentials.redirect_url);
        Ok(url)
    }

    /// Current access token, refreshed first if it has expired.
    pub fn access_token(&self) -> Result<String> {
        if self.is_access_token_expired() {
            tracing::info!("Access token expired, refreshing");
            self.refresh_access_token()?;
        }

        self.store.get().access_token.ok_or_else(|| {
            Error::Configuration(
                "No access token available. Call request_access_token with a valid \
                 OAuth2 authorization code first."
                    .to_string(),
            )
        })
    }

    /// Whether a stored token has passed its expiry. Returns `false` when
    /// no expiry is recorded.
    pub fn is_access_token_expired(&self) -> bool {
        self.store.get().is_expired_at(Utc::now().timestamp())
    }

    /// Exchange an authorization code for a token set.
    pub fn request_access_token(&self, authorization_code: &str) -> Result<TokenSet> {
        self.request_oauth2_access(Grant::AuthorizationCode(authorization_code))
    }

    /// Exchange the stored refresh token for a new token set.
    pub fn refresh_access_token(&self) -> Result<TokenSet> {
        let refresh_token = self.store.get().refresh_token.ok_or_else(|| {
            Error::Configuration("No refresh token available".to_string())
        })?;
        self.request_oauth2_access(Grant::RefreshToken(&refresh_token))
    }

    fn token_url(&self, grant: Grant<'_>) -> Result<Url> {
        let mut url = self.endpoint.api_url().join("oauth2/access")?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.credentials.client_id)
                .append_pair("client_secret", &self.credentials.client_secret)
                .append_pair("redirect_uri", &self.credentials.redirect_url);
            for (key, value) in grant.params() {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request_oauth2_access(&self, grant: Grant<'_>) -> Result<TokenSet> {
        let url = self.token_url(grant)?;
        let grant_type = grant.params()[0].1;
        tracing::debug!(grant_type, "requesting OAuth2 access");

        let response = self.http.post(url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::status(status, redacted(&url).as_str(), body));
        }

        let issued_at = issued_at(response.headers());
        let body = response.bytes()?;
        let token: TokenResponse = serde_json::from_slice(&body)?;

        let tokens = TokenSet {
            access_token: Some(token.access_token),
            refresh_token: token.refresh_token,
            expires_in: Some(token.expires_in),
            expires_at: Some(issued_at.saturating_add(token.expires_in)),
        };
        self.store.set(tokens.clone())?;

        tracing::info!(grant_type, expires_in = token.expires_in, "OAuth2 tokens stored");
        Ok(tokens)
    }
}

/// Issue time of a token response: the server's `Date` header when present
/// and parseable, otherwise the local clock.
fn issued_at(headers: &HeaderMap) -> i64 {
    let Some(value) = headers.get(DATE) else {
        return Utc::now().timestamp();
    };
    match value
        .to_str()
        .ok()
        .and_then(|s| DateTime::parse_from_rfc2822(s).ok())
    {
        Some(date) => date.timestamp(),
        None => {
            tracing::warn!(?value, "Unparseable Date header on token response, using local clock");
            Utc::now().timestamp()
        }
    }
}

/// Token URL with the secret and grant values stripped, for error messages.
fn redacted(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url
}

/// Builder for an [`Authenticator`].
#[derive(Debug)]
pub struct AuthenticatorBuilder {
    credentials: Credentials,
    endpoint: Endpoint,
    store: Option<Box<dyn TokenStore>>,
    timeout: Duration,
}

impl AuthenticatorBuilder {
    fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: Endpoint::default(),
            store: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Select the deployment (default: live).
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Use a specific token store (default: in-memory).
    pub fn store(mut self, store: impl TokenStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Use an already boxed token store.
    pub fn boxed_store(mut self, store: Box<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the token request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the authenticator.
    pub fn build(self) -> Result<Authenticator> {
        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .user_agent(format!("lingo24-client/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Authenticator {
            credentials: self.credentials,
            endpoint: self.endpoint,
            store: self
                .store
                .unwrap_or_else(|| Box::new(MemoryTokenStore::new())),
            http,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn authenticator(store: MemoryTokenStore) -> Authenticator {
        Authenticator::builder(Credentials::new(
            "xxx",
            "yyy",
            "https://www.example.com/callback",
        ))
        .store(store)
        .build()
        .unwrap()
    }

    #[test]
    fn test_authorization_url() {
        let auth = authenticator(MemoryTokenStore::new());
        let url = auth.authorization_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://ease.lingo24.com/oauth/authorize?response_type=code&client_id=xxx&redirect_uri=https%3A%2F%2Fwww.example.com%2Fcallback"
        );
    }

    #[test]
    fn test_authorization_url_demo() {
        let auth = Authenticator::builder(Credentials::new("xxx", "yyy", "https://e.com/cb"))
            .endpoint(Endpoint::Demo)
            .build()
            .unwrap();
        let url = auth.authorization_url().unwrap();
        assert_eq!(url.host_str(), Some("ease-demo.lingo24.com"));
        assert_eq!(url.path(), "/oauth/authorize");
    }

    #[test]
    fn test_token_url_carries_grant() {
        let auth = authenticator(MemoryTokenStore::new());
        let url = auth.token_url(Grant::RefreshToken("bbb")).unwrap();
        assert_eq!(url.path(), "/docs/v1/oauth2/access");

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "xxx".into())));
        assert!(pairs.contains(&("client_secret".into(), "yyy".into())));
        assert!(pairs.contains(&("grant_type".into(), "refresh_token".into())));
        assert!(pairs.contains(&("refresh_token".into(), "bbb".into())));

        assert_eq!(redacted(&url).query(), None);
    }

    #[test]
    fn test_access_token_without_tokens() {
        let auth = authenticator(MemoryTokenStore::new());
        let err = auth.access_token().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_access_token_without_expiry_is_returned() {
        let auth = authenticator(MemoryTokenStore::with_tokens(TokenSet::with_access_token(
            "aaa",
        )));
        assert!(!auth.is_access_token_expired());
        assert_eq!(auth.access_token().unwrap(), "aaa");
    }

    #[test]
    fn test_access_token_valid_is_returned() {
        let tokens = TokenSet {
            access_token: Some("aaa".into()),
            refresh_token: Some("bbb".into()),
            expires_in: Some(3600),
            expires_at: Some(Utc::now().timestamp() + 3600),
        };
        let auth = authenticator(MemoryTokenStore::with_tokens(tokens));
        assert!(!auth.is_access_token_expired());
        assert_eq!(auth.access_token().unwrap(), "aaa");
    }

    #[test]
    fn test_expired_token_detected() {
        let tokens = TokenSet {
            access_token: Some("aaa".into()),
            refresh_token: None,
            expires_in: Some(3600),
            expires_at: Some(Utc::now().timestamp() - 10),
        };
        let auth = authenticator(MemoryTokenStore::with_tokens(tokens));
        assert!(auth.is_access_token_expired());
    }

    #[test]
    fn test_refresh_without_refresh_token() {
        let auth = authenticator(MemoryTokenStore::with_tokens(TokenSet::with_access_token(
            "aaa",
        )));
        let err = auth.refresh_access_token().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_issued_at_uses_date_header() {
        let mut headers = HeaderMap::new();
        headers.insert(DATE, HeaderValue::from_static("Thu, 01 Jan 2015 00:00:00 GMT"));
        assert_eq!(issued_at(&headers), 1_420_070_400);
    }

    #[test]
    fn test_issued_at_falls_back_to_local_clock() {
        let before = Utc::now().timestamp();

        let mut headers = HeaderMap::new();
        headers.insert(DATE, HeaderValue::from_static("not a date"));
        let garbage = issued_at(&headers);
        let missing = issued_at(&HeaderMap::new());

        let after = Utc::now().timestamp();
        assert!((before..=after).contains(&garbage));
        assert!((before..=after).contains(&missing));
    }
}
