//! Top-level API client.

use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::api::{Domain, File, Locale, Project, Service};
use crate::auth::Authenticator;
use crate::collection::{Capabilities, PagedCollection};
use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestOptions};

/// Default page size for collections.
pub const DEFAULT_PER_PAGE: u32 = 25;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Service status reported by the unauthenticated `status` endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiStatus {
    pub version: String,
    pub date: serde_json::Value,
}

/// Entry point to the Lingo24 Business Documents API.
///
/// Cheap to clone. Every collection and domain object handed out shares the
/// same connection pool and token state.
///
/// ```no_run
/// use lingo24_client::{Authenticator, Client, Endpoint};
///
/// # fn main() -> lingo24_client::Result<()> {
/// let auth = Authenticator::builder(lingo24_client::Credentials::new(
///     "client-id",
///     "client-secret",
///     "https://example.com/callback",
/// ))
/// .endpoint(Endpoint::Demo)
/// .build()?;
/// let client = Client::new(auth)?;
///
/// for project in client.projects().sort("name")?.iter() {
///     println!("{}", project?.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    http: HttpClient,
    endpoint: Endpoint,
    per_page: u32,
}

impl Client {
    /// Client on the authenticator's endpoint with default settings.
    pub fn new(authenticator: Authenticator) -> Result<Self> {
        Self::builder(authenticator).build()
    }

    pub fn builder(authenticator: Authenticator) -> ClientBuilder {
        ClientBuilder::new(authenticator)
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    pub fn authenticator(&self) -> &Authenticator {
        self.http.authenticator()
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Page size used by collections from this client.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Absolute URL for an API path.
    pub fn make_url(&self, path: &str) -> Result<Url> {
        self.http.url(path)
    }

    /// Query the service status. Needs no token.
    pub fn status(&self) -> Result<ApiStatus> {
        self.http
            .get_json_with("status", RequestOptions::unauthenticated())
    }

    pub fn domains(&self) -> PagedCollection<Domain> {
        PagedCollection::new(self.clone(), "domains/", Capabilities::ALL)
    }

    pub fn locales(&self) -> PagedCollection<Locale> {
        PagedCollection::new(self.clone(), "locales/", Capabilities::ALL)
    }

    pub fn services(&self) -> PagedCollection<Service> {
        PagedCollection::new(self.clone(), "services/", Capabilities::ALL)
    }

    /// Files by id. The top-level file collection cannot be listed.
    pub fn files(&self) -> PagedCollection<File> {
        PagedCollection::new(self.clone(), "files/", Capabilities::ADDRESSABLE)
    }

    pub fn projects(&self) -> PagedCollection<Project> {
        PagedCollection::new(self.clone(), "projects/", Capabilities::ALL)
    }
}

/// Builder for a [`Client`].
#[derive(Debug)]
pub struct ClientBuilder {
    authenticator: Authenticator,
    endpoint: Option<Endpoint>,
    per_page: u32,
    timeout: Duration,
}

impl ClientBuilder {
    fn new(authenticator: Authenticator) -> Self {
        Self {
            authenticator,
            endpoint: None,
            per_page: DEFAULT_PER_PAGE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the API endpoint (default: the authenticator's).
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<Client> {
        if self.per_page == 0 {
            return Err(Error::InvalidArgument("per_page must be at least 1".into()));
        }
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| self.authenticator.endpoint().clone());
        let http = HttpClient::new(self.authenticator, endpoint.api_url(), self.timeout)?;

        Ok(Client {
            http,
            endpoint,
            per_page: self.per_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Credentials;

    fn authenticator(endpoint: Endpoint) -> Authenticator {
        Authenticator::builder(Credentials::new("xxx", "yyy", "https://e.com/cb"))
            .endpoint(endpoint)
            .build()
            .unwrap()
    }

    #[test]
    fn test_make_url() {
        let client = Client::new(authenticator(Endpoint::Demo)).unwrap();
        assert_eq!(
            client.make_url("abc/def").unwrap().as_str(),
            "https://api-demo.lingo24.com/docs/v1/abc/def"
        );
    }

    #[test]
    fn test_endpoint_override() {
        let client = Client::builder(authenticator(Endpoint::Demo))
            .endpoint(Endpoint::Live)
            .build()
            .unwrap();
        assert_eq!(client.endpoint(), &Endpoint::Live);
        assert_eq!(
            client.make_url("status").unwrap().as_str(),
            "https://api.lingo24.com/docs/v1/status"
        );
    }

    #[test]
    fn test_per_page() {
        let client = Client::new(authenticator(Endpoint::Live)).unwrap();
        assert_eq!(client.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(client.projects().page_size(), DEFAULT_PER_PAGE);

        let result = Client::builder(authenticator(Endpoint::Live)).per_page(0).build();
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_collections_share_client() {
        let client = Client::new(authenticator(Endpoint::Live)).unwrap();
        assert_eq!(client.domains(), client.domains());
        assert_eq!(client.clone().projects(), client.projects());
        assert_eq!(client.files().capabilities(), Capabilities::ADDRESSABLE);
    }
}
