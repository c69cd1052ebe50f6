//! Client library for the Lingo24 Business Documents translation API.
//!
//! The crate handles the OAuth2 token lifecycle and exposes remote resources
//! as lazily paginated collections.
//!
//! # Example
//!
//! ```no_run
//! use lingo24_client::{Authenticator, Client, Credentials, Endpoint, FileTokenStore, Result};
//!
//! # fn example() -> Result<()> {
//! let auth = Authenticator::builder(Credentials::new(
//!     "client-id",
//!     "client-secret",
//!     "https://example.com/callback",
//! ))
//! .endpoint(Endpoint::Demo)
//! .store(FileTokenStore::open("tokens.json")?)
//! .build()?;
//!
//! // First run: send the user to the consent page, then exchange the code.
//! println!("Log in at {}", auth.authorization_url()?);
//! auth.request_access_token("code-from-redirect")?;
//!
//! let client = Client::new(auth)?;
//! println!("{} projects", client.projects().len()?);
//!
//! // Collections fetch pages on demand.
//! for locale in client.locales().sort("name")?.slice(..10)? {
//!     println!("{}", locale?.name);
//! }
//!
//! let mut project = client.projects().find(|p| p.name == "Brochure")?;
//! project.request_quote()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Resources
//!
//! - **Domains, locales, services**: sortable reference data
//! - **Files**: lookup by id, upload and download content
//! - **Projects**: create, quote workflow, prices, charges, files, jobs
//! - **Jobs**: create, prices, metrics, related locales and files

pub mod api;
pub mod auth;
pub mod client;
pub mod collection;
pub mod endpoint;
pub mod error;
pub mod http;

pub use api::{
    Charge, Domain, File, Job, Locale, Metric, Money, Price, Project, ProjectStatus, Service,
    TotalPrice,
};
pub use auth::{
    Authenticator, AuthenticatorBuilder, Credentials, FileTokenStore, MemoryTokenStore, TokenSet,
    TokenStore,
};
pub use client::{ApiStatus, Client, ClientBuilder};
pub use collection::{Capabilities, PagedCollection, Parent, ResourceId};
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use http::{HttpClient, RequestOptions};
