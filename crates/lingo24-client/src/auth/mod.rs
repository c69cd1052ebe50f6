//! OAuth2 authentication.
//!
//! - [`oauth`]: authorization URL, code exchange and token refresh
//! - [`store`]: token persistence

pub mod oauth;
pub mod store;

pub use oauth::{Authenticator, AuthenticatorBuilder, Credentials};
pub use store::{FileTokenStore, MemoryTokenStore, TokenSet, TokenStore};
