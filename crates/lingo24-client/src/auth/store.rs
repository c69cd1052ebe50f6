//! Token persistence.
//!
//! The authenticator reads and replaces the whole token set through a
//! [`TokenStore`]; what a store does with it (keep it in memory, write it to
//! disk, put it in a keychain) is up to the implementation.

use std::fmt;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default token file name within the lingo24 config directory.
pub const TOKEN_FILE: &str = "tokens.json";

// ============================================================================
// TokenSet
// ============================================================================

/// The current OAuth2 token set.
///
/// Every field is optional: a store may have been seeded with nothing but an
/// access token, and a fresh store holds nothing at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token sent with API requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Token exchanged for a new access token once it expires.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Lifetime reported by the server, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Absolute expiry as a unix timestamp (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl TokenSet {
    /// A token set holding only an access token, with no known expiry.
    pub fn with_access_token(token: impl Into<String>) -> Self {
        Self {
            access_token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Whether the token expired before `now` (unix seconds). A set with no
    /// recorded expiry never counts as expired.
    pub fn is_expired_at(&self, now: i64) -> bool {
        matches!(self.expires_at, Some(expires_at) if expires_at < now)
    }

    /// Whether nothing has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

// ============================================================================
// TokenStore Trait
// ============================================================================

/// Pluggable persistence for the current token set.
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Current token set (empty if nothing has been stored).
    fn get(&self) -> TokenSet;

    /// Replace the stored token set.
    fn set(&self, tokens: TokenSet) -> Result<()>;

    /// Forget all tokens.
    fn clear(&self) -> Result<()> {
        self.set(TokenSet::default())
    }
}

// ============================================================================
// MemoryTokenStore
// ============================================================================

/// In-memory token store. Tokens are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<TokenSet>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with a token set.
    pub fn with_tokens(tokens: TokenSet) -> Self {
        Self {
            tokens: RwLock::new(tokens),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> TokenSet {
        self.tokens.read().clone()
    }

    fn set(&self, tokens: TokenSet) -> Result<()> {
        *self.tokens.write() = tokens;
        Ok(())
    }
}

// ============================================================================
// FileTokenStore
// ============================================================================

/// JSON file token store. The file is read once on open and rewritten on
/// every `set`.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cached: RwLock<TokenSet>,
}

impl FileTokenStore {
    /// Open a store backed by `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tokens = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                Error::Store(format!("Failed to read token file {}: {}", path.display(), e))
            })?;
            serde_json::from_str(&content).map_err(|e| {
                Error::Store(format!("Failed to parse token file {}: {}", path.display(), e))
            })?
        } else {
            TokenSet::default()
        };

        Ok(Self {
            path,
            cached: RwLock::new(tokens),
        })
    }

    /// Open the default token file inside `dir`.
    pub fn in_dir(dir: &Path) -> Result<Self> {
        Self::open(dir.join(TOKEN_FILE))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> TokenSet {
        self.cached.read().clone()
    }

    fn set(&self, tokens: TokenSet) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Store(format!("Failed to create token directory: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(&tokens)?;
        std::fs::write(&self.path, json)
            .map_err(|e| Error::Store(format!("Failed to write token file: {}", e)))?;

        *self.cached.write() = tokens;
        tracing::debug!(path = %self.path.display(), "tokens saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .map_err(|e| Error::Store(format!("Failed to delete token file: {}", e)))?;
        }
        *self.cached.write() = TokenSet::default();
        Ok(())
    }
}
