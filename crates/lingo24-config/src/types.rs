//! Configuration types mapping to the TOML schema.
//!
//! ```toml
//! endpoint = "demo"          # live | demo
//! per_page = 25
//! timeout_secs = 30
//!
//! [oauth]
//! client_id = "abc"
//! client_secret_env = "LINGO24_CLIENT_SECRET"
//! redirect_url = "https://example.com/callback"
//! token_file = "~/.config/lingo24/tokens.json"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::secrets::{DEFAULT_SECRET_ENV, ResolvedSecret, SecretSource};
use crate::{ConfigError, Result};

/// Page size used when none is configured.
pub const DEFAULT_PER_PAGE: u32 = 25;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Token file name inside the config directory.
pub const DEFAULT_TOKEN_FILE: &str = "tokens.json";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// Every field is optional so that partial files (e.g. a project-local
/// override) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lingo24Config {
    /// Deployment name: `live` or `demo`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// API base URL for a private deployment; overrides `endpoint`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Consent host for a private deployment; used with `api_url`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ease_url: Option<String>,
    /// Collection page size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    /// HTTP request timeout in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    /// OAuth2 client registration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oauth: Option<OAuthConfig>,
}

impl Lingo24Config {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    pub fn merge(&mut self, other: Lingo24Config) {
        if other.endpoint.is_some() {
            self.endpoint = other.endpoint;
        }
        if other.api_url.is_some() {
            self.api_url = other.api_url;
        }
        if other.ease_url.is_some() {
            self.ease_url = other.ease_url;
        }
        if other.per_page.is_some() {
            self.per_page = other.per_page;
        }
        if other.timeout_secs.is_some() {
            self.timeout_secs = other.timeout_secs;
        }
        match (&mut self.oauth, other.oauth) {
            (Some(base), Some(layer)) => base.merge(layer),
            (base @ None, layer) => *base = layer,
            (Some(_), None) => {}
        }
    }

    /// Configured page size, or [`DEFAULT_PER_PAGE`].
    pub fn per_page(&self) -> u32 {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    /// Configured timeout, or [`DEFAULT_TIMEOUT_SECS`].
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    /// The `[oauth]` section, or an error naming the missing section.
    pub fn require_oauth(&self) -> Result<&OAuthConfig> {
        self.oauth.as_ref().ok_or_else(|| ConfigError::MissingField {
            field: "oauth".to_string(),
            context: "config".to_string(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OAuth Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// OAuth2 client registration and token storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Client id issued by Lingo24.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Client secret (prefer `client_secret_env`; warns if set here).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Environment variable holding the client secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret_env: Option<String>,
    /// Redirect URL registered with the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
    /// Where tokens are persisted. `~` expands to the home directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<PathBuf>,
}

impl OAuthConfig {
    /// Field-wise merge; set fields in `other` win.
    pub fn merge(&mut self, other: OAuthConfig) {
        if other.client_id.is_some() {
            self.client_id = other.client_id;
        }
        if other.client_secret.is_some() {
            self.client_secret = other.client_secret;
        }
        if other.client_secret_env.is_some() {
            self.client_secret_env = other.client_secret_env;
        }
        if other.redirect_url.is_some() {
            self.redirect_url = other.redirect_url;
        }
        if other.token_file.is_some() {
            self.token_file = other.token_file;
        }
    }

    /// Returns true if the client secret is stored directly in the config file.
    pub fn has_plaintext_secret(&self) -> bool {
        self.client_secret.is_some()
    }

    /// Environment variable consulted for the secret.
    pub fn secret_env_var(&self) -> &str {
        self.client_secret_env.as_deref().unwrap_or(DEFAULT_SECRET_ENV)
    }

    /// Resolve the client secret: environment variable first, then the
    /// plaintext value.
    pub fn resolve_client_secret(&self) -> Option<ResolvedSecret> {
        let env_var = self.secret_env_var();
        if let Ok(value) = std::env::var(env_var)
            && !value.is_empty()
        {
            return Some(ResolvedSecret {
                value,
                source: SecretSource::EnvVar(env_var.to_string()),
            });
        }

        self.client_secret.as_ref().map(|value| ResolvedSecret {
            value: value.clone(),
            source: SecretSource::ConfigFile,
        })
    }

    /// Like [`resolve_client_secret`](Self::resolve_client_secret), failing
    /// when no secret is available.
    pub fn require_client_secret(&self) -> Result<ResolvedSecret> {
        self.resolve_client_secret()
            .ok_or_else(|| ConfigError::SecretNotFound {
                env_var: self.secret_env_var().to_string(),
            })
    }

    pub fn require_client_id(&self) -> Result<&str> {
        self.client_id.as_deref().ok_or_else(|| missing_oauth_field("client_id"))
    }

    pub fn require_redirect_url(&self) -> Result<&str> {
        self.redirect_url
            .as_deref()
            .ok_or_else(|| missing_oauth_field("redirect_url"))
    }

    /// Token file path with `~` expanded, defaulting to `tokens.json` in
    /// `config_dir`.
    pub fn resolved_token_file(&self, config_dir: Option<&Path>) -> Option<PathBuf> {
        match &self.token_file {
            Some(path) => Some(expand_tilde(path)),
            None => config_dir.map(|dir| dir.join(DEFAULT_TOKEN_FILE)),
        }
    }
}

fn missing_oauth_field(field: &str) -> ConfigError {
    ConfigError::MissingField {
        field: field.to_string(),
        context: "[oauth]".to_string(),
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = Lingo24Config::from_toml(
            r#"
endpoint = "demo"
per_page = 10
timeout_secs = 5

[oauth]
client_id = "abc"
client_secret_env = "MY_SECRET"
redirect_url = "https://example.com/callback"
token_file = "/tmp/lingo24/tokens.json"
"#,
        )
        .unwrap();

        assert_eq!(config.endpoint.as_deref(), Some("demo"));
        assert_eq!(config.per_page(), 10);
        assert_eq!(config.timeout_secs(), 5);
        let oauth = config.require_oauth().unwrap();
        assert_eq!(oauth.require_client_id().unwrap(), "abc");
        assert_eq!(oauth.secret_env_var(), "MY_SECRET");
        assert!(!oauth.has_plaintext_secret());
        assert_eq!(
            oauth.resolved_token_file(None),
            Some(PathBuf::from("/tmp/lingo24/tokens.json"))
        );
    }

    #[test]
    fn test_defaults() {
        let config = Lingo24Config::from_toml("").unwrap();
        assert_eq!(config, Lingo24Config::new());
        assert_eq!(config.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(config.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert!(matches!(
            config.require_oauth(),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let config = Lingo24Config::from_toml("colour = \"blue\"\nper_page = 3").unwrap();
        assert_eq!(config.per_page, Some(3));
    }

    #[test]
    fn test_merge_overrides_and_keeps() {
        let mut base = Lingo24Config::from_toml(
            r#"
endpoint = "live"
per_page = 50

[oauth]
client_id = "base-id"
redirect_url = "https://base/cb"
"#,
        )
        .unwrap();
        let layer = Lingo24Config::from_toml(
            r#"
endpoint = "demo"

[oauth]
client_id = "project-id"
"#,
        )
        .unwrap();

        base.merge(layer);
        assert_eq!(base.endpoint.as_deref(), Some("demo"));
        assert_eq!(base.per_page, Some(50));
        let oauth = base.oauth.unwrap();
        assert_eq!(oauth.client_id.as_deref(), Some("project-id"));
        assert_eq!(oauth.redirect_url.as_deref(), Some("https://base/cb"));
    }

    #[test]
    fn test_merge_into_empty_oauth() {
        let mut base = Lingo24Config::new();
        base.merge(Lingo24Config::from_toml("[oauth]\nclient_id = \"x\"").unwrap());
        assert_eq!(base.oauth.unwrap().client_id.as_deref(), Some("x"));
    }

    #[test]
    fn test_toml_roundtrip_omits_unset() {
        let config = Lingo24Config {
            endpoint: Some("demo".into()),
            oauth: Some(OAuthConfig {
                client_id: Some("abc".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let text = config.to_toml().unwrap();
        assert!(!text.contains("per_page"));
        assert_eq!(Lingo24Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_secret_from_env_wins() {
        // unique variable name so parallel tests do not interfere
        let var = "LINGO24_TEST_SECRET_FROM_ENV";
        unsafe { std::env::set_var(var, "from-env") };

        let oauth = OAuthConfig {
            client_secret: Some("plaintext".into()),
            client_secret_env: Some(var.into()),
            ..Default::default()
        };
        let secret = oauth.resolve_client_secret().unwrap();
        assert_eq!(secret.value, "from-env");
        assert_eq!(secret.source, SecretSource::EnvVar(var.into()));

        unsafe { std::env::remove_var(var) };
    }

    #[test]
    fn test_secret_falls_back_to_plaintext() {
        let oauth = OAuthConfig {
            client_secret: Some("plaintext".into()),
            client_secret_env: Some("LINGO24_TEST_SECRET_UNSET".into()),
            ..Default::default()
        };
        assert!(oauth.has_plaintext_secret());
        let secret = oauth.require_client_secret().unwrap();
        assert_eq!(secret.value, "plaintext");
        assert_eq!(secret.source, SecretSource::ConfigFile);
    }

    #[test]
    fn test_missing_secret() {
        let oauth = OAuthConfig {
            client_secret_env: Some("LINGO24_TEST_SECRET_MISSING".into()),
            ..Default::default()
        };
        let err = oauth.require_client_secret().unwrap_err();
        assert!(err.to_string().contains("LINGO24_TEST_SECRET_MISSING"));
    }

    #[test]
    fn test_token_file_resolution() {
        let oauth = OAuthConfig::default();
        assert_eq!(oauth.resolved_token_file(None), None);
        assert_eq!(
            oauth.resolved_token_file(Some(Path::new("/etc/lingo24"))),
            Some(PathBuf::from("/etc/lingo24/tokens.json"))
        );

        let oauth = OAuthConfig {
            token_file: Some(PathBuf::from("~/tokens.json")),
            ..Default::default()
        };
        let resolved = oauth.resolved_token_file(None).unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(resolved, home.join("tokens.json"));
        }
    }

    #[test]
    fn test_expand_tilde_leaves_other_paths() {
        assert_eq!(expand_tilde(Path::new("/abs/path")), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde(Path::new("rel/~x")), PathBuf::from("rel/~x"));
    }
}
