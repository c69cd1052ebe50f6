//! CLI command handlers.

pub mod auth;
pub mod config;
pub mod file;
pub mod list;
pub mod project;
pub mod status;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, bail};
use serde::Serialize;

use lingo24_client::{Authenticator, Client, Credentials, Endpoint, FileTokenStore};
use lingo24_config::{ConfigError, LoadedConfig};

/// Discover the config files, or load exactly `explicit` when given.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig> {
    Ok(match explicit {
        Some(path) => lingo24_config::load_config_from(path)?,
        None => lingo24_config::load_config(None)?,
    })
}

/// Shared context for all commands.
#[derive(Debug)]
pub struct Context {
    /// Effective configuration and where it came from.
    pub loaded: LoadedConfig,
    /// `--endpoint` flag, which beats the config file.
    pub endpoint_override: Option<Endpoint>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    pub fn new(
        loaded: LoadedConfig,
        endpoint: Option<&str>,
        json_output: bool,
        verbose: bool,
    ) -> Result<Self> {
        let endpoint_override = endpoint.map(str::parse::<Endpoint>).transpose()?;
        Ok(Self {
            loaded,
            endpoint_override,
            json_output,
            verbose,
        })
    }

    /// Deployment: `--endpoint`, then `api_url`/`ease_url`, then `endpoint`,
    /// then live.
    pub fn endpoint(&self) -> Result<Endpoint> {
        if let Some(endpoint) = &self.endpoint_override {
            return Ok(endpoint.clone());
        }

        let config = &self.loaded.config;
        match (&config.api_url, &config.ease_url) {
            (Some(api), Some(ease)) => Ok(Endpoint::custom(ease, api)?),
            (Some(_), None) | (None, Some(_)) => {
                bail!("api_url and ease_url must be configured together")
            }
            (None, None) => match &config.endpoint {
                Some(name) => Ok(name.parse()?),
                None => Ok(Endpoint::default()),
            },
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.loaded.config.timeout_secs())
    }

    /// Where tokens are persisted, if anywhere.
    pub fn token_file(&self) -> Option<PathBuf> {
        let oauth = self.loaded.config.oauth.clone().unwrap_or_default();
        oauth.resolved_token_file(self.loaded.config_dir.as_deref())
    }

    /// Authenticator built from the `[oauth]` section, backed by the token
    /// file.
    pub fn authenticator(&self) -> Result<Authenticator> {
        let oauth = self.loaded.config.require_oauth()?;
        let secret = oauth.require_client_secret()?;
        tracing::debug!(source = %secret.source, "resolved client secret");

        let credentials = Credentials::new(
            oauth.require_client_id()?,
            secret.value,
            oauth.require_redirect_url()?,
        );
        let token_file = self.token_file().ok_or(ConfigError::NoConfigDir)?;

        Ok(Authenticator::builder(credentials)
            .endpoint(self.endpoint()?)
            .store(FileTokenStore::open(token_file)?)
            .timeout(self.timeout())
            .build()?)
    }

    /// Authenticator holding only the client id and redirect URL, enough to
    /// build the consent URL.
    pub fn consent_authenticator(&self) -> Result<Authenticator> {
        let oauth = self.loaded.config.require_oauth()?;
        let credentials = Credentials::new(
            oauth.require_client_id()?,
            "",
            oauth.require_redirect_url()?,
        );

        Ok(Authenticator::builder(credentials)
            .endpoint(self.endpoint()?)
            .timeout(self.timeout())
            .build()?)
    }

    /// API client for authenticated commands.
    pub fn client(&self) -> Result<Client> {
        self.build_client(self.authenticator()?)
    }

    /// Client for endpoints that need no token. Falls back to blank
    /// credentials when no `[oauth]` section is configured.
    pub fn anonymous_client(&self) -> Result<Client> {
        let authenticator = match self.authenticator() {
            Ok(authenticator) => authenticator,
            Err(e) => {
                tracing::debug!(error = %e, "using blank credentials");
                Authenticator::builder(Credentials::new("", "", ""))
                    .endpoint(self.endpoint()?)
                    .timeout(self.timeout())
                    .build()?
            }
        };
        self.build_client(authenticator)
    }

    fn build_client(&self, authenticator: Authenticator) -> Result<Client> {
        Ok(Client::builder(authenticator)
            .per_page(self.loaded.config.per_page())
            .timeout(self.timeout())
            .build()?)
    }

    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
