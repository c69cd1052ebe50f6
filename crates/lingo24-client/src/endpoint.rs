//! Deployment endpoints.
//!
//! Lingo24 runs two deployments, each with an "Ease" host that serves the
//! OAuth consent page and an API host for everything else.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{Error, Result};

const LIVE_EASE_URL: &str = "https://ease.lingo24.com/";
const LIVE_API_URL: &str = "https://api.lingo24.com/docs/v1/";
const DEMO_EASE_URL: &str = "https://ease-demo.lingo24.com/";
const DEMO_API_URL: &str = "https://api-demo.lingo24.com/docs/v1/";

/// A Lingo24 deployment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// Production.
    #[default]
    Live,
    /// Sandbox deployment for integration work.
    Demo,
    /// Explicit hosts, for private deployments and mock servers.
    Custom {
        /// Base URL of the consent host.
        ease: Url,
        /// Base URL of the API.
        api: Url,
    },
}

impl Endpoint {
    /// Build a custom endpoint. Both bases are normalised to end in `/` so
    /// relative paths join beneath them.
    pub fn custom(ease: &str, api: &str) -> Result<Self> {
        Ok(Endpoint::Custom {
            ease: normalize_base(Url::parse(ease)?),
            api: normalize_base(Url::parse(api)?),
        })
    }

    /// Base URL of the consent host.
    pub fn ease_url(&self) -> Url {
        match self {
            Endpoint::Live => parse_static(LIVE_EASE_URL),
            Endpoint::Demo => parse_static(DEMO_EASE_URL),
            Endpoint::Custom { ease, .. } => ease.clone(),
        }
    }

    /// Base URL of the API.
    pub fn api_url(&self) -> Url {
        match self {
            Endpoint::Live => parse_static(LIVE_API_URL),
            Endpoint::Demo => parse_static(DEMO_API_URL),
            Endpoint::Custom { api, .. } => api.clone(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Live => f.write_str("live"),
            Endpoint::Demo => f.write_str("demo"),
            Endpoint::Custom { api, .. } => write!(f, "custom ({})", api),
        }
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "live" => Ok(Endpoint::Live),
            "demo" => Ok(Endpoint::Demo),
            other => Err(Error::InvalidArgument(format!(
                "unknown endpoint '{}' (expected 'live' or 'demo')",
                other
            ))),
        }
    }
}

fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

// The constants above are valid absolute URLs.
fn parse_static(url: &'static str) -> Url {
    Url::parse(url).unwrap_or_else(|e| unreachable!("invalid built-in URL {url}: {e}"))
}
