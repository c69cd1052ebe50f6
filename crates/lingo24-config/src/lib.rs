//! Configuration for the Lingo24 command-line client.
//!
//! Provides TOML-based configuration with:
//! - Config file layering (user config + project-local overrides)
//! - OAuth client registration and token file location
//! - Client secret resolution (env var, then config file)

pub mod discovery;
pub mod error;
pub mod secrets;
pub mod types;

pub use discovery::{
    CONFIG_DIR_ENV, ConfigSource, LoadedConfig, load_config, load_config_file, load_config_from,
    load_config_with_options, save_config, user_config_dir,
};
pub use error::{ConfigError, Result};
pub use secrets::{DEFAULT_SECRET_ENV, ResolvedSecret, SecretSource};
pub use types::*;
