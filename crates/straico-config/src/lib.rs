#![allow(clippy::must_use_candidate)]

//! Configuration for the Straico client
//!
//! Settings come either from a TOML file with `{{ env.VAR }}` placeholders
//! or directly from `STRAICO_*` environment variables.

mod env;
mod loader;

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use straico_client::ClientConfig;

pub use loader::{API_KEY_VAR, BASE_URL_VAR, TIMEOUT_VAR};

/// Straico connection settings
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StraicoConfig {
    /// API key obtained from the Straico account
    pub api_key: SecretString,
    /// Base URL for the v1 endpoints
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_base_url() -> String {
    straico_client::DEFAULT_BASE_URL.to_owned()
}

const fn default_timeout() -> u64 {
    straico_client::DEFAULT_TIMEOUT.as_secs()
}

impl StraicoConfig {
    /// Connection settings for [`straico_client::StraicoClient::new`]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
