use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

use crate::StraicoConfig;

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "STRAICO_API_KEY";

/// Environment variable overriding the base URL
pub const BASE_URL_VAR: &str = "STRAICO_BASE_URL";

/// Environment variable overriding the timeout, in whole seconds
pub const TIMEOUT_VAR: &str = "STRAICO_TIMEOUT";

impl StraicoConfig {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a referenced variable is
    /// unset, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if placeholder expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded = crate::env::expand_env(raw)
            .map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self =
            toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Build configuration from `STRAICO_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is unset, the timeout is not an
    /// integer, or validation fails
    pub fn from_env() -> anyhow::Result<Self> {
        let api_key =
            std::env::var(API_KEY_VAR).map_err(|_| anyhow::anyhow!("{API_KEY_VAR} is not set"))?;

        let base_url = std::env::var(BASE_URL_VAR).unwrap_or_else(|_| crate::default_base_url());

        let timeout = match std::env::var(TIMEOUT_VAR) {
            Ok(raw) => raw.trim().parse().map_err(|e| {
                anyhow::anyhow!("{TIMEOUT_VAR} must be a whole number of seconds: {e}")
            })?,
            Err(_) => crate::default_timeout(),
        };

        let config = Self {
            api_key: SecretString::from(api_key),
            base_url,
            timeout,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate that the settings can build a client
    ///
    /// # Errors
    ///
    /// Returns an error if the key or URL is blank or the timeout is zero
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            anyhow::bail!("api_key must not be empty");
        }

        if self.base_url.trim().trim_end_matches('/').is_empty() {
            anyhow::bail!("base_url must not be empty");
        }

        if self.timeout == 0 {
            anyhow::bail!("timeout must be greater than 0");
        }

        tracing::debug!(
            base_url = %self.base_url,
            timeout = self.timeout,
            "loaded Straico configuration"
        );

        Ok(())
    }
}
