//! Remote leaderboard configuration
//!
//! Endpoint and token are deployment secrets. Native builds read them from
//! the environment (optionally via a `.env` file); the browser build reads
//! `<meta>` tags injected into the page at deploy time.

use thiserror::Error;

/// Environment variable holding the store endpoint
pub const ENDPOINT_VAR: &str = "LEADERBOARD_URL";
/// Environment variable holding the bearer token
pub const TOKEN_VAR: &str = "LEADERBOARD_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("endpoint must be an http(s) URL, got '{0}'")]
    InvalidEndpoint(String),
}

/// Where the leaderboard lives and how to authenticate
#[derive(Clone, PartialEq, Eq)]
pub struct LeaderboardConfig {
    pub endpoint: String,
    pub token: String,
}

impl std::fmt::Debug for LeaderboardConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeaderboardConfig")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl LeaderboardConfig {
    /// Build from raw values, trimming whitespace
    pub fn from_parts(
        endpoint: Option<String>,
        token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let endpoint = endpoint
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(ENDPOINT_VAR))?;
        let token = token
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(TOKEN_VAR))?;

        let config = Self { endpoint, token };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(ConfigError::InvalidEndpoint(self.endpoint.clone()));
        }
        Ok(())
    }

    /// Load from the environment (after `.env`, if present)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("Loaded environment from {}", path.display());
        }
        Self::from_parts(std::env::var(ENDPOINT_VAR).ok(), std::env::var(TOKEN_VAR).ok())
    }

    /// Load from `<meta name="leaderboard-endpoint|leaderboard-token">`
    #[cfg(target_arch = "wasm32")]
    pub fn from_document() -> Result<Self, ConfigError> {
        let document = web_sys::window().and_then(|w| w.document());
        let meta = |name: &str| {
            document
                .as_ref()?
                .query_selector(&format!("meta[name=\"{}\"]", name))
                .ok()
                .flatten()?
                .get_attribute("content")
        };
        Self::from_parts(meta("leaderboard-endpoint"), meta("leaderboard-token"))
    }

    /// Platform-appropriate loader; logs and returns None when unconfigured
    pub fn load() -> Option<Self> {
        #[cfg(target_arch = "wasm32")]
        let loaded = Self::from_document();
        #[cfg(not(target_arch = "wasm32"))]
        let loaded = Self::from_env();

        match loaded {
            Ok(config) => {
                log::info!("Leaderboard endpoint: {}", config.endpoint);
                Some(config)
            }
            Err(e) => {
                log::warn!("Remote leaderboard disabled: {}", e);
                None
            }
        }
    }
}
