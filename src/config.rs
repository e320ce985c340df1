//! Runtime parameters for the bridge.

use serde::{Deserialize, Serialize};

use crate::error::AdaptorError;
use crate::sign::MAX_NONCE_ATTEMPTS;

/// Environment variable overriding [`BridgeConfig::max_nonce_attempts`].
pub const MAX_NONCE_ATTEMPTS_ENV: &str = "ADAPTOR_BRIDGE_MAX_NONCE_ATTEMPTS";

/// Upper bound accepted for the retry cap.
pub const MAX_NONCE_ATTEMPTS_LIMIT: usize = 1024;

/// Bridge parameters. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Cap on blinded-nonce draws per adaptor signature.
    pub max_nonce_attempts: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            max_nonce_attempts: MAX_NONCE_ATTEMPTS,
        }
    }
}

impl BridgeConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, AdaptorError> {
        let config: BridgeConfig =
            serde_json::from_str(s).map_err(|e| AdaptorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, overridden by [`MAX_NONCE_ATTEMPTS_ENV`] when set.
    pub fn from_env() -> Result<Self, AdaptorError> {
        Self::with_override(std::env::var(MAX_NONCE_ATTEMPTS_ENV).ok().as_deref())
    }

    fn with_override(raw: Option<&str>) -> Result<Self, AdaptorError> {
        let mut config = BridgeConfig::default();
        if let Some(raw) = raw {
            config.max_nonce_attempts = raw
                .trim()
                .parse()
                .map_err(|_| AdaptorError::Config(format!("{MAX_NONCE_ATTEMPTS_ENV}={raw}")))?;
        }
        config.validate()?;
        Ok(config)
    }

    /// The retry cap must be in `1..=MAX_NONCE_ATTEMPTS_LIMIT`.
    pub fn validate(&self) -> Result<(), AdaptorError> {
        if !(1..=MAX_NONCE_ATTEMPTS_LIMIT).contains(&self.max_nonce_attempts) {
            return Err(AdaptorError::Config(format!(
                "max_nonce_attempts must be in 1..={MAX_NONCE_ATTEMPTS_LIMIT}, got {}",
                self.max_nonce_attempts
            )));
        }
        Ok(())
    }
}
