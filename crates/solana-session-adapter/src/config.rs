/*
[INPUT]:  Process environment variables and serde sources
[OUTPUT]: Validated session configuration
[POS]:    Configuration layer - startup parameters for the session manager
[UPDATE]: When adding new configuration options
*/

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SessionError};
use crate::types::{LoginMethod, Network};

/// Environment variable holding the required provider client identifier
pub const CLIENT_ID_ENV_VAR: &str = "SOLANA_SESSION_CLIENT_ID";
/// Environment variable selecting the network environment (optional)
pub const NETWORK_ENV_VAR: &str = "SOLANA_SESSION_NETWORK";
/// Environment variable overriding the RPC endpoint URL (optional)
pub const RPC_URL_ENV_VAR: &str = "SOLANA_SESSION_RPC_URL";

/// Configuration for a session manager instance
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Client identifier registered with the identity provider (required)
    pub client_id: String,
    /// Network environment the session is bound to
    #[serde(default)]
    pub network: Network,
    /// RPC endpoint override; falls back to the network default when absent
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Login methods offered by the provider's interactive flow
    #[serde(default = "default_login_methods")]
    pub login_methods: Vec<LoginMethod>,
    /// Timeout for identity provider calls, in seconds
    #[serde(default = "default_provider_timeout_secs")]
    pub provider_timeout_secs: u64,
    /// Timeout for RPC calls, in seconds
    #[serde(default = "default_rpc_timeout_secs")]
    pub rpc_timeout_secs: u64,
    /// Connect timeout for RPC calls, in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_login_methods() -> Vec<LoginMethod> {
    vec![LoginMethod::Google]
}

fn default_provider_timeout_secs() -> u64 {
    60
}

fn default_rpc_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl SessionConfig {
    /// Create a configuration with defaults for the given client id
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            network: Network::default(),
            rpc_url: None,
            login_methods: default_login_methods(),
            provider_timeout_secs: default_provider_timeout_secs(),
            rpc_timeout_secs: default_rpc_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    /// Load configuration from the process environment.
    ///
    /// A missing client identifier is fatal; network and RPC URL fall back
    /// to devnet defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let client_id = lookup(CLIENT_ID_ENV_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                SessionError::Config(format!("{CLIENT_ID_ENV_VAR} is not set"))
            })?;

        let mut config = Self::new(client_id);
        if let Some(network) = lookup(NETWORK_ENV_VAR) {
            config.network = network.parse()?;
        }
        config.rpc_url = lookup(RPC_URL_ENV_VAR).filter(|value| !value.trim().is_empty());
        config.validate()?;
        Ok(config)
    }

    /// Validate invariants that serde defaults cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(SessionError::Config(
                "client_id must not be empty".to_string(),
            ));
        }
        if self.login_methods.is_empty() {
            return Err(SessionError::Config(
                "login_methods must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// RPC endpoint in effect (override or network default)
    pub fn effective_rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_rpc_url())
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_client_id_is_fatal() {
        let err = SessionConfig::from_lookup(lookup_from(&[])).unwrap_err();
        match err {
            SessionError::Config(msg) => assert!(msg.contains(CLIENT_ID_ENV_VAR)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_defaults_applied() {
        let config =
            SessionConfig::from_lookup(lookup_from(&[(CLIENT_ID_ENV_VAR, "client-123")]))
                .unwrap();
        assert_eq!(config.client_id, "client-123");
        assert_eq!(config.network, Network::Devnet);
        assert_eq!(config.effective_rpc_url(), "https://api.devnet.solana.com");
        assert_eq!(config.login_methods, vec![LoginMethod::Google]);
    }

    #[test]
    fn test_network_and_rpc_override() {
        let config = SessionConfig::from_lookup(lookup_from(&[
            (CLIENT_ID_ENV_VAR, "client-123"),
            (NETWORK_ENV_VAR, "testnet"),
            (RPC_URL_ENV_VAR, "http://localhost:8899"),
        ]))
        .unwrap();
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.effective_rpc_url(), "http://localhost:8899");
    }

    #[test]
    fn test_bad_network_rejected() {
        let err = SessionConfig::from_lookup(lookup_from(&[
            (CLIENT_ID_ENV_VAR, "client-123"),
            (NETWORK_ENV_VAR, "moonnet"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn test_deserialized_config_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"client_id":"abc"}"#).unwrap();
        assert_eq!(config.provider_timeout(), Duration::from_secs(60));
        assert_eq!(config.rpc_timeout(), Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }
}
