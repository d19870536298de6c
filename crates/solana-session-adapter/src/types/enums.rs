/*
[INPUT]:  Recognized network environments and login methods
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - enumerated configuration options
[UPDATE]: When supporting new networks or login methods
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Solana network environment the session is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

impl Network {
    /// Chain identifier used when registering with the identity provider
    pub fn chain_id(&self) -> &'static str {
        match self {
            Network::Mainnet => "0x1",
            Network::Testnet => "0x2",
            Network::Devnet => "0x3",
        }
    }

    /// Public RPC endpoint used when no override is configured
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => "https://api.mainnet-beta.solana.com",
            Network::Testnet => "https://api.testnet.solana.com",
            Network::Devnet => "https://api.devnet.solana.com",
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Devnet
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Devnet => "devnet",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = SessionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mainnet" | "mainnet-beta" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "devnet" => Ok(Network::Devnet),
            other => Err(SessionError::Config(format!(
                "Unrecognized network '{other}', expected mainnet, testnet, or devnet"
            ))),
        }
    }
}

/// Social login method accepted by the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginMethod {
    Google,
    Facebook,
    Twitter,
    Discord,
    Email,
}
