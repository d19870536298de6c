/*
[INPUT]:  Endpoint URL, timeouts, and account public keys
[OUTPUT]: Native-token balances in lamports and SOL
[POS]:    RPC layer - JSON-RPC client implementation
[UPDATE]: When adding RPC methods or changing timeout behavior
*/

use std::time::Duration;

use reqwest::{Client, Url};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, SessionError};
use crate::types::Pubkey;

/// Lamports per SOL, the fixed scale of the native denomination
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Convert a raw smallest-unit balance to the human-displayed unit
pub fn lamports_to_sol(lamports: u64) -> Decimal {
    Decimal::from(lamports) / Decimal::from(LAMPORTS_PER_SOL)
}

/// RPC client configuration
#[derive(Debug, Clone)]
pub struct RpcConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct BalanceResult {
    value: u64,
}

/// JSON-RPC client for the network read endpoint
#[derive(Debug, Clone)]
pub struct RpcClient {
    http_client: Client,
    endpoint: Url,
    timeout_secs: u64,
}

impl RpcClient {
    /// Create a client for the given endpoint with default timeouts
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_config(endpoint, RpcConfig::default())
    }

    /// Create a client with explicit timeouts
    pub fn with_config(endpoint: &str, config: RpcConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http_client,
            endpoint: Url::parse(endpoint)?,
            timeout_secs: config.timeout.as_secs(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Query the native-token balance for an account, in lamports.
    ///
    /// POST {"jsonrpc":"2.0","method":"getBalance","params":[pubkey]}
    pub async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getBalance",
            "params": [pubkey.to_base58()],
        });

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Network(format!(
                "RPC endpoint returned HTTP {status}"
            )));
        }

        let payload: RpcResponse<BalanceResult> = response
            .json()
            .await
            .map_err(|e| SessionError::InvalidResponse(format!("Malformed RPC body: {e}")))?;

        if let Some(err) = payload.error {
            return Err(SessionError::Network(format!(
                "RPC error (code {}): {}",
                err.code, err.message
            )));
        }

        let lamports = payload
            .result
            .ok_or_else(|| {
                SessionError::InvalidResponse("RPC response missing result".to_string())
            })?
            .value;

        debug!(pubkey = %pubkey, lamports, "balance fetched");
        Ok(lamports)
    }

    fn map_transport_error(&self, err: reqwest::Error) -> SessionError {
        if err.is_timeout() {
            SessionError::Timeout {
                duration: self.timeout_secs,
            }
        } else {
            SessionError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(1, "0.000000001")]
    #[case(1_500_000_000, "1.5")]
    #[case(1_000_000_000, "1")]
    #[case(12_345_678_900, "12.3456789")]
    fn test_lamports_to_sol(#[case] lamports: u64, #[case] expected: &str) {
        assert_eq!(
            lamports_to_sol(lamports),
            expected.parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn test_rejects_invalid_endpoint() {
        assert!(RpcClient::new("not a url").is_err());
    }
}
