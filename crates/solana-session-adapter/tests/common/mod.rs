/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for solana-session-adapter tests

use std::sync::Arc;

use solana_session_adapter::{MockProvider, SessionConfig, SessionManager};
use wiremock::MockServer;

/// Setup a mock HTTP server standing in for the network RPC endpoint
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Session configuration pointing at a test RPC endpoint
#[allow(dead_code)]
pub fn test_config(rpc_url: &str) -> SessionConfig {
    let mut config = SessionConfig::new("test-client-id");
    config.rpc_url = Some(rpc_url.to_string());
    config
}

/// Build a session manager wired to a fresh mock provider
#[allow(dead_code)]
pub fn manager_with_mock(rpc_url: &str) -> (SessionManager, Arc<MockProvider>) {
    let provider = Arc::new(MockProvider::new());
    let manager = SessionManager::new(test_config(rpc_url), provider.clone())
        .expect("manager construction");
    (manager, provider)
}

/// JSON-RPC getBalance success body for the given lamport amount
#[allow(dead_code)]
pub fn balance_response(lamports: u64) -> serde_json::Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": { "context": { "slot": 1 }, "value": lamports },
    })
}
