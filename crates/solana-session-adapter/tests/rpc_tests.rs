/*
[INPUT]:  Mock JSON-RPC responses
[OUTPUT]: Test results for the RPC client
[POS]:    Integration tests - network RPC endpoint
[UPDATE]: When RPC methods or error mapping change
*/

mod common;

use common::{balance_response, setup_mock_server};
use solana_session_adapter::{Pubkey, RpcClient, SessionError, PUBKEY_LEN};
use tokio_test::assert_ok;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

fn test_pubkey() -> Pubkey {
    Pubkey::new([3u8; PUBKEY_LEN])
}

#[tokio::test]
async fn test_get_balance_sends_jsonrpc_request() {
    let server = setup_mock_server().await;
    let pubkey = test_pubkey();

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(serde_json::json!({
            "jsonrpc": "2.0",
            "method": "getBalance",
            "params": [pubkey.to_base58()],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(balance_response(42)))
        .expect(1)
        .mount(&server)
        .await;

    let client = assert_ok!(RpcClient::new(&server.uri()));
    let lamports = assert_ok!(client.get_balance(&pubkey).await);
    assert_eq!(lamports, 42);
}

#[tokio::test]
async fn test_rpc_error_object_maps_to_network_error() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Invalid param: WrongSize" },
        })))
        .mount(&server)
        .await;

    let client = assert_ok!(RpcClient::new(&server.uri()));
    let err = client.get_balance(&test_pubkey()).await.unwrap_err();
    match err {
        SessionError::Network(msg) => {
            assert!(msg.contains("-32602"));
            assert!(msg.contains("WrongSize"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_http_failure_maps_to_network_error() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = assert_ok!(RpcClient::new(&server.uri()));
    let err = client.get_balance(&test_pubkey()).await.unwrap_err();
    assert!(matches!(err, SessionError::Network(_)));
}

#[tokio::test]
async fn test_malformed_body_maps_to_invalid_response() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = assert_ok!(RpcClient::new(&server.uri()));
    let err = client.get_balance(&test_pubkey()).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_missing_result_maps_to_invalid_response() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "jsonrpc": "2.0", "id": 1 })),
        )
        .mount(&server)
        .await;

    let client = assert_ok!(RpcClient::new(&server.uri()));
    let err = client.get_balance(&test_pubkey()).await.unwrap_err();
    assert!(matches!(err, SessionError::InvalidResponse(_)));
}
