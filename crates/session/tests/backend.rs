use alloy_primitives::b256;
use alloy_signer_local::PrivateKeySigner;
use cw_config::CommunityConfig;
use cw_session::{SessionError, confirm_session_request, send_session_request};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> CommunityConfig {
    let raw = json!({
        "community": {
            "name": "Test Community",
            "description": "A test community",
            "url": "https://test.commonswallet.org",
            "alias": "test",
            "logo": "https://test.commonswallet.org/logo.png",
            "profile": { "address": "0x6872b14B11B127B8fD3ccB9e1A43fA92Bf2F6564", "chain_id": 137 },
            "primary_token": { "address": "0x8f8b1972eBf05D90E4E2B882A647A7C9eb3A4C29", "chain_id": 137 },
            "primary_account_factory": { "address": "0x940e47a0BFD36e125BBa3Ced1a9a0e965F0b6A06", "chain_id": 137 },
            "primary_session_manager": { "address": "0xE544c1dd8bcC27a412Ce2c21406a35F544F99035", "chain_id": 137 }
        },
        "tokens": {
            "137:0x8f8b1972ebf05d90e4e2b882a647a7c9eb3a4c29": {
                "standard": "ERC20",
                "name": "Test Token",
                "address": "0x8f8b1972eBf05D90E4E2B882A647A7C9eb3A4C29",
                "symbol": "TST",
                "decimals": 6,
                "chain_id": 137
            }
        },
        "scan": { "url": "https://polygonscan.com", "name": "Polygonscan" },
        "accounts": {
            "137:0x940e47a0bfd36e125bba3ced1a9a0e965f0b6a06": {
                "chain_id": 137,
                "entrypoint_address": "0xB8E2f3b1bcBD1787ed0eb14E25480f5D6E97eAbc",
                "paymaster_address": "0x4E51552731aedCd70D725E4712A310Ae154D1E24",
                "account_factory_address": "0x940e47a0BFD36e125BBa3Ced1a9a0e965F0b6A06",
                "paymaster_type": "cw"
            }
        },
        "sessions": {
            "137:0xe544c1dd8bcc27a412ce2c21406a35f544f99035": {
                "chain_id": 137,
                "provider_address": "0x1dB0A6F5a7E5b74D0b0DAb6e41E0520e1f73e9d7",
                "module_address": "0xE544c1dd8bcC27a412Ce2c21406a35F544F99035"
            }
        },
        "chains": {
            "137": { "id": 137, "node": { "url": "http://127.0.0.1:1", "ws_url": "http://127.0.0.1:1" } }
        },
        "ipfs": { "url": "https://ipfs.internal.test.org" },
        "config_location": "https://config.test.org/test.json",
        "version": 4
    });
    CommunityConfig::new(serde_json::from_value(raw).unwrap())
}

fn signer() -> PrivateKeySigner {
    "4c0883a69102937d6231471b5dbb6204fe51296170827936ea5cce4b76994b0f"
        .parse::<PrivateKeySigner>()
        .unwrap()
}

#[tokio::test]
async fn request_posts_and_returns_both_hashes() {
    let server = MockServer::start().await;
    let tx_hash = "0x1111111111111111111111111111111111111111111111111111111111111111";

    Mock::given(method("POST"))
        .and(path("/session"))
        .and(body_partial_json(json!({
            "provider": "0x1db0a6f5a7e5b74d0b0dab6e41e0520e1f73e9d7",
            "source": "+32478121212",
            "type": "sms"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "sessionRequestTxHash": tx_hash })),
        )
        .mount(&server)
        .await;

    let url = format!("{}/session", server.uri());
    let result = send_session_request(&url, &test_config(), &signer(), "+32478121212", "sms")
        .await
        .unwrap();
    assert_eq!(format!("{}", result.tx_hash), tx_hash);
}

#[tokio::test]
async fn bad_request_means_invalid_challenge() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "bad code" })))
        .mount(&server)
        .await;

    let err = send_session_request(&server.uri(), &test_config(), &signer(), "+32478121212", "sms")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::InvalidChallenge));
}

#[tokio::test]
async fn missing_tx_hash_surfaces_the_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "error": "pending challenge" })),
        )
        .mount(&server)
        .await;

    let err = send_session_request(&server.uri(), &test_config(), &signer(), "+32478121212", "sms")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::Backend(msg) if msg == "pending challenge"));
}

#[tokio::test]
async fn confirm_patches_with_the_derived_session_hash() {
    let server = MockServer::start().await;
    let request_hash =
        b256!("15ad40feb49bfd3799d6ac9fef3f56840b9d444768f1c4709ff68dcdfc4fad0a");
    let confirm_tx = "0x2222222222222222222222222222222222222222222222222222222222222222";

    Mock::given(method("PATCH"))
        .and(body_partial_json(json!({
            "sessionRequestHash": format!("{request_hash}"),
            "sessionHash": "0x7eff1431c5a1ae00432446e207f12cdc0c868ef2351c32da3dbd429cd7d0f18d"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "sessionConfirmTxHash": confirm_tx })),
        )
        .mount(&server)
        .await;

    let tx = confirm_session_request(&server.uri(), &test_config(), &signer(), request_hash, 123456)
        .await
        .unwrap();
    assert_eq!(format!("{tx}"), confirm_tx);
}
