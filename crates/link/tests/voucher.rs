use alloy_primitives::address;
use alloy_signer_local::PrivateKeySigner;
use cw_config::CommunityConfig;
use cw_link::{create_voucher, parse_voucher};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

struct RpcResult(serde_json::Value);

impl Respond for RpcResult {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": body["id"],
            "result": self.0,
        }))
    }
}

fn test_config(node_url: &str) -> CommunityConfig {
    let raw = json!({
        "community": {
            "name": "Test Community",
            "description": "A test community",
            "url": "https://test.commonswallet.org",
            "alias": "test",
            "custom_domain": "wallet.test.org",
            "logo": "https://test.commonswallet.org/logo.png",
            "profile": { "address": "0x6872b14B11B127B8fD3ccB9e1A43fA92Bf2F6564", "chain_id": 137 },
            "primary_token": { "address": "0x8f8b1972eBf05D90E4E2B882A647A7C9eb3A4C29", "chain_id": 137 },
            "primary_account_factory": { "address": "0x940e47a0BFD36e125BBa3Ced1a9a0e965F0b6A06", "chain_id": 137 }
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
        "chains": {
            "137": { "id": 137, "node": { "url": node_url, "ws_url": node_url } }
        },
        "ipfs": { "url": "https://ipfs.internal.test.org" },
        "config_location": "https://config.test.org/test.json",
        "version": 4
    });
    CommunityConfig::new(serde_json::from_value(raw).unwrap())
}

#[tokio::test]
async fn voucher_round_trip_recovers_signer_and_metadata() {
    let server = MockServer::start().await;
    // factory getAddress view
    Mock::given(method("POST"))
        .and(path("/v1/rpc/0x4E51552731aedCd70D725E4712A310Ae154D1E24"))
        .and(body_partial_json(json!({ "method": "eth_call" })))
        .respond_with(RpcResult(json!(
            "0x0000000000000000000000001a90d4744979058aa58a8f981542cce348a85fd5"
        )))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let signer = "4c0883a69102937d6231471b5dbb6204fe51296170827936ea5cce4b76994b0f"
        .parse::<PrivateKeySigner>()
        .unwrap();
    let creator = address!("4250526126491EF53ca4A73e97151b5c2597F43c");

    let created = create_voucher(&config, "Welcome gift", creator, &signer, None)
        .await
        .unwrap();
    assert_eq!(created.account, address!("1a90d4744979058aa58a8F981542cCE348a85fd5"));
    assert!(created.link.starts_with("https://wallet.test.org/#/?voucher="));

    let (voucher, recovered) = parse_voucher(&created.link).unwrap();
    assert_eq!(voucher.alias, "test");
    assert_eq!(voucher.creator, creator);
    assert_eq!(voucher.account, created.account);
    assert_eq!(voucher.name, "Welcome gift");
    assert_eq!(recovered.address(), signer.address());
}

#[tokio::test]
async fn voucher_with_leading_zero_key_round_trips() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": "eth_call" })))
        .respond_with(RpcResult(json!(
            "0x0000000000000000000000001a90d4744979058aa58a8f981542cce348a85fd5"
        )))
        .mount(&server)
        .await;

    let config = test_config(&server.uri());
    let signer = "0011223344556677889900112233445566778899001122334455667788990011"
        .parse::<PrivateKeySigner>()
        .unwrap();
    let creator = address!("4250526126491EF53ca4A73e97151b5c2597F43c");

    let created = create_voucher(&config, "Gift", creator, &signer, None).await.unwrap();
    let (_, recovered) = parse_voucher(&created.link).unwrap();
    assert_eq!(recovered.address(), signer.address());
}
