//! Signature auth ("connect"): proving control of an account to a web
//! backend with a signed, expiring message carried in headers or query
//! parameters.

use alloy_primitives::{Address, B256, Bytes, keccak256};
use alloy_signer::Signer;
use chrono::{DateTime, NaiveDateTime, Utc};
use cw_config::CommunityConfig;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::error::SessionError;

pub const SIGAUTH_ACCOUNT_HEADER: &str = "x-sigauth-account";
pub const SIGAUTH_EXPIRY_HEADER: &str = "x-sigauth-expiry";
pub const SIGAUTH_SIGNATURE_HEADER: &str = "x-sigauth-signature";
pub const SIGAUTH_REDIRECT_HEADER: &str = "x-sigauth-redirect";

const ACCOUNT_PARAM: &str = "sigAuthAccount";
const EXPIRY_PARAM: &str = "sigAuthExpiry";
const SIGNATURE_PARAM: &str = "sigAuthSignature";
const REDIRECT_PARAM: &str = "sigAuthRedirect";

/// Everything `encodeURIComponent` escapes. The unreserved marks stay
/// literal so hashes line up with the web clients.
const REDIRECT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a redirect the way browsers and the mobile clients do.
fn encode_redirect(redirect: &str) -> String {
    utf8_percent_encode(redirect, REDIRECT_ENCODE_SET).to_string()
}

/// The hash both sides sign and verify. The account is rendered in its
/// checksummed form so casing differences between clients cannot change the
/// hash.
pub fn generate_connection_message(
    account: Address,
    expiry: &str,
    redirect: Option<&str>,
) -> B256 {
    let mut message =
        format!("Signature auth for {} with expiry {expiry}", account.to_checksum(None));
    if let Some(redirect) = redirect {
        message.push_str(" and redirect ");
        message.push_str(&encode_redirect(redirect));
    }
    keccak256(message)
}

/// A signed connection, ready to be attached to a request.
#[derive(Debug, Clone)]
pub struct ConnectedHeaders {
    pub account: Address,
    pub expiry: String,
    pub signature: Bytes,
    pub redirect: Option<String>,
}

impl ConnectedHeaders {
    /// Header name/value pairs, redirect included only when set.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (SIGAUTH_ACCOUNT_HEADER, self.account.to_checksum(None)),
            (SIGAUTH_EXPIRY_HEADER, self.expiry.clone()),
            (SIGAUTH_SIGNATURE_HEADER, self.signature.to_string()),
        ];
        if let Some(redirect) = &self.redirect {
            pairs.push((SIGAUTH_REDIRECT_HEADER, redirect.clone()));
        }
        pairs
    }
}

pub async fn generate_connected_headers<S: Signer + Sync>(
    signer: &S,
    account: Address,
    expiry: &str,
    redirect: Option<&str>,
) -> Result<ConnectedHeaders, SessionError> {
    let message = generate_connection_message(account, expiry, redirect);
    let signature = signer.sign_message(message.as_slice()).await?;
    Ok(ConnectedHeaders {
        account,
        expiry: expiry.to_string(),
        signature: Bytes::from(signature.as_bytes().to_vec()),
        redirect: redirect.map(str::to_string),
    })
}

/// Append the signed connection to a URL as query parameters, keeping any
/// query the URL already carries.
pub async fn create_connected_url<S: Signer + Sync>(
    url: &str,
    signer: &S,
    account: Address,
    expiry: &str,
    redirect: Option<&str>,
) -> Result<String, SessionError> {
    let message = generate_connection_message(account, expiry, redirect);
    let signature = signer.sign_message(message.as_slice()).await?;

    let mut url = Url::parse(url)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair(ACCOUNT_PARAM, &account.to_checksum(None));
        pairs.append_pair(EXPIRY_PARAM, expiry);
        pairs.append_pair(
            SIGNATURE_PARAM,
            &Bytes::from(signature.as_bytes().to_vec()).to_string(),
        );
        if let Some(redirect) = redirect {
            pairs.append_pair(REDIRECT_PARAM, redirect);
        }
    }
    Ok(url.into())
}

/// ISO-8601 (with or without zone) or unix seconds.
fn parse_expiry(raw: &str) -> Result<DateTime<Utc>, SessionError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(secs) = raw.parse::<i64>()
        && let Some(parsed) = DateTime::from_timestamp(secs, 0)
    {
        return Ok(parsed);
    }
    Err(SessionError::InvalidConnection(format!("unparseable expiry {raw:?}")))
}

async fn verify_connection(
    config: &CommunityConfig,
    account: Option<String>,
    expiry: Option<String>,
    signature: Option<String>,
    redirect: Option<String>,
    field_names: [&str; 3],
) -> Result<Option<Address>, SessionError> {
    let missing: Vec<&str> = [
        account.is_none().then_some(field_names[0]),
        expiry.is_none().then_some(field_names[1]),
        signature.is_none().then_some(field_names[2]),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !missing.is_empty() {
        return Err(SessionError::InvalidConnection(format!("missing {}", missing.join(", "))));
    }
    let (account, expiry, signature) = (
        account.unwrap_or_default(),
        expiry.unwrap_or_default(),
        signature.unwrap_or_default(),
    );

    if parse_expiry(&expiry)? < Utc::now() {
        return Err(SessionError::ConnectionExpired);
    }

    let account: Address = account
        .parse()
        .map_err(|_| SessionError::InvalidConnection(format!("bad account {account:?}")))?;
    let signature: Bytes = signature
        .parse()
        .map_err(|_| SessionError::InvalidConnection("bad signature encoding".to_string()))?;

    let message = generate_connection_message(account, &expiry, redirect.as_deref());
    let verified =
        cw_accounts::verify_account_ownership(config, account, message, &signature).await;
    Ok(verified.then_some(account))
}

/// Verify a connection carried in request headers. `header` is the caller's
/// lookup into whatever header map its framework uses.
pub async fn verify_connected_headers<F>(
    config: &CommunityConfig,
    header: F,
) -> Result<Option<Address>, SessionError>
where
    F: Fn(&str) -> Option<String>,
{
    verify_connection(
        config,
        header(SIGAUTH_ACCOUNT_HEADER),
        header(SIGAUTH_EXPIRY_HEADER),
        header(SIGAUTH_SIGNATURE_HEADER),
        header(SIGAUTH_REDIRECT_HEADER),
        [SIGAUTH_ACCOUNT_HEADER, SIGAUTH_EXPIRY_HEADER, SIGAUTH_SIGNATURE_HEADER],
    )
    .await
}

/// Verify a connection carried in a URL's query string.
pub async fn verify_connected_url(
    config: &CommunityConfig,
    url: &str,
) -> Result<Option<Address>, SessionError> {
    let url = Url::parse(url)?;
    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    };
    verify_connection(
        config,
        param(ACCOUNT_PARAM),
        param(EXPIRY_PARAM),
        param(SIGNATURE_PARAM),
        param(REDIRECT_PARAM),
        [ACCOUNT_PARAM, EXPIRY_PARAM, SIGNATURE_PARAM],
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256};
    use alloy_signer_local::PrivateKeySigner;
    use serde_json::json;

    fn unreachable_config() -> CommunityConfig {
        let raw = json!({
            "community": {
                "name": "Test Community",
                "description": "A test community",
                "url": "https://test.commonswallet.org",
                "alias": "test",
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

    #[test]
    fn message_hash_matches_known_vectors() {
        let account = address!("4250526126491EF53ca4A73e97151b5c2597F43c");
        assert_eq!(
            generate_connection_message(account, "2025-05-10T10:29:12.092327", None),
            b256!("35bbfc49dbeb73133a5d7981b06852172d41c2bc196765e82f91be87e526f259")
        );
        assert_eq!(
            generate_connection_message(
                account,
                "2025-05-10T10:29:12.092327",
                Some("https://app.example.com")
            ),
            b256!("009fd9e84bfd9785a0f52c53f33c6a2f5f8eb9fdea99973379d2e4f5d3e0f63f")
        );
        assert_eq!(
            generate_connection_message(
                account,
                "2025-05-10T10:29:12.092327",
                Some("https://app.example.com/a(1)")
            ),
            b256!("7fef700130c43200eab1d8781e4fce4c1499031762fda4831aad64690829b34a")
        );
    }

    #[test]
    fn redirect_encoding_keeps_unreserved_marks_literal() {
        assert_eq!(
            encode_redirect("https://app.example.com/a(1)"),
            "https%3A%2F%2Fapp.example.com%2Fa(1)"
        );
        assert_eq!(encode_redirect("it's a test!~*()"), "it's%20a%20test!~*()");
        assert_eq!(encode_redirect("a=b&c d"), "a%3Db%26c%20d");
    }

    #[tokio::test]
    async fn headers_round_trip_for_an_owner_key() {
        let signer = signer();
        let account = signer.address();
        let headers =
            generate_connected_headers(&signer, account, "2999-01-01T00:00:00Z", None)
                .await
                .unwrap();

        let pairs: std::collections::HashMap<&str, String> =
            headers.pairs().into_iter().collect();
        let verified = verify_connected_headers(&unreachable_config(), |name| {
            pairs.get(name).cloned()
        })
        .await
        .unwrap();
        assert_eq!(verified, Some(account));
    }

    #[tokio::test]
    async fn url_round_trip_keeps_existing_query() {
        let signer = signer();
        let account = signer.address();
        let url = create_connected_url(
            "https://api.example.com/connect?foo=bar",
            &signer,
            account,
            "2999-01-01T00:00:00Z",
            Some("https://app.example.com"),
        )
        .await
        .unwrap();
        assert!(url.contains("foo=bar"));

        let verified = verify_connected_url(&unreachable_config(), &url).await.unwrap();
        assert_eq!(verified, Some(account));
    }

    #[tokio::test]
    async fn expired_connection_is_rejected_before_any_lookup() {
        let signer = signer();
        let account = signer.address();
        let headers =
            generate_connected_headers(&signer, account, "2020-01-01T00:00:00Z", None)
                .await
                .unwrap();
        let pairs: std::collections::HashMap<&str, String> =
            headers.pairs().into_iter().collect();

        let err = verify_connected_headers(&unreachable_config(), |name| {
            pairs.get(name).cloned()
        })
        .await
        .unwrap_err();
        assert!(matches!(err, SessionError::ConnectionExpired));
    }

    #[tokio::test]
    async fn missing_fields_are_named() {
        let err = verify_connected_headers(&unreachable_config(), |_| None)
            .await
            .unwrap_err();
        match err {
            SessionError::InvalidConnection(msg) => {
                assert!(msg.contains(SIGAUTH_ACCOUNT_HEADER));
                assert!(msg.contains(SIGAUTH_EXPIRY_HEADER));
                assert!(msg.contains(SIGAUTH_SIGNATURE_HEADER));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn mismatching_signer_verifies_to_none() {
        let signer = signer();
        let claimed = address!("1dB0A6F5a7E5b74D0b0DAb6e41E0520e1f73e9d7");
        let headers = generate_connected_headers(&signer, claimed, "2999-01-01T00:00:00Z", None)
            .await
            .unwrap();
        let pairs: std::collections::HashMap<&str, String> =
            headers.pairs().into_iter().collect();

        let verified = verify_connected_headers(&unreachable_config(), |name| {
            pairs.get(name).cloned()
        })
        .await
        .unwrap();
        assert_eq!(verified, None);
    }

    #[tokio::test]
    async fn unix_second_expiries_are_accepted() {
        let signer = signer();
        let account = signer.address();
        // far past, as unix seconds
        let headers = generate_connected_headers(&signer, account, "1577836800", None)
            .await
            .unwrap();
        let pairs: std::collections::HashMap<&str, String> =
            headers.pairs().into_iter().collect();
        let err = verify_connected_headers(&unreachable_config(), |name| {
            pairs.get(name).cloned()
        })
        .await
        .unwrap_err();
        assert!(matches!(err, SessionError::ConnectionExpired));
    }
}
