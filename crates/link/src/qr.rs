//! QR payload sniffing and decoding.
//!
//! Format detection is first-match-wins over an ordered predicate chain;
//! the order is load-bearing (an EIP-681 transfer also matches the plain
//! EIP-681 predicate, a sendto URL is also an http URL) and must not be
//! rearranged.

use std::borrow::Cow;
use std::sync::LazyLock;

use alloy_primitives::Address;
use cw_core::decompress;
use regex::Regex;
use url::Url;

/// WalletConnect pairing URI: 64-hex topic, numeric version, irn relay and
/// a 64-hex symmetric key.
static PAIRING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^wc:[0-9a-fA-F]{64}@[0-9]+\?relay-protocol=irn&symKey=[0-9a-fA-F]{64}$")
        .unwrap_or_else(|e| unreachable!("invalid pairing regex: {e}"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QRFormat {
    /// Raw `0x` hex address.
    Address,
    /// EIP-681 `ethereum:` URI without a function path.
    Address681,
    /// EIP-681 `ethereum:` URI with a `/transfer` call.
    Transfer681,
    /// App URL carrying a `sendto=` recipient.
    SendtoUrl,
    /// App URL carrying a raw `calldata=` contract call.
    CalldataUrl,
    /// Compressed `receiveParams=` URL from older app versions.
    LegacyReceiveUrl,
    /// Bearer voucher URL. Not a payment target.
    Voucher,
    /// WalletConnect pairing request. Not a payment at all.
    PairingRequest,
    Unsupported,
}

/// Normalized payment intent decoded from a QR payload. An empty `address`
/// means the payload could not be decoded as a payment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QRPayload {
    pub address: String,
    pub amount: Option<String>,
    pub description: Option<String>,
    pub calldata: Option<String>,
}

impl QRPayload {
    fn empty() -> Self {
        Self::default()
    }

    fn address_only(address: String) -> Self {
        Self { address, ..Self::default() }
    }
}

pub fn parse_qr_format(value: &str) -> QRFormat {
    if value.starts_with("ethereum:") && !value.contains('/') {
        return QRFormat::Address681;
    }
    if value.starts_with("ethereum:") && value.contains("/transfer") {
        return QRFormat::Transfer681;
    }
    let is_http = value.starts_with("http://") || value.starts_with("https://");
    if is_http && value.contains("sendto=") {
        return QRFormat::SendtoUrl;
    }
    if is_http && value.contains("calldata=") {
        return QRFormat::CalldataUrl;
    }
    if value.starts_with("0x") {
        return QRFormat::Address;
    }
    if value.contains("receiveParams=") {
        return QRFormat::LegacyReceiveUrl;
    }
    if value.contains("voucher=") {
        return QRFormat::Voucher;
    }
    if PAIRING_RE.is_match(value) {
        return QRFormat::PairingRequest;
    }
    QRFormat::Unsupported
}

/// Decode a QR payload into a payment intent. Never fails: undecodable
/// payloads, vouchers and pairing requests all come back with an empty
/// address.
pub fn parse_qr_code(value: &str) -> QRPayload {
    match parse_qr_format(value) {
        QRFormat::Address => checked_address(value)
            .map(QRPayload::address_only)
            .unwrap_or_else(QRPayload::empty),
        QRFormat::Address681 => decode_address_681(value),
        QRFormat::Transfer681 => decode_transfer_681(value),
        QRFormat::SendtoUrl => decode_sendto(value),
        QRFormat::CalldataUrl => decode_calldata(value),
        QRFormat::LegacyReceiveUrl => decode_legacy_receive(value),
        QRFormat::Voucher | QRFormat::PairingRequest | QRFormat::Unsupported => QRPayload::empty(),
    }
}

fn checked_address(value: &str) -> Option<String> {
    value.trim().parse::<Address>().ok().map(|_| value.trim().to_string())
}

fn decode_address_681(value: &str) -> QRPayload {
    let rest = value.trim_start_matches("ethereum:");
    let address = rest.split(['@', '?']).next().unwrap_or_default();
    checked_address(address).map(QRPayload::address_only).unwrap_or_else(QRPayload::empty)
}

fn query_of(value: &str) -> Vec<(Cow<'_, str>, Cow<'_, str>)> {
    match value.split_once('?') {
        Some((_, query)) => url::form_urlencoded::parse(query.as_bytes()).collect(),
        None => Vec::new(),
    }
}

fn param<'a>(pairs: &'a [(Cow<'_, str>, Cow<'_, str>)], name: &str) -> Option<&'a str> {
    pairs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_ref())
}

fn decode_transfer_681(value: &str) -> QRPayload {
    let pairs = query_of(value);
    let Some(address) = param(&pairs, "address").and_then(checked_address) else {
        return QRPayload::empty();
    };
    QRPayload {
        address,
        amount: param(&pairs, "uint256").map(str::to_string),
        description: None,
        calldata: None,
    }
}

fn decode_sendto(value: &str) -> QRPayload {
    let Ok(url) = Url::parse(value) else {
        return QRPayload::empty();
    };
    let pairs: Vec<_> = url.query_pairs().collect();
    let Some(sendto) = param(&pairs, "sendto") else {
        return QRPayload::empty();
    };
    // `sendto` is `{address}@{alias}`; the alias is only display context.
    let Some(address) = checked_address(sendto.split('@').next().unwrap_or_default()) else {
        return QRPayload::empty();
    };
    QRPayload {
        address,
        amount: param(&pairs, "amount").map(str::to_string),
        description: param(&pairs, "description").map(str::to_string),
        calldata: None,
    }
}

fn decode_calldata(value: &str) -> QRPayload {
    let Ok(url) = Url::parse(value) else {
        return QRPayload::empty();
    };
    let pairs: Vec<_> = url.query_pairs().collect();
    let Some(address) = param(&pairs, "address").and_then(checked_address) else {
        return QRPayload::empty();
    };
    QRPayload {
        address,
        amount: param(&pairs, "value").map(str::to_string),
        description: None,
        calldata: param(&pairs, "calldata").map(str::to_string),
    }
}

fn decode_legacy_receive(value: &str) -> QRPayload {
    // The interesting query lives behind the `#/` fragment.
    let flattened = value.replace("#/", "");
    let pairs = query_of(&flattened);
    let Some(compressed) = param(&pairs, "receiveParams") else {
        return QRPayload::empty();
    };
    let Ok(decoded) = decompress(compressed) else {
        return QRPayload::empty();
    };
    let inner = query_of(&decoded);
    let Some(address) = param(&inner, "address").and_then(checked_address) else {
        return QRPayload::empty();
    };
    QRPayload {
        address,
        amount: param(&inner, "amount").map(str::to_string),
        description: param(&inner, "message").map(str::to_string),
        calldata: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_core::compress;

    const ADDR: &str = "0x4250526126491EF53ca4A73e97151b5c2597F43c";

    #[test]
    fn classification_is_order_sensitive() {
        assert_eq!(parse_qr_format(ADDR), QRFormat::Address);
        assert_eq!(parse_qr_format(&format!("ethereum:{ADDR}@137")), QRFormat::Address681);
        // contains /transfer, must never classify as the plain 681 form
        assert_eq!(
            parse_qr_format(&format!("ethereum:{ADDR}@137/transfer?address={ADDR}&uint256=10")),
            QRFormat::Transfer681
        );
        assert_eq!(
            parse_qr_format(&format!("https://app.example.com/?sendto={ADDR}@test")),
            QRFormat::SendtoUrl
        );
        // a sendto URL also carrying calldata still classifies as sendto
        assert_eq!(
            parse_qr_format(&format!("https://app.example.com/?sendto={ADDR}@test&calldata=0x")),
            QRFormat::SendtoUrl
        );
        assert_eq!(
            parse_qr_format(&format!(
                "https://app.example.com/?address={ADDR}&calldata=0xb61d27f6"
            )),
            QRFormat::CalldataUrl
        );
        assert_eq!(
            parse_qr_format("https://app.example.com/#/?alias=test&receiveParams=H4sIAAA"),
            QRFormat::LegacyReceiveUrl
        );
        assert_eq!(
            parse_qr_format("https://app.example.com/#/?voucher=abc&params=def"),
            QRFormat::Voucher
        );
        assert_eq!(
            parse_qr_format(&format!("wc:{}@2?relay-protocol=irn&symKey={}", "a".repeat(64), "b".repeat(64))),
            QRFormat::PairingRequest
        );
        assert_eq!(parse_qr_format("hello world"), QRFormat::Unsupported);
    }

    #[test]
    fn pairing_regex_is_strict() {
        assert_eq!(
            parse_qr_format(&format!("wc:{}@2?relay-protocol=iridium&symKey={}", "a".repeat(64), "b".repeat(64))),
            QRFormat::Unsupported
        );
        assert_eq!(
            parse_qr_format(&format!("wc:{}@2?relay-protocol=irn&symKey={}", "a".repeat(63), "b".repeat(64))),
            QRFormat::Unsupported
        );
    }

    #[test]
    fn decodes_sendto_with_optional_fields() {
        let payload = parse_qr_code(&format!(
            "https://app.example.com/?sendto={ADDR}@test&amount=1.5&description=lunch"
        ));
        assert_eq!(payload.address, ADDR);
        assert_eq!(payload.amount.as_deref(), Some("1.5"));
        assert_eq!(payload.description.as_deref(), Some("lunch"));
        assert_eq!(payload.calldata, None);

        let bare = parse_qr_code(&format!("https://app.example.com/?sendto={ADDR}@test"));
        assert_eq!(bare.address, ADDR);
        assert_eq!(bare.amount, None);
    }

    #[test]
    fn decodes_legacy_receive_params() {
        let inner = format!("?address={ADDR}&alias=test&amount=2.5&message=thanks");
        let compressed = compress(&inner).unwrap();
        let payload = parse_qr_code(&format!(
            "https://app.example.com/#/?alias=test&receiveParams={compressed}"
        ));
        assert_eq!(payload.address, ADDR);
        assert_eq!(payload.amount.as_deref(), Some("2.5"));
        assert_eq!(payload.description.as_deref(), Some("thanks"));
    }

    #[test]
    fn decodes_calldata_links() {
        let payload = parse_qr_code(&format!(
            "https://app.example.com/?alias=test&address={ADDR}&value=0&calldata=0xb61d27f6"
        ));
        assert_eq!(payload.address, ADDR);
        assert_eq!(payload.amount.as_deref(), Some("0"));
        assert_eq!(payload.calldata.as_deref(), Some("0xb61d27f6"));
    }

    #[test]
    fn failures_yield_the_empty_payload() {
        // malformed address in an otherwise well-formed sendto link
        assert_eq!(
            parse_qr_code("https://app.example.com/?sendto=notanaddress@test"),
            QRPayload::default()
        );
        // vouchers are never a payment target
        assert_eq!(
            parse_qr_code("https://app.example.com/#/?voucher=abc&params=def"),
            QRPayload::default()
        );
        assert_eq!(parse_qr_code("0xnothex"), QRPayload::default());
        assert_eq!(parse_qr_code("hello"), QRPayload::default());
    }

    #[test]
    fn decodes_eip681_forms() {
        let simple = parse_qr_code(&format!("ethereum:{ADDR}@137"));
        assert_eq!(simple.address, ADDR);

        let transfer = parse_qr_code(&format!(
            "ethereum:0x8f8b1972eBf05D90E4E2B882A647A7C9eb3A4C29@137/transfer?address={ADDR}&uint256=1000000"
        ));
        assert_eq!(transfer.address, ADDR);
        assert_eq!(transfer.amount.as_deref(), Some("1000000"));
    }
}
