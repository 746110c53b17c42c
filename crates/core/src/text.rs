//! Username, address-id and alias helpers shared by profiles and links.

use alloy_primitives::{Address, B256, U256, keccak256};
use thiserror::Error;

/// `keccak256("MINTER_ROLE")`, the role required to mint the community token.
pub const MINTER_ROLE: B256 = B256::new([
    0x9f, 0x2d, 0xf0, 0xfe, 0xd2, 0xc7, 0x76, 0x48, 0xde, 0x58, 0x60, 0xa4, 0xcc, 0x50, 0x8c,
    0xd0, 0x81, 0x8c, 0x85, 0xb8, 0xb8, 0xa1, 0xab, 0x4c, 0xee, 0xef, 0x8d, 0x98, 0x1c, 0x89,
    0x56, 0xa6,
]);

#[derive(Debug, Error)]
pub enum UsernameError {
    #[error("username is longer than 32 bytes")]
    TooLong,
}

/// Encode a username as the registry's fixed-width identifier: strip one
/// leading `@`, then left-pad the UTF-8 bytes with spaces to exactly 32.
pub fn format_username_bytes32(username: &str) -> Result<B256, UsernameError> {
    let stripped = username.strip_prefix('@').unwrap_or(username);
    let bytes = stripped.as_bytes();
    if bytes.len() > 32 {
        return Err(UsernameError::TooLong);
    }
    let mut out = [b' '; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(B256::new(out))
}

/// Numeric registry id of an address.
pub fn address_to_id(address: Address) -> U256 {
    U256::from_be_slice(address.as_slice())
}

/// Invert [`address_to_id`]. Ids above 2^160 - 1 do not correspond to an
/// address and are truncated to their low 160 bits.
pub fn id_to_address(id: U256) -> Address {
    Address::from_slice(&id.to_be_bytes::<32>()[12..])
}

/// Extract the community alias from a hostname: strip a matching base domain
/// suffix and the joining dot; unrelated domains echo back unchanged.
pub fn parse_alias_from_domain<'a>(domain: &'a str, base_path: &str) -> &'a str {
    match domain.strip_suffix(base_path) {
        Some(alias) => alias.strip_suffix('.').unwrap_or(alias),
        None => domain,
    }
}

/// Truncate a string to at most `max_length` characters.
pub fn limit_string_length(value: &str, max_length: usize) -> &str {
    match value.char_indices().nth(max_length) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

/// Hash an instance identifier or card serial into its on-chain key.
pub fn hash_identifier(identifier: &str) -> B256 {
    keccak256(identifier.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn username_is_left_padded_with_spaces() {
        let encoded = format_username_bytes32("alice").unwrap();
        assert_eq!(
            alloy_primitives::hex::encode(encoded),
            "202020202020202020202020202020202020202020202020202020616c696365"
        );
        // multi-byte pad stays byte-correct
        let single = format_username_bytes32("x").unwrap();
        assert_eq!(&single[..31], [b' '; 31]);
        assert_eq!(single[31], b'x');
    }

    #[test]
    fn username_strips_leading_at() {
        assert_eq!(
            format_username_bytes32("@jim").unwrap(),
            format_username_bytes32("jim").unwrap()
        );
        assert_eq!(
            alloy_primitives::hex::encode(format_username_bytes32("@jim").unwrap()),
            "20202020202020202020202020202020202020202020202020202020206a696d"
        );
    }

    #[test]
    fn username_is_always_32_bytes() {
        let exact = "a".repeat(32);
        assert_eq!(format_username_bytes32(&exact).unwrap().as_slice(), exact.as_bytes());
        assert!(format_username_bytes32(&"a".repeat(33)).is_err());
    }

    #[test]
    fn address_id_round_trip() {
        let addr = address!("4250526126491EF53ca4A73e97151b5c2597F43c");
        assert_eq!(id_to_address(address_to_id(addr)), addr);
        assert_eq!(address_to_id(Address::ZERO), U256::ZERO);
        assert_eq!(id_to_address(U256::from(1u64)), address!("0000000000000000000000000000000000000001"));
    }

    #[test]
    fn alias_extraction() {
        let base = "commonswallet.org";
        assert_eq!(parse_alias_from_domain("gratitude.commonswallet.org", base), "gratitude");
        assert_eq!(parse_alias_from_domain("wallet.sfluv.org", base), "wallet.sfluv.org");
        assert_eq!(
            parse_alias_from_domain("something.other.commonswallet.org", base),
            "something.other"
        );
    }

    #[test]
    fn limits_string_length() {
        assert_eq!(limit_string_length("hello", 3), "hel");
        assert_eq!(limit_string_length("hi", 10), "hi");
    }

    #[test]
    fn minter_role_matches_keccak() {
        assert_eq!(MINTER_ROLE, keccak256(b"MINTER_ROLE"));
    }
}
