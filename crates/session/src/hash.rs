//! The session hashing protocol.
//!
//! All three hashes are bit-exact with the on-chain session manager and the
//! mobile clients: the salt hashes the raw utf-8 of `source:type`, the two
//! composite hashes go through standard ABI encoding.

use alloy_primitives::{Address, B256, U256, keccak256};
use alloy_sol_types::SolValue;

/// Salt binding a session to its delivery channel, e.g. a phone number over
/// sms.
pub fn session_salt(source: &str, session_type: &str) -> B256 {
    keccak256(format!("{source}:{session_type}"))
}

/// Hash of one session request: `keccak256(abi.encode(provider, owner,
/// salt, expiry))` with the expiry as a uint48.
pub fn session_request_hash(
    provider: Address,
    owner: Address,
    salt: B256,
    expiry: u64,
) -> B256 {
    keccak256((provider, owner, salt, expiry).abi_encode())
}

/// Final session hash combining the request hash with the challenge code
/// the user received out of band.
pub fn session_hash(request_hash: B256, challenge: u64) -> B256 {
    keccak256((request_hash, U256::from(challenge)).abi_encode())
}
