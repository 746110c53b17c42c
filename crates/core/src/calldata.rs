//! The action-to-calldata encoding table.
//!
//! Every logical action (transfer, mint, profile set, role grant, ...) is
//! encoded as the inner contract call and then wrapped exactly once in the
//! execution envelope of the sender's account variant. The two envelopes are
//! mutually exclusive per account; the wrong one reverts on-chain rather
//! than failing client-side, so the variant is carried explicitly.

use crate::abi::{access, account, card_manager, erc20, factory, profile, safe, session_manager};
use crate::text::{UsernameError, format_username_bytes32};
use alloy_primitives::aliases::U48;
use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::SolCall;
use cw_config::AccountVariant;

/// Safe module operation tag for a plain call (never delegatecall).
const OPERATION_CALL: u8 = 0;

/// Pure, deterministic encoder over `(action, variant, args)`.
#[derive(Debug, Clone, Copy)]
pub struct CalldataBuilder {
    variant: AccountVariant,
}

impl CalldataBuilder {
    pub const fn new(variant: AccountVariant) -> Self {
        Self { variant }
    }

    /// Wrap an already-encoded contract call in the account's execution
    /// envelope.
    pub fn wrap(&self, target: Address, value: U256, inner: Vec<u8>) -> Bytes {
        let encoded = match self.variant {
            AccountVariant::Plain => account::executeCall {
                dest: target,
                value,
                func: inner.into(),
            }
            .abi_encode(),
            AccountVariant::SafeModule => safe::execTransactionFromModuleCall {
                to: target,
                value,
                data: inner.into(),
                operation: OPERATION_CALL,
            }
            .abi_encode(),
        };
        Bytes::from(encoded)
    }

    pub fn transfer(&self, token: Address, to: Address, amount: U256) -> Bytes {
        self.wrap(token, U256::ZERO, erc20::transferCall { to, amount }.abi_encode())
    }

    pub fn mint(&self, token: Address, to: Address, amount: U256) -> Bytes {
        self.wrap(token, U256::ZERO, erc20::mintCall { to, amount }.abi_encode())
    }

    pub fn burn_from(&self, token: Address, from: Address, amount: U256) -> Bytes {
        self.wrap(
            token,
            U256::ZERO,
            erc20::burnFromCall { account: from, amount }.abi_encode(),
        )
    }

    pub fn approve(&self, token: Address, spender: Address, amount: U256) -> Bytes {
        self.wrap(token, U256::ZERO, erc20::approveCall { spender, amount }.abi_encode())
    }

    pub fn set_profile(
        &self,
        profile_contract: Address,
        profile_account: Address,
        username: &str,
        ipfs_hash: &str,
    ) -> Result<Bytes, UsernameError> {
        let inner = profile::setCall {
            profile: profile_account,
            username: format_username_bytes32(username)?,
            uri: ipfs_hash.to_string(),
        }
        .abi_encode();
        Ok(self.wrap(profile_contract, U256::ZERO, inner))
    }

    pub fn burn_profile(&self, profile_contract: Address, profile_account: Address) -> Bytes {
        self.wrap(
            profile_contract,
            U256::ZERO,
            profile::burnCall { profile: profile_account }.abi_encode(),
        )
    }

    pub fn grant_role(&self, target: Address, role: B256, account: Address) -> Bytes {
        self.wrap(target, U256::ZERO, access::grantRoleCall { role, account }.abi_encode())
    }

    pub fn revoke_role(&self, target: Address, role: B256, account: Address) -> Bytes {
        self.wrap(target, U256::ZERO, access::revokeRoleCall { role, account }.abi_encode())
    }

    pub fn create_instance(&self, card_manager: Address, instance_id: B256) -> Bytes {
        let inner = card_manager::createInstanceCall { instanceId: instance_id }.abi_encode();
        self.wrap(card_manager, U256::ZERO, inner)
    }

    pub fn call_on_card(
        &self,
        card_manager: Address,
        instance_id: B256,
        hashed_serial: B256,
        to: Address,
        value: U256,
        data: Bytes,
    ) -> Bytes {
        let inner = card_manager::callOnCardCall {
            instanceId: instance_id,
            hashedSerial: hashed_serial,
            to,
            value,
            data,
        }
        .abi_encode();
        self.wrap(card_manager, U256::ZERO, inner)
    }

    pub fn request_session(
        &self,
        session_module: Address,
        session_salt: B256,
        session_request_hash: B256,
        signed_session_request_hash: Bytes,
        signed_session_hash: Bytes,
        session_expiry: u64,
        challenge_expiry: u64,
    ) -> Bytes {
        let inner = session_manager::requestCall {
            sessionSalt: session_salt,
            sessionRequestHash: session_request_hash,
            signedSessionRequestHash: signed_session_request_hash,
            signedSessionHash: signed_session_hash,
            sessionExpiry: U48::from(session_expiry),
            challengeExpiry: U48::from(challenge_expiry),
        }
        .abi_encode();
        self.wrap(session_module, U256::ZERO, inner)
    }

    pub fn confirm_session(
        &self,
        session_module: Address,
        session_request_hash: B256,
        session_hash: B256,
        signed_session_hash: Bytes,
    ) -> Bytes {
        let inner = session_manager::confirmCall {
            sessionRequestHash: session_request_hash,
            sessionHash: session_hash,
            signedSessionHash: signed_session_hash,
        }
        .abi_encode();
        self.wrap(session_module, U256::ZERO, inner)
    }

    pub fn revoke_session(&self, session_module: Address, session_owner: Address) -> Bytes {
        self.wrap(
            session_module,
            U256::ZERO,
            session_manager::revokeCall { sessionOwner: session_owner }.abi_encode(),
        )
    }
}

/// Factory init code for a not-yet-deployed account: the factory address
/// concatenated with the `createAccount` calldata.
pub fn account_init_code(factory_address: Address, owner: Address, salt: U256) -> Bytes {
    let creation = factory::createAccountCall { owner, salt }.abi_encode();
    let mut buf = Vec::with_capacity(20 + creation.len());
    buf.extend_from_slice(factory_address.as_slice());
    buf.extend_from_slice(&creation);
    Bytes::from(buf)
}
