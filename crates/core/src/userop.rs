//! ERC-4337 style user operation, community entrypoint flavor.

use crate::abi::entrypoint;
use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// One meta-transaction intent before on-chain execution.
///
/// On the wire every numeric field is a minimal-width hex quantity and every
/// byte field is `0x`-prefixed hex; the alloy serde impls produce exactly
/// that. An operation is executable only once `call_data`,
/// `paymaster_and_data` and `signature` are all non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    pub sender: Address,
    pub nonce: U256,
    pub init_code: Bytes,
    pub call_data: Bytes,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub paymaster_and_data: Bytes,
    pub signature: Bytes,
}

impl UserOperation {
    /// A blank operation for `sender`. Gas and fee fields are filled in by
    /// the paymaster during sponsorship.
    pub fn empty(sender: Address) -> Self {
        Self {
            sender,
            nonce: U256::ZERO,
            init_code: Bytes::new(),
            call_data: Bytes::new(),
            call_gas_limit: U256::ZERO,
            verification_gas_limit: U256::ZERO,
            pre_verification_gas: U256::ZERO,
            max_fee_per_gas: U256::ZERO,
            max_priority_fee_per_gas: U256::ZERO,
            paymaster_and_data: Bytes::new(),
            signature: Bytes::new(),
        }
    }

    /// Whether the operation is ready to submit.
    pub fn is_executable(&self) -> bool {
        !self.call_data.is_empty()
            && !self.paymaster_and_data.is_empty()
            && !self.signature.is_empty()
    }

    /// The operation in the entrypoint's ABI layout, for `getUserOpHash`.
    pub fn to_sol(&self) -> entrypoint::UserOperation {
        entrypoint::UserOperation {
            sender: self.sender,
            nonce: self.nonce,
            initCode: self.init_code.clone(),
            callData: self.call_data.clone(),
            callGasLimit: self.call_gas_limit,
            verificationGasLimit: self.verification_gas_limit,
            preVerificationGas: self.pre_verification_gas,
            maxFeePerGas: self.max_fee_per_gas,
            maxPriorityFeePerGas: self.max_priority_fee_per_gas,
            paymasterAndData: self.paymaster_and_data.clone(),
            signature: self.signature.clone(),
        }
    }
}
