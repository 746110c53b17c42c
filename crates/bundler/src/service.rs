//! The sponsored user-operation pipeline.
//!
//! Every action funnels through the same five steps, in order: existence
//! check, build, paymaster sponsorship, owner signature over the entrypoint's
//! operation hash, submission. Later steps never roll back earlier ones; a
//! failed submission leaves the sponsorship credit reserved and callers
//! retry with a fresh operation.

use std::time::Duration;

use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types::TransactionReceipt;
use alloy_signer::Signer;
use cw_accounts::view;
use cw_config::CommunityConfig;
use cw_core::abi::entrypoint;
use cw_core::text::{MINTER_ROLE, hash_identifier};
use cw_core::{CalldataBuilder, UserOperation, account_init_code};
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::error::BundlerError;

/// `keccak256("Transfer(address,address,uint256)")`, the ERC-20 transfer
/// event topic relayed to the indexer alongside submissions.
const TRANSFER_EVENT_TOPIC: B256 = B256::new([
    0xdd, 0xf2, 0x52, 0xad, 0x1b, 0xe2, 0xc8, 0x9b, 0x69, 0xc2, 0xb0, 0x68, 0xfc, 0x37, 0x8d,
    0xaa, 0x95, 0x2b, 0xa7, 0xf1, 0x63, 0xc4, 0xa1, 0x16, 0x28, 0xf5, 0x5a, 0x4d, 0xf5, 0x23,
    0xb3, 0xef,
]);

/// One receipt confirmation within roughly twelve seconds, matching the
/// block cadence of the supported chains.
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(12);
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Transfer-event side channel sent with a submission so the community
/// indexer can show the transfer before it lands on-chain.
#[derive(Debug, Clone, Serialize)]
pub struct TransferEventData {
    pub topic: B256,
    pub address: Address,
    pub from: Address,
    pub to: Address,
    pub value: String,
}

impl TransferEventData {
    pub fn new(token: Address, from: Address, to: Address, value: U256) -> Self {
        Self { topic: TRANSFER_EVENT_TOPIC, address: token, from, to, value: value.to_string() }
    }
}

#[derive(Debug, Clone, Serialize)]
struct UserOpExtraData<'a> {
    description: &'a str,
}

#[derive(Debug, Clone, Serialize)]
struct PaymasterArg {
    #[serde(rename = "type")]
    paymaster_type: String,
}

/// Client against a community bundler node.
#[derive(Debug)]
pub struct BundlerService {
    config: CommunityConfig,
    provider: RootProvider,
    http: reqwest::Client,
}

impl BundlerService {
    pub fn new(config: &CommunityConfig) -> Result<Self, BundlerError> {
        let url = Url::parse(&config.primary_rpc_url()?)?;
        Ok(Self {
            config: config.clone(),
            provider: RootProvider::new_http(url),
            http: reqwest::Client::new(),
        })
    }

    /// Whether the sender's contract account is already deployed. The node
    /// answers with a 200-class status exactly when it is.
    pub async fn sender_account_exists(&self, sender: Address) -> Result<bool, BundlerError> {
        let node_url = &self.config.primary_network()?.node.url;
        let url = format!("{node_url}/v1/accounts/{sender}/exists");
        let resp = self.http.get(url).send().await?;
        Ok(resp.status().is_success())
    }

    fn calldata(&self) -> Result<CalldataBuilder, BundlerError> {
        Ok(CalldataBuilder::new(self.config.primary_account_variant()?))
    }

    /// Step 2: a blank operation with init code for undeployed senders and
    /// the wrapped calldata attached.
    async fn prepare_user_op(
        &self,
        owner: Address,
        sender: Address,
        call_data: Bytes,
    ) -> Result<UserOperation, BundlerError> {
        let exists = self.sender_account_exists(sender).await?;
        let mut op = UserOperation::empty(sender);
        if !exists {
            let factory = self.config.primary_account_config()?.account_factory_address;
            op.init_code = account_init_code(factory, owner, U256::ZERO);
            debug!(sender = %sender, "attaching account init code");
        }
        op.call_data = call_data;
        Ok(op)
    }

    /// Step 3: have the paymaster fill in gas fields, nonce and its own
    /// signature. An empty result means sponsorship was declined.
    async fn sponsor_user_op(&self, op: UserOperation) -> Result<UserOperation, BundlerError> {
        let account = self.config.primary_account_config()?;
        let params = (
            op,
            account.entrypoint_address,
            PaymasterArg { paymaster_type: account.paymaster_type.clone() },
            1u32,
        );
        let sponsored: Vec<UserOperation> = self
            .provider
            .raw_request("pm_ooSponsorUserOperation".into(), params)
            .await
            .map_err(|e| BundlerError::Sponsorship(e.to_string()))?;
        sponsored
            .into_iter()
            .next()
            .ok_or_else(|| BundlerError::Sponsorship("empty paymaster response".to_string()))
    }

    /// Step 4: the entrypoint computes the operation hash on-chain, the
    /// owner key signs it EIP-191 style.
    async fn sign_user_op<S: Signer + Sync>(
        &self,
        signer: &S,
        op: &UserOperation,
    ) -> Result<Bytes, BundlerError> {
        let entrypoint_address = self.config.primary_account_config()?.entrypoint_address;
        let hash: B256 = view(
            &self.provider,
            entrypoint_address,
            entrypoint::getUserOpHashCall { userOp: op.to_sol() },
        )
        .await?;
        let signature = signer.sign_message(hash.as_slice()).await?;
        Ok(Bytes::from(signature.as_bytes().to_vec()))
    }

    /// Step 5: hand the signed operation to the bundler, with the optional
    /// side-channel payloads appended positionally.
    async fn submit_user_op(
        &self,
        op: &UserOperation,
        data: Option<&TransferEventData>,
        description: Option<&str>,
    ) -> Result<B256, BundlerError> {
        let entrypoint_address = self.config.primary_account_config()?.entrypoint_address;
        let mut params = vec![serde_json::to_value(op)?, serde_json::to_value(entrypoint_address)?];
        if let Some(data) = data {
            params.push(serde_json::to_value(data)?);
        }
        if let Some(description) = description {
            params.push(serde_json::to_value(UserOpExtraData { description })?);
        }

        let response: String = self
            .provider
            .raw_request("eth_sendUserOperation".into(), params)
            .await
            .map_err(|e| BundlerError::Submission(e.to_string()))?;
        if response.is_empty() {
            return Err(BundlerError::Submission("empty bundler response".to_string()));
        }
        let hash = response
            .parse::<B256>()
            .map_err(|e| BundlerError::Submission(e.to_string()))?;
        info!(tx_hash = %hash, sender = %op.sender, "user operation submitted");
        Ok(hash)
    }

    async fn run<S: Signer + Sync>(
        &self,
        signer: &S,
        sender: Address,
        call_data: Bytes,
        data: Option<&TransferEventData>,
        description: Option<&str>,
    ) -> Result<(B256, UserOperation), BundlerError> {
        let mut op = self.prepare_user_op(signer.address(), sender, call_data).await?;
        op = self.sponsor_user_op(op).await?;
        op.signature = self.sign_user_op(signer, &op).await?;
        let hash = self.submit_user_op(&op, data, description).await?;
        Ok((hash, op))
    }

    /// Transfer community tokens from the sender account.
    pub async fn send_erc20_token<S: Signer + Sync>(
        &self,
        signer: &S,
        token: Address,
        from: Address,
        to: Address,
        amount: &str,
        description: Option<&str>,
    ) -> Result<B256, BundlerError> {
        let decimals = self.config.primary_token()?.decimals;
        let value = cw_core::amount::parse_token_amount(amount, decimals)?;
        let call_data = self.calldata()?.transfer(token, to, value);
        let data = TransferEventData::new(token, from, to, value);
        let (hash, _) = self.run(signer, from, call_data, Some(&data), description).await?;
        Ok(hash)
    }

    /// Mint tokens to `to`. A failed submission is re-checked against the
    /// token's access control: a sender without MINTER_ROLE gets the role
    /// error instead of the bundler's opaque one.
    pub async fn mint_erc20_token<S: Signer + Sync>(
        &self,
        signer: &S,
        token: Address,
        sender: Address,
        to: Address,
        amount: &str,
        description: Option<&str>,
    ) -> Result<B256, BundlerError> {
        let decimals = self.config.primary_token()?.decimals;
        let value = cw_core::amount::parse_token_amount(amount, decimals)?;
        let call_data = self.calldata()?.mint(token, to, value);
        let data = TransferEventData::new(token, Address::ZERO, to, value);

        let mut op = self.prepare_user_op(signer.address(), sender, call_data).await?;
        op = self.sponsor_user_op(op).await?;
        op.signature = self.sign_user_op(signer, &op).await?;
        match self.submit_user_op(&op, Some(&data), description).await {
            Ok(hash) => Ok(hash),
            Err(err) => {
                if !cw_accounts::has_role(&self.config, token, MINTER_ROLE, sender).await {
                    return Err(BundlerError::MissingRole { account: sender, token });
                }
                Err(err)
            }
        }
    }

    /// Burn tokens held by `holder`, spending the sender's allowance. Same
    /// role diagnostic as minting.
    pub async fn burn_from_erc20_token<S: Signer + Sync>(
        &self,
        signer: &S,
        token: Address,
        sender: Address,
        holder: Address,
        amount: &str,
        description: Option<&str>,
    ) -> Result<B256, BundlerError> {
        let decimals = self.config.primary_token()?.decimals;
        let value = cw_core::amount::parse_token_amount(amount, decimals)?;
        let call_data = self.calldata()?.burn_from(token, holder, value);
        let data = TransferEventData::new(token, holder, Address::ZERO, value);

        let mut op = self.prepare_user_op(signer.address(), sender, call_data).await?;
        op = self.sponsor_user_op(op).await?;
        op.signature = self.sign_user_op(signer, &op).await?;
        match self.submit_user_op(&op, Some(&data), description).await {
            Ok(hash) => Ok(hash),
            Err(err) => {
                if !cw_accounts::has_role(&self.config, token, MINTER_ROLE, sender).await {
                    return Err(BundlerError::MissingRole { account: sender, token });
                }
                Err(err)
            }
        }
    }

    /// Create or update the on-chain profile for `profile_account`.
    pub async fn set_profile<S: Signer + Sync>(
        &self,
        signer: &S,
        sender: Address,
        profile_account: Address,
        username: &str,
        ipfs_hash: &str,
    ) -> Result<B256, BundlerError> {
        let profile_contract = self.config.community().profile.address;
        let call_data =
            self.calldata()?.set_profile(profile_contract, profile_account, username, ipfs_hash)?;
        let (hash, _) = self.run(signer, sender, call_data, None, None).await?;
        Ok(hash)
    }

    pub async fn burn_profile<S: Signer + Sync>(
        &self,
        signer: &S,
        sender: Address,
        profile_account: Address,
    ) -> Result<B256, BundlerError> {
        let profile_contract = self.config.community().profile.address;
        let call_data = self.calldata()?.burn_profile(profile_contract, profile_account);
        let (hash, _) = self.run(signer, sender, call_data, None, None).await?;
        Ok(hash)
    }

    pub async fn grant_role<S: Signer + Sync>(
        &self,
        signer: &S,
        sender: Address,
        target: Address,
        role: B256,
        account: Address,
    ) -> Result<B256, BundlerError> {
        let call_data = self.calldata()?.grant_role(target, role, account);
        let (hash, _) = self.run(signer, sender, call_data, None, None).await?;
        Ok(hash)
    }

    pub async fn revoke_role<S: Signer + Sync>(
        &self,
        signer: &S,
        sender: Address,
        target: Address,
        role: B256,
        account: Address,
    ) -> Result<B256, BundlerError> {
        let call_data = self.calldata()?.revoke_role(target, role, account);
        let (hash, _) = self.run(signer, sender, call_data, None, None).await?;
        Ok(hash)
    }

    /// Create the community's card-manager instance and return its owner.
    /// An instance somebody already owns is returned as-is, without
    /// submitting anything.
    pub async fn create_card_instance<S: Signer + Sync>(
        &self,
        signer: &S,
        sender: Address,
    ) -> Result<Address, BundlerError> {
        let card = self.config.primary_card_config()?;
        if let Some(owner) = cw_accounts::get_instance_owner(&self.config).await
            && owner != Address::ZERO
        {
            return Ok(owner);
        }

        let instance_id = hash_identifier(&card.instance_id);
        let call_data = self.calldata()?.create_instance(card.address, instance_id);
        let (tx_hash, _) = self.run(signer, sender, call_data, None, None).await?;
        self.await_success(tx_hash, None).await?;

        cw_accounts::get_instance_owner(&self.config)
            .await
            .filter(|owner| *owner != Address::ZERO)
            .ok_or(BundlerError::TransactionFailed)
    }

    /// Relay a call through the community card instance to the card behind
    /// `hashed_serial`.
    pub async fn call_on_card<S: Signer + Sync>(
        &self,
        signer: &S,
        sender: Address,
        hashed_serial: B256,
        to: Address,
        value: U256,
        data: Bytes,
        description: Option<&str>,
    ) -> Result<B256, BundlerError> {
        let card = self.config.primary_card_config()?;
        let instance_id = hash_identifier(&card.instance_id);
        let call_data = self
            .calldata()?
            .call_on_card(card.address, instance_id, hashed_serial, to, value, data);
        let (hash, _) = self.run(signer, sender, call_data, None, description).await?;
        Ok(hash)
    }

    /// Run the pipeline with calldata already wrapped in the sender's
    /// execution envelope, as produced by [`CalldataBuilder`].
    pub async fn execute<S: Signer + Sync>(
        &self,
        signer: &S,
        sender: Address,
        call_data: Bytes,
        data: Option<&TransferEventData>,
        description: Option<&str>,
    ) -> Result<B256, BundlerError> {
        let (hash, _) = self.run(signer, sender, call_data, data, description).await?;
        Ok(hash)
    }

    /// Execute an arbitrary already-encoded contract call from the sender
    /// account.
    pub async fn call<S: Signer + Sync>(
        &self,
        signer: &S,
        sender: Address,
        target: Address,
        calldata: Bytes,
        description: Option<&str>,
    ) -> Result<B256, BundlerError> {
        let call_data = self.calldata()?.wrap(target, U256::ZERO, calldata.to_vec());
        let (hash, _) = self.run(signer, sender, call_data, None, description).await?;
        Ok(hash)
    }

    /// Like [`call`](Self::call) but hands back the final signed operation,
    /// for callers that track the full payload.
    pub async fn submit<S: Signer + Sync>(
        &self,
        signer: &S,
        sender: Address,
        target: Address,
        calldata: Bytes,
        data: Option<&TransferEventData>,
        description: Option<&str>,
    ) -> Result<UserOperation, BundlerError> {
        let call_data = self.calldata()?.wrap(target, U256::ZERO, calldata.to_vec());
        let (_, op) = self.run(signer, sender, call_data, data, description).await?;
        Ok(op)
    }

    /// Step 6: wait for one confirmation. A receipt that never shows up
    /// within the timeout (twelve seconds unless the caller says otherwise),
    /// or one with a failed status, is a failure.
    pub async fn await_success(
        &self,
        tx_hash: B256,
        timeout: Option<Duration>,
    ) -> Result<TransactionReceipt, BundlerError> {
        let poll = async {
            loop {
                match self.provider.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return receipt,
                    Ok(None) => {}
                    Err(e) => {
                        debug!(tx_hash = %tx_hash, error = %e, "receipt not available yet");
                    }
                }
                tokio::time::sleep(RECEIPT_POLL_INTERVAL).await;
            }
        };

        let receipt = tokio::time::timeout(timeout.unwrap_or(RECEIPT_TIMEOUT), poll)
            .await
            .map_err(|_| BundlerError::TransactionFailed)?;
        if !receipt.status() {
            return Err(BundlerError::TransactionFailed);
        }
        Ok(receipt)
    }
}
