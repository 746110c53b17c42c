//! Provider construction and the shared contract view-call helper.

use crate::error::ViewError;
use alloy_primitives::{Address, Bytes, TxKind};
use alloy_provider::{Provider, RootProvider};
use alloy_rpc_types::{TransactionInput, TransactionRequest};
use alloy_sol_types::SolCall;
use cw_config::CommunityConfig;
use url::Url;

/// Provider over the community's paymaster-scoped RPC endpoint.
pub fn community_provider(config: &CommunityConfig) -> Result<RootProvider, ViewError> {
    let url = Url::parse(&config.primary_rpc_url()?)?;
    Ok(RootProvider::new_http(url))
}

/// Execute a read-only contract call and decode its return value.
pub async fn view<C: SolCall>(
    provider: &impl Provider,
    to: Address,
    call: C,
) -> Result<C::Return, ViewError> {
    let tx = TransactionRequest {
        to: Some(TxKind::Call(to)),
        input: TransactionInput::new(Bytes::from(call.abi_encode())),
        ..Default::default()
    };
    let out = provider
        .call(tx)
        .await
        .map_err(|e| ViewError::Rpc(e.to_string()))?;
    Ok(C::abi_decode_returns(&out)?)
}
