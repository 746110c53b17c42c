use cw_config::ConfigError;
use thiserror::Error;

/// Failures while talking to the community RPC node.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid rpc url: {0}")]
    Url(#[from] url::ParseError),

    #[error("rpc error: {0}")]
    Rpc(String),

    #[error("abi decode error: {0}")]
    Abi(#[from] alloy_sol_types::Error),
}
