use cw_config::ConfigError;
use cw_core::CodecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid voucher")]
    InvalidVoucher,

    #[error("could not resolve the voucher account address")]
    AccountResolution,
}
