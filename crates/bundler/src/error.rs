use alloy_primitives::Address;
use cw_accounts::ViewError;
use cw_config::ConfigError;
use cw_core::amount::AmountError;
use cw_core::text::UsernameError;
use thiserror::Error;

/// Failures along the user-operation pipeline. Each step maps to one
/// variant so callers can tell a declined sponsorship from a bundler that
/// swallowed the submission.
#[derive(Debug, Error)]
pub enum BundlerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid bundler url: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("signing failed: {0}")]
    Signer(#[from] alloy_signer::Error),

    #[error(transparent)]
    Username(#[from] UsernameError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error("paymaster declined sponsorship: {0}")]
    Sponsorship(String),

    #[error("bundler rejected submission: {0}")]
    Submission(String),

    #[error("account {account} does not have the MINTER_ROLE on token {token}")]
    MissingRole { account: Address, token: Address },

    #[error("transaction did not confirm successfully")]
    TransactionFailed,
}
