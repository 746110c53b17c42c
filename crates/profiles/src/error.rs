use cw_core::text::UsernameError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error(transparent)]
    Config(#[from] cw_config::ConfigError),

    #[error(transparent)]
    View(#[from] cw_accounts::ViewError),

    #[error(transparent)]
    Bundler(#[from] cw_bundler::BundlerError),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Username(#[from] UsernameError),

    #[error("pinning service error: {0}")]
    Pin(String),

    #[error("no profile registered")]
    NotFound,

    #[error("failed to resolve the signer's account address")]
    AccountResolution,

    #[error("no available username after appending random letters")]
    UsernameUnavailable,
}
