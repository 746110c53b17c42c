use cw_accounts::ViewError;
use cw_bundler::BundlerError;
use cw_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bundler(#[from] BundlerError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("signing failed: {0}")]
    Signer(#[from] alloy_signer::Error),

    #[error("session backend error: {0}")]
    Backend(String),

    #[error("challenge rejected by the session provider")]
    InvalidChallenge,

    #[error("session request not found")]
    NotFound,

    #[error("session request expired")]
    Expired,

    #[error("session challenge expired")]
    ChallengeExpired,

    #[error("invalid connection request: {0}")]
    InvalidConnection(String),

    #[error("connection request expired")]
    ConnectionExpired,
}
