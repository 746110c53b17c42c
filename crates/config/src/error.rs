use thiserror::Error;

/// Failed lookups inside a community document. These indicate a broken or
/// incomplete document and are never recovered at runtime.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no token entry for {0}")]
    MissingToken(String),

    #[error("no chain entry for {0}")]
    MissingChain(String),

    #[error("no account entry for {0}")]
    MissingAccount(String),

    #[error("community has no card manager configured")]
    MissingCards,

    #[error("community has no session manager configured")]
    MissingSession,
}
