//! Community configuration model and resolver.
//!
//! A community is described by a JSON document published alongside the
//! network indexer. This crate deserializes that document and exposes the
//! derived lookups the rest of the SDK needs: primary token, primary chain,
//! RPC endpoint, account/session/card entries. Lookups that can miss return
//! [`ConfigError`]; a missing entry is fatal and never recovered.

mod community;
mod error;
mod networks;
mod types;

pub use community::{AccountVariant, CommunityConfig};
pub use error::ConfigError;
pub use networks::{NETWORKS, Network};
pub use types::{
    Config, ConfigAccount, ConfigCard, ConfigChain, ConfigChainNode, ConfigCommunity,
    ConfigCommunityProfile, ConfigCommunityToken, ConfigIpfs, ConfigPlugin, ConfigScan,
    ConfigSession, ConfigToken,
};
