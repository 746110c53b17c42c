//! Well-known chain endpoints served by the network engine.

use std::collections::HashMap;
use std::sync::LazyLock;

#[derive(Debug, Clone)]
pub struct Network {
    pub chain_id: u64,
    pub name: &'static str,
    pub symbol: &'static str,
    pub explorer: &'static str,
    pub rpc_url: &'static str,
    pub ws_rpc_url: &'static str,
}

pub static NETWORKS: LazyLock<HashMap<u64, Network>> = LazyLock::new(|| {
    [
        Network {
            chain_id: 100,
            name: "Gnosis",
            symbol: "xDAI",
            explorer: "https://gnosisscan.io",
            rpc_url: "https://100.engine.commonswallet.org",
            ws_rpc_url: "wss://100.engine.commonswallet.org",
        },
        Network {
            chain_id: 137,
            name: "Polygon",
            symbol: "MATIC",
            explorer: "https://polygonscan.com",
            rpc_url: "https://137.engine.commonswallet.org",
            ws_rpc_url: "wss://137.engine.commonswallet.org",
        },
        Network {
            chain_id: 8453,
            name: "Base",
            symbol: "Ether",
            explorer: "https://basescan.org",
            rpc_url: "https://8453.engine.commonswallet.org",
            ws_rpc_url: "wss://8453.engine.commonswallet.org",
        },
        Network {
            chain_id: 42161,
            name: "Arbitrum",
            symbol: "Ether",
            explorer: "https://arbiscan.io",
            rpc_url: "https://42161.engine.commonswallet.org",
            ws_rpc_url: "wss://42161.engine.commonswallet.org",
        },
        Network {
            chain_id: 42220,
            name: "CELO",
            symbol: "CELO",
            explorer: "https://celoscan.io",
            rpc_url: "https://42220.engine.commonswallet.org",
            ws_rpc_url: "wss://42220.engine.commonswallet.org",
        },
    ]
    .into_iter()
    .map(|n| (n.chain_id, n))
    .collect()
});
