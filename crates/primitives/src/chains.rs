use alloy_chains::NamedChain;

/// Networks a proposal may target, keyed by the name used in deployment configs.
pub const KNOWN_NETWORKS: [(&str, NamedChain); 6] = [
    ("mainnet", NamedChain::Mainnet),
    ("sepolia", NamedChain::Sepolia),
    ("polygon", NamedChain::Polygon),
    ("arbitrum", NamedChain::Arbitrum),
    ("optimism", NamedChain::Optimism),
    ("base", NamedChain::Base),
];

/// Chain identifiers of [`KNOWN_NETWORKS`], in table order.
pub const KNOWN_CHAIN_IDS: [u64; 6] = [
    NamedChain::Mainnet as u64,
    NamedChain::Sepolia as u64,
    NamedChain::Polygon as u64,
    NamedChain::Arbitrum as u64,
    NamedChain::Optimism as u64,
    NamedChain::Base as u64,
];

pub fn chain_id_for(network: &str) -> Option<u64> {
    let network = network.trim().to_lowercase();
    KNOWN_NETWORKS
        .iter()
        .find(|(name, _)| *name == network)
        .map(|(_, chain)| *chain as u64)
}

pub fn network_name_for(chain_id: u64) -> Option<&'static str> {
    KNOWN_NETWORKS
        .iter()
        .find(|(_, chain)| *chain as u64 == chain_id)
        .map(|(name, _)| *name)
}

pub fn is_known_chain(chain_id: u64) -> bool {
    KNOWN_CHAIN_IDS.contains(&chain_id)
}
