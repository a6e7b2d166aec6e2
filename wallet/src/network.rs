/// Display names for the chains whose addresses show up in IBC messages,
/// keyed by bech32 human-readable prefix.
const BECH32_NETWORKS: &[(&str, &str)] = &[
    ("inj", "Injective"),
    ("cosmos", "Cosmos Hub"),
    ("osmo", "Osmosis"),
    ("axelar", "Axelar"),
    ("juno", "Juno"),
    ("terra", "Terra"),
    ("evmos", "Evmos"),
    ("persistence", "Persistence"),
    ("secret", "Secret Network"),
    ("stride", "Stride"),
    ("cre", "Crescent"),
    ("somm", "Sommelier"),
    ("canto", "Canto"),
    ("kava", "Kava"),
    ("orai", "Oraichain"),
    ("noble", "Noble"),
    ("celestia", "Celestia"),
    ("migaloo", "Migaloo"),
    ("kujira", "Kujira"),
    ("neutron", "Neutron"),
    ("chihuahua", "Chihuahua"),
    ("xpla", "XPLA"),
    ("andr", "Andromeda"),
    ("saga", "Saga"),
];

pub const ETHEREUM_NETWORK: &str = "Ethereum";
pub const UNKNOWN_NETWORK: &str = "Unknown";

/// Network an address belongs to, judged by its prefix alone.
pub fn network_from_address(address: &str) -> &'static str {
    if address.starts_with("0x") {
        return ETHEREUM_NETWORK;
    }

    let Some((hrp, _)) = address.rsplit_once('1') else {
        return UNKNOWN_NETWORK;
    };

    BECH32_NETWORKS
        .iter()
        .find(|(prefix, _)| *prefix == hrp)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_NETWORK)
}
