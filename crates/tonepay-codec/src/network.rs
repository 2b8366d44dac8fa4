//! Network ID table and canonical per-network stablecoin asset addresses.
//!
//! The wire format never carries the asset address directly; the decoder
//! derives it from the 1-byte network ID.

/// A settlement network the payment could be denominated on.
///
/// Unknown wire IDs decode to [`Network::BaseSepolia`], the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Base Sepolia testnet. Wire ID 0, and the default for unknown IDs.
    BaseSepolia,
    /// Base mainnet. Wire ID 1.
    Base,
    /// Ethereum mainnet. Wire ID 2.
    Ethereum,
    /// Ethereum Sepolia testnet. Wire ID 3.
    EthereumSepolia,
}

impl Network {
    /// Wire representation of this network.
    #[must_use]
    pub fn id(self) -> u8 {
        match self {
            Self::BaseSepolia => 0,
            Self::Base => 1,
            Self::Ethereum => 2,
            Self::EthereumSepolia => 3,
        }
    }

    /// Decode a wire network ID. Unknown IDs map to [`Network::BaseSepolia`].
    #[must_use]
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => Self::Base,
            2 => Self::Ethereum,
            3 => Self::EthereumSepolia,
            _ => Self::BaseSepolia,
        }
    }

    /// Canonical 20-byte stablecoin asset address for this network.
    ///
    /// `base-sepolia` and `base` addresses are the USDC deployments used by
    /// the settlement ecosystem this wire format targets. `ethereum` is the
    /// canonical mainnet USDC contract. `ethereum-sepolia` has no single
    /// canonical USDC deployment across testnet forks; the address below is
    /// a documented placeholder, not a claim of an authoritative contract.
    #[must_use]
    pub fn asset_address(self) -> [u8; 20] {
        match self {
            Self::BaseSepolia => hex20("036CbD53842c5426634e7929541eC2318f3dCF7e"),
            Self::Base => hex20("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
            Self::Ethereum => hex20("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
            Self::EthereumSepolia => hex20("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
        }
    }
}

fn hex20(s: &str) -> [u8; 20] {
    let mut out = [0u8; 20];
    match hex::decode_to_slice(s, &mut out) {
        Ok(()) => out,
        Err(_) => unreachable!("network asset addresses are fixed valid hex literals"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_maps_to_base_sepolia() {
        assert_eq!(Network::from_id(99), Network::BaseSepolia);
    }

    #[test]
    fn id_round_trips_for_known_networks() {
        for n in [
            Network::BaseSepolia,
            Network::Base,
            Network::Ethereum,
            Network::EthereumSepolia,
        ] {
            assert_eq!(Network::from_id(n.id()), n);
        }
    }

    #[test]
    fn every_network_has_a_distinct_nonzero_asset_address() {
        let addrs: Vec<_> = [
            Network::BaseSepolia,
            Network::Base,
            Network::Ethereum,
            Network::EthereumSepolia,
        ]
        .map(Network::asset_address)
        .to_vec();
        assert!(addrs.iter().all(|a| *a != [0u8; 20]));
        for i in 0..addrs.len() {
            for j in (i + 1)..addrs.len() {
                assert_ne!(addrs[i], addrs[j]);
            }
        }
    }
}
