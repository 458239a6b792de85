//! Static per-network gas reference data
//!
//! Gas limits and default fee levels per network and operation type.
//! Live gas prices and native-token USD prices are never stored here; they
//! come from the injected `GasOracle` on every call.

use lazy_static::lazy_static;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use crate::errors::{EngineError, EngineResult};
use crate::types::{NetworkId, OperationType};

#[derive(Debug, Clone)]
pub struct GasLimits {
    pub transfer: u64,
    pub swap: u64,
    pub flash_loan: u64,
    pub arbitrage: u64,
    pub complex: u64,
}

impl GasLimits {
    pub fn for_operation(&self, operation: OperationType) -> u64 {
        match operation {
            OperationType::Transfer => self.transfer,
            OperationType::Swap => self.swap,
            OperationType::FlashLoan => self.flash_loan,
            OperationType::Arbitrage => self.arbitrage,
            OperationType::Complex => self.complex,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NetworkGasProfile {
    pub limits: GasLimits,
    pub default_base_fee_gwei: Decimal,
    pub default_priority_fee_gwei: Decimal,
    pub avg_confirmation_secs: u64,
}

lazy_static! {
    pub static ref NETWORK_GAS_PROFILES: HashMap<NetworkId, NetworkGasProfile> = {
        let mut profiles = HashMap::new();
        profiles.insert(
            NetworkId::Ethereum,
            NetworkGasProfile {
                limits: GasLimits {
                    transfer: 21_000,
                    swap: 150_000,
                    flash_loan: 300_000,
                    arbitrage: 400_000,
                    complex: 600_000,
                },
                default_base_fee_gwei: dec!(25),
                default_priority_fee_gwei: dec!(2),
                avg_confirmation_secs: 60,
            },
        );
        profiles.insert(
            NetworkId::Arbitrum,
            NetworkGasProfile {
                limits: GasLimits {
                    transfer: 21_000,
                    swap: 500_000,
                    flash_loan: 900_000,
                    arbitrage: 1_200_000,
                    complex: 1_800_000,
                },
                default_base_fee_gwei: dec!(0.1),
                default_priority_fee_gwei: dec!(0.01),
                avg_confirmation_secs: 2,
            },
        );
        profiles.insert(
            NetworkId::Optimism,
            NetworkGasProfile {
                limits: GasLimits {
                    transfer: 21_000,
                    swap: 160_000,
                    flash_loan: 320_000,
                    arbitrage: 420_000,
                    complex: 650_000,
                },
                default_base_fee_gwei: dec!(0.05),
                default_priority_fee_gwei: dec!(0.005),
                avg_confirmation_secs: 4,
            },
        );
        profiles.insert(
            NetworkId::Base,
            NetworkGasProfile {
                limits: GasLimits {
                    transfer: 21_000,
                    swap: 160_000,
                    flash_loan: 320_000,
                    arbitrage: 420_000,
                    complex: 650_000,
                },
                default_base_fee_gwei: dec!(0.05),
                default_priority_fee_gwei: dec!(0.005),
                avg_confirmation_secs: 4,
            },
        );
        profiles.insert(
            NetworkId::Polygon,
            NetworkGasProfile {
                limits: GasLimits {
                    transfer: 21_000,
                    swap: 180_000,
                    flash_loan: 350_000,
                    arbitrage: 450_000,
                    complex: 700_000,
                },
                default_base_fee_gwei: dec!(40),
                default_priority_fee_gwei: dec!(30),
                avg_confirmation_secs: 5,
            },
        );
        profiles
    };
}

pub fn network_profile(network: NetworkId) -> EngineResult<&'static NetworkGasProfile> {
    NETWORK_GAS_PROFILES
        .get(&network)
        .ok_or_else(|| EngineError::UnsupportedNetwork {
            network: network.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_network_has_a_profile() {
        for network in [
            NetworkId::Ethereum,
            NetworkId::Arbitrum,
            NetworkId::Optimism,
            NetworkId::Base,
            NetworkId::Polygon,
        ] {
            let profile = network_profile(network).unwrap();
            assert!(profile.limits.transfer > 0);
            assert!(profile.limits.arbitrage > profile.limits.swap);
            assert!(profile.avg_confirmation_secs > 0);
        }
    }
}
