//! Per-network deployment parameters.
//!
//! Configuration is plain immutable data resolved once at startup from the
//! network name; nothing downstream mutates or re-reads it.

use alloy_primitives::{Address, U256};

use crate::{
    constants::HAY_ADDRESS,
    errors::ScriptError,
    utils::{days_to_seconds, hours_to_seconds},
};

/// The parameters of one target network
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// The network name, also the key of the persisted address file
    pub network: String,
    /// The live reward token, recorded in the book and wired into voting
    pub reward_token: Address,
    /// The epoch length in seconds; start times align to multiples of this
    pub epoch_period: u64,
    /// Token bonding coefficients for [helio, helioLP]
    pub bonding_coefficients: [U256; 2],
}

impl NetworkConfig {
    /// Resolves the configuration for a named network.
    ///
    /// Production runs on week-long epochs; test networks compress an epoch
    /// to an hour so a full cycle can be observed quickly.
    pub fn for_network(network: &str) -> Result<Self, ScriptError> {
        let epoch_period = match network {
            "bsc" => days_to_seconds(7),
            "bscTestnet" | "hardhat" | "localhost" => hours_to_seconds(1),
            _ => {
                return Err(ScriptError::InvalidArgument(format!(
                    "unknown network: {network}"
                )))
            }
        };

        let one_token = U256::from(10).pow(U256::from(18));
        Ok(Self {
            network: network.to_string(),
            reward_token: HAY_ADDRESS,
            epoch_period,
            bonding_coefficients: [one_token, one_token * U256::from(2)],
        })
    }
}
