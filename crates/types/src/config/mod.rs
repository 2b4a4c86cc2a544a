mod env_utils;
pub use env_utils::{load_address, load_string};

mod error;
pub use error::ConfigError;

use alloy::{genesis::Genesis, primitives::Address};

/// Environment variable holding the exit event source address.
pub const EXIT_SOURCE_ENV: &str = "BRIDGE_EXIT_SOURCE";

/// Environment variable holding the slashing source address.
pub const SLASH_SOURCE_ENV: &str = "BRIDGE_SLASH_SOURCE";

/// Environment variable holding the root chain checkpoint manager address.
pub const CHECKPOINT_MANAGER_ENV: &str = "BRIDGE_CHECKPOINT_MANAGER";

/// Genesis `extra_fields` key under which the constants are stored.
pub const GENESIS_KEY: &str = "bridgeConstants";

/// Bridge constants.
///
/// These are the contract addresses the bridge listens to on the local chain,
/// and the address of the checkpoint manager it submits to on the root chain.
#[derive(Debug, Copy, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConstants {
    /// Local contract emitting exit events.
    exit_source: Address,
    /// Local validator set contract, emitting slash events and originating
    /// slash exits.
    slash_source: Address,
    /// Root chain checkpoint manager contract.
    checkpoint_manager: Address,
}

impl core::fmt::Display for BridgeConstants {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{{ exit_source: {}, slash_source: {}, checkpoint_manager: {} }}",
            self.exit_source, self.slash_source, self.checkpoint_manager
        )
    }
}

impl BridgeConstants {
    /// Create a new set of constants.
    pub const fn new(
        exit_source: Address,
        slash_source: Address,
        checkpoint_manager: Address,
    ) -> Self {
        Self { exit_source, slash_source, checkpoint_manager }
    }

    /// Get the hard-coded local test constants.
    #[cfg(any(test, feature = "test-utils"))]
    pub const fn test() -> Self {
        crate::test_utils::TEST_CONSTANTS
    }

    /// Load the constants from a [`Genesis`].
    pub fn try_from_genesis(genesis: &Genesis) -> Result<Self, ConfigError> {
        let constants = genesis
            .config
            .extra_fields
            .get(GENESIS_KEY)
            .ok_or(ConfigError::MissingGenesis(GENESIS_KEY))?;
        serde_json::from_value(constants.clone()).map_err(Into::into)
    }

    /// Load the constants from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            exit_source: load_address(EXIT_SOURCE_ENV)?,
            slash_source: load_address(SLASH_SOURCE_ENV)?,
            checkpoint_manager: load_address(CHECKPOINT_MANAGER_ENV)?,
        })
    }

    /// Get the exit event source address.
    pub const fn exit_source(&self) -> Address {
        self.exit_source
    }

    /// Get the slashing source address.
    pub const fn slash_source(&self) -> Address {
        self.slash_source
    }

    /// Get the root chain checkpoint manager address.
    pub const fn checkpoint_manager(&self) -> Address {
        self.checkpoint_manager
    }

    /// True if logs emitted by this address are of interest to the bridge.
    pub const fn const_is_watched(&self, address: Address) -> bool {
        address.const_eq(&self.exit_source) || address.const_eq(&self.slash_source)
    }

    /// True if logs emitted by this address are of interest to the bridge.
    pub fn is_watched(&self, address: Address) -> bool {
        address == self.exit_source || address == self.slash_source
    }
}
