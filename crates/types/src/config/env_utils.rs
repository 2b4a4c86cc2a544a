use crate::ConfigError;
use alloy::primitives::Address;
use std::env;

/// Load a variable from the environment
pub fn load_string(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::missing(key))
}

/// Load an address from the environment
pub fn load_address(key: &str) -> Result<Address, ConfigError> {
    load_string(key)?
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidAddress { key: key.to_string(), source })
}
