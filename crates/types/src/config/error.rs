use alloy::primitives::hex::FromHexError;

/// Errors loading the [`BridgeConstants`].
///
/// [`BridgeConstants`]: crate::BridgeConstants
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The genesis has no bridge constants.
    #[error("missing {0} field in genesis")]
    MissingGenesis(&'static str),
    /// Missing or non-unicode environment variable.
    #[error("missing or non-unicode environment variable: {0}")]
    Var(String),
    /// An environment variable is not an address.
    #[error("invalid address in {key}: {source}")]
    InvalidAddress {
        /// The environment variable.
        key: String,
        /// The parse error.
        #[source]
        source: FromHexError,
    },
    /// The genesis bridge constants are malformed.
    #[error("failed to parse bridge constants: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    /// Missing or non-unicode env var.
    pub fn missing(key: &str) -> Self {
        Self::Var(key.to_string())
    }
}
