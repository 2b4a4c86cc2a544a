mod provider;
pub use provider::{ProviderRelayer, RelayerError};
