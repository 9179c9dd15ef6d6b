//! Infrastructure layer - External service integrations
//!
//! This layer contains the Alloy-backed chain client, the `sol!` contract
//! bindings, transaction signing and the contract gateway.

pub mod ethereum;

pub use ethereum::{connect, AlloyChainClient, ChainClient, ProviderConfig};
