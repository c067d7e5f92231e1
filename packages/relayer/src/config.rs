//! Relayer configuration.

use serde::Deserialize;

/// Configuration for the relay service.
///
/// The domain fields (`chain_id`, `domain_name`, `domain_version`,
/// `forwarder_address`) are load-bearing in the signing codec and must be
/// sourced identically by originators or every signature will be rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Ledger node JSON-RPC endpoint.
    #[serde(default = "defaults::rpc_url")]
    pub rpc_url: String,

    /// Deployed forwarder contract the relay submits through.
    #[serde(default = "defaults::forwarder_address")]
    pub forwarder_address: String,

    /// Network identifier signatures are scoped to.
    #[serde(default = "defaults::chain_id")]
    pub chain_id: u64,

    /// EIP-712 domain name.
    #[serde(default = "defaults::domain_name")]
    pub domain_name: String,

    /// EIP-712 domain version.
    #[serde(default = "defaults::domain_version")]
    pub domain_version: String,

    /// File holding the relayer's hex-encoded fee-paying key.
    /// The `RELAYER_KEY` env var takes precedence.
    #[serde(default = "defaults::key_path")]
    pub key_path: String,

    #[serde(default = "defaults::bind_address")]
    pub bind_address: String,

    /// Upper bound on each outbound ledger call, in milliseconds.
    #[serde(default = "defaults::rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: defaults::rpc_url(),
            forwarder_address: defaults::forwarder_address(),
            chain_id: defaults::chain_id(),
            domain_name: defaults::domain_name(),
            domain_version: defaults::domain_version(),
            key_path: defaults::key_path(),
            bind_address: defaults::bind_address(),
            rpc_timeout_ms: defaults::rpc_timeout_ms(),
        }
    }
}

mod defaults {
    pub fn rpc_url() -> String {
        std::env::var("RELAYER_RPC_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| "http://127.0.0.1:8545".into())
    }

    pub fn forwarder_address() -> String {
        "0x5FbDB2315678afecb367f032d93F642f64180aa3".into()
    }

    pub fn chain_id() -> u64 {
        31337
    }

    pub fn domain_name() -> String {
        "MinimalForwarder".into()
    }

    pub fn domain_version() -> String {
        "0.0.1".into()
    }

    pub fn key_path() -> String {
        "./account_keys/relayer.key".into()
    }

    pub fn bind_address() -> String {
        "0.0.0.0:3040".into()
    }

    pub fn rpc_timeout_ms() -> u64 {
        10_000
    }
}
