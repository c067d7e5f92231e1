//! Application state shared across handlers.

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::Eip712Domain;
use forward_types::signing_domain;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::ledger::Ledger;
use crate::rpc::ForwarderRpc;

/// Shared application state. Holds no per-request state: every relay
/// invocation is independent.
pub struct AppState {
    pub config: Config,
    pub domain: Eip712Domain,
    pub ledger: Arc<dyn Ledger>,
    pub relayer_address: Address,
    pub forwarder_address: Address,
    pub start_time: Instant,
    pub request_count: AtomicU64,
}

impl AppState {
    /// Create application state from configuration, connecting the JSON-RPC
    /// ledger client with the relay's own fee-paying key.
    pub async fn new(config: Config) -> Result<Self, Error> {
        let signer = load_signer(&config)?;
        let relayer_address = signer.address();
        info!(relayer = %relayer_address, "Loaded relayer key");

        let forwarder_address = parse_forwarder(&config)?;
        let rpc = ForwarderRpc::new(
            &config.rpc_url,
            signer,
            forwarder_address,
            Duration::from_millis(config.rpc_timeout_ms),
        )?;

        // A signing domain pointed at the wrong network rejects every
        // signature; catch that at startup instead of per-request.
        match rpc.chain_id().await {
            Ok(id) if id != config.chain_id => warn!(
                node = id,
                configured = config.chain_id,
                "Node chain id disagrees with configured chain id; signatures will fail verification"
            ),
            Ok(id) => info!(chain_id = id, "Node chain id matches configuration"),
            Err(e) => warn!(error = %e, "Could not query node chain id at startup"),
        }

        Self::with_ledger(config, Arc::new(rpc), relayer_address)
    }

    /// Assemble state around an explicit ledger implementation. Used by
    /// tests and embedded deployments.
    pub fn with_ledger(
        config: Config,
        ledger: Arc<dyn Ledger>,
        relayer_address: Address,
    ) -> Result<Self, Error> {
        let forwarder_address = parse_forwarder(&config)?;
        let domain = signing_domain(
            &config.domain_name,
            &config.domain_version,
            config.chain_id,
            forwarder_address,
        );
        Ok(Self {
            domain,
            ledger,
            relayer_address,
            forwarder_address,
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        })
    }
}

/// Relayer key: `RELAYER_KEY` env var first, then the configured key file.
fn load_signer(config: &Config) -> Result<PrivateKeySigner, Error> {
    let raw = match std::env::var("RELAYER_KEY") {
        Ok(key) if !key.is_empty() => key,
        _ => std::fs::read_to_string(&config.key_path).map_err(|e| {
            Error::Config(format!(
                "no RELAYER_KEY env var and failed to read key file `{}`: {e}",
                config.key_path
            ))
        })?,
    };
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("invalid relayer key: {e}")))
}

fn parse_forwarder(config: &Config) -> Result<Address, Error> {
    config.forwarder_address.parse().map_err(|e| {
        Error::Config(format!(
            "invalid forwarder_address `{}`: {e}",
            config.forwarder_address
        ))
    })
}
