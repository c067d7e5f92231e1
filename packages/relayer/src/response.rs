//! Response types for the relayer API.

use serde::Serialize;

/// Response from the relay endpoint. Failure bodies are built by
/// `Error::into_response` with the same `{success, error, details}` shape.
#[derive(Serialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(rename = "txHash")]
    pub tx_hash: String,
}

impl RelayResponse {
    pub fn ok(tx_hash: String) -> Self {
        Self {
            success: true,
            tx_hash,
        }
    }
}

/// Response from the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub relayer_account: String,
    pub forwarder_address: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub uptime_secs: u64,
    pub requests: u64,
}

/// Response from the nonce endpoint. The nonce is a decimal string, like
/// the numeric fields of the relay payload.
#[derive(Serialize)]
pub struct NonceResponse {
    pub address: String,
    pub nonce: String,
}
