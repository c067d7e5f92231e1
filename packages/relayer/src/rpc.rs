//! JSON-RPC ledger client backed by the deployed forwarder contract.
//!
//! Wraps an `alloy` provider carrying the relay's fee-paying wallet. Every
//! outbound call is bounded by the configured timeout; node-reported
//! reverts and transport failures are classified separately so callers can
//! tell "would fail on-chain" from "could not reach the node".

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolCall;
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use forward_types::{executeCall, getNonceCall, verifyCall, ForwardRequest};
use std::future::IntoFuture;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tracing::info;

use crate::error::Error;
use crate::ledger::{Ledger, LedgerError};
use crate::metrics::METRICS;

/// Ledger client bound to one forwarder deployment.
pub struct ForwarderRpc {
    provider: DynProvider,
    forwarder: Address,
    timeout: Duration,
    rpc_url: String,
}

impl ForwarderRpc {
    pub fn new(
        rpc_url: &str,
        signer: PrivateKeySigner,
        forwarder: Address,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| Error::Config(format!("invalid rpc_url `{rpc_url}`: {e}")))?;
        let wallet = EthereumWallet::from(signer);
        let provider = ProviderBuilder::new().wallet(wallet).connect_http(url).erased();
        info!(rpc = rpc_url, forwarder = %forwarder, "Ledger RPC client initialized");
        Ok(Self {
            provider,
            forwarder,
            timeout,
            rpc_url: rpc_url.to_string(),
        })
    }

    /// The configured RPC endpoint, for logs and health reporting.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Network identifier reported by the node. Queried at startup to catch
    /// a signing domain pointed at the wrong network.
    pub async fn chain_id(&self) -> Result<u64, LedgerError> {
        self.bounded(self.provider.get_chain_id()).await
    }

    fn call_to_forwarder(&self, input: Vec<u8>) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(self.forwarder)
            .with_input(input)
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, LedgerError>
    where
        F: IntoFuture<Output = Result<T, TransportError>>,
    {
        match tokio::time::timeout(self.timeout, fut.into_future()).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                METRICS.ledger_errors.fetch_add(1, Ordering::Relaxed);
                Err(classify(err))
            }
            Err(_) => {
                METRICS.ledger_errors.fetch_add(1, Ordering::Relaxed);
                Err(LedgerError::Unreachable(format!(
                    "ledger call timed out after {}ms",
                    self.timeout.as_millis()
                )))
            }
        }
    }
}

/// Split node-reported reverts from transport-level failures.
fn classify(err: TransportError) -> LedgerError {
    match err {
        RpcError::ErrorResp(payload) => {
            if payload.as_revert_data().is_some() || payload.message.contains("revert") {
                LedgerError::Reverted(payload.to_string())
            } else {
                LedgerError::Unreachable(format!("node rejected call: {payload}"))
            }
        }
        other => LedgerError::Unreachable(other.to_string()),
    }
}

#[async_trait]
impl Ledger for ForwarderRpc {
    async fn read_verify(
        &self,
        request: &ForwardRequest,
        signature: &Bytes,
    ) -> Result<bool, LedgerError> {
        let call = verifyCall {
            request: request.clone(),
            signature: signature.clone(),
        };
        let tx = self.call_to_forwarder(call.abi_encode());
        let output = self.bounded(self.provider.call(tx)).await?;
        verifyCall::abi_decode_returns(&output)
            .map_err(|e| LedgerError::Protocol(format!("undecodable verify return: {e}")))
    }

    async fn submit_execute(
        &self,
        request: &ForwardRequest,
        signature: &Bytes,
    ) -> Result<B256, LedgerError> {
        let call = executeCall {
            request: request.clone(),
            signature: signature.clone(),
        };
        // The forwarder passes `request.value` on to the target, paid from
        // the relay's balance alongside the fee.
        let tx = self
            .call_to_forwarder(call.abi_encode())
            .with_value(request.value);
        let pending = self.bounded(self.provider.send_transaction(tx)).await?;
        Ok(*pending.tx_hash())
    }

    async fn read_nonce(&self, account: Address) -> Result<U256, LedgerError> {
        let call = getNonceCall { from: account };
        let tx = self.call_to_forwarder(call.abi_encode());
        let output = self.bounded(self.provider.call(tx)).await?;
        getNonceCall::abi_decode_returns(&output)
            .map_err(|e| LedgerError::Protocol(format!("undecodable getNonce return: {e}")))
    }
}
