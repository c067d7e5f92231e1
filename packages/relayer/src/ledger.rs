//! Outbound dependency contract against the forwarder ledger.

use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use forward_types::ForwardRequest;
use std::fmt;

/// Outcome classification for outbound ledger calls.
#[derive(Debug)]
pub enum LedgerError {
    /// The node simulated the call and reported a revert. No fee was spent.
    Reverted(String),
    /// Transport failure or timeout. The signed request was not consumed.
    Unreachable(String),
    /// The node answered with something the relay cannot interpret.
    Protocol(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Reverted(msg) => write!(f, "ledger call reverted: {msg}"),
            LedgerError::Unreachable(msg) => write!(f, "ledger unreachable: {msg}"),
            LedgerError::Protocol(msg) => write!(f, "unexpected ledger response: {msg}"),
        }
    }
}

impl std::error::Error for LedgerError {}

/// The three operations the relay depends on.
///
/// `read_verify` and `read_nonce` are pure reads over current ledger state,
/// safe to call speculatively. `submit_execute` pays the fee and, on
/// success, advances the stored nonce for `request.from` by exactly one,
/// permanently invalidating the same signed request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Would the forwarder accept `(request, signature)` right now?
    async fn read_verify(
        &self,
        request: &ForwardRequest,
        signature: &Bytes,
    ) -> Result<bool, LedgerError>;

    /// Fee-paying execution. Returns the transaction identifier without
    /// waiting for confirmation.
    async fn submit_execute(
        &self,
        request: &ForwardRequest,
        signature: &Bytes,
    ) -> Result<B256, LedgerError>;

    /// Currently stored nonce for `account`.
    async fn read_nonce(&self, account: Address) -> Result<U256, LedgerError>;
}
