//! In-memory forwarder ledger for tests and local development.
//!
//! Mirrors the dependency contract of the deployed forwarder: `verify` is a
//! pure read over current state; `execute` re-verifies and advances the
//! per-account nonce under one lock, so concurrent submissions against the
//! same nonce resolve to exactly one winner.

use alloy::primitives::{keccak256, Address, Bytes, B256, U256};
use alloy::sol_types::Eip712Domain;
use async_trait::async_trait;
use forward_types::{recover_signer, signing_hash, ForwardRequest};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::ledger::{Ledger, LedgerError};

/// In-memory forwarder ledger (for testing and ephemeral use).
pub struct MemoryForwarder {
    domain: Eip712Domain,
    nonces: Mutex<HashMap<Address, U256>>,
    verify_calls: AtomicU64,
    execute_calls: AtomicU64,
}

impl MemoryForwarder {
    pub fn new(domain: Eip712Domain) -> Self {
        Self {
            domain,
            nonces: Mutex::new(HashMap::new()),
            verify_calls: AtomicU64::new(0),
            execute_calls: AtomicU64::new(0),
        }
    }

    /// Seed a stored nonce, as if the account had executed before.
    pub fn set_nonce(&self, account: Address, nonce: U256) {
        self.nonces.lock().unwrap().insert(account, nonce);
    }

    pub fn nonce(&self, account: Address) -> U256 {
        self.nonces
            .lock()
            .unwrap()
            .get(&account)
            .copied()
            .unwrap_or(U256::ZERO)
    }

    /// Number of verify calls observed. Lets tests assert that malformed
    /// input never reaches the ledger.
    pub fn verify_calls(&self) -> u64 {
        self.verify_calls.load(Ordering::Relaxed)
    }

    pub fn execute_calls(&self) -> u64 {
        self.execute_calls.load(Ordering::Relaxed)
    }

    fn check(
        nonces: &HashMap<Address, U256>,
        domain: &Eip712Domain,
        request: &ForwardRequest,
        signature: &Bytes,
    ) -> bool {
        let stored = nonces.get(&request.from).copied().unwrap_or(U256::ZERO);
        if stored != request.nonce {
            return false;
        }
        match recover_signer(request, domain, signature) {
            Ok(signer) => signer == request.from,
            Err(_) => false,
        }
    }
}

#[async_trait]
impl Ledger for MemoryForwarder {
    async fn read_verify(
        &self,
        request: &ForwardRequest,
        signature: &Bytes,
    ) -> Result<bool, LedgerError> {
        self.verify_calls.fetch_add(1, Ordering::Relaxed);
        let nonces = self.nonces.lock().unwrap();
        Ok(Self::check(&nonces, &self.domain, request, signature))
    }

    async fn submit_execute(
        &self,
        request: &ForwardRequest,
        signature: &Bytes,
    ) -> Result<B256, LedgerError> {
        self.execute_calls.fetch_add(1, Ordering::Relaxed);
        let mut nonces = self.nonces.lock().unwrap();
        if !Self::check(&nonces, &self.domain, request, signature) {
            return Err(LedgerError::Reverted(
                "forwarder: signature does not match request".into(),
            ));
        }
        nonces.insert(request.from, request.nonce + U256::from(1u64));
        // Deterministic pseudo hash, unique per consumed (request, signature).
        let mut seed = signing_hash(request, &self.domain).to_vec();
        seed.extend_from_slice(signature);
        Ok(keccak256(seed))
    }

    async fn read_nonce(&self, account: Address) -> Result<U256, LedgerError> {
        Ok(self.nonce(account))
    }
}
