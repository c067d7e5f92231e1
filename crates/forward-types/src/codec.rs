//! Deterministic digest and signature-to-identity recovery.

use alloy_primitives::{Address, Signature, B256};
use alloy_sol_types::{Eip712Domain, SolStruct};

use crate::error::CodecError;
use crate::forwarder::ForwardRequest;

/// The exact digest a signature over `request` covers:
/// `keccak256(0x1901 ‖ domainSeparator ‖ structHash)`. The struct type hash
/// embedded in `structHash` is the structural tag keeping this scheme
/// separate from every other signed-message format.
pub fn signing_hash(request: &ForwardRequest, domain: &Eip712Domain) -> B256 {
    request.eip712_signing_hash(domain)
}

/// Recover the account that produced `signature` over the canonical
/// encoding of `(domain, request)`.
///
/// Accepts 65-byte `r ‖ s ‖ v` signatures with v in {0, 1, 27, 28}.
pub fn recover_signer(
    request: &ForwardRequest,
    domain: &Eip712Domain,
    signature: &[u8],
) -> Result<Address, CodecError> {
    let signature = Signature::from_raw(signature)
        .map_err(|e| CodecError::MalformedSignature(e.to_string()))?;
    signature
        .recover_address_from_prehash(&signing_hash(request, domain))
        .map_err(|e| CodecError::RecoveryFailed(e.to_string()))
}
