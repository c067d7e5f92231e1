//! EIP-712 signing domain construction.

use alloy_primitives::{Address, U256};
use alloy_sol_types::Eip712Domain;

/// Build the signing domain scoping signatures to one protocol instance,
/// one network, and one forwarder deployment. All four parameters must be
/// sourced identically by the signer and the relay or every signature will
/// be rejected.
pub fn signing_domain(
    name: &str,
    version: &str,
    chain_id: u64,
    verifying_contract: Address,
) -> Eip712Domain {
    Eip712Domain::new(
        Some(name.to_owned().into()),
        Some(version.to_owned().into()),
        Some(U256::from(chain_id)),
        Some(verifying_contract),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const FORWARDER: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

    #[test]
    fn test_separator_depends_on_network() {
        let local = signing_domain("MinimalForwarder", "0.0.1", 31337, FORWARDER);
        let mainnet = signing_domain("MinimalForwarder", "0.0.1", 1, FORWARDER);
        assert_ne!(local.separator(), mainnet.separator());
    }

    #[test]
    fn test_separator_depends_on_deployment() {
        let a = signing_domain("MinimalForwarder", "0.0.1", 31337, FORWARDER);
        let b = signing_domain("MinimalForwarder", "0.0.1", 31337, Address::ZERO);
        assert_ne!(a.separator(), b.separator());
    }
}
