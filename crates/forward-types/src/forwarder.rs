//! On-chain forwarder ABI: the `ForwardRequest` struct and entry points.
//!
//! Declared once so the EIP-712 digest the codec computes and the ABI bytes
//! the relay sends to the ledger come from the same definition.

use alloy_sol_types::sol;

sol! {
    /// A delegated call authorization, signed off-chain by `from`.
    ///
    /// `nonce` must equal the forwarder's stored value for `from` at
    /// execution time; a successful execution advances it, permanently
    /// invalidating the same signed request.
    struct ForwardRequest {
        address from;
        address to;
        uint256 value;
        uint256 gas;
        uint256 nonce;
        bytes data;
    }

    /// Read-only signature and nonce check against current ledger state.
    function verify(ForwardRequest request, bytes signature) external view returns (bool);

    /// Fee-paying execution. Advances the stored nonce for `request.from`.
    function execute(ForwardRequest request, bytes signature) external payable returns (bool success, bytes returndata);

    /// Currently stored nonce for an account.
    function getNonce(address from) external view returns (uint256);
}
