//! Shared request types and typed-message codec for the meta-transaction
//! relay. Zero service dependency, usable by signer-side tooling and the
//! relay alike.

mod codec;
mod domain;
mod error;
mod forwarder;

pub use codec::{recover_signer, signing_hash};
pub use domain::signing_domain;
pub use error::CodecError;
pub use forwarder::{executeCall, getNonceCall, verifyCall, ForwardRequest};
