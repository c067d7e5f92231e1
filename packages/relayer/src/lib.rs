//! # Meta-Transaction Relayer
//!
//! A relay for gasless transactions. A user authorizes an action by signing
//! a typed forward request off-chain; the relay verifies it against the
//! on-chain forwarder before any fee is at stake, then submits the
//! execution call with its own fee-paying key.
//!
//! ## Quick Start
//! ```bash
//! RELAYER_KEY=0x... cargo run --bin relayer
//! ```
//!
//! ## Endpoints
//! - `GET /health` - Health check with basic metrics
//! - `GET /metrics` - Prometheus metrics
//! - `POST /relay` - Verify and submit a signed forward request
//! - `GET /nonce/{address}` - Current forwarder nonce for an account

pub mod config;
mod error;
mod handlers;
pub mod ledger;
pub mod memory;
mod metrics;
mod middleware;
mod response;
mod router;
pub mod rpc;
mod schemas;
mod state;

pub use config::Config;
pub use error::Error;
pub use ledger::{Ledger, LedgerError};
pub use memory::MemoryForwarder;
pub use router::create as create_router;
pub use state::AppState;
