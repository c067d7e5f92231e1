//! Inbound wire types for the relay endpoint.
//!
//! Numeric fields arrive as decimal strings (exact unsigned JSON integers
//! are also accepted) so values above 2^53 survive JSON clients; they parse
//! into 256-bit integers, never machine-width ones.

use alloy::primitives::{Address, Bytes, U256};
use forward_types::ForwardRequest;
use serde::Deserialize;
use serde_json::Value;

/// Full relay payload: the request plus the originator's signature.
#[derive(Debug, Clone, Deserialize)]
pub struct RelayPayload {
    pub request: ForwardRequestPayload,
    /// 65-byte `r ‖ s ‖ v` signature, hex-encoded.
    pub signature: Bytes,
}

/// Wire form of a forward request.
#[derive(Debug, Clone, Deserialize)]
pub struct ForwardRequestPayload {
    pub from: Address,
    pub to: Address,
    pub value: DecimalU256,
    pub gas: DecimalU256,
    pub nonce: DecimalU256,
    #[serde(default)]
    pub data: Bytes,
}

impl From<ForwardRequestPayload> for ForwardRequest {
    fn from(payload: ForwardRequestPayload) -> Self {
        ForwardRequest {
            from: payload.from,
            to: payload.to,
            value: payload.value.0,
            gas: payload.gas.0,
            nonce: payload.nonce.0,
            data: payload.data,
        }
    }
}

/// A non-negative 256-bit integer carried as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalU256(pub U256);

impl std::str::FromStr for DecimalU256 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("expected a decimal integer, got an empty string".into());
        }
        U256::from_str_radix(trimmed, 10)
            .map(Self)
            .map_err(|err| format!("not a non-negative decimal integer: {err}"))
    }
}

impl<'de> Deserialize<'de> for DecimalU256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => s.parse().map_err(serde::de::Error::custom),
            Value::Number(n) => n.as_u64().map(|v| Self(U256::from(v))).ok_or_else(|| {
                serde::de::Error::custom("numeric fields must be non-negative integers")
            }),
            other => Err(serde::de::Error::custom(format!(
                "numeric fields must be decimal strings, got {other}"
            ))),
        }
    }
}
