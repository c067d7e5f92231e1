//! HTTP request handlers.

use crate::error::Error;
use crate::ledger::LedgerError;
use crate::metrics::METRICS;
use crate::middleware::RequestId;
use crate::response::{HealthResponse, NonceResponse, RelayResponse};
use crate::schemas::RelayPayload;
use crate::state::AppState;
use alloy::primitives::{Address, B256};
use axum::extract::{FromRequest, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use forward_types::{recover_signer, ForwardRequest};
use serde_json::Value;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Health check with basic metrics.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        relayer_account: state.relayer_address.to_string(),
        forwarder_address: state.forwarder_address.to_string(),
        chain_id: state.config.chain_id,
        rpc_url: state.config.rpc_url.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        requests: state.request_count.load(Ordering::Relaxed),
    })
}

/// Prometheus metrics in text exposition format.
pub async fn metrics() -> impl IntoResponse {
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4",
        )],
        METRICS.render(),
    )
}

/// Current forwarder nonce for an account. Originators read this before
/// signing; the relay itself never caches it.
pub async fn nonce(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> Result<Json<NonceResponse>, Error> {
    let account: Address = address
        .parse()
        .map_err(|_| Error::MalformedInput(format!("invalid account address `{address}`")))?;
    let nonce = state.ledger.read_nonce(account).await?;
    Ok(Json(NonceResponse {
        address: account.to_string(),
        nonce: nonce.to_string(),
    }))
}

/// Verify and submit a signed forward request.
pub async fn relay(
    State(state): State<Arc<AppState>>,
    request_parts: axum::extract::Request,
) -> Response {
    let start = std::time::Instant::now();
    METRICS.relay_total.fetch_add(1, Ordering::Relaxed);
    state.request_count.fetch_add(1, Ordering::Relaxed);

    // Correlation ID set by middleware.
    let req_id = request_parts
        .extensions()
        .get::<RequestId>()
        .map(|r| r.0.clone())
        .unwrap_or_default();

    // Parse the body through Value so malformed JSON gets this API's error
    // shape instead of the default extractor rejection.
    let body: Value = match Json::<Value>::from_request(request_parts, &state).await {
        Ok(Json(v)) => v,
        Err(e) => {
            warn!(req_id = %req_id, error = %e, "Invalid JSON body");
            METRICS.relay_rejected.fetch_add(1, Ordering::Relaxed);
            return Error::MalformedInput("request body is not valid JSON".into()).into_response();
        }
    };

    let result = relay_inner(&state, &req_id, body).await;
    METRICS.record_relay_duration(start);

    match result {
        Ok(tx_hash) => {
            METRICS.relay_success.fetch_add(1, Ordering::Relaxed);
            info!(req_id = %req_id, tx_hash = %tx_hash, "TX submitted");
            (StatusCode::OK, Json(RelayResponse::ok(tx_hash.to_string()))).into_response()
        }
        Err(err) => {
            match &err {
                Error::SubmissionFailed(_) | Error::Unexpected(_) | Error::Config(_) => {
                    METRICS.relay_failed.fetch_add(1, Ordering::Relaxed);
                    error!(req_id = %req_id, error = %err, "Relay failed");
                }
                _ => {
                    METRICS.relay_rejected.fetch_add(1, Ordering::Relaxed);
                    warn!(req_id = %req_id, error = %err, "Relay rejected");
                }
            }
            err.into_response()
        }
    }
}

/// The relay protocol: structural validation, advisory recovery,
/// authoritative pre-flight verification, then fee-paying submission. Each
/// step is an exit point; nothing is submitted unless verification passed.
async fn relay_inner(state: &AppState, req_id: &str, body: Value) -> Result<B256, Error> {
    // 1. Structural validation. Nothing leaves the process until the
    //    payload parses.
    let payload = parse_payload(body)?;
    let request: ForwardRequest = payload.request.into();
    let signature = payload.signature;

    info!(
        req_id = %req_id,
        from = %request.from,
        to = %request.to,
        nonce = %request.nonce,
        "Relaying request"
    );

    // 2. Advisory off-chain recovery. The ledger's verify stays the
    //    authoritative check; a mismatch here is logged for operators
    //    chasing signature-construction bugs and never decides the outcome.
    match recover_signer(&request, &state.domain, &signature) {
        Ok(signer) if signer == request.from => {
            debug!(req_id = %req_id, signer = %signer, "Off-chain recovery matches originator");
        }
        Ok(signer) => warn!(
            req_id = %req_id,
            expected = %request.from,
            recovered = %signer,
            "Off-chain recovery mismatch, deferring to on-chain verify"
        ),
        Err(e) => warn!(req_id = %req_id, error = %e, "Off-chain recovery failed"),
    }

    // 3. Pre-flight verification, before any fee is at stake.
    match state.ledger.read_verify(&request, &signature).await {
        Ok(true) => {}
        Ok(false) => {
            return Err(Error::VerificationFailed(
                "forwarder rejected the signature or nonce".into(),
            ))
        }
        Err(err) => return Err(err.into()),
    }

    // 4. Submission with the relay's own fee-paying credential. Never
    //    retried here: a consumed nonce cannot be re-signed by the relay.
    let tx_hash = state
        .ledger
        .submit_execute(&request, &signature)
        .await
        .map_err(|err| match err {
            LedgerError::Protocol(msg) => Error::Unexpected(msg),
            other => Error::SubmissionFailed(other.to_string()),
        })?;

    // 5. Done. Confirmation watching is the caller's concern.
    Ok(tx_hash)
}

/// Field-presence checks before the typed parse so the error names the
/// missing piece.
fn parse_payload(body: Value) -> Result<RelayPayload, Error> {
    let obj = body
        .as_object()
        .ok_or_else(|| Error::MalformedInput("request body must be a JSON object".into()))?;
    if !obj.contains_key("request") {
        return Err(Error::MalformedInput("missing `request` field".into()));
    }
    if !obj.contains_key("signature") {
        return Err(Error::MalformedInput("missing `signature` field".into()));
    }
    serde_json::from_value(body).map_err(|e| Error::MalformedInput(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::ledger::MockLedger;
    use alloy::primitives::{address, b256, Bytes, Signature, U256};
    use alloy::signers::local::PrivateKeySigner;
    use alloy::signers::SignerSync;
    use alloy::sol_types::Eip712Domain;
    use forward_types::{signing_domain, signing_hash};
    use serde_json::json;

    const TARGET: Address = address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512");

    fn test_state(ledger: MockLedger) -> AppState {
        AppState::with_ledger(Config::default(), Arc::new(ledger), Address::ZERO).unwrap()
    }

    fn test_domain() -> Eip712Domain {
        let config = Config::default();
        signing_domain(
            &config.domain_name,
            &config.domain_version,
            config.chain_id,
            config.forwarder_address.parse().unwrap(),
        )
    }

    fn encode_signature(signature: &Signature) -> Bytes {
        let mut out = signature.r().to_be_bytes::<32>().to_vec();
        out.extend_from_slice(&signature.s().to_be_bytes::<32>());
        out.push(if signature.v() { 28 } else { 27 });
        out.into()
    }

    /// Payload signed by `signer`, claiming `from` as originator.
    fn payload(signer: &PrivateKeySigner, from: Address, nonce: u64) -> Value {
        let request = ForwardRequest {
            from,
            to: TARGET,
            value: U256::ZERO,
            gas: U256::from(100_000u64),
            nonce: U256::from(nonce),
            data: Bytes::new(),
        };
        let digest = signing_hash(&request, &test_domain());
        let signature = signer.sign_hash_sync(&digest).unwrap();
        json!({
            "request": {
                "from": request.from.to_string(),
                "to": request.to.to_string(),
                "value": "0",
                "gas": "100000",
                "nonce": nonce.to_string(),
                "data": "0x",
            },
            "signature": encode_signature(&signature).to_string(),
        })
    }

    #[tokio::test]
    async fn test_missing_signature_rejected_before_any_ledger_call() {
        // No expectations set: any ledger call panics the mock.
        let state = test_state(MockLedger::new());
        let body = json!({ "request": { "from": "0x", "nonce": "0" } });
        let err = relay_inner(&state, "test", body).await.unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[tokio::test]
    async fn test_non_numeric_value_rejected_before_any_ledger_call() {
        let state = test_state(MockLedger::new());
        let signer = PrivateKeySigner::random();
        let mut body = payload(&signer, signer.address(), 0);
        body["request"]["value"] = json!("not-a-number");
        let err = relay_inner(&state, "test", body).await.unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }

    #[tokio::test]
    async fn test_verify_false_maps_to_verification_failed() {
        let mut ledger = MockLedger::new();
        ledger
            .expect_read_verify()
            .times(1)
            .returning(|_, _| Ok(false));
        // No submit expectation: submitting after a failed verify panics.
        let state = test_state(ledger);
        let signer = PrivateKeySigner::random();
        let err = relay_inner(&state, "test", payload(&signer, signer.address(), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::VerificationFailed(_)));
    }

    #[tokio::test]
    async fn test_verify_revert_maps_to_simulation_reverted() {
        let mut ledger = MockLedger::new();
        ledger.expect_read_verify().times(1).returning(|_, _| {
            Err(LedgerError::Reverted("insufficient deposit".into()))
        });
        let state = test_state(ledger);
        let signer = PrivateKeySigner::random();
        let err = relay_inner(&state, "test", payload(&signer, signer.address(), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SimulationReverted(_)));
    }

    #[tokio::test]
    async fn test_submit_failure_maps_to_submission_failed() {
        let mut ledger = MockLedger::new();
        ledger
            .expect_read_verify()
            .times(1)
            .returning(|_, _| Ok(true));
        ledger.expect_submit_execute().times(1).returning(|_, _| {
            Err(LedgerError::Unreachable("connection refused".into()))
        });
        let state = test_state(ledger);
        let signer = PrivateKeySigner::random();
        let err = relay_inner(&state, "test", payload(&signer, signer.address(), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SubmissionFailed(_)));
    }

    #[tokio::test]
    async fn test_verified_request_is_submitted() {
        let tx_hash =
            b256!("00000000000000000000000000000000000000000000000000000000000000aa");
        let mut ledger = MockLedger::new();
        ledger
            .expect_read_verify()
            .times(1)
            .returning(|_, _| Ok(true));
        ledger
            .expect_submit_execute()
            .times(1)
            .returning(move |_, _| Ok(tx_hash));
        let state = test_state(ledger);
        let signer = PrivateKeySigner::random();
        let result = relay_inner(&state, "test", payload(&signer, signer.address(), 0))
            .await
            .unwrap();
        assert_eq!(result, tx_hash);
    }

    #[tokio::test]
    async fn test_recovery_mismatch_is_advisory_only() {
        // Signed by one key but claiming another originator: the off-chain
        // recovery disagrees, yet the ledger's verdict decides.
        let tx_hash =
            b256!("00000000000000000000000000000000000000000000000000000000000000bb");
        let mut ledger = MockLedger::new();
        ledger
            .expect_read_verify()
            .times(1)
            .returning(|_, _| Ok(true));
        ledger
            .expect_submit_execute()
            .times(1)
            .returning(move |_, _| Ok(tx_hash));
        let state = test_state(ledger);
        let signer = PrivateKeySigner::random();
        let other = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        let result = relay_inner(&state, "test", payload(&signer, other, 0))
            .await
            .unwrap();
        assert_eq!(result, tx_hash);
    }
}
