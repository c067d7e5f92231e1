/// Codec error. A malformed signature is an explicit error, never a
/// silently wrong identity.
#[derive(Debug, Clone)]
pub enum CodecError {
    MalformedSignature(String),
    RecoveryFailed(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedSignature(msg) => write!(f, "malformed signature: {msg}"),
            Self::RecoveryFailed(msg) => write!(f, "signer recovery failed: {msg}"),
        }
    }
}

impl std::error::Error for CodecError {}
