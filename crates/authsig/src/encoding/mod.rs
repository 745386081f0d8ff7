mod canonical;

pub use canonical::{CanonicalJsonEncoder, MAX_SAFE_INTEGER, canonicalize, canonicalize_serialize};

/// The result of encoding a signing payload.
pub struct EncodedPayload {
    /// Canonical bytes, exactly what gets signed.
    pub data: Vec<u8>,
    /// SHA-256 digest of `data`.
    pub digest: Vec<u8>,
}
