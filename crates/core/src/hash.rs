//! Canonical content hashing.
//!
//! Every hash in the system is SHA-256 rendered as lowercase hex, whatever
//! process computes it. Staleness detection compares hashes produced at
//! generation time with hashes produced later, possibly elsewhere, so there
//! is exactly one algorithm and no per-environment variant.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// SHA-256 over raw bytes, lowercase hex.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Hash of a brand-voice document (UTF-8 bytes, no normalisation).
pub fn brand_voice_hash(document: &str) -> String {
    sha256_hex(document.as_bytes())
}

/// Hash of the canonical JSON encoding of `value`.
///
/// Struct fields serialize in declaration order, so the encoding is stable
/// for the fixed-shape records this is used on.
pub fn canonical_json_hash<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    Ok(sha256_hex(&json))
}
