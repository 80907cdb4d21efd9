//! Content hashes for orders and operations.
//!
//! Both hashes are SHA-256 over a domain tag followed by the value's
//! canonical encoding. The canonical encoding is the JSON serialization of
//! the value: field order is fixed by the type definitions and no type in
//! this crate contains a map, so the bytes are identical on every node.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 of an [`crate::Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderHash(pub [u8; 32]);

/// SHA-256 of an [`crate::Operation`]. Used for deduplication and audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OperationHash(pub [u8; 32]);

impl OrderHash {
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl OperationHash {
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for OrderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Display for OperationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Canonical bytes of a value.
///
/// # Panics
/// Only if `value` serializes a map with non-string keys, which no clobcore
/// type does.
#[must_use]
pub fn canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("clobcore types serialize without maps or fallible fields")
}

/// Domain-separated SHA-256 over the canonical bytes of `value`.
#[must_use]
pub(crate) fn domain_digest<T: Serialize>(domain: &[u8], value: &T) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(canonical_bytes(value));
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}
