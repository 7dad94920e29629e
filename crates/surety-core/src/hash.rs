//! Content hashing
//!
//! All deterministic identifiers (flight keys, request index derivation,
//! test accounts) go through this module so the algorithm is chosen in one
//! place. Current algorithm: **SHA-256**.
//!
//! Every caller prefixes its input with a domain tag so that digests from
//! different purposes can never collide.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// 32-byte digest
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Hash32(pub [u8; 32]);

impl Hash32 {
    /// Borrow the raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex with `0x` prefix
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Hash32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash32({})", self.to_hex())
    }
}

/// Incremental hasher
pub struct Hasher(Sha256);

impl Hasher {
    /// Feed bytes into the digest
    pub fn update(&mut self, data: impl AsRef<[u8]>) {
        self.0.update(data.as_ref());
    }

    /// Feed a length-prefixed byte string, so adjacent variable-length
    /// fields cannot be shifted into one another
    pub fn update_prefixed(&mut self, data: impl AsRef<[u8]>) {
        let data = data.as_ref();
        self.0.update((data.len() as u64).to_be_bytes());
        self.0.update(data);
    }

    /// Finish and return the digest
    pub fn finalize(self) -> Hash32 {
        Hash32(self.0.finalize().into())
    }
}

/// Start an incremental hash
pub fn hasher() -> Hasher {
    Hasher(Sha256::new())
}

/// Hash a single byte string
pub fn hash(data: &[u8]) -> Hash32 {
    let mut h = hasher();
    h.update(data);
    h.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(hash(b"surety"), hash(b"surety"));
        assert_ne!(hash(b"surety"), hash(b"surety!"));
    }

    #[test]
    fn test_prefixed_update_separates_fields() {
        let mut a = hasher();
        a.update_prefixed(b"AC1");
        a.update_prefixed(b"10");

        let mut b = hasher();
        b.update_prefixed(b"AC11");
        b.update_prefixed(b"0");

        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_hex_display() {
        let digest = Hash32([0xab; 32]);
        let rendered = digest.to_string();
        assert!(rendered.starts_with("0xabab"));
        assert_eq!(rendered.len(), 66);
    }
}
