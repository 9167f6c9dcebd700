//! Deterministic transaction ids for the native chain
//!
//! id = decimal(u64 read from the first 8 bytes of SHA-256(preimage), byte-reversed)
//!
//! Reversing the window and reading it big-endian is the same as reading it
//! little-endian, which is how it is computed here.

use crate::constants::ID_WINDOW_LENGTH;
use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Transaction id: an unsigned 64-bit integer rendered in base 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodecError::Serialization(format!("invalid transaction id {:?}", s)));
        }
        s.parse::<u64>()
            .map(TransactionId)
            .map_err(|e| CodecError::Serialization(format!("transaction id {:?}: {}", s, e)))
    }
}

/// Read the id window out of a digest
///
/// A digest shorter than the window cannot yield a deterministic id; this is
/// reported as `NonDeterministicId` instead of inventing a value.
pub fn id_from_digest(digest: &[u8]) -> Result<u64> {
    let window = digest.get(..ID_WINDOW_LENGTH).ok_or_else(|| {
        warn!(len = digest.len(), "digest shorter than id window");
        CodecError::NonDeterministicId(digest.len())
    })?;
    let mut bytes = [0u8; ID_WINDOW_LENGTH];
    bytes.copy_from_slice(window);
    Ok(u64::from_le_bytes(bytes))
}

/// Derive the id of a serialized (signed) native transaction
pub fn derive_id(preimage: &[u8]) -> Result<TransactionId> {
    let digest = Sha256::digest(preimage);
    id_from_digest(&digest).map(TransactionId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_is_reversed_prefix() {
        let digest = [1u8, 2, 3, 4, 5, 6, 7, 8, 0xff, 0xff];
        assert_eq!(id_from_digest(&digest).unwrap(), 0x0807060504030201);
    }

    #[test]
    fn test_short_digest_is_degraded() {
        assert_eq!(id_from_digest(&[1, 2, 3]), Err(CodecError::NonDeterministicId(3)));
    }

    #[test]
    fn test_derive_id_deterministic() {
        let a = derive_id(b"preimage").unwrap();
        assert_eq!(a, derive_id(b"preimage").unwrap());
        assert_ne!(a, derive_id(b"preimagf").unwrap());
    }

    #[test]
    fn test_id_display_and_parse() {
        let id = TransactionId(10497408962404364061);
        assert_eq!(id.to_string(), "10497408962404364061");
        assert_eq!("10497408962404364061".parse::<TransactionId>().unwrap(), id);
        assert!("".parse::<TransactionId>().is_err());
        assert!("+1".parse::<TransactionId>().is_err());
        assert!("18446744073709551616".parse::<TransactionId>().is_err());
    }
}
