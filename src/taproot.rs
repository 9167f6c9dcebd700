//! Taproot address codec (witness v1, Bech32m) and BIP-341 key tweaking

use crate::constants::*;
use crate::error::{CodecError, Result};
use crate::segwit;
use crate::types::Hash;
use secp256k1::{Scalar, Secp256k1, XOnlyPublicKey};
use sha2::{Digest, Sha256};

/// Decode a Taproot address: witness version 1, Bech32m, 32-byte output key
pub fn decode(hrp: &str, address: &str) -> Result<[u8; TAPROOT_PROGRAM_LENGTH]> {
    let wp = segwit::decode(hrp, address)?;
    if wp.version != TAPROOT_WITNESS_VERSION {
        return Err(CodecError::InvalidWitnessVersion(wp.version));
    }
    to_output_key(&wp.program)
}

/// Encode a 32-byte output key as a Taproot address
pub fn encode(hrp: &str, output_key: &[u8; TAPROOT_PROGRAM_LENGTH]) -> Result<String> {
    segwit::encode(hrp, TAPROOT_WITNESS_VERSION, output_key)
}

fn to_output_key(program: &[u8]) -> Result<[u8; TAPROOT_PROGRAM_LENGTH]> {
    program
        .try_into()
        .map_err(|_| CodecError::InvalidWitnessProgramLength(program.len()))
}

/// BIP-340 tagged hash: SHA256(SHA256(tag) ‖ SHA256(tag) ‖ data)
pub fn tagged_hash(tag: &str, data: &[u8]) -> Hash {
    let tag_hash = Sha256::digest(tag.as_bytes());
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the Taproot output key
/// OutputKey = InternalKey + H_TapTweak(InternalKey ‖ MerkleRoot) × G
///
/// A key-path-only output commits to no merkle root.
pub fn compute_output_key(
    internal_key: &[u8; 32],
    merkle_root: Option<&Hash>,
) -> Result<[u8; TAPROOT_PROGRAM_LENGTH]> {
    let secp = Secp256k1::verification_only();
    let internal = XOnlyPublicKey::from_slice(internal_key).map_err(|_| CodecError::InvalidPublicKey)?;

    let mut tweak_data = Vec::with_capacity(64);
    tweak_data.extend_from_slice(internal_key);
    if let Some(root) = merkle_root {
        tweak_data.extend_from_slice(root);
    }
    let tweak = Scalar::from_be_bytes(tagged_hash("TapTweak", &tweak_data))
        .map_err(|_| CodecError::KeyGeneration("tweak out of range".to_string()))?;

    let (output, _parity) = internal
        .add_tweak(&secp, &tweak)
        .map_err(|e| CodecError::KeyGeneration(e.to_string()))?;
    Ok(output.serialize())
}
