//! Base58Check codec for legacy (pre-SegWit) addresses
//!
//! `address = Base58(version ‖ payload ‖ SHA256d(version ‖ payload)[0..4])`
//!
//! Conversion runs over fixed-size digit buffers sized for the largest legacy
//! address (25 raw bytes), so no arbitrary-precision arithmetic is involved and
//! oversized input is rejected instead of growing the buffer.

use crate::constants::*;
use crate::error::{CodecError, Result};
use bitcoin_hashes::{sha256d, Hash as BitcoinHash};
use tracing::debug;

/// version ‖ hash160 ‖ checksum
pub const MAX_RAW_LENGTH: usize = 1 + HASH160_LENGTH + BASE58_CHECKSUM_LENGTH;

/// ceil(25 × log(256) / log(58))
const MAX_ENCODED_LENGTH: usize = 35;

fn digit_value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    BASE58_ALPHABET
        .iter()
        .position(|&b| b == c as u8)
        .map(|p| p as u8)
}

/// Base58-encode up to `MAX_RAW_LENGTH` bytes
pub fn encode(input: &[u8]) -> Result<String> {
    if input.len() > MAX_RAW_LENGTH {
        return Err(CodecError::InvalidAddressLength(input.len()));
    }

    // Little-endian base-58 digits
    let mut digits = [0u8; MAX_ENCODED_LENGTH];
    let mut len = 0;
    for &byte in input {
        let mut carry = byte as u32;
        for digit in digits[..len].iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            let slot = digits
                .get_mut(len)
                .ok_or(CodecError::InvalidAddressLength(input.len()))?;
            *slot = (carry % 58) as u8;
            len += 1;
            carry /= 58;
        }
    }

    let zeros = input.iter().take_while(|&&b| b == 0).count();
    let mut out = String::with_capacity(zeros + len);
    out.extend(std::iter::repeat('1').take(zeros));
    out.extend(
        digits[..len]
            .iter()
            .rev()
            .map(|&d| BASE58_ALPHABET[d as usize] as char),
    );
    Ok(out)
}

/// Base58-decode into at most `MAX_RAW_LENGTH` bytes
pub fn decode(s: &str) -> Result<Vec<u8>> {
    // Little-endian base-256 bytes
    let mut bytes = [0u8; MAX_RAW_LENGTH];
    let mut len = 0;
    for (i, c) in s.chars().enumerate() {
        let value = digit_value(c).ok_or(CodecError::InvalidCharacter(c, i))?;
        let mut carry = value as u32;
        for byte in bytes[..len].iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            let slot = bytes
                .get_mut(len)
                .ok_or(CodecError::InvalidAddressLength(s.len()))?;
            *slot = (carry & 0xff) as u8;
            len += 1;
            carry >>= 8;
        }
    }

    let zeros = s.chars().take_while(|&c| c == '1').count();
    if zeros + len > MAX_RAW_LENGTH {
        return Err(CodecError::InvalidAddressLength(zeros + len));
    }
    let mut out = vec![0u8; zeros];
    out.extend(bytes[..len].iter().rev());
    Ok(out)
}

/// First four bytes of SHA256d(data)
pub fn checksum(data: &[u8]) -> [u8; BASE58_CHECKSUM_LENGTH] {
    let digest = sha256d::Hash::hash(data).into_inner();
    let mut out = [0u8; BASE58_CHECKSUM_LENGTH];
    out.copy_from_slice(&digest[..BASE58_CHECKSUM_LENGTH]);
    out
}

/// Encode a version byte and 20-byte hash as a Base58Check address
pub fn encode_check(version: u8, payload: &[u8]) -> Result<String> {
    if payload.len() != HASH160_LENGTH {
        return Err(CodecError::InvalidAddressLength(payload.len()));
    }
    let mut raw = Vec::with_capacity(MAX_RAW_LENGTH);
    raw.push(version);
    raw.extend_from_slice(payload);
    let check = checksum(&raw);
    raw.extend_from_slice(&check);
    encode(&raw)
}

/// Decode a Base58Check address into its version byte and 20-byte hash
pub fn decode_check(address: &str) -> Result<(u8, [u8; HASH160_LENGTH])> {
    let raw = decode(address)?;
    if raw.len() != MAX_RAW_LENGTH {
        debug!(len = raw.len(), "base58check payload has wrong length");
        return Err(CodecError::InvalidAddressLength(
            raw.len().saturating_sub(1 + BASE58_CHECKSUM_LENGTH),
        ));
    }

    let (body, check) = raw.split_at(MAX_RAW_LENGTH - BASE58_CHECKSUM_LENGTH);
    if checksum(body) != check {
        debug!("base58check checksum mismatch");
        return Err(CodecError::InvalidChecksum);
    }

    let mut payload = [0u8; HASH160_LENGTH];
    payload.copy_from_slice(&body[1..]);
    Ok((body[0], payload))
}
