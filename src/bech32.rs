//! Bech32 and Bech32m text encoding (BIP-173, BIP-350)
//!
//! A string is `hrp ‖ '1' ‖ data ‖ checksum`, where data and checksum are 5-bit
//! symbols drawn from a 32-character alphabet. The checksum is a BCH code over
//! GF(32); the two variants differ only in the constant XORed into the final
//! polymod value.

use crate::constants::*;
use crate::error::{CodecError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Checksum variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    Bech32,
    Bech32m,
}

impl Variant {
    pub fn constant(self) -> u32 {
        match self {
            Variant::Bech32 => BECH32_CONST,
            Variant::Bech32m => BECH32M_CONST,
        }
    }

    fn from_residue(residue: u32) -> Option<Self> {
        match residue {
            BECH32_CONST => Some(Variant::Bech32),
            BECH32M_CONST => Some(Variant::Bech32m),
            _ => None,
        }
    }
}

/// Decoded Bech32 string: human-readable part, data symbols (checksum removed), variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub hrp: String,
    pub data: Vec<u8>,
    pub variant: Variant,
}

const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for value in values {
        let top = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ value as u32;
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> impl Iterator<Item = u8> + '_ {
    hrp.bytes()
        .map(|b| b >> 5)
        .chain(std::iter::once(0))
        .chain(hrp.bytes().map(|b| b & 0x1f))
}

fn create_checksum(hrp: &str, data: &[u8], variant: Variant) -> [u8; BECH32_CHECKSUM_LENGTH] {
    let values = hrp_expand(hrp)
        .chain(data.iter().copied())
        .chain([0u8; BECH32_CHECKSUM_LENGTH]);
    let pm = polymod(values) ^ variant.constant();
    let mut checksum = [0u8; BECH32_CHECKSUM_LENGTH];
    for (i, symbol) in checksum.iter_mut().enumerate() {
        *symbol = ((pm >> (5 * (5 - i))) & 0x1f) as u8;
    }
    checksum
}

fn validate_hrp(hrp: &str) -> Result<()> {
    if hrp.is_empty() || hrp.len() > 83 {
        return Err(CodecError::InvalidHrp(format!("length {}", hrp.len())));
    }
    if let Some(c) = hrp.chars().find(|c| !(33..=126).contains(&(*c as u32))) {
        return Err(CodecError::InvalidHrp(format!("character {:?}", c)));
    }
    Ok(())
}

/// Encode `values` (5-bit symbols) under `hrp`. Output is lowercase.
pub fn encode(hrp: &str, values: &[u8], variant: Variant) -> Result<String> {
    validate_hrp(hrp)?;
    let hrp = hrp.to_ascii_lowercase();
    if let Some((i, v)) = values.iter().enumerate().find(|(_, v)| **v > 31) {
        return Err(CodecError::BitsConversionFailed(format!(
            "symbol {} at index {} is not 5-bit",
            v, i
        )));
    }
    let total = hrp.len() + 1 + values.len() + BECH32_CHECKSUM_LENGTH;
    if total > BECH32_MAX_LENGTH {
        return Err(CodecError::InvalidAddressLength(total));
    }

    let checksum = create_checksum(&hrp, values, variant);
    let mut out = String::with_capacity(total);
    out.push_str(&hrp);
    out.push(BECH32_SEPARATOR);
    for &symbol in values.iter().chain(checksum.iter()) {
        out.push(BECH32_CHARSET[symbol as usize] as char);
    }
    Ok(out)
}

/// Decode a Bech32 or Bech32m string; the variant is recovered from the checksum
pub fn decode(s: &str) -> Result<Decoded> {
    if s.len() > BECH32_MAX_LENGTH {
        return Err(CodecError::InvalidAddressLength(s.len()));
    }
    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(CodecError::MixedCase);
    }
    if let Some((i, c)) = s.chars().enumerate().find(|(_, c)| !(33..=126).contains(&(*c as u32))) {
        return Err(CodecError::InvalidCharacter(c, i));
    }
    let lower = s.to_ascii_lowercase();

    let sep = lower.rfind(BECH32_SEPARATOR).ok_or(CodecError::MissingSeparator)?;
    let (hrp, rest) = lower.split_at(sep);
    validate_hrp(hrp)?;
    let data_part = &rest[1..];
    if data_part.len() < BECH32_CHECKSUM_LENGTH {
        return Err(CodecError::ChecksumSizeTooLow(data_part.len()));
    }

    let mut values = Vec::with_capacity(data_part.len());
    for (i, c) in data_part.chars().enumerate() {
        let position = BECH32_CHARSET
            .iter()
            .position(|&b| b as char == c)
            .ok_or(CodecError::InvalidCharacter(c, sep + 1 + i))?;
        values.push(position as u8);
    }

    let residue = polymod(hrp_expand(hrp).chain(values.iter().copied()));
    let variant = Variant::from_residue(residue).ok_or_else(|| {
        debug!(hrp, "bech32 checksum mismatch");
        CodecError::InvalidChecksum
    })?;

    values.truncate(values.len() - BECH32_CHECKSUM_LENGTH);
    Ok(Decoded {
        hrp: hrp.to_string(),
        data: values,
        variant,
    })
}

/// Decode and require a specific human-readable part
pub fn decode_with_hrp(expected_hrp: &str, s: &str) -> Result<Decoded> {
    let decoded = decode(s)?;
    if decoded.hrp != expected_hrp.to_ascii_lowercase() {
        return Err(CodecError::HrpMismatch {
            expected: expected_hrp.to_string(),
            found: decoded.hrp,
        });
    }
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_data_vectors() {
        assert_eq!(encode("a", &[], Variant::Bech32).unwrap(), "a12uel5l");
        let decoded = decode("A12UEL5L").unwrap();
        assert_eq!(decoded.hrp, "a");
        assert!(decoded.data.is_empty());
        assert_eq!(decoded.variant, Variant::Bech32);
    }

    #[test]
    fn test_bech32m_vector() {
        let data: Vec<u8> = (0..32u8).rev().collect();
        let s = "abcdef1l7aum6echk45nj3s0wdvt2fg8x9yrzpqzd3ryx";
        assert_eq!(encode("abcdef", &data, Variant::Bech32m).unwrap(), s);
        let decoded = decode(s).unwrap();
        assert_eq!(decoded.variant, Variant::Bech32m);
        assert_eq!(decoded.data, data);
    }

    #[test]
    fn test_mixed_case_rejected() {
        assert_eq!(decode("A12uEL5L"), Err(CodecError::MixedCase));
    }

    #[test]
    fn test_missing_separator() {
        assert_eq!(decode("pzry9x0s0muk"), Err(CodecError::MissingSeparator));
    }

    #[test]
    fn test_short_checksum() {
        assert_eq!(decode("a1qqqqq"), Err(CodecError::ChecksumSizeTooLow(5)));
    }

    #[test]
    fn test_empty_hrp() {
        assert!(matches!(decode("1pzry9x0s0muk"), Err(CodecError::InvalidHrp(_))));
    }

    #[test]
    fn test_invalid_data_character() {
        assert!(matches!(decode("a1b2uel5l"), Err(CodecError::InvalidCharacter('b', 2))));
    }

    #[test]
    fn test_checksum_mismatch() {
        assert_eq!(decode("a12uel5m"), Err(CodecError::InvalidChecksum));
    }

    #[test]
    fn test_hrp_mismatch() {
        let result = decode_with_hrp("b", "a12uel5l");
        assert!(matches!(result, Err(CodecError::HrpMismatch { .. })));
    }

    #[test]
    fn test_variant_constants_differ() {
        let a = encode("bc", &[0, 1, 2], Variant::Bech32).unwrap();
        let b = encode("bc", &[0, 1, 2], Variant::Bech32m).unwrap();
        assert_ne!(a, b);
        assert_eq!(decode(&a).unwrap().variant, Variant::Bech32);
        assert_eq!(decode(&b).unwrap().variant, Variant::Bech32m);
    }

    #[test]
    fn test_encode_rejects_wide_symbol() {
        assert!(encode("bc", &[32], Variant::Bech32).is_err());
    }
}
