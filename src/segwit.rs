//! Segregated Witness address codec (BIP-173 / BIP-350)

use crate::bech32::{self, Variant};
use crate::bits::convert_bits;
use crate::constants::*;
use crate::error::{CodecError, Result};
use crate::types::ByteString;
use tracing::debug;

/// Witness program: version × program bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WitnessProgram {
    pub version: u8,
    pub program: ByteString,
}

/// Checksum variant mandated for a witness version
pub fn variant_for_version(version: u8) -> Variant {
    if version == 0 {
        Variant::Bech32
    } else {
        Variant::Bech32m
    }
}

/// Validate version and program length
///
/// 1. version ≤ 16
/// 2. 2 ≤ |program| ≤ 40
/// 3. version = 0 ⟹ |program| ∈ {20, 32}
pub fn validate_witness_program(version: u8, program: &[u8]) -> Result<()> {
    if version > MAX_WITNESS_VERSION {
        return Err(CodecError::InvalidWitnessVersion(version));
    }
    if program.len() < MIN_WITNESS_PROGRAM_LENGTH || program.len() > MAX_WITNESS_PROGRAM_LENGTH {
        return Err(CodecError::InvalidWitnessProgramLength(program.len()));
    }
    if version == 0
        && program.len() != WITNESS_V0_KEYHASH_LENGTH
        && program.len() != WITNESS_V0_SCRIPTHASH_LENGTH
    {
        return Err(CodecError::SegwitV0ProgramSizeMismatch(program.len()));
    }
    Ok(())
}

/// Decode a SegWit address under `hrp`
pub fn decode(hrp: &str, address: &str) -> Result<WitnessProgram> {
    let decoded = bech32::decode_with_hrp(hrp, address)?;
    let (&version, symbols) = decoded
        .data
        .split_first()
        .ok_or(CodecError::InvalidWitnessProgramLength(0))?;
    if version > MAX_WITNESS_VERSION {
        debug!(version, "witness version out of range");
        return Err(CodecError::InvalidWitnessVersion(version));
    }

    let program = convert_bits(5, 8, false, symbols)?;
    validate_witness_program(version, &program)?;

    if decoded.variant != variant_for_version(version) {
        debug!(version, variant = ?decoded.variant, "witness version encoded with wrong variant");
        return Err(CodecError::SegwitVersionAndEncodingMismatch(version));
    }

    Ok(WitnessProgram { version, program })
}

/// Encode with the variant mandated for `version`
pub fn encode(hrp: &str, version: u8, program: &[u8]) -> Result<String> {
    encode_with_variant(hrp, version, program, variant_for_version(version))
}

/// Encode with an explicit variant, then decode the result and require it to
/// reproduce `(version, program)`.
pub fn encode_with_variant(
    hrp: &str,
    version: u8,
    program: &[u8],
    variant: Variant,
) -> Result<String> {
    validate_witness_program(version, program)?;

    let mut values = Vec::with_capacity(1 + (program.len() * 8 + 4) / 5);
    values.push(version);
    values.extend(convert_bits(8, 5, true, program)?);
    let address = bech32::encode(hrp, &values, variant)?;

    match decode(hrp, &address) {
        Ok(wp) if wp.version == version && wp.program == program => Ok(address),
        Ok(_) => Err(CodecError::EncodingCheckFailed),
        Err(e) => {
            debug!(error = %e, "encoded witness address failed self-check");
            Err(CodecError::EncodingCheckFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2WPKH: &str = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";

    fn hash160() -> Vec<u8> {
        hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6").unwrap()
    }

    #[test]
    fn test_decode_p2wpkh() {
        let wp = decode("bc", P2WPKH).unwrap();
        assert_eq!(wp.version, 0);
        assert_eq!(wp.program, hash160());
    }

    #[test]
    fn test_decode_uppercase() {
        let wp = decode("bc", &P2WPKH.to_uppercase()).unwrap();
        assert_eq!(wp.program, hash160());
    }

    #[test]
    fn test_encode_p2wpkh() {
        assert_eq!(encode("bc", 0, &hash160()).unwrap(), P2WPKH);
    }

    #[test]
    fn test_decode_p2wsh_testnet() {
        let wp = decode(
            "tb",
            "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7",
        )
        .unwrap();
        assert_eq!(wp.version, 0);
        assert_eq!(
            hex::encode(&wp.program),
            "1863143c14c5166804bd19203356da136c985678cd4d27a1b8c6329604903262"
        );
    }

    #[test]
    fn test_decode_v16_two_bytes() {
        let wp = decode("bc", "bc1sw50qgdz25j").unwrap();
        assert_eq!(wp.version, 16);
        assert_eq!(wp.program, vec![0x75, 0x1e]);
    }

    #[test]
    fn test_v0_with_bech32m_rejected() {
        let result = decode("bc", "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kemeawh");
        assert_eq!(result, Err(CodecError::SegwitVersionAndEncodingMismatch(0)));
    }

    #[test]
    fn test_v1_with_bech32_rejected() {
        let result = decode(
            "bc",
            "bc1pqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqq5us4ke",
        );
        assert_eq!(result, Err(CodecError::SegwitVersionAndEncodingMismatch(1)));
    }

    #[test]
    fn test_wrong_hrp() {
        let result = decode("tb", P2WPKH);
        assert!(matches!(result, Err(CodecError::HrpMismatch { .. })));
    }

    #[test]
    fn test_self_check_catches_wrong_variant() {
        let result = encode_with_variant("bc", 0, &hash160(), Variant::Bech32m);
        assert_eq!(result, Err(CodecError::EncodingCheckFailed));
    }

    #[test]
    fn test_validate_witness_program_bounds() {
        assert!(validate_witness_program(1, &[0; 2]).is_ok());
        assert!(validate_witness_program(1, &[0; 40]).is_ok());
        assert!(validate_witness_program(1, &[0; 19]).is_ok());
        assert_eq!(
            validate_witness_program(0, &[0; 19]),
            Err(CodecError::SegwitV0ProgramSizeMismatch(19))
        );
        assert_eq!(
            validate_witness_program(1, &[0; 1]),
            Err(CodecError::InvalidWitnessProgramLength(1))
        );
        assert_eq!(
            validate_witness_program(1, &[0; 41]),
            Err(CodecError::InvalidWitnessProgramLength(41))
        );
        assert_eq!(
            validate_witness_program(17, &[0; 20]),
            Err(CodecError::InvalidWitnessVersion(17))
        );
        assert_eq!(
            validate_witness_program(0, &[0; 21]),
            Err(CodecError::SegwitV0ProgramSizeMismatch(21))
        );
    }
}
