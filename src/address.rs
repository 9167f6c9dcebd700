//! Bitcoin-family addresses as a closed sum over the three text formats

use crate::base58;
use crate::constants::*;
use crate::error::{CodecError, Result};
use crate::network::NetworkParams;
use crate::script::{self, ScriptType};
use crate::segwit;
use crate::taproot;
use crate::types::ByteString;
use std::fmt;
use tracing::warn;

/// Legacy address discriminant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyKind {
    PubkeyHash,
    ScriptHash,
}

/// A decoded address
///
/// Built only by decoding or by the constructors below, so `string_value` and
/// the payload always re-derive each other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    Legacy {
        kind: LegacyKind,
        version: u8,
        hash: [u8; HASH160_LENGTH],
        string_value: String,
    },
    SegWitV0 {
        program: ByteString,
        string_value: String,
    },
    Taproot {
        version: u8,
        output_key: [u8; TAPROOT_PROGRAM_LENGTH],
        string_value: String,
    },
}

impl Address {
    /// P2PKH/P2SH from a 20-byte hash
    pub fn legacy(params: &NetworkParams, kind: LegacyKind, hash: [u8; HASH160_LENGTH]) -> Result<Self> {
        let version = match kind {
            LegacyKind::PubkeyHash => params.p2pkh_version,
            LegacyKind::ScriptHash => params.p2sh_version,
        };
        let string_value = base58::encode_check(version, &hash)?;
        Ok(Address::Legacy {
            kind,
            version,
            hash,
            string_value,
        })
    }

    /// P2WPKH (20 bytes) or P2WSH (32 bytes)
    pub fn segwit_v0(params: &NetworkParams, program: &[u8]) -> Result<Self> {
        let string_value = segwit::encode(params.require_hrp()?, 0, program)?;
        Ok(Address::SegWitV0 {
            program: program.to_vec(),
            string_value,
        })
    }

    /// P2TR from a tweaked 32-byte output key
    pub fn taproot(params: &NetworkParams, output_key: [u8; TAPROOT_PROGRAM_LENGTH]) -> Result<Self> {
        let string_value = taproot::encode(params.require_hrp()?, &output_key)?;
        Ok(Address::Taproot {
            version: TAPROOT_WITNESS_VERSION,
            output_key,
            string_value,
        })
    }

    /// P2PKH for a serialized secp256k1 public key
    pub fn p2pkh_from_public_key(params: &NetworkParams, public_key: &[u8]) -> Result<Self> {
        Self::legacy(params, LegacyKind::PubkeyHash, script::hash160(public_key))
    }

    /// P2WPKH for a compressed secp256k1 public key
    pub fn p2wpkh_from_public_key(params: &NetworkParams, public_key: &[u8]) -> Result<Self> {
        if public_key.len() != 33 {
            return Err(CodecError::InvalidPublicKey);
        }
        Self::segwit_v0(params, &script::hash160(public_key))
    }

    /// Key-path-only P2TR for an x-only internal key
    pub fn taproot_from_internal_key(params: &NetworkParams, internal_key: &[u8; 32]) -> Result<Self> {
        Self::taproot(params, taproot::compute_output_key(internal_key, None)?)
    }

    /// Decode a Base58Check address whose version byte belongs to `params`
    pub fn decode_legacy(params: &NetworkParams, text: &str) -> Result<Self> {
        let (version, hash) = base58::decode_check(text)?;
        let kind = if version == params.p2pkh_version {
            LegacyKind::PubkeyHash
        } else if version == params.p2sh_version {
            LegacyKind::ScriptHash
        } else {
            return Err(CodecError::WrongAddressPrefix(version));
        };
        Ok(Address::Legacy {
            kind,
            version,
            hash,
            string_value: text.to_string(),
        })
    }

    /// Decode a witness v0 address
    pub fn decode_segwit_v0(params: &NetworkParams, text: &str) -> Result<Self> {
        let wp = segwit::decode(params.require_hrp()?, text)?;
        if wp.version != 0 {
            return Err(CodecError::InvalidWitnessVersion(wp.version));
        }
        Self::segwit_v0(params, &wp.program)
    }

    /// Decode a Taproot address
    pub fn decode_taproot(params: &NetworkParams, text: &str) -> Result<Self> {
        let output_key = taproot::decode(params.require_hrp()?, text)?;
        Self::taproot(params, output_key)
    }

    /// Try every format in turn; if none accepts the text, report all failures
    pub fn parse(params: &NetworkParams, text: &str) -> Result<Self> {
        let attempts: [fn(&NetworkParams, &str) -> Result<Self>; 3] = [
            Self::decode_segwit_v0,
            Self::decode_taproot,
            Self::decode_legacy,
        ];
        let mut errors = Vec::with_capacity(attempts.len());
        for attempt in attempts {
            match attempt(params, text) {
                Ok(address) => return Ok(address),
                Err(e) => errors.push(e),
            }
        }
        warn!(network = %params.name, "address rejected by every decoder");
        Err(CodecError::Aggregate(errors))
    }

    /// Render the address paying to a standard locking script
    pub fn from_script(params: &NetworkParams, locking_script: &[u8]) -> Result<Self> {
        let (script_type, payload) = script::classify(locking_script)
            .ok_or_else(|| CodecError::UnknownAddressType("non-standard script".to_string()))?;
        match script_type {
            ScriptType::P2pkh | ScriptType::P2sh => {
                let mut hash = [0u8; HASH160_LENGTH];
                hash.copy_from_slice(&payload);
                let kind = if script_type == ScriptType::P2pkh {
                    LegacyKind::PubkeyHash
                } else {
                    LegacyKind::ScriptHash
                };
                Self::legacy(params, kind, hash)
            }
            ScriptType::P2wpkh | ScriptType::P2wsh => Self::segwit_v0(params, &payload),
            ScriptType::P2tr => {
                let mut key = [0u8; TAPROOT_PROGRAM_LENGTH];
                key.copy_from_slice(&payload);
                Self::taproot(params, key)
            }
        }
    }

    pub fn script_type(&self) -> ScriptType {
        match self {
            Address::Legacy {
                kind: LegacyKind::PubkeyHash,
                ..
            } => ScriptType::P2pkh,
            Address::Legacy {
                kind: LegacyKind::ScriptHash,
                ..
            } => ScriptType::P2sh,
            Address::SegWitV0 { program, .. } if program.len() == WITNESS_V0_KEYHASH_LENGTH => {
                ScriptType::P2wpkh
            }
            Address::SegWitV0 { .. } => ScriptType::P2wsh,
            Address::Taproot { .. } => ScriptType::P2tr,
        }
    }

    /// Raw bytes pushed by the locking script: hash160 or witness program
    pub fn locking_script_payload(&self) -> &[u8] {
        match self {
            Address::Legacy { hash, .. } => &hash[..],
            Address::SegWitV0 { program, .. } => program.as_slice(),
            Address::Taproot { output_key, .. } => &output_key[..],
        }
    }

    pub fn locking_script(&self) -> ByteString {
        script::locking_script(self.script_type(), self.locking_script_payload())
    }

    pub fn string_value(&self) -> &str {
        match self {
            Address::Legacy { string_value, .. }
            | Address::SegWitV0 { string_value, .. }
            | Address::Taproot { string_value, .. } => string_value.as_str(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.string_value())
    }
}
