//! Standard output (locking) scripts

use crate::constants::*;
use crate::error::{CodecError, Result};
use crate::segwit;
use crate::types::ByteString;
use ripemd::Ripemd160;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Standard output script template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptType {
    /// OP_DUP OP_HASH160 <20> OP_EQUALVERIFY OP_CHECKSIG
    P2pkh,
    /// OP_HASH160 <20> OP_EQUAL
    P2sh,
    /// OP_0 <20>
    P2wpkh,
    /// OP_0 <32>
    P2wsh,
    /// OP_1 <32>
    P2tr,
}

/// HASH160(x) = RIPEMD160(SHA256(x))
pub fn hash160(data: &[u8]) -> [u8; HASH160_LENGTH] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

/// Small-integer opcode for a witness version: OP_0, OP_1 .. OP_16
pub fn witness_version_opcode(version: u8) -> Result<u8> {
    match version {
        0 => Ok(OP_0),
        1..=MAX_WITNESS_VERSION => Ok(OP_1 + (version - 1)),
        _ => Err(CodecError::InvalidWitnessVersion(version)),
    }
}

fn push_data(script: &mut ByteString, data: &[u8]) {
    // Payloads here are at most 40 bytes, always a direct push
    script.push(data.len() as u8);
    script.extend_from_slice(data);
}

fn push_witness_program(opcode: u8, program: &[u8]) -> ByteString {
    let mut script = Vec::with_capacity(2 + program.len());
    script.push(opcode);
    push_data(&mut script, program);
    script
}

/// OP_n <program> for a version/program pair the SegWit rules accept
pub fn witness_script(version: u8, program: &[u8]) -> Result<ByteString> {
    segwit::validate_witness_program(version, program)?;
    Ok(push_witness_program(witness_version_opcode(version)?, program))
}

/// Build the canonical locking script for `(script_type, payload)`
///
/// The payload has already been validated by the address decoder.
pub fn locking_script(script_type: ScriptType, payload: &[u8]) -> ByteString {
    match script_type {
        ScriptType::P2pkh => {
            let mut script = Vec::with_capacity(25);
            script.push(OP_DUP);
            script.push(OP_HASH160);
            push_data(&mut script, payload);
            script.push(OP_EQUALVERIFY);
            script.push(OP_CHECKSIG);
            script
        }
        ScriptType::P2sh => {
            let mut script = Vec::with_capacity(23);
            script.push(OP_HASH160);
            push_data(&mut script, payload);
            script.push(OP_EQUAL);
            script
        }
        ScriptType::P2wpkh | ScriptType::P2wsh => push_witness_program(OP_0, payload),
        ScriptType::P2tr => push_witness_program(OP_1, payload),
    }
}

/// Recognize a standard locking script, returning its template and payload
pub fn classify(script: &[u8]) -> Option<(ScriptType, ByteString)> {
    match script {
        [OP_DUP, OP_HASH160, 0x14, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG]
            if hash.len() == HASH160_LENGTH =>
        {
            Some((ScriptType::P2pkh, hash.to_vec()))
        }
        [OP_HASH160, 0x14, hash @ .., OP_EQUAL] if hash.len() == HASH160_LENGTH => {
            Some((ScriptType::P2sh, hash.to_vec()))
        }
        [OP_0, 0x14, program @ ..] if program.len() == WITNESS_V0_KEYHASH_LENGTH => {
            Some((ScriptType::P2wpkh, program.to_vec()))
        }
        [OP_0, 0x20, program @ ..] if program.len() == WITNESS_V0_SCRIPTHASH_LENGTH => {
            Some((ScriptType::P2wsh, program.to_vec()))
        }
        [OP_1, 0x20, program @ ..] if program.len() == TAPROOT_PROGRAM_LENGTH => {
            Some((ScriptType::P2tr, program.to_vec()))
        }
        _ => None,
    }
}
