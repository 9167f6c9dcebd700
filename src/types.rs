//! Core Bitcoin-family types for transaction serialization

use serde::{Deserialize, Serialize};

/// Hash type: 256-bit hash
pub type Hash = [u8; 32];

/// Byte string type
pub type ByteString = Vec<u8>;

/// OutPoint: reference to a prior output
///
/// `hash` is kept in internal byte order (the reverse of how explorers display it).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub hash: Hash,
    pub index: u32,
}

impl OutPoint {
    /// Build an outpoint from a txid in display (big-endian hex) order
    pub fn from_display_hex(txid: &str, index: u32) -> crate::Result<Self> {
        let bytes = hex::decode(txid)
            .map_err(|e| crate::CodecError::Serialization(format!("txid hex: {}", e)))?;
        if bytes.len() != 32 {
            return Err(crate::CodecError::Serialization(format!(
                "txid must be 32 bytes, found {}",
                bytes.len()
            )));
        }
        let mut hash = [0u8; 32];
        for (dst, src) in hash.iter_mut().zip(bytes.iter().rev()) {
            *dst = *src;
        }
        Ok(Self { hash, index })
    }

    /// Txid in display order
    pub fn display_hex(&self) -> String {
        let reversed: Vec<u8> = self.hash.iter().rev().copied().collect();
        hex::encode(reversed)
    }
}

/// Transaction Input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub prevout: OutPoint,
    pub script_sig: ByteString,
    pub sequence: u32,
}

/// Transaction Output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionOutput {
    pub value: u64,
    pub script_pubkey: ByteString,
}

/// Transaction: version × inputs × outputs × lock_time
///
/// Equality is field-wise, in serialization order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
    pub lock_time: u32,
}

/// An output still available for spending, as reported by a wallet back end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub outpoint: OutPoint,
    pub output: TransactionOutput,
}

impl UnspentOutput {
    /// Input spending this output with an empty unlocking script
    pub fn to_unsigned_input(&self, sequence: u32) -> TransactionInput {
        TransactionInput {
            prevout: self.outpoint.clone(),
            script_sig: Vec::new(),
            sequence,
        }
    }
}
