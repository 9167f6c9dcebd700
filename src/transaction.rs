//! Bitcoin-family transaction serialization
//!
//! Serialize(tx) = version:u32le ‖ varint(|ins|) ‖ ins ‖ varint(|outs|) ‖ outs ‖ lock_time:u32le
//!
//! where each input is `prev_hash[32] ‖ prev_index:u32le ‖ varint(|script_sig|) ‖ script_sig ‖ sequence:u32le`
//! and each output is `value:u64le ‖ varint(|script_pubkey|) ‖ script_pubkey`.

use crate::address::Address;
use crate::error::{CodecError, Result};
use crate::types::*;
use bitcoin_hashes::{sha256d, Hash as BitcoinHash};

/// Append a CompactSize integer
pub fn write_varint(out: &mut ByteString, n: u64) {
    match n {
        0..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_le_bytes());
        }
    }
}

fn write_bytes(out: &mut ByteString, data: &[u8]) {
    write_varint(out, data.len() as u64);
    out.extend_from_slice(data);
}

/// Serialize a transaction into its signable/hashable byte layout
pub fn serialize(tx: &Transaction) -> ByteString {
    let mut out = Vec::with_capacity(serialized_size(tx));
    out.extend_from_slice(&tx.version.to_le_bytes());

    write_varint(&mut out, tx.inputs.len() as u64);
    for input in &tx.inputs {
        out.extend_from_slice(&input.prevout.hash);
        out.extend_from_slice(&input.prevout.index.to_le_bytes());
        write_bytes(&mut out, &input.script_sig);
        out.extend_from_slice(&input.sequence.to_le_bytes());
    }

    write_varint(&mut out, tx.outputs.len() as u64);
    for output in &tx.outputs {
        out.extend_from_slice(&output.value.to_le_bytes());
        write_bytes(&mut out, &output.script_pubkey);
    }

    out.extend_from_slice(&tx.lock_time.to_le_bytes());
    out
}

fn varint_size(n: usize) -> usize {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Exact length of `serialize(tx)`
pub fn serialized_size(tx: &Transaction) -> usize {
    let inputs: usize = tx
        .inputs
        .iter()
        .map(|i| 32 + 4 + varint_size(i.script_sig.len()) + i.script_sig.len() + 4)
        .sum();
    let outputs: usize = tx
        .outputs
        .iter()
        .map(|o| 8 + varint_size(o.script_pubkey.len()) + o.script_pubkey.len())
        .sum();
    4 + varint_size(tx.inputs.len()) + inputs + varint_size(tx.outputs.len()) + outputs + 4
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                CodecError::Serialization(format!("unexpected end of data at offset {}", self.pos))
            })?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    fn u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.array()?))
    }

    fn varint(&mut self) -> Result<u64> {
        let prefix = self.array::<1>()?[0];
        let (value, min) = match prefix {
            0xfd => (u16::from_le_bytes(self.array()?) as u64, 0xfd),
            0xfe => (u32::from_le_bytes(self.array()?) as u64, 0x1_0000),
            0xff => (u64::from_le_bytes(self.array()?), 0x1_0000_0000),
            n => return Ok(n as u64),
        };
        if value < min {
            return Err(CodecError::Serialization(format!(
                "non-canonical varint {}",
                value
            )));
        }
        Ok(value)
    }

    fn length(&mut self) -> Result<usize> {
        let n = self.varint()?;
        let remaining = (self.data.len() - self.pos) as u64;
        if n > remaining {
            return Err(CodecError::Serialization(format!(
                "length {} exceeds remaining {} bytes",
                n, remaining
            )));
        }
        Ok(n as usize)
    }

    fn bytes(&mut self) -> Result<ByteString> {
        let n = self.length()?;
        Ok(self.take(n)?.to_vec())
    }
}

/// Parse bytes produced by `serialize`; trailing data is rejected
pub fn deserialize(data: &[u8]) -> Result<Transaction> {
    let mut r = Reader::new(data);
    let version = r.u32_le()?;

    let input_count = r.length()?;
    let mut inputs = Vec::with_capacity(input_count);
    for _ in 0..input_count {
        let hash: Hash = r.array()?;
        let index = r.u32_le()?;
        let script_sig = r.bytes()?;
        let sequence = r.u32_le()?;
        inputs.push(TransactionInput {
            prevout: OutPoint { hash, index },
            script_sig,
            sequence,
        });
    }

    let output_count = r.length()?;
    let mut outputs = Vec::with_capacity(output_count);
    for _ in 0..output_count {
        let value = r.u64_le()?;
        let script_pubkey = r.bytes()?;
        outputs.push(TransactionOutput {
            value,
            script_pubkey,
        });
    }

    let lock_time = r.u32_le()?;
    if r.pos != data.len() {
        return Err(CodecError::Serialization(format!(
            "{} trailing bytes",
            data.len() - r.pos
        )));
    }

    Ok(Transaction {
        version,
        inputs,
        outputs,
        lock_time,
    })
}

/// SHA256d of the serialized transaction, internal byte order
pub fn signature_hash(tx: &Transaction) -> Hash {
    sha256d::Hash::hash(&serialize(tx)).into_inner()
}

/// Transaction id in display order (reversed SHA256d)
pub fn txid_hex(tx: &Transaction) -> String {
    let mut hash = signature_hash(tx);
    hash.reverse();
    hex::encode(hash)
}

/// Unsigned transaction spending `spends` and paying `payments`
pub fn unsigned_transaction(
    version: u32,
    spends: &[UnspentOutput],
    payments: &[(Address, u64)],
    sequence: u32,
    lock_time: u32,
) -> Transaction {
    Transaction {
        version,
        inputs: spends.iter().map(|u| u.to_unsigned_input(sequence)).collect(),
        outputs: payments
            .iter()
            .map(|(address, value)| TransactionOutput {
                value: *value,
                script_pubkey: address.locking_script(),
            })
            .collect(),
        lock_time,
    }
}
