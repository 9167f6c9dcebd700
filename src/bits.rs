//! Regrouping of bit strings between word widths

use crate::error::{CodecError, Result};

/// ConvertBits: regroup `input` from `from_bits`-wide words into `to_bits`-wide words
///
/// The accumulator is masked to `from_bits + to_bits - 1` bits, which is all that
/// is ever needed to hold the pending remainder plus one input word.
///
/// With `pad`, leftover bits are flushed left-justified in one extra word.
/// Without it, leftover bits must be fewer than `from_bits` and all zero.
pub fn convert_bits(from_bits: u32, to_bits: u32, pad: bool, input: &[u8]) -> Result<Vec<u8>> {
    if from_bits == 0 || from_bits > 8 || to_bits == 0 || to_bits > 8 {
        return Err(CodecError::BitsConversionFailed(format!(
            "unsupported widths {} -> {}",
            from_bits, to_bits
        )));
    }

    let max_value: u32 = (1 << to_bits) - 1;
    let max_acc: u32 = (1 << (from_bits + to_bits - 1)) - 1;
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut output = Vec::with_capacity(input.len() * from_bits as usize / to_bits as usize + 1);

    for (i, &value) in input.iter().enumerate() {
        if (value as u32) >> from_bits != 0 {
            return Err(CodecError::BitsConversionFailed(format!(
                "word {} at index {} exceeds {} bits",
                value, i, from_bits
            )));
        }
        acc = ((acc << from_bits) | value as u32) & max_acc;
        bits += from_bits;
        while bits >= to_bits {
            bits -= to_bits;
            output.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            output.push(((acc << (to_bits - bits)) & max_value) as u8);
        }
    } else if bits >= from_bits || ((acc << (to_bits - bits)) & max_value) != 0 {
        return Err(CodecError::BitsConversionFailed(format!(
            "{} leftover bits without padding",
            bits
        )));
    }

    Ok(output)
}
