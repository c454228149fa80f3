//! LEB128 variable-length integers (§4.1 "varuint32"/"varint32").
//!
//! `varuint32` is the unsigned flavor: despite the name it is backed by the
//! same general-purpose unsigned LEB128 used for length prefixes, array
//! counts, and variant discriminators, and this crate does not clamp its
//! decoded value to 32 bits — only to the 64-bit ceiling LEB128 itself
//! imposes. `varint32` is genuinely 32-bit: the Non-goals explicitly scope
//! out arbitrary-width signed varints, so its decoder rejects anything that
//! doesn't fit an `i32` once sign-extended.

use crate::error::{DecodeError, EncodeError};
use crate::wire::cursor::{Decoder, Encoder};

/// Writes `value` as unsigned LEB128, seven bits per byte, least-significant
/// group first, continuation bit set on every byte but the last.
pub fn write_varuint(enc: &mut Encoder, mut value: u64) -> Result<usize, EncodeError> {
    let start = enc.written();
    loop {
        let mut byte = (value & 0x7f) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        enc.write_u8(byte)?;
        if value == 0 {
            break;
        }
    }
    Ok(enc.written() - start)
}

/// Reads an unsigned LEB128 value, accepting at most 10 bytes (the widest
/// encoding a 64-bit value can require) and rejecting anything that would
/// overflow 64 bits.
pub fn read_varuint(dec: &mut Decoder) -> Result<(u64, usize), DecodeError> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    let mut count = 0usize;
    loop {
        let byte = dec.read_u8()?;
        count += 1;
        let chunk = (byte & 0x7f) as u64;
        if shift >= 64 {
            if chunk != 0 {
                return Err(DecodeError::VarintOverflow);
            }
        } else if shift == 63 && chunk > 1 {
            return Err(DecodeError::VarintOverflow);
        } else {
            result |= chunk << shift;
        }
        if byte & 0x80 == 0 {
            return Ok((result, count));
        }
        if count == 10 {
            return Err(DecodeError::VarintTooLong);
        }
        shift += 7;
    }
}

/// Writes `value` as signed LEB128: seven bits per byte, sign-extended, a
/// byte terminates the encoding once its top data bit (bit 6) matches the
/// sign of everything left to encode.
pub fn write_varint(enc: &mut Encoder, value: i32) -> Result<usize, EncodeError> {
    let start = enc.written();
    let mut v = value as i64;
    loop {
        let byte = (v & 0x7f) as u8;
        v >>= 7;
        let sign_bit_set = byte & 0x40 != 0;
        let done = (v == 0 && !sign_bit_set) || (v == -1 && sign_bit_set);
        if done {
            enc.write_u8(byte)?;
            break;
        }
        enc.write_u8(byte | 0x80)?;
    }
    Ok(enc.written() - start)
}

/// Reads a signed LEB128 value. Encodings longer than 5 bytes (the widest a
/// sign-extended 32-bit value needs) are rejected rather than silently
/// accepted, per the resolved reading of §9's over-long-encoding question.
pub fn read_varint(dec: &mut Decoder) -> Result<(i32, usize), DecodeError> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;
    let mut count = 0usize;
    loop {
        let byte = dec.read_u8()?;
        count += 1;
        result |= ((byte & 0x7f) as i64) << shift;
        shift += 7;
        if byte & 0x80 == 0 {
            if shift < 64 && byte & 0x40 != 0 {
                result |= -(1i64 << shift);
            }
            break;
        }
        if count == 5 {
            return Err(DecodeError::VarintTooLong);
        }
    }
    if result < i32::MIN as i64 || result > i32::MAX as i64 {
        return Err(DecodeError::VarintOverflow);
    }
    Ok((result as i32, count))
}
