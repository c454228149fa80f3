//! Fixed-width integers and floats, length-prefixed bytes/strings, raw fixed
//! blobs, and the `varuint32`/`varint32` wire primitives (§4.1, §3
//! "Primitive").
//!
//! Every function here takes or returns plain Rust values, not
//! [`crate::value::Value`] — the emitter (§4.3) is the layer that maps a
//! declared field's [`crate::ir::Primitive`] to the right function and lifts
//! the result back into a `Value`.

use crate::error::{DecodeError, EncodeError};
use crate::wire::cursor::{Decoder, Encoder};
use crate::wire::varint::{read_varint, read_varuint, write_varint, write_varuint};

pub fn pack_bool(enc: &mut Encoder, value: bool) -> Result<(), EncodeError> {
    enc.write_u8(if value { 1 } else { 0 })
}

pub fn unpack_bool(dec: &mut Decoder) -> Result<bool, DecodeError> {
    Ok(dec.read_u8()? != 0)
}

/// Packs an unsigned integer of `width` bits (8/16/32/64/128), little-endian,
/// rejecting a `value` that doesn't fit (§8 "Unsigned integer overflow at
/// pack").
pub fn pack_uint(enc: &mut Encoder, width: u8, value: u128) -> Result<(), EncodeError> {
    let bytes = (width / 8) as usize;
    if bytes < 16 && value >> (width as u32) != 0 {
        return Err(EncodeError::IntegerOutOfRange {
            width,
            signed: "unsigned",
        });
    }
    enc.write_bytes(&value.to_le_bytes()[..bytes])
}

pub fn unpack_uint(dec: &mut Decoder, width: u8) -> Result<u128, DecodeError> {
    let bytes = (width / 8) as usize;
    let slice = dec.read_bytes(bytes)?;
    let mut buf = [0u8; 16];
    buf[..bytes].copy_from_slice(slice);
    Ok(u128::from_le_bytes(buf))
}

/// Packs a signed integer of `width` bits, little-endian, two's complement,
/// rejecting a `value` outside that width's range.
pub fn pack_int(enc: &mut Encoder, width: u8, value: i128) -> Result<(), EncodeError> {
    let bytes = (width / 8) as usize;
    if bytes < 16 {
        let min = -(1i128 << (width as u32 - 1));
        let max = (1i128 << (width as u32 - 1)) - 1;
        if value < min || value > max {
            return Err(EncodeError::IntegerOutOfRange {
                width,
                signed: "signed",
            });
        }
    }
    enc.write_bytes(&value.to_le_bytes()[..bytes])
}

pub fn unpack_int(dec: &mut Decoder, width: u8) -> Result<i128, DecodeError> {
    let bytes = (width / 8) as usize;
    let slice = dec.read_bytes(bytes)?;
    let fill = if slice[bytes - 1] & 0x80 != 0 { 0xff } else { 0 };
    let mut buf = [fill; 16];
    buf[..bytes].copy_from_slice(slice);
    Ok(i128::from_le_bytes(buf))
}

pub fn pack_f32(enc: &mut Encoder, value: f32) -> Result<(), EncodeError> {
    enc.write_bytes(&value.to_le_bytes())
}

pub fn unpack_f32(dec: &mut Decoder) -> Result<f32, DecodeError> {
    let slice = dec.read_bytes(4)?;
    Ok(f32::from_le_bytes(slice.try_into().unwrap()))
}

pub fn pack_f64(enc: &mut Encoder, value: f64) -> Result<(), EncodeError> {
    enc.write_bytes(&value.to_le_bytes())
}

pub fn unpack_f64(dec: &mut Decoder) -> Result<f64, DecodeError> {
    let slice = dec.read_bytes(8)?;
    Ok(f64::from_le_bytes(slice.try_into().unwrap()))
}

/// The 128-bit opaque float: 16 raw bytes, carried through verbatim with no
/// interpretation (§3 "float128").
pub fn pack_f128(enc: &mut Encoder, value: [u8; 16]) -> Result<(), EncodeError> {
    enc.write_bytes(&value)
}

pub fn unpack_f128(dec: &mut Decoder) -> Result<[u8; 16], DecodeError> {
    let slice = dec.read_bytes(16)?;
    Ok(slice.try_into().unwrap())
}

pub fn pack_varuint32(enc: &mut Encoder, value: u64) -> Result<(), EncodeError> {
    write_varuint(enc, value).map(|_| ())
}

pub fn unpack_varuint32(dec: &mut Decoder) -> Result<u64, DecodeError> {
    read_varuint(dec).map(|(v, _)| v)
}

pub fn pack_varint32(enc: &mut Encoder, value: i32) -> Result<(), EncodeError> {
    write_varint(enc, value).map(|_| ())
}

pub fn unpack_varint32(dec: &mut Decoder) -> Result<i32, DecodeError> {
    read_varint(dec).map(|(v, _)| v)
}

/// A varuint32-length-prefixed, otherwise opaque, byte string (§3 "bytes").
pub fn pack_bytes(enc: &mut Encoder, value: &[u8]) -> Result<(), EncodeError> {
    write_varuint(enc, value.len() as u64)?;
    enc.write_bytes(value)
}

pub fn unpack_bytes(dec: &mut Decoder) -> Result<Vec<u8>, DecodeError> {
    let (len, _) = read_varuint(dec)?;
    Ok(dec.read_bytes(len as usize)?.to_vec())
}

/// A varuint32-length-prefixed UTF-8 string (§3 "string").
pub fn pack_str(enc: &mut Encoder, value: &str) -> Result<(), EncodeError> {
    pack_bytes(enc, value.as_bytes())
}

pub fn unpack_str(dec: &mut Decoder) -> Result<String, DecodeError> {
    let bytes = unpack_bytes(dec)?;
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
}

/// A fixed-width blob with no length prefix: `checksum160`, `checksum256`,
/// `public_key`, `signature`, and friends (§3).
pub fn pack_raw(enc: &mut Encoder, width: u8, value: &[u8]) -> Result<(), EncodeError> {
    if value.len() != width as usize {
        return Err(EncodeError::WrongHostType {
            expected: "fixed-width byte string",
        });
    }
    enc.write_bytes(value)
}

pub fn unpack_raw(dec: &mut Decoder, width: u8) -> Result<Vec<u8>, DecodeError> {
    Ok(dec.read_bytes(width as usize)?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc_buf() -> [u8; 64] {
        [0u8; 64]
    }

    #[test]
    fn uint_roundtrip_and_overflow() {
        let mut buf = enc_buf();
        let mut enc = Encoder::new(&mut buf);
        pack_uint(&mut enc, 16, 65535).unwrap();
        let written = enc.written();
        let mut dec = Decoder::new(&buf[..written]);
        assert_eq!(unpack_uint(&mut dec, 16).unwrap(), 65535);

        let mut buf2 = enc_buf();
        let mut enc2 = Encoder::new(&mut buf2);
        assert!(matches!(
            pack_uint(&mut enc2, 16, 65536),
            Err(EncodeError::IntegerOutOfRange { width: 16, .. })
        ));
    }

    #[test]
    fn int_roundtrip_negative() {
        let mut buf = enc_buf();
        let mut enc = Encoder::new(&mut buf);
        pack_int(&mut enc, 32, -1).unwrap();
        let written = enc.written();
        assert_eq!(&buf[..written], &[0xff, 0xff, 0xff, 0xff]);
        let mut dec = Decoder::new(&buf[..written]);
        assert_eq!(unpack_int(&mut dec, 32).unwrap(), -1);
    }

    #[test]
    fn int_overflow_rejected() {
        let mut buf = enc_buf();
        let mut enc = Encoder::new(&mut buf);
        assert!(matches!(
            pack_int(&mut enc, 8, 200),
            Err(EncodeError::IntegerOutOfRange { width: 8, .. })
        ));
    }

    #[test]
    fn string_roundtrip() {
        let mut buf = enc_buf();
        let mut enc = Encoder::new(&mut buf);
        pack_str(&mut enc, "hello").unwrap();
        let written = enc.written();
        let mut dec = Decoder::new(&buf[..written]);
        assert_eq!(unpack_str(&mut dec).unwrap(), "hello");
    }

    #[test]
    fn string_rejects_invalid_utf8() {
        let mut buf = enc_buf();
        let mut enc = Encoder::new(&mut buf);
        pack_bytes(&mut enc, &[0xff, 0xfe]).unwrap();
        let written = enc.written();
        let mut dec = Decoder::new(&buf[..written]);
        assert!(matches!(unpack_str(&mut dec), Err(DecodeError::InvalidUtf8)));
    }

    #[test]
    fn raw_fixed_width_rejects_wrong_length() {
        let mut buf = enc_buf();
        let mut enc = Encoder::new(&mut buf);
        assert!(pack_raw(&mut enc, 32, &[0u8; 31]).is_err());
    }
}
