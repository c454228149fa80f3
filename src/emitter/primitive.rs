//! Dispatches a bare [`Primitive`] to its wire routine (§4.3).

use crate::error::{DecodeError, EncodeError};
use crate::ir::Primitive;
use crate::value::Value;
use crate::wire::{self, Decoder, Encoder};

#[cfg(feature = "encode")]
pub fn pack_primitive(p: Primitive, value: &Value, enc: &mut Encoder) -> Result<(), EncodeError> {
    if let Some(width) = p.int_width_bits() {
        return if p.is_signed_int() {
            let v = match value {
                Value::Int(i) => *i,
                Value::UInt(u) => *u as i128,
                _ => return Err(EncodeError::WrongHostType { expected: "integer" }),
            };
            wire::pack_int(enc, width, v)
        } else {
            let v = match value {
                Value::UInt(u) => *u,
                Value::Int(i) if *i >= 0 => *i as u128,
                _ => return Err(EncodeError::WrongHostType { expected: "integer" }),
            };
            wire::pack_uint(enc, width, v)
        };
    }
    if let Some(width) = p.raw_width_bytes() {
        let bytes = value
            .as_bytes()
            .ok_or(EncodeError::WrongHostType { expected: "fixed-width byte string" })?;
        return wire::pack_raw(enc, width, bytes);
    }
    match p {
        Primitive::Bool => {
            let b = value.as_bool().ok_or(EncodeError::WrongHostType { expected: "bool" })?;
            wire::pack_bool(enc, b)
        }
        Primitive::F32 => match value {
            Value::Float32(f) => wire::pack_f32(enc, *f),
            _ => Err(EncodeError::WrongHostType { expected: "float32" }),
        },
        Primitive::F64 => match value {
            Value::Float64(f) => wire::pack_f64(enc, *f),
            _ => Err(EncodeError::WrongHostType { expected: "float64" }),
        },
        Primitive::F128 => match value {
            Value::Float128(bytes) => wire::pack_f128(enc, *bytes),
            _ => Err(EncodeError::WrongHostType { expected: "float128" }),
        },
        Primitive::Bytes => {
            let bytes = value.as_bytes().ok_or(EncodeError::WrongHostType { expected: "bytes" })?;
            wire::pack_bytes(enc, bytes)
        }
        Primitive::Str => {
            let s = value.as_str().ok_or(EncodeError::WrongHostType { expected: "string" })?;
            wire::pack_str(enc, s)
        }
        Primitive::VarUint32 => {
            let v = match value {
                Value::UInt(u) => *u as u64,
                Value::Int(i) if *i >= 0 => *i as u64,
                _ => return Err(EncodeError::WrongHostType { expected: "unsigned integer" }),
            };
            wire::pack_varuint32(enc, v)
        }
        Primitive::VarInt32 => {
            let v = match value {
                Value::Int(i) => *i as i32,
                Value::UInt(u) => *u as i32,
                _ => return Err(EncodeError::WrongHostType { expected: "integer" }),
            };
            wire::pack_varint32(enc, v)
        }
        Primitive::U8
        | Primitive::U16
        | Primitive::U32
        | Primitive::U64
        | Primitive::U128
        | Primitive::I8
        | Primitive::I16
        | Primitive::I32
        | Primitive::I64
        | Primitive::I128
        | Primitive::Raw(_) => unreachable!("handled above"),
    }
}

#[cfg(feature = "decode")]
pub fn unpack_primitive(p: Primitive, dec: &mut Decoder) -> Result<Value, DecodeError> {
    if let Some(width) = p.int_width_bits() {
        return Ok(if p.is_signed_int() {
            Value::Int(wire::unpack_int(dec, width)?)
        } else {
            Value::UInt(wire::unpack_uint(dec, width)?)
        });
    }
    if let Some(width) = p.raw_width_bytes() {
        return Ok(Value::Bytes(wire::unpack_raw(dec, width)?));
    }
    Ok(match p {
        Primitive::Bool => Value::Bool(wire::unpack_bool(dec)?),
        Primitive::F32 => Value::Float32(wire::unpack_f32(dec)?),
        Primitive::F64 => Value::Float64(wire::unpack_f64(dec)?),
        Primitive::F128 => Value::Float128(wire::unpack_f128(dec)?),
        Primitive::Bytes => Value::Bytes(wire::unpack_bytes(dec)?),
        Primitive::Str => Value::Str(wire::unpack_str(dec)?),
        Primitive::VarUint32 => Value::UInt(wire::unpack_varuint32(dec)? as u128),
        Primitive::VarInt32 => Value::Int(wire::unpack_varint32(dec)? as i128),
        Primitive::U8
        | Primitive::U16
        | Primitive::U32
        | Primitive::U64
        | Primitive::U128
        | Primitive::I8
        | Primitive::I16
        | Primitive::I32
        | Primitive::I64
        | Primitive::I128
        | Primitive::Raw(_) => unreachable!("handled above"),
    })
}
