//! Applies a [`TypeRef`]'s modifier chain outermost-first, then dispatches
//! the bare stem to a primitive, struct, variant, or alias routine (§4.2
//! step 4, §4.3).

use crate::error::{DecodeError, EncodeError};
use crate::ir::{Modifier, TypeDecl, TypeId, TypeRef};
use crate::resolver::Registry;
use crate::value::Value;
use crate::wire::{self, Decoder, Encoder};

use super::primitive;
use super::struct_codec;
use super::variant_codec;

fn peel(ty: &TypeRef) -> Option<(Modifier, TypeRef)> {
    let (first, rest) = ty.modifiers.split_first()?;
    Some((*first, TypeRef { stem: ty.stem, modifiers: rest.iter().copied().collect() }))
}

#[cfg(feature = "encode")]
pub fn pack_value(
    reg: &Registry,
    ty: &TypeRef,
    value: &Value,
    enc: &mut Encoder,
) -> Result<(), EncodeError> {
    match peel(ty) {
        Some((Modifier::Optional, inner)) => match value {
            Value::Absent => wire::pack_bool(enc, false),
            other => {
                wire::pack_bool(enc, true)?;
                pack_value(reg, &inner, other, enc)
            }
        },
        Some((Modifier::Extension, inner)) => match value {
            Value::Absent => Ok(()),
            other => pack_value(reg, &inner, other, enc),
        },
        Some((Modifier::Array, inner)) => {
            let list = value.as_list().ok_or(EncodeError::WrongHostType { expected: "list" })?;
            wire::pack_varuint32(enc, list.len() as u64)?;
            for item in list {
                pack_value(reg, &inner, item, enc)?;
            }
            Ok(())
        }
        None => pack_bare(reg, ty.stem, value, enc),
    }
}

#[cfg(feature = "decode")]
pub fn unpack_value(reg: &Registry, ty: &TypeRef, dec: &mut Decoder) -> Result<Value, DecodeError> {
    match peel(ty) {
        Some((Modifier::Optional, inner)) => {
            if wire::unpack_bool(dec)? {
                unpack_value(reg, &inner, dec)
            } else {
                Ok(Value::Absent)
            }
        }
        Some((Modifier::Extension, inner)) => {
            if dec.remaining() == 0 {
                Ok(Value::Absent)
            } else {
                unpack_value(reg, &inner, dec)
            }
        }
        Some((Modifier::Array, inner)) => {
            let count = wire::unpack_varuint32(dec)?;
            let mut items = Vec::with_capacity(count as usize);
            for _ in 0..count {
                items.push(unpack_value(reg, &inner, dec)?);
            }
            Ok(Value::List(items))
        }
        None => unpack_bare(reg, ty.stem, dec),
    }
}

#[cfg(feature = "encode")]
fn pack_bare(reg: &Registry, stem: TypeId, value: &Value, enc: &mut Encoder) -> Result<(), EncodeError> {
    match reg.get(stem) {
        TypeDecl::Primitive(p) => primitive::pack_primitive(*p, value, enc),
        TypeDecl::Alias(target) => pack_value(reg, target, value, enc),
        TypeDecl::Struct(_) => struct_codec::pack_struct(reg, stem, value, enc),
        TypeDecl::Variant(_) => variant_codec::pack_variant(reg, stem, value, enc),
    }
}

#[cfg(feature = "decode")]
fn unpack_bare(reg: &Registry, stem: TypeId, dec: &mut Decoder) -> Result<Value, DecodeError> {
    match reg.get(stem) {
        TypeDecl::Primitive(p) => primitive::unpack_primitive(*p, dec),
        TypeDecl::Alias(target) => unpack_value(reg, target, dec),
        TypeDecl::Struct(_) => struct_codec::unpack_struct(reg, stem, dec),
        TypeDecl::Variant(_) => variant_codec::unpack_variant(reg, stem, dec),
    }
}
