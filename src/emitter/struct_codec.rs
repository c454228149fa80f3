//! Pack/unpack for declared structs, including single-inheritance base
//! fields (§3 "Struct", §4.3).

#[cfg(feature = "decode")]
use indexmap::IndexMap;

use crate::error::{DecodeError, EncodeError};
use crate::ir::{Field, Modifier, TypeId};
use crate::resolver::Registry;
use crate::value::Value;
use crate::wire::{Decoder, Encoder};

use super::modifier;

/// Collects `id`'s fields in wire order: the base struct's own fields
/// (recursively, root first), then `id`'s own fields (§3 "fields... are
/// serialized in declaration order, base fields first").
pub(crate) fn collect_fields<'a>(reg: &'a Registry, id: TypeId, out: &mut Vec<&'a Field>) {
    let s = reg.get(id).as_struct().expect("collect_fields called on a non-struct TypeId");
    if let Some(base) = s.base {
        collect_fields(reg, base, out);
    }
    out.extend(s.fields.iter());
}

static ABSENT: Value = Value::Absent;

#[cfg(feature = "encode")]
pub fn pack_struct(
    reg: &Registry,
    id: TypeId,
    value: &Value,
    enc: &mut Encoder,
) -> Result<(), EncodeError> {
    let record = value.as_record().ok_or(EncodeError::WrongHostType { expected: "record" })?;
    let mut fields = Vec::new();
    collect_fields(reg, id, &mut fields);
    for f in fields {
        let field_value = match record.get(&f.name) {
            Some(v) => v,
            None if matches!(f.ty.modifiers.first(), Some(Modifier::Extension)) => &ABSENT,
            None => return Err(EncodeError::MissingField(f.name.clone())),
        };
        modifier::pack_value(reg, &f.ty, field_value, enc)?;
    }
    Ok(())
}

#[cfg(feature = "decode")]
pub fn unpack_struct(reg: &Registry, id: TypeId, dec: &mut Decoder) -> Result<Value, DecodeError> {
    let mut fields = Vec::new();
    collect_fields(reg, id, &mut fields);
    let mut record = IndexMap::with_capacity(fields.len());
    for f in fields {
        let v = modifier::unpack_value(reg, &f.ty, dec)?;
        record.insert(f.name.clone(), v);
    }
    Ok(Value::Record(record))
}
