//! Pack/unpack for declared variants (§3 "Variant", §4.4 VARIANT SEMANTICS).
//!
//! Packing accepts either an explicit `{type, value}` record naming the case
//! by its declared label, or a bare host value classified against the
//! variant's cases by runtime type (§4.4 step 2). Unpacking returns the bare
//! payload directly when the decoded case is the variant's only case of its
//! host-class primitive category, and the tagged `{type, value}` form
//! otherwise, since only then does the wire format's numeric discriminator
//! alone leave no ambiguity about which case produced the value (§3, §4.4
//! "or — when compatible — just the payload").

#[cfg(feature = "decode")]
use indexmap::IndexMap;

use crate::error::{DecodeError, EncodeError};
use crate::ir::TypeId;
use crate::resolver::Registry;
use crate::value::Value;
use crate::wire::{self, Decoder, Encoder};

use super::modifier;

static ABSENT: Value = Value::Absent;

/// `true` iff `case_idx` is the only case among `v.cases` whose resolved
/// type is a bare primitive of the same host class — the condition under
/// which a value can round-trip through its host class alone, with no
/// `{type, value}` tag needed (§4.4 step 2, used by both pack's
/// classification and unpack's "when compatible" bare-payload check).
fn is_unambiguous_by_host_class(reg: &Registry, v: &crate::ir::VariantDecl, case_idx: usize) -> bool {
    let Some(class) = reg.classify_primitive(&v.cases[case_idx].ty).and_then(|p| p.host_class()) else {
        return false;
    };
    v.cases
        .iter()
        .filter(|c| reg.classify_primitive(&c.ty).and_then(|p| p.host_class()) == Some(class))
        .count()
        == 1
}

#[cfg(feature = "encode")]
pub fn pack_variant(
    reg: &Registry,
    id: TypeId,
    value: &Value,
    enc: &mut Encoder,
) -> Result<(), EncodeError> {
    let v = reg.get(id).as_variant().expect("pack_variant called on a non-variant TypeId");

    let (case_idx, payload) = if let Some(record) = value.as_record() {
        let type_tag = record
            .get("type")
            .and_then(Value::as_str)
            .ok_or(EncodeError::WrongHostType { expected: "{type, value} record" })?;
        let idx = v
            .cases
            .iter()
            .position(|c| c.label == type_tag)
            .ok_or(EncodeError::UnknownVariant)?;
        let payload = record.get("value").unwrap_or(&ABSENT);
        (idx, payload)
    } else {
        let class = value.classify().ok_or(EncodeError::UnknownVariant)?;
        let idx = v
            .cases
            .iter()
            .position(|c| reg.classify_primitive(&c.ty).and_then(|p| p.host_class()) == Some(class))
            .ok_or(EncodeError::UnknownVariant)?;
        if !is_unambiguous_by_host_class(reg, v, idx) {
            return Err(EncodeError::UnknownVariant);
        }
        (idx, value)
    };

    wire::pack_varuint32(enc, case_idx as u64)?;
    modifier::pack_value(reg, &v.cases[case_idx].ty, payload, enc)
}

#[cfg(feature = "decode")]
pub fn unpack_variant(reg: &Registry, id: TypeId, dec: &mut Decoder) -> Result<Value, DecodeError> {
    let v = reg.get(id).as_variant().expect("unpack_variant called on a non-variant TypeId");
    let idx = wire::unpack_varuint32(dec)?;
    let case = v
        .cases
        .get(idx as usize)
        .ok_or(DecodeError::UnknownVariantIndex(idx as u32))?;
    let payload = modifier::unpack_value(reg, &case.ty, dec)?;

    if is_unambiguous_by_host_class(reg, v, idx as usize) {
        return Ok(payload);
    }

    let mut record = IndexMap::with_capacity(2);
    record.insert("type".to_string(), Value::Str(case.label.clone()));
    record.insert("value".to_string(), payload);
    Ok(Value::Record(record))
}
