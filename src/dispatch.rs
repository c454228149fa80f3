//! The top-level `pack`/`unpack` entry points a host actually calls (§4.5
//! DISPATCH, §4.6 BUFFER GROWTH).
//!
//! A [`Codec`] borrows a resolved [`Registry`] and looks up a type by name on
//! every call rather than building one generated function per name — see
//! [`crate::emitter`]'s module doc for why. The name passed to `pack`/`unpack`
//! may itself carry a modifier suffix (`"transaction[]"`, `"asset?"`), parsed
//! with the same grammar as a field's type expression, so a host can dispatch
//! directly to "an array of transactions" without declaring a wrapper alias.

use crate::error::{CodecError, DispatchError, EncodeError};
use crate::emitter;
use crate::ir::TypeRef;
use crate::resolver::{parse_type_expr, Registry};
use crate::value::Value;
use crate::wire::{Decoder, Encoder};

/// Initial output buffer size a `pack` call allocates before trying to grow
/// it (§4.6). Chosen to fit most struct instances without a retry.
const INITIAL_CAPACITY: usize = 256;

/// How many times `pack` doubles its buffer and retries before giving up
/// (§4.6 "a boundary wrapper doubles capacity and retries").
const MAX_RESIZE_ATTEMPTS: u32 = 5;

pub struct Codec<'a> {
    registry: &'a Registry,
}

impl<'a> Codec<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Codec { registry }
    }

    /// The names this codec can `pack`/`unpack` by (structs, variants, and
    /// aliases, in ABI declaration order).
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.registry.dispatch_order().iter().map(|(name, _)| name.as_str())
    }

    #[cfg(feature = "encode")]
    pub fn pack(&self, name: &str, value: &Value) -> Result<Vec<u8>, CodecError> {
        let ty = self.resolve_type_ref(name)?;
        let mut capacity = INITIAL_CAPACITY;
        for attempt in 1..=MAX_RESIZE_ATTEMPTS {
            let mut buf = vec![0u8; capacity];
            let mut enc = Encoder::new(&mut buf);
            match emitter::pack_value(self.registry, &ty, value, &mut enc) {
                Ok(()) => {
                    let written = enc.written();
                    buf.truncate(written);
                    log::trace!("packed `{name}` into {written} byte(s) ({attempt} attempt(s))");
                    return Ok(buf);
                }
                Err(EncodeError::BufferTooSmall) => {
                    log::warn!("`{name}` did not fit {capacity} byte(s), growing and retrying");
                    capacity *= 2;
                }
                Err(other) => return Err(CodecError::Encode(other)),
            }
        }
        Err(CodecError::Dispatch(DispatchError::ExceededMaxResizeAttempts(MAX_RESIZE_ATTEMPTS)))
    }

    #[cfg(feature = "decode")]
    pub fn unpack(&self, name: &str, bytes: &[u8]) -> Result<Value, CodecError> {
        let ty = self.resolve_type_ref(name)?;
        let mut dec = Decoder::new(bytes);
        let value = emitter::unpack_value(self.registry, &ty, &mut dec)?;
        Ok(value)
    }

    fn resolve_type_ref(&self, name: &str) -> Result<TypeRef, DispatchError> {
        let (stem_name, modifiers) =
            parse_type_expr(name).map_err(|_| DispatchError::UnknownType(name.to_string()))?;
        let stem = self
            .registry
            .lookup(&stem_name)
            .ok_or_else(|| DispatchError::UnknownType(name.to_string()))?;
        Ok(TypeRef { stem, modifiers })
    }
}
