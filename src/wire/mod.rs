//! The byte-level encoding rules every emitted routine bottoms out in
//! (§4.1 WIRE FORMAT).
//!
//! This module knows nothing about the ABI, the IR, or [`crate::value::Value`]
//! records — it only knows how to move bytes in and out of a cursor. The
//! emitter (§4.3, §4.4) is the layer that maps a declared type to calls here.

mod cursor;
mod primitives;
mod varint;

pub use cursor::{Decoder, Encoder};
pub use primitives::{
    pack_bool, pack_bytes, pack_f32, pack_f64, pack_f128, pack_int, pack_raw, pack_str,
    pack_uint, pack_varint32, pack_varuint32, unpack_bool, unpack_bytes, unpack_f32, unpack_f64,
    unpack_f128, unpack_int, unpack_raw, unpack_str, unpack_uint, unpack_varint32,
    unpack_varuint32,
};
pub use varint::{read_varint, read_varuint, write_varint, write_varuint};
