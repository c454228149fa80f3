//! Maps a resolved [`TypeRef`] to the wire routines in [`crate::wire`] and
//! the [`Value`] it carries (§4.3 PACK/UNPACK SEMANTICS, §4.4 VARIANT
//! SEMANTICS).
//!
//! Unlike `cranelift-codegen-meta`'s literal textual codegen, this emitter
//! specializes by recursing over the IR at call time rather than generating
//! a distinct function body per named type ahead of time — a JIT or
//! C-compiler pass to do the latter is out of scope (§1 "Out of scope").
//! The recursive shape still gives every struct/variant/alias its own
//! dispatch entry (§6), just resolved through [`crate::resolver::Registry`]
//! instead of through generated source.

mod modifier;
mod primitive;
mod struct_codec;
mod variant_codec;

#[cfg(feature = "encode")]
pub use modifier::pack_value;
#[cfg(feature = "decode")]
pub use modifier::unpack_value;
