//! The canonical IR a resolved ABI is lowered into (§3 DATA MODEL, §9 "Graph
//! cycles in IR").
//!
//! Nodes reference each other by [`TypeId`], a `cranelift-entity` style
//! newtype index into a [`PrimaryMap`], not by pointer. That's what lets a
//! struct refer to itself (directly, or transitively through an array of a
//! sibling struct) without `Rc`/`RefCell` cycles: the graph is just indices
//! into a flat table.

use cranelift_entity::{entity_impl, PrimaryMap};
use smallvec::SmallVec;

use crate::value::HostClass;

/// An opaque reference to a [`TypeDecl`] in a [`crate::resolver::Registry`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct TypeId(u32);
entity_impl!(TypeId, "type");

pub type TypeTable = PrimaryMap<TypeId, TypeDecl>;

/// The fixed, closed set of primitive wire types (§3 "Primitive").
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Primitive {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    I8,
    I16,
    I32,
    I64,
    I128,
    F32,
    F64,
    /// The 128-bit opaque float: 16 raw bytes, no interpretation.
    F128,
    Bytes,
    Str,
    VarUint32,
    VarInt32,
    /// A fixed-width raw blob with no length prefix. `N` is one of
    /// {16, 20, 32, 34, 64, 66}, per §3's checksum/key/signature primitives.
    Raw(u8),
}

impl Primitive {
    /// The canonical wire name used to seed the resolver's name table and,
    /// for variant cases, the `{type, value}` discriminator tag (§4.4).
    pub fn canonical_name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::U8 => "uint8",
            Primitive::U16 => "uint16",
            Primitive::U32 => "uint32",
            Primitive::U64 => "uint64",
            Primitive::U128 => "uint128",
            Primitive::I8 => "int8",
            Primitive::I16 => "int16",
            Primitive::I32 => "int32",
            Primitive::I64 => "int64",
            Primitive::I128 => "int128",
            Primitive::F32 => "float32",
            Primitive::F64 => "float64",
            Primitive::F128 => "float128",
            Primitive::Bytes => "bytes",
            Primitive::Str => "string",
            Primitive::VarUint32 => "varuint32",
            Primitive::VarInt32 => "varint32",
            Primitive::Raw(16) => "checksum128",
            Primitive::Raw(20) => "checksum160",
            Primitive::Raw(32) => "checksum256",
            Primitive::Raw(34) => "public_key",
            Primitive::Raw(64) => "checksum512",
            Primitive::Raw(66) => "signature",
            Primitive::Raw(n) => {
                // Only the six widths above are ever constructed (see
                // resolver::seed_primitives); this arm exists so the match is
                // exhaustive without a panic in normal operation.
                debug_assert!(false, "unexpected raw width {n}");
                "raw"
            }
        }
    }

    /// Bit width of a fixed-width integer primitive, or `None` for anything
    /// else (§4.3's pack/unpack integer routines key off this).
    pub fn int_width_bits(self) -> Option<u8> {
        match self {
            Primitive::U8 | Primitive::I8 => Some(8),
            Primitive::U16 | Primitive::I16 => Some(16),
            Primitive::U32 | Primitive::I32 => Some(32),
            Primitive::U64 | Primitive::I64 => Some(64),
            Primitive::U128 | Primitive::I128 => Some(128),
            _ => None,
        }
    }

    pub fn is_signed_int(self) -> bool {
        matches!(
            self,
            Primitive::I8 | Primitive::I16 | Primitive::I32 | Primitive::I64 | Primitive::I128
        )
    }

    pub fn is_unsigned_int(self) -> bool {
        matches!(
            self,
            Primitive::U8 | Primitive::U16 | Primitive::U32 | Primitive::U64 | Primitive::U128
        )
    }

    /// The width, in bytes, of a fixed-width raw blob primitive (§3
    /// "checksum160"/"checksum256"/"public_key"/"signature" and friends).
    pub fn raw_width_bytes(self) -> Option<u8> {
        match self {
            Primitive::Raw(n) => Some(n),
            _ => None,
        }
    }

    /// The host runtime type class a bare value of this primitive
    /// classifies as, used to disambiguate an untagged variant pack-side
    /// value (§4.4 step 2).
    pub fn host_class(self) -> Option<HostClass> {
        match self {
            Primitive::Bool => Some(HostClass::Bool),
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
            | Primitive::VarUint32
            | Primitive::VarInt32 => Some(HostClass::Int),
            Primitive::F32 | Primitive::F64 | Primitive::F128 => Some(HostClass::Float),
            Primitive::Bytes | Primitive::Raw(_) => Some(HostClass::Bytes),
            Primitive::Str => Some(HostClass::Str),
        }
    }
}

/// One of the three wrappers a field's type expression can carry, applied
/// outermost-first (§3 "Modifier chain", §4.3).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Modifier {
    Optional,
    Extension,
    Array,
}

/// Most fields carry zero or one modifier; inline storage avoids a heap
/// allocation for the common case while still allowing arbitrary nesting
/// (e.g. `T?[]$` is unusual but not rejected by the grammar).
pub type ModifierChain = SmallVec<[Modifier; 3]>;

/// A resolved type expression: a base type plus the modifier chain parsed
/// from its syntactic suffix (§4.2 step 4).
#[derive(Clone, Debug)]
pub struct TypeRef {
    pub stem: TypeId,
    pub modifiers: ModifierChain,
}

impl TypeRef {
    pub fn bare(stem: TypeId) -> Self {
        TypeRef {
            stem,
            modifiers: ModifierChain::new(),
        }
    }
}

/// A struct field: a unique name plus its resolved type.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
}

#[derive(Clone, Debug, Default)]
pub struct StructDecl {
    /// The single base struct, if declared (§3 "A struct may declare a
    /// single base struct").
    pub base: Option<TypeId>,
    pub fields: Vec<Field>,
}

/// One case of a variant: the case's resolved type plus the original
/// type-expression text, used as the `{type, value}` discriminator tag on
/// the pack side (§4.4) since it may name an alias rather than a bare
/// primitive or struct.
#[derive(Clone, Debug)]
pub struct VariantCase {
    pub label: String,
    pub ty: TypeRef,
}

#[derive(Clone, Debug)]
pub struct VariantDecl {
    pub cases: Vec<VariantCase>,
}

/// A node in the IR graph (§3 DATA MODEL, §2 point 3).
#[derive(Clone, Debug)]
pub enum TypeDecl {
    Primitive(Primitive),
    Struct(StructDecl),
    Variant(VariantDecl),
    /// Transparent: the emitted routine for an alias delegates to its
    /// target's routine (§3 "Alias").
    Alias(TypeRef),
}

impl TypeDecl {
    pub fn as_struct(&self) -> Option<&StructDecl> {
        match self {
            TypeDecl::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_variant(&self) -> Option<&VariantDecl> {
        match self {
            TypeDecl::Variant(v) => Some(v),
            _ => None,
        }
    }
}
