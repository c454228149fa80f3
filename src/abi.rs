//! The ABI front-end contract the resolver consumes (§6 "ABI front-end
//! contract (consumed)").
//!
//! The JSON parsing and schema validation that would produce an [`AbiView`]
//! live outside this crate (§1 "Out of scope"). Anything implementing this
//! trait — a parsed-JSON wrapper, a hand-built fixture in a test — can be
//! fed to [`crate::resolver::resolve`].

/// One field of a declared struct: its name and the textual type expression
/// it was declared with (e.g. `"uint32[]"`, `"asset?"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbiField {
    pub name: String,
    pub type_expr: String,
}

/// One declared struct: its name, optional base struct name, and ordered
/// fields (§3 "Struct").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbiStruct {
    pub name: String,
    pub base: Option<String>,
    pub fields: Vec<AbiField>,
}

/// One declared variant: its name and ordered case type expressions
/// (§3 "Variant").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbiVariant {
    pub name: String,
    pub cases: Vec<String>,
}

/// One declared type alias: a new name bound to a target type expression
/// (§3 "Alias").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbiAlias {
    pub name: String,
    pub type_expr: String,
}

/// The capabilities the resolver needs from an ABI schema (§6).
///
/// Richer ABI content — actions, tables, ricardian clauses — is ignored by
/// the core and has no representation here.
pub trait AbiView {
    fn structs(&self) -> &[AbiStruct];
    fn variants(&self) -> &[AbiVariant];
    fn aliases(&self) -> &[AbiAlias];
}

/// A plain in-memory [`AbiView`], useful for tests and for hosts that have
/// already parsed their ABI JSON into owned data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaticAbi {
    pub structs: Vec<AbiStruct>,
    pub variants: Vec<AbiVariant>,
    pub aliases: Vec<AbiAlias>,
}

impl AbiView for StaticAbi {
    fn structs(&self) -> &[AbiStruct] {
        &self.structs
    }

    fn variants(&self) -> &[AbiVariant] {
        &self.variants
    }

    fn aliases(&self) -> &[AbiAlias] {
        &self.aliases
    }
}
