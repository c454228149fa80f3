//! Lowers an [`AbiView`] into the canonical IR (§4.2 "Type resolver").
//!
//! Resolution happens once per ABI and the resulting [`Registry`] is
//! read-only afterwards (§3 "Lifecycle"). The six steps below follow the
//! algorithm description directly: seed primitives, reserve a `TypeId` for
//! every user-declared name (so forward and self references resolve without
//! a second pass over the name table), resolve aliases with cycle
//! detection, then resolve struct fields/bases and variant cases.

use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

use cranelift_entity::PrimaryMap;
use indexmap::IndexMap;

use crate::abi::AbiView;
use crate::error::SchemaError;
use crate::ir::{
    Field, ModifierChain, Primitive, StructDecl, TypeDecl, TypeId, TypeRef, TypeTable,
    VariantCase, VariantDecl,
};

/// Antelope-style domain aliases that decay to an underlying primitive
/// (§3 "All 64-bit-wide domain aliases... decay to an underlying
/// primitive"; extended per SPEC_FULL.md's supplemented features to the
/// handful of 32-bit-wide ones the same family includes).
const DOMAIN_ALIASES: &[(&str, &str)] = &[
    ("name", "uint64"),
    ("symbol", "uint64"),
    ("symbol_code", "uint64"),
    ("time_point", "uint64"),
    ("time_point_sec", "uint32"),
    ("block_timestamp_type", "uint32"),
];

/// A fully resolved ABI: every declared name maps to exactly one [`TypeId`],
/// and every [`TypeDecl`] is final.
#[derive(Debug)]
pub struct Registry {
    types: TypeTable,
    names: IndexMap<String, TypeId>,
    /// Struct, variant, and alias names in ABI declaration order — the
    /// order the dispatch table is built in (§3 "Lifecycle": "stable
    /// naming"; §6: routines exist "for every struct, variant, and alias").
    dispatch_order: Vec<(String, TypeId)>,
}

impl Registry {
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    pub fn get(&self, id: TypeId) -> &TypeDecl {
        &self.types[id]
    }

    pub fn dispatch_order(&self) -> &[(String, TypeId)] {
        &self.dispatch_order
    }

    /// Follow `ty` through transparent alias hops to the `Primitive` it
    /// ultimately names, or `None` if it has any modifier of its own, or if
    /// it bottoms out at a struct or variant instead (§4.4's host-type
    /// classification only applies to bare primitives).
    pub fn classify_primitive(&self, ty: &TypeRef) -> Option<Primitive> {
        if !ty.modifiers.is_empty() {
            return None;
        }
        match self.get(ty.stem) {
            TypeDecl::Primitive(p) => Some(*p),
            TypeDecl::Alias(target) => self.classify_primitive(target),
            TypeDecl::Struct(_) | TypeDecl::Variant(_) => None,
        }
    }

    /// A human-readable dump of the resolved IR, useful for a host
    /// diagnosing "what did the resolver actually build" (SPEC_FULL.md's
    /// supplemented features).
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for (name, id) in &self.dispatch_order {
            match self.get(*id) {
                TypeDecl::Struct(s) => {
                    let _ = write!(out, "struct {name}");
                    if let Some(base) = s.base {
                        let _ = write!(out, "({})", self.name_of(base).unwrap_or("?"));
                    }
                    out.push_str(": ");
                    for (i, f) in s.fields.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        let _ = write!(out, "{}: {}", f.name, self.describe_ref(&f.ty));
                    }
                    out.push('\n');
                }
                TypeDecl::Variant(v) => {
                    let _ = write!(out, "variant {name}: ");
                    for (i, c) in v.cases.iter().enumerate() {
                        if i > 0 {
                            out.push_str(" | ");
                        }
                        out.push_str(&c.label);
                    }
                    out.push('\n');
                }
                TypeDecl::Alias(target) => {
                    let _ = writeln!(out, "alias {name} = {}", self.describe_ref(target));
                }
                TypeDecl::Primitive(_) => {}
            }
        }
        out
    }

    fn name_of(&self, id: TypeId) -> Option<&str> {
        self.names.iter().find(|(_, v)| **v == id).map(|(k, _)| k.as_str())
    }

    fn describe_ref(&self, ty: &TypeRef) -> String {
        let mut s = self.name_of(ty.stem).unwrap_or("?").to_string();
        for m in &ty.modifiers {
            s.push_str(match m {
                crate::ir::Modifier::Array => "[]",
                crate::ir::Modifier::Optional => "?",
                crate::ir::Modifier::Extension => "$",
            });
        }
        s
    }
}

/// Build the [`Registry`] for `abi` (§4.2).
pub fn resolve(abi: &dyn AbiView) -> Result<Registry, SchemaError> {
    let mut types: TypeTable = PrimaryMap::new();
    let mut names: IndexMap<String, TypeId> = IndexMap::new();

    seed_primitives(&mut types, &mut names);

    // Step 2: reserve a TypeId for every user-declared name up front so
    // field/case/base/target expressions can reference any name regardless
    // of declaration order, including a struct's own name (self-reference
    // through an array field).
    let bool_id = names["bool"];
    for s in abi.structs() {
        register(&mut types, &mut names, &s.name, TypeDecl::Struct(StructDecl::default()))?;
    }
    for v in abi.variants() {
        register(
            &mut types,
            &mut names,
            &v.name,
            TypeDecl::Variant(VariantDecl { cases: Vec::new() }),
        )?;
    }
    for a in abi.aliases() {
        // Placeholder target; overwritten once this alias is actually
        // resolved below. Never read before that happens.
        register(&mut types, &mut names, &a.name, TypeDecl::Alias(TypeRef::bare(bool_id)))?;
    }

    resolve_aliases(abi, &mut types, &names)?;
    resolve_structs(abi, &mut types, &names)?;
    resolve_variants(abi, &mut types, &names)?;

    let mut dispatch_order = Vec::new();
    for s in abi.structs() {
        log::debug!("dispatch table: struct `{}`", s.name);
        dispatch_order.push((s.name.clone(), names[&s.name]));
    }
    for v in abi.variants() {
        log::debug!("dispatch table: variant `{}`", v.name);
        dispatch_order.push((v.name.clone(), names[&v.name]));
    }
    for a in abi.aliases() {
        log::debug!("dispatch table: alias `{}`", a.name);
        dispatch_order.push((a.name.clone(), names[&a.name]));
    }

    Ok(Registry { types, names, dispatch_order })
}

fn register(
    types: &mut TypeTable,
    names: &mut IndexMap<String, TypeId>,
    name: &str,
    placeholder: TypeDecl,
) -> Result<TypeId, SchemaError> {
    if names.contains_key(name) {
        return Err(SchemaError::DuplicateName(name.to_string()));
    }
    let id = types.push(placeholder);
    names.insert(name.to_string(), id);
    Ok(id)
}

fn seed_primitives(types: &mut TypeTable, names: &mut IndexMap<String, TypeId>) {
    use Primitive::*;
    const PRIMITIVES: &[Primitive] = &[
        Bool, U8, U16, U32, U64, U128, I8, I16, I32, I64, I128, F32, F64, F128, Bytes, Str,
        VarUint32, VarInt32,
        Raw(16),
        Raw(20),
        Raw(32),
        Raw(34),
        Raw(64),
        Raw(66),
    ];
    for p in PRIMITIVES {
        let id = types.push(TypeDecl::Primitive(*p));
        names.insert(p.canonical_name().to_string(), id);
    }
    for (alias_name, target) in DOMAIN_ALIASES {
        let target_id = names[*target];
        let id = types.push(TypeDecl::Alias(TypeRef::bare(target_id)));
        names.insert((*alias_name).to_string(), id);
    }
}

/// Parses a type expression's modifier suffix, outermost-first.
///
/// Scanning from the right, the first suffix found (the one written last)
/// is the outermost wrapper: in `"T?[]"` the final `[]` is detected first
/// and is the array itself (an array of optionals), while in `"T[]?"` the
/// final `?` is detected first and is the optional itself (an optional
/// array). Each detected modifier is appended to the chain in detection
/// order, so `chain[0]` is always the outermost modifier.
pub fn parse_type_expr(expr: &str) -> Result<(String, ModifierChain), SchemaError> {
    let mut rest = expr;
    let mut chain = ModifierChain::new();
    loop {
        if let Some(stripped) = rest.strip_suffix("[]") {
            chain.push(crate::ir::Modifier::Array);
            rest = stripped;
        } else if let Some(stripped) = rest.strip_suffix('?') {
            chain.push(crate::ir::Modifier::Optional);
            rest = stripped;
        } else if let Some(stripped) = rest.strip_suffix('$') {
            chain.push(crate::ir::Modifier::Extension);
            rest = stripped;
        } else {
            break;
        }
    }
    if rest.is_empty() {
        return Err(SchemaError::MalformedTypeExpression(expr.to_string()));
    }
    Ok((rest.to_string(), chain))
}

fn resolve_aliases(
    abi: &dyn AbiView,
    types: &mut TypeTable,
    names: &IndexMap<String, TypeId>,
) -> Result<(), SchemaError> {
    #[derive(Copy, Clone, PartialEq)]
    enum Color {
        Grey,
        Black,
    }

    let exprs: HashMap<&str, &str> =
        abi.aliases().iter().map(|a| (a.name.as_str(), a.type_expr.as_str())).collect();
    // Reverse lookup so visiting a stem that happens to itself be a
    // not-yet-resolved alias can find its declared name again.
    let alias_name_of: HashMap<TypeId, &str> =
        abi.aliases().iter().map(|a| (names[&a.name], a.name.as_str())).collect();
    let mut color: HashMap<TypeId, Color> = HashMap::new();

    fn visit(
        id: TypeId,
        name: &str,
        exprs: &HashMap<&str, &str>,
        alias_name_of: &HashMap<TypeId, &str>,
        names: &IndexMap<String, TypeId>,
        types: &mut TypeTable,
        color: &mut HashMap<TypeId, Color>,
    ) -> Result<(), SchemaError> {
        log::trace!("visiting alias `{name}` for cycle detection");
        match color.get(&id) {
            Some(Color::Black) => return Ok(()),
            Some(Color::Grey) => return Err(SchemaError::CyclicAlias(name.to_string())),
            None => {}
        }
        color.insert(id, Color::Grey);

        let expr = exprs[name];
        let (stem_name, chain) = parse_type_expr(expr)?;
        let stem_id = names
            .get(&stem_name)
            .copied()
            .ok_or_else(|| SchemaError::UnknownType(stem_name.clone()))?;

        if let Some(stem_expr_name) = alias_name_of.get(&stem_id) {
            visit(stem_id, stem_expr_name, exprs, alias_name_of, names, types, color)?;
        }

        types[id] = TypeDecl::Alias(TypeRef { stem: stem_id, modifiers: chain });
        color.insert(id, Color::Black);
        Ok(())
    }

    for a in abi.aliases() {
        let id = names[&a.name];
        visit(id, &a.name, &exprs, &alias_name_of, names, types, &mut color)?;
    }
    Ok(())
}

fn resolve_structs(
    abi: &dyn AbiView,
    types: &mut TypeTable,
    names: &IndexMap<String, TypeId>,
) -> Result<(), SchemaError> {
    // Pass A: resolve and validate bases before touching any fields, then
    // check the whole inheritance graph is acyclic (§4.2 step 5).
    let mut bases: HashMap<TypeId, Option<TypeId>> = HashMap::new();
    for s in abi.structs() {
        let id = names[&s.name];
        let base_id = match &s.base {
            None => None,
            Some(base_name) => {
                let bid = names
                    .get(base_name)
                    .copied()
                    .ok_or_else(|| SchemaError::UnknownType(base_name.clone()))?;
                match &types[bid] {
                    TypeDecl::Struct(_) => {}
                    _ => {
                        return Err(SchemaError::BaseNotAStruct {
                            of: s.name.clone(),
                            base: base_name.clone(),
                        })
                    }
                }
                Some(bid)
            }
        };
        bases.insert(id, base_id);
    }

    for (&id, _) in &bases {
        let mut seen = HashSet::new();
        seen.insert(id);
        let mut cur = id;
        while let Some(Some(next)) = bases.get(&cur) {
            log::trace!("visiting base {next:?} from {cur:?} for inheritance cycle detection");
            if !seen.insert(*next) {
                let name = abi
                    .structs()
                    .iter()
                    .find(|s| names[&s.name] == id)
                    .map(|s| s.name.clone())
                    .unwrap_or_default();
                return Err(SchemaError::CyclicInheritance(name));
            }
            cur = *next;
        }
    }

    // Pass B: resolve each struct's own fields and validate the extension
    // tail rule (§4.2 step 6) against that struct's own declared fields.
    for s in abi.structs() {
        let id = names[&s.name];
        let base = bases[&id];

        let mut fields = Vec::with_capacity(s.fields.len());
        let mut seen_names = HashSet::new();
        for f in &s.fields {
            if !seen_names.insert(f.name.clone()) {
                return Err(SchemaError::DuplicateField { of: s.name.clone(), field: f.name.clone() });
            }
            let (stem_name, chain) = parse_type_expr(&f.type_expr)?;
            let stem_id = names
                .get(&stem_name)
                .copied()
                .ok_or_else(|| SchemaError::UnknownType(stem_name.clone()))?;
            fields.push(Field { name: f.name.clone(), ty: TypeRef { stem: stem_id, modifiers: chain } });
        }
        validate_extension_tail(&s.name, &fields)?;

        types[id] = TypeDecl::Struct(StructDecl { base, fields });
    }

    Ok(())
}

fn validate_extension_tail(struct_name: &str, fields: &[Field]) -> Result<(), SchemaError> {
    let mut seen_extension = false;
    for f in fields {
        let is_extension = matches!(f.ty.modifiers.first(), Some(crate::ir::Modifier::Extension));
        if seen_extension && !is_extension {
            return Err(SchemaError::ExtensionNotTrailing {
                of: struct_name.to_string(),
                field: f.name.clone(),
            });
        }
        seen_extension |= is_extension;
    }
    Ok(())
}

fn resolve_variants(
    abi: &dyn AbiView,
    types: &mut TypeTable,
    names: &IndexMap<String, TypeId>,
) -> Result<(), SchemaError> {
    for v in abi.variants() {
        let id = names[&v.name];
        if v.cases.is_empty() {
            return Err(SchemaError::EmptyVariant(v.name.clone()));
        }
        let mut cases = Vec::with_capacity(v.cases.len());
        for case_expr in &v.cases {
            let (stem_name, chain) = parse_type_expr(case_expr)
                .map_err(|_| SchemaError::UnresolvedVariantCase(v.name.clone(), case_expr.clone()))?;
            let stem_id = names.get(&stem_name).copied().ok_or_else(|| {
                SchemaError::UnresolvedVariantCase(v.name.clone(), case_expr.clone())
            })?;
            cases.push(VariantCase { label: case_expr.clone(), ty: TypeRef { stem: stem_id, modifiers: chain } });
        }
        types[id] = TypeDecl::Variant(VariantDecl { cases });
    }
    Ok(())
}
