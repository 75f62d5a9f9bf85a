//! Type name rendering
//!
//! Turns type model values into text that can be pasted into generated
//! source: canonical names with nested-type markers rewritten, array
//! suffixes, erasures for class literals, and type parameter lists in their
//! declaration-site and reference-site forms.

use crate::consts::{
    ARRAY_SUFFIX, BOUND_CONJUNCTION, ERASURE_MAX_DEPTH, JAVA_LANG_OBJECT, MEMBER_SEPARATOR, NESTING_MARKER,
};
use crate::types::{JavaType, TypeParameter, WildcardBound};

/// Canonical, directly embeddable name of a type.
///
/// Class types get their nesting markers rewritten to the member-access
/// separator, arrays render their component followed by `[]`, and every
/// other form falls back to its `Display` text.
pub fn canonical_name(ty: &JavaType) -> String {
    match ty {
        JavaType::Class(name) => name.replace(NESTING_MARKER, &MEMBER_SEPARATOR.to_string()),
        JavaType::Array(component) => {
            let mut name = canonical_name(component);
            name.push_str(ARRAY_SUFFIX);
            name
        }
        other => other.to_string(),
    }
}

/// Whether type parameters are rendered with their bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundMode {
    /// `<T extends A & B>`; bounds are mandatory, missing ones render as Object
    Declaration,
    /// `<T>`
    Reference,
}

/// Render a type parameter list, or nothing when `params` is empty
pub fn type_parameters(params: &[TypeParameter], mode: BoundMode) -> String {
    if params.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = params
        .iter()
        .map(|param| match mode {
            BoundMode::Reference => param.name.clone(),
            BoundMode::Declaration => format!("{} extends {}", param.name, bound_list(&param.bounds)),
        })
        .collect();
    format!("<{}>", rendered.join(", "))
}

fn bound_list(bounds: &[JavaType]) -> String {
    if bounds.is_empty() {
        return JAVA_LANG_OBJECT.to_string();
    }
    bounds.iter().map(canonical_name).collect::<Vec<_>>().join(BOUND_CONJUNCTION)
}

/// Type parameters visible at a point of use: the method's own, then the
/// enclosing type's.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScope<'a> {
    pub method: &'a [TypeParameter],
    pub enclosing: &'a [TypeParameter],
}

impl<'a> TypeScope<'a> {
    pub fn new(method: &'a [TypeParameter], enclosing: &'a [TypeParameter]) -> Self {
        Self { method, enclosing }
    }

    pub fn lookup(&self, name: &str) -> Option<&'a TypeParameter> {
        self.method
            .iter()
            .find(|p| p.name == name)
            .or_else(|| self.enclosing.iter().find(|p| p.name == name))
    }
}

/// Erasure of a type (JLS 4.6)
pub fn erasure(ty: &JavaType, scope: &TypeScope<'_>) -> JavaType {
    erase(ty, scope, 0)
}

fn erase(ty: &JavaType, scope: &TypeScope<'_>, depth: usize) -> JavaType {
    if depth > ERASURE_MAX_DEPTH {
        return JavaType::object();
    }
    match ty {
        JavaType::Void | JavaType::Primitive(_) | JavaType::Class(_) => ty.clone(),
        JavaType::Parameterized { raw, .. } => JavaType::Class(raw.clone()),
        JavaType::Array(component) => JavaType::Array(Box::new(erase(component, scope, depth + 1))),
        JavaType::TypeVar(name) => match scope.lookup(name).and_then(|p| p.bounds.first()) {
            Some(bound) => erase(bound, scope, depth + 1),
            None => JavaType::object(),
        },
        JavaType::Wildcard(WildcardBound::Extends(bound)) => erase(bound, scope, depth + 1),
        JavaType::Wildcard(_) => JavaType::object(),
    }
}
