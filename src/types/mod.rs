//! Runtime type model
//!
//! The Rust rendition of the host VM's reflective type handles: types as they
//! appear in generic method signatures, type parameters with their bounds,
//! and the class/method descriptors the synthesizer reads.

pub mod descriptor;
pub mod signature;

pub use descriptor::{AccessFlags, MethodDescriptor, TypeDescriptor, TypeKind};

use crate::render::canonical_name;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub fn keyword(&self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    /// JVM base type descriptor character (JVMS 4.3.2)
    pub fn from_descriptor(c: char) -> Option<Self> {
        match c {
            'Z' => Some(PrimitiveType::Boolean),
            'B' => Some(PrimitiveType::Byte),
            'C' => Some(PrimitiveType::Char),
            'S' => Some(PrimitiveType::Short),
            'I' => Some(PrimitiveType::Int),
            'J' => Some(PrimitiveType::Long),
            'F' => Some(PrimitiveType::Float),
            'D' => Some(PrimitiveType::Double),
            _ => None,
        }
    }
}

/// Bound of a wildcard type argument
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<JavaType>),
    Super(Box<JavaType>),
}

/// A type as it appears in a (possibly generic) declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JavaType {
    Void,
    Primitive(PrimitiveType),
    /// Class or interface by binary name, e.g. `java.util.Map$Entry`
    Class(String),
    /// Generic instantiation of a class, e.g. `java.util.List<T>`
    Parameterized { raw: String, args: Vec<JavaType> },
    Array(Box<JavaType>),
    TypeVar(String),
    Wildcard(WildcardBound),
}

impl JavaType {
    pub fn class(binary_name: impl Into<String>) -> Self {
        JavaType::Class(binary_name.into())
    }

    pub fn object() -> Self {
        JavaType::Class(crate::consts::JAVA_LANG_OBJECT.to_string())
    }

    pub fn parameterized(raw: impl Into<String>, args: Vec<JavaType>) -> Self {
        JavaType::Parameterized { raw: raw.into(), args }
    }

    pub fn array_of(component: JavaType) -> Self {
        JavaType::Array(Box::new(component))
    }

    pub fn type_var(name: impl Into<String>) -> Self {
        JavaType::TypeVar(name.into())
    }

    pub fn is_void(&self) -> bool {
        matches!(self, JavaType::Void)
    }
}

/// Default textual form of a type.
///
/// Class types print their binary name unchanged; composite forms print
/// their parts through [`canonical_name`].
impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Void => f.write_str("void"),
            JavaType::Primitive(p) => f.write_str(p.keyword()),
            JavaType::Class(name) => f.write_str(name),
            JavaType::Parameterized { raw, args } => {
                write!(f, "{}<", canonical_name(&JavaType::Class(raw.clone())))?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(&canonical_name(arg))?;
                }
                f.write_str(">")
            }
            JavaType::Array(component) => write!(f, "{}[]", component),
            JavaType::TypeVar(name) => f.write_str(name),
            JavaType::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            JavaType::Wildcard(WildcardBound::Extends(bound)) => {
                write!(f, "? extends {}", canonical_name(bound))
            }
            JavaType::Wildcard(WildcardBound::Super(bound)) => {
                write!(f, "? super {}", canonical_name(bound))
            }
        }
    }
}

/// A declared type parameter. No bounds means the implicit `java.lang.Object`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeParameter {
    pub name: String,
    pub bounds: Vec<JavaType>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), bounds: Vec::new() }
    }

    pub fn bounded(name: impl Into<String>, bounds: Vec<JavaType>) -> Self {
        Self { name: name.into(), bounds }
    }
}
