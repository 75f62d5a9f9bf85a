//! Class and method descriptors
//!
//! Read-only views of a target type's shape, built either with the builder
//! methods or from JVM metadata (internal names, descriptors, generic
//! signatures and access flags).

use super::signature::{binary_name, parse_class_signature, parse_method_signature};
use super::{JavaType, TypeParameter};
use crate::common::classpath::ClassPath;
use crate::common::error::Result;
use crate::consts::access_flags::*;
use crate::consts::NESTING_MARKER;
use std::ops::BitOr;

/// JVM access flag word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessFlags(u16);

impl AccessFlags {
    pub const PUBLIC: AccessFlags = AccessFlags(ACC_PUBLIC);
    pub const PROTECTED: AccessFlags = AccessFlags(ACC_PROTECTED);
    pub const PRIVATE: AccessFlags = AccessFlags(ACC_PRIVATE);
    pub const STATIC: AccessFlags = AccessFlags(ACC_STATIC);
    pub const FINAL: AccessFlags = AccessFlags(ACC_FINAL);
    pub const INTERFACE: AccessFlags = AccessFlags(ACC_INTERFACE);
    pub const ABSTRACT: AccessFlags = AccessFlags(ACC_ABSTRACT);

    pub const fn from_bits(bits: u16) -> Self {
        AccessFlags(bits)
    }

    pub const fn bits(&self) -> u16 {
        self.0
    }

    pub const fn contains(&self, flag: u16) -> bool {
        self.0 & flag != 0
    }

    pub const fn is_public(&self) -> bool {
        self.contains(ACC_PUBLIC)
    }

    pub const fn is_static(&self) -> bool {
        self.contains(ACC_STATIC)
    }

    pub const fn is_final(&self) -> bool {
        self.contains(ACC_FINAL)
    }

    pub const fn is_interface(&self) -> bool {
        self.contains(ACC_INTERFACE)
    }

    pub const fn is_abstract(&self) -> bool {
        self.contains(ACC_ABSTRACT)
    }
}

impl BitOr for AccessFlags {
    type Output = AccessFlags;

    fn bitor(self, rhs: AccessFlags) -> AccessFlags {
        AccessFlags(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
}

/// Runtime handle to a class or interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    binary_name: String,
    kind: TypeKind,
    access: AccessFlags,
    type_parameters: Vec<TypeParameter>,
    methods: Vec<MethodDescriptor>,
    loader: ClassPath,
}

impl TypeDescriptor {
    /// Public class with the given binary name (`com.example.Outer$Inner`)
    pub fn class(binary_name: impl Into<String>) -> Self {
        Self::with_kind(binary_name.into(), TypeKind::Class, AccessFlags::PUBLIC)
    }

    pub fn interface(binary_name: impl Into<String>) -> Self {
        Self::with_kind(
            binary_name.into(),
            TypeKind::Interface,
            AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
        )
    }

    fn with_kind(binary_name: String, kind: TypeKind, access: AccessFlags) -> Self {
        Self {
            binary_name,
            kind,
            access,
            type_parameters: Vec::new(),
            methods: Vec::new(),
            loader: ClassPath::default(),
        }
    }

    /// Build from class-file level metadata: an internal or binary name, the
    /// class access flags and the optional generic `Signature` attribute.
    pub fn from_jvm(name: &str, access: u16, signature: Option<&str>) -> Result<Self> {
        let access = AccessFlags::from_bits(access);
        let kind = if access.is_interface() { TypeKind::Interface } else { TypeKind::Class };
        let mut descriptor = Self::with_kind(binary_name(name), kind, access);
        if let Some(signature) = signature {
            descriptor.type_parameters = parse_class_signature(signature)?.type_parameters;
        }
        Ok(descriptor)
    }

    pub fn with_type_parameter(mut self, param: TypeParameter) -> Self {
        self.type_parameters.push(param);
        self
    }

    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_methods(mut self, methods: impl IntoIterator<Item = MethodDescriptor>) -> Self {
        self.methods.extend(methods);
        self
    }

    pub fn with_access(mut self, access: AccessFlags) -> Self {
        self.access = access;
        self
    }

    /// Classpath of the loader that defined this type
    pub fn with_loader(mut self, loader: ClassPath) -> Self {
        self.loader = loader;
        self
    }

    pub fn binary_name(&self) -> &str {
        &self.binary_name
    }

    /// Package portion of the binary name, empty for the default package
    pub fn package_name(&self) -> &str {
        match self.binary_name.rfind('.') {
            Some(idx) => &self.binary_name[..idx],
            None => "",
        }
    }

    /// Name without package or enclosing types: `Inner` for `a.b.Outer$Inner`
    pub fn simple_name(&self) -> &str {
        let unqualified = match self.binary_name.rfind('.') {
            Some(idx) => &self.binary_name[idx + 1..],
            None => &self.binary_name,
        };
        match unqualified.rfind(NESTING_MARKER) {
            Some(idx) if idx > 0 && idx + 1 < unqualified.len() => &unqualified[idx + 1..],
            _ => unqualified,
        }
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn access(&self) -> AccessFlags {
        self.access
    }

    pub fn type_parameters(&self) -> &[TypeParameter] {
        &self.type_parameters
    }

    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    pub fn loader(&self) -> &ClassPath {
        &self.loader
    }
}

/// Runtime handle to one method of a target type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    name: String,
    return_type: JavaType,
    erased_return: Option<JavaType>,
    parameter_types: Vec<JavaType>,
    type_parameters: Vec<TypeParameter>,
    access: AccessFlags,
}

impl MethodDescriptor {
    /// Public instance method returning `return_type`
    pub fn new(name: impl Into<String>, return_type: JavaType) -> Self {
        Self {
            name: name.into(),
            return_type,
            erased_return: None,
            parameter_types: Vec::new(),
            type_parameters: Vec::new(),
            access: AccessFlags::PUBLIC,
        }
    }

    /// Build from a JVM method table entry: the erased descriptor, the
    /// optional generic signature and the method access flags.
    pub fn from_jvm(name: &str, descriptor: &str, signature: Option<&str>, access: u16) -> Result<Self> {
        let erased = parse_method_signature(descriptor)?;
        let generic = match signature {
            Some(signature) => parse_method_signature(signature)?,
            None => erased.clone(),
        };
        Ok(Self {
            name: name.to_string(),
            return_type: generic.return_type,
            erased_return: Some(erased.return_type),
            parameter_types: generic.parameters,
            type_parameters: generic.type_parameters,
            access: AccessFlags::from_bits(access),
        })
    }

    pub fn with_parameter(mut self, ty: JavaType) -> Self {
        self.parameter_types.push(ty);
        self
    }

    pub fn with_parameters(mut self, types: impl IntoIterator<Item = JavaType>) -> Self {
        self.parameter_types.extend(types);
        self
    }

    pub fn with_type_parameter(mut self, param: TypeParameter) -> Self {
        self.type_parameters.push(param);
        self
    }

    pub fn with_access(mut self, access: AccessFlags) -> Self {
        self.access = access;
        self
    }

    /// Record the erased return type reported by the runtime
    pub fn with_erased_return(mut self, erased: JavaType) -> Self {
        self.erased_return = Some(erased);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn return_type(&self) -> &JavaType {
        &self.return_type
    }

    /// Erased return type, when the runtime reported one
    pub fn erased_return(&self) -> Option<&JavaType> {
        self.erased_return.as_ref()
    }

    pub fn parameter_types(&self) -> &[JavaType] {
        &self.parameter_types
    }

    pub fn type_parameters(&self) -> &[TypeParameter] {
        &self.type_parameters
    }

    pub fn access(&self) -> AccessFlags {
        self.access
    }

    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }

    /// Only public, non-static, non-final methods get a generated override
    pub fn is_overridable(&self) -> bool {
        self.access.is_public() && !self.access.is_static() && !self.access.is_final()
    }
}
