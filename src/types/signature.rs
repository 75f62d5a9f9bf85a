// JVMS 4.3 descriptors and 4.7.9.1 generic signatures, read into the type model
//
// Hosts that only see JVM-level metadata (class files, JNI/JVMTI method
// tables) hand these strings over; the reader turns them into JavaType values.

use super::{JavaType, PrimitiveType, TypeParameter, WildcardBound};
use crate::common::error::{Error, Result};
use crate::consts::{NESTING_MARKER, SIGNATURE_MAX_ITERS};

/// Generic signature of a class: its type parameters and supertypes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub superclass: JavaType,
    pub interfaces: Vec<JavaType>,
}

/// Method descriptor or generic method signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<JavaType>,
    pub return_type: JavaType,
    pub throws: Vec<JavaType>,
}

/// Convert an internal name (`java/util/Map$Entry`) to a binary name
pub fn binary_name(internal_name: &str) -> String {
    internal_name.replace('/', ".")
}

pub fn parse_class_signature(s: &str) -> Result<ClassSignature> {
    let mut p = Parser::new(s);
    let type_parameters = if p.peek() == Some('<') { p.parse_type_parameters()? } else { Vec::new() };
    let superclass = p.parse_class_type_signature()?;
    let mut interfaces = Vec::new();
    while p.more() {
        p.tick()?;
        interfaces.push(p.parse_class_type_signature()?);
    }
    Ok(ClassSignature { type_parameters, superclass, interfaces })
}

/// Parse a field type signature, a field descriptor, or a base type
pub fn parse_field_signature(s: &str) -> Result<JavaType> {
    let mut p = Parser::new(s);
    let ty = p.parse_field_type_signature_or_base()?;
    p.expect_eof()?;
    Ok(ty)
}

/// Parse a method descriptor (`(I)Ljava/lang/String;`) or a generic method
/// signature (`<T:Ljava/lang/Object;>(TT;)Ljava/util/List<TT;>;`)
pub fn parse_method_signature(s: &str) -> Result<MethodSignature> {
    let mut p = Parser::new(s);
    let type_parameters = if p.peek() == Some('<') { p.parse_type_parameters()? } else { Vec::new() };
    p.expect('(')?;
    let mut parameters = Vec::new();
    while p.peek() != Some(')') {
        p.tick()?;
        parameters.push(p.parse_field_type_signature_or_base()?);
    }
    p.expect(')')?;
    let return_type = if p.consume('V') { JavaType::Void } else { p.parse_field_type_signature_or_base()? };
    let mut throws = Vec::new();
    while p.consume('^') {
        p.tick()?;
        if p.peek() == Some('T') {
            throws.push(p.parse_type_variable_signature()?);
        } else {
            throws.push(p.parse_class_type_signature()?);
        }
    }
    p.expect_eof()?;
    Ok(MethodSignature { type_parameters, parameters, return_type, throws })
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    steps: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, steps: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn consume(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.next();
            true
        } else {
            false
        }
    }

    fn more(&self) -> bool {
        self.pos < self.src.len()
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::signature_error(self.src, self.pos, message)
    }

    fn unexpected(&self, expected: &str) -> Error {
        match self.peek() {
            Some(c) => self.error(format!("expected {}, found '{}'", expected, c)),
            None => self.error(format!("expected {}, found end of input", expected)),
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        if self.consume(c) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", c)))
        }
    }

    fn expect_eof(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(c) => Err(self.error(format!("trailing input starting at '{}'", c))),
        }
    }

    // Safety cap: prevent pathological loops on malformed signatures
    fn tick(&mut self) -> Result<()> {
        self.steps += 1;
        if self.steps > SIGNATURE_MAX_ITERS {
            return Err(self.error("signature too long"));
        }
        Ok(())
    }

    fn parse_identifier(&mut self) -> Result<&'a str> {
        // JVMS identifiers exclude '/', ';', '<', '>', ':', '.', '['
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '/' | ';' | '<' | '>' | ':' | '.' | '[') {
                break;
            }
            self.next();
        }
        if self.pos == start {
            return Err(self.unexpected("identifier"));
        }
        Ok(&self.src[start..self.pos])
    }

    fn parse_type_parameters(&mut self) -> Result<Vec<TypeParameter>> {
        self.expect('<')?;
        let mut params = Vec::new();
        loop {
            self.tick()?;
            if self.consume('>') {
                break;
            }
            let name = self.parse_identifier()?.to_string();
            self.expect(':')?;
            let mut bounds = Vec::new();
            // ClassBound is optional: "T::Ljava/lang/Comparable;" has interface bounds only
            if !matches!(self.peek(), Some(':') | Some('>')) {
                bounds.push(self.parse_field_type_signature()?);
            }
            while self.consume(':') {
                self.tick()?;
                bounds.push(self.parse_field_type_signature()?);
            }
            params.push(TypeParameter { name, bounds });
        }
        if params.is_empty() {
            return Err(self.error("empty type parameter list"));
        }
        Ok(params)
    }

    fn parse_field_type_signature_or_base(&mut self) -> Result<JavaType> {
        if let Some(prim) = self.peek().and_then(PrimitiveType::from_descriptor) {
            self.next();
            return Ok(JavaType::Primitive(prim));
        }
        self.parse_field_type_signature()
    }

    fn parse_field_type_signature(&mut self) -> Result<JavaType> {
        match self.peek() {
            Some('L') => self.parse_class_type_signature(),
            Some('T') => self.parse_type_variable_signature(),
            Some('[') => self.parse_array_type_signature(),
            _ => Err(self.unexpected("'L', 'T' or '['")),
        }
    }

    fn parse_type_variable_signature(&mut self) -> Result<JavaType> {
        self.expect('T')?;
        let name = self.parse_identifier()?.to_string();
        self.expect(';')?;
        Ok(JavaType::TypeVar(name))
    }

    fn parse_array_type_signature(&mut self) -> Result<JavaType> {
        self.expect('[')?;
        self.tick()?;
        Ok(JavaType::Array(Box::new(self.parse_field_type_signature_or_base()?)))
    }

    fn parse_class_type_signature(&mut self) -> Result<JavaType> {
        self.expect('L')?;
        let mut name = String::new();
        let mut args = self.parse_simple_class_type_signature(&mut name)?;
        // Inner classes are separated by '.' and nest with '$' in binary names
        while self.consume('.') {
            self.tick()?;
            name.push(NESTING_MARKER);
            args = self.parse_simple_class_type_signature(&mut name)?;
        }
        self.expect(';')?;
        Ok(if args.is_empty() {
            JavaType::Class(name)
        } else {
            JavaType::Parameterized { raw: name, args }
        })
    }

    // Appends the (package-qualified) simple name to `name`, returns its type arguments
    fn parse_simple_class_type_signature(&mut self, name: &mut String) -> Result<Vec<JavaType>> {
        name.push_str(self.parse_identifier()?);
        while self.consume('/') {
            self.tick()?;
            name.push('.');
            name.push_str(self.parse_identifier()?);
        }
        if self.peek() == Some('<') {
            self.parse_type_arguments()
        } else {
            Ok(Vec::new())
        }
    }

    fn parse_type_arguments(&mut self) -> Result<Vec<JavaType>> {
        self.expect('<')?;
        let mut args = Vec::new();
        loop {
            self.tick()?;
            let arg = match self.peek() {
                Some('*') => {
                    self.next();
                    JavaType::Wildcard(WildcardBound::Unbounded)
                }
                Some('+') => {
                    self.next();
                    JavaType::Wildcard(WildcardBound::Extends(Box::new(self.parse_field_type_signature()?)))
                }
                Some('-') => {
                    self.next();
                    JavaType::Wildcard(WildcardBound::Super(Box::new(self.parse_field_type_signature()?)))
                }
                _ => self.parse_field_type_signature()?,
            };
            args.push(arg);
            if self.consume('>') {
                break;
            }
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_descriptor() {
        let sig = parse_method_signature("(I[Ljava/lang/String;)Ljava/util/Map$Entry;").unwrap();
        assert!(sig.type_parameters.is_empty());
        assert_eq!(
            sig.parameters,
            vec![
                JavaType::Primitive(PrimitiveType::Int),
                JavaType::array_of(JavaType::class("java.lang.String")),
            ]
        );
        assert_eq!(sig.return_type, JavaType::class("java.util.Map$Entry"));
    }

    #[test]
    fn test_generic_method_signature() {
        let sig = parse_method_signature(
            "<R:Ljava/lang/Object;>(Ljava/util/function/Function<-TT;+TR;>;)Ljava/util/List<TR;>;^Ljava/io/IOException;",
        )
        .unwrap();
        assert_eq!(sig.type_parameters, vec![TypeParameter::bounded("R", vec![JavaType::object()])]);
        assert_eq!(
            sig.parameters[0],
            JavaType::parameterized(
                "java.util.function.Function",
                vec![
                    JavaType::Wildcard(WildcardBound::Super(Box::new(JavaType::type_var("T")))),
                    JavaType::Wildcard(WildcardBound::Extends(Box::new(JavaType::type_var("R")))),
                ]
            )
        );
        assert_eq!(sig.return_type, JavaType::parameterized("java.util.List", vec![JavaType::type_var("R")]));
        assert_eq!(sig.throws, vec![JavaType::class("java.io.IOException")]);
    }

    #[test]
    fn test_class_signature_with_interface_only_bounds() {
        let sig = parse_class_signature(
            "<T::Ljava/lang/Comparable<TT;>;:Ljava/io/Serializable;>Ljava/lang/Object;Ljava/util/function/Supplier<TT;>;",
        )
        .unwrap();
        assert_eq!(sig.type_parameters.len(), 1);
        assert_eq!(
            sig.type_parameters[0].bounds,
            vec![
                JavaType::parameterized("java.lang.Comparable", vec![JavaType::type_var("T")]),
                JavaType::class("java.io.Serializable"),
            ]
        );
        assert_eq!(sig.superclass, JavaType::object());
        assert_eq!(sig.interfaces.len(), 1);
    }

    #[test]
    fn test_inner_class_of_generic_owner() {
        let ty = parse_field_signature("Ljava/util/Map<TK;TV;>.Entry<TK;TV;>;").unwrap();
        assert_eq!(
            ty,
            JavaType::parameterized("java.util.Map$Entry", vec![JavaType::type_var("K"), JavaType::type_var("V")])
        );
    }

    #[test]
    fn test_multi_dimensional_array() {
        let ty = parse_field_signature("[[D").unwrap();
        assert_eq!(ty, JavaType::array_of(JavaType::array_of(JavaType::Primitive(PrimitiveType::Double))));
    }

    #[test]
    fn test_malformed_input_reports_position() {
        let input = "(ILjava/lang/String)V";
        let err = parse_method_signature(input).unwrap_err();
        match err {
            Error::Signature { position, .. } => assert_eq!(position, input.len()),
            other => panic!("unexpected error: {other}"),
        }
        assert!(parse_field_signature("Ljava/lang/String;X").is_err());
        assert!(parse_field_signature("V").is_err());
        assert!(parse_method_signature("<>()V").is_err());
    }

    #[test]
    fn test_binary_name() {
        assert_eq!(binary_name("java/util/Map$Entry"), "java.util.Map$Entry");
    }
}
