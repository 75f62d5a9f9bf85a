//! Subtype source synthesis
//!
//! Emits the source text of a class that extends (or implements) a target
//! type and overrides every overridable method with a body returning a
//! value from the configured default-value provider. Pure text assembly:
//! nothing here can fail, problems only surface when the unit is built.

use crate::common::config::Config;
use crate::render::{canonical_name, erasure, type_parameters, BoundMode, TypeScope};
use crate::types::{JavaType, MethodDescriptor, TypeDescriptor};
use std::collections::HashSet;

/// Source text of a synthesized subtype plus its naming metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Package shared with the target, empty for the default package
    pub package: String,
    /// Simple name of the target followed by the configured suffix
    pub type_name: String,
    pub source: String,
}

impl GeneratedUnit {
    /// Binary name under which the unit is compiled and loaded
    pub fn qualified_name(&self) -> String {
        if self.package.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}.{}", self.package, self.type_name)
        }
    }
}

/// Synthesized type name for `target`: simple name followed by `suffix`
pub fn synthesized_name(target: &TypeDescriptor, suffix: &str) -> String {
    format!("{}{}", target.simple_name(), suffix)
}

pub struct SignatureSynthesizer {
    impl_suffix: String,
    value_provider: String,
    value_provider_method: String,
}

impl SignatureSynthesizer {
    pub fn new(config: &Config) -> Self {
        Self {
            impl_suffix: config.impl_suffix.clone(),
            value_provider: config.value_provider.clone(),
            value_provider_method: config.value_provider_method.clone(),
        }
    }

    pub fn synthesize(&self, target: &TypeDescriptor) -> GeneratedUnit {
        log::debug!(
            "synthesizing subtype of {} ({} methods)",
            target.binary_name(),
            target.methods().len()
        );
        let type_name = synthesized_name(target, &self.impl_suffix);
        let mut w = SourceWriter::new();

        if !target.package_name().is_empty() {
            w.writeln(&format!("package {};", target.package_name()));
            w.newline();
        }

        let mut header = format!("public class {}", type_name);
        header.push_str(&type_parameters(target.type_parameters(), BoundMode::Declaration));
        header.push_str(if target.is_interface() { " implements " } else { " extends " });
        header.push_str(&canonical_name(&JavaType::Class(target.binary_name().to_string())));
        header.push_str(&type_parameters(target.type_parameters(), BoundMode::Reference));
        header.push_str(" {");
        w.writeln(&header);
        w.indent();

        let mut emitted: HashSet<(String, Vec<JavaType>)> = HashSet::new();
        for method in target.methods().iter().filter(|m| m.is_overridable()) {
            let scope = TypeScope::new(method.type_parameters(), target.type_parameters());
            let erased_params: Vec<JavaType> = method.parameter_types().iter().map(|p| erasure(p, &scope)).collect();
            if !emitted.insert((method.name().to_string(), erased_params)) {
                log::warn!(
                    "skipping {}.{}: same erased signature as an earlier method",
                    target.binary_name(),
                    method.name()
                );
                continue;
            }
            self.write_method(&mut w, method, &scope);
        }

        w.dedent();
        w.writeln("}");

        let unit = GeneratedUnit {
            package: target.package_name().to_string(),
            type_name,
            source: w.finish(),
        };
        log::trace!("generated source for {}:\n{}", unit.qualified_name(), unit.source);
        unit
    }

    fn write_method(&self, w: &mut SourceWriter, method: &MethodDescriptor, scope: &TypeScope<'_>) {
        let mut signature = String::from("public ");
        let own_params = type_parameters(method.type_parameters(), BoundMode::Declaration);
        if !own_params.is_empty() {
            signature.push_str(&own_params);
            signature.push(' ');
        }
        let return_type = canonical_name(method.return_type());
        signature.push_str(&return_type);
        signature.push(' ');
        signature.push_str(method.name());
        signature.push('(');
        let params: Vec<String> = method
            .parameter_types()
            .iter()
            .enumerate()
            .map(|(i, ty)| format!("{} p{}", canonical_name(ty), i))
            .collect();
        signature.push_str(&params.join(", "));
        signature.push_str(") {");
        w.writeln(&signature);

        if !method.returns_void() {
            let erased = match method.erased_return() {
                Some(erased) => erased.clone(),
                None => erasure(method.return_type(), scope),
            };
            w.indent();
            w.writeln(&format!(
                "return ({}) {}.{}({}.class);",
                return_type,
                self.value_provider,
                self.value_provider_method,
                canonical_name(&erased)
            ));
            w.dedent();
        }
        w.writeln("}");
    }
}

/// Indentation-aware text buffer
struct SourceWriter {
    indent_level: usize,
    output: String,
}

impl SourceWriter {
    fn new() -> Self {
        Self { indent_level: 0, output: String::new() }
    }

    fn indent(&mut self) {
        self.indent_level += 4;
    }

    fn dedent(&mut self) {
        if self.indent_level >= 4 {
            self.indent_level -= 4;
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push(' ');
        }
    }

    fn writeln(&mut self, s: &str) {
        self.write_indent();
        self.output.push_str(s);
        self.output.push('\n');
    }

    fn newline(&mut self) {
        self.output.push('\n');
    }

    fn finish(self) -> String {
        self.output
    }
}
