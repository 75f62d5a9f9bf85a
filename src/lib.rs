//! stubsynth
//!
//! Runtime subtype synthesis for JVM test support: given a descriptor of a
//! class or interface, generate the source of a subtype whose overridable
//! methods return provider-made default values, build it through a
//! pluggable build-and-load service, and hand back an instance.
//!
//! ## Architecture
//!
//! - **types**: runtime type model, descriptors, JVM signature reader
//! - **render**: canonical type names, erasure, type parameter lists
//! - **synth**: source text synthesis of the subtype
//! - **bridge**: build-and-load boundary, plus a `javac`-backed bridge
//! - **factory**: memoizing synthesize-build-instantiate entry point
//! - **context**: call-context resolution over captured stacks
//!
//! ## Flow
//!
//! ```text
//! TypeDescriptor → SignatureSynthesizer → GeneratedUnit → BuildBridge → CompiledUnit → instance
//!                        ↓
//!                  TypeNameRenderer
//! ```

pub mod bridge;
pub mod common;
pub mod consts;
pub mod context;
pub mod factory;
pub mod render;
pub mod synth;
pub mod types;

pub use bridge::{BuildBridge, CompileRequest, CompiledUnit, JavacBridge};
pub use common::{ClassPath, Config, Error, Result};
pub use context::{StackContextResolver, StackFrame, StackSource, ThreadDump, ThreadStack};
pub use factory::{synthesize_and_instantiate, InstanceOf, StubFactory};
pub use synth::{GeneratedUnit, SignatureSynthesizer};
pub use types::{AccessFlags, JavaType, MethodDescriptor, PrimitiveType, TypeDescriptor, TypeParameter, WildcardBound};
