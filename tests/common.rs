// Common test utilities
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use stubsynth::{
    BuildBridge, ClassPath, CompileRequest, CompiledUnit, JavaType, MethodDescriptor, PrimitiveType, StackFrame,
    StackSource, ThreadStack, TypeDescriptor, TypeParameter,
};

pub fn init_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

/// What the fake bridge saw for one compile call
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub unit_name: String,
    pub source: String,
    pub parent: ClassPath,
    pub options: Vec<String>,
    pub ignore_warnings: bool,
}

/// Build bridge that defines each unit name at most once, like a class loader
#[derive(Default)]
pub struct FakeBridge {
    pub compile_error: Mutex<Option<String>>,
    pub instance_error: Option<String>,
    pub delay: Duration,
    compiles: AtomicUsize,
    defined: Mutex<HashSet<String>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_compile(message: &str) -> Self {
        let bridge = Self::default();
        *bridge.compile_error.lock().unwrap() = Some(message.to_string());
        bridge
    }

    pub fn failing_instances(message: &str) -> Self {
        Self { instance_error: Some(message.to_string()), ..Self::default() }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn compiles(&self) -> usize {
        self.compiles.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub struct FakeUnit {
    name: String,
    generation: usize,
    instance_error: Option<String>,
    created: AtomicUsize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeInstance {
    pub type_name: String,
    pub generation: usize,
    pub serial: usize,
}

impl BuildBridge for FakeBridge {
    type Unit = FakeUnit;

    fn compile(&self, request: &CompileRequest<'_>) -> anyhow::Result<FakeUnit> {
        let generation = self.compiles.fetch_add(1, Ordering::SeqCst) + 1;
        std::thread::sleep(self.delay);
        self.requests.lock().unwrap().push(RecordedRequest {
            unit_name: request.unit_name.to_string(),
            source: request.source.to_string(),
            parent: request.parent.clone(),
            options: request.options.to_vec(),
            ignore_warnings: request.ignore_warnings,
        });
        if let Some(message) = self.compile_error.lock().unwrap().clone() {
            anyhow::bail!("{}", message);
        }
        if !self.defined.lock().unwrap().insert(request.unit_name.to_string()) {
            anyhow::bail!("duplicate class definition: {}", request.unit_name);
        }
        Ok(FakeUnit {
            name: request.unit_name.to_string(),
            generation,
            instance_error: self.instance_error.clone(),
            created: AtomicUsize::new(0),
        })
    }
}

impl CompiledUnit for FakeUnit {
    type Instance = FakeInstance;

    fn name(&self) -> &str {
        &self.name
    }

    fn new_instance(&self) -> anyhow::Result<FakeInstance> {
        if let Some(message) = &self.instance_error {
            anyhow::bail!("{}", message);
        }
        Ok(FakeInstance {
            type_name: self.name.clone(),
            generation: self.generation,
            serial: self.created.fetch_add(1, Ordering::SeqCst),
        })
    }
}

/// Stack source with fixed snapshots
pub struct FixedStacks {
    pub current: Vec<StackFrame>,
    pub others: Vec<ThreadStack>,
}

impl FixedStacks {
    pub fn current_only(frames: Vec<StackFrame>) -> Self {
        Self { current: frames, others: Vec::new() }
    }
}

impl StackSource for FixedStacks {
    fn current_thread(&self) -> Vec<StackFrame> {
        self.current.clone()
    }

    fn all_threads(&self) -> Vec<ThreadStack> {
        let mut threads = vec![ThreadStack::new("main", self.current.clone())];
        threads.extend(self.others.iter().cloned());
        threads
    }
}

/// `interface com.example.Greeter { void greet(String); int count(); }`
pub fn greeter() -> TypeDescriptor {
    TypeDescriptor::interface("com.example.Greeter")
        .with_method(MethodDescriptor::new("greet", JavaType::Void).with_parameter(JavaType::class("java.lang.String")))
        .with_method(MethodDescriptor::new("count", JavaType::Primitive(PrimitiveType::Int)))
}

/// `abstract class com.example.Repository<T extends Comparable<T> & Serializable>`
pub fn repository() -> TypeDescriptor {
    TypeDescriptor::class("com.example.Repository")
        .with_type_parameter(TypeParameter::bounded(
            "T",
            vec![
                JavaType::parameterized("java.lang.Comparable", vec![JavaType::type_var("T")]),
                JavaType::class("java.io.Serializable"),
            ],
        ))
        .with_method(MethodDescriptor::new("find", JavaType::type_var("T")).with_parameter(JavaType::Primitive(PrimitiveType::Long)))
        .with_method(
            MethodDescriptor::new("all", JavaType::parameterized("java.util.List", vec![JavaType::type_var("T")])),
        )
        .with_method(MethodDescriptor::new("save", JavaType::Void).with_parameter(JavaType::type_var("T")))
}
