// Naming and rendering constants shared by the renderer and the synthesizer

// Suffix appended to the target's simple name to form the synthesized type name
pub const IMPL_SUFFIX: &str = "$SynthImpl";

// Marker the JVM uses inside binary names of nested, anonymous and lambda-synthesized members
pub const NESTING_MARKER: char = '$';
// Separator valid in source text for member access and nested type references
pub const MEMBER_SEPARATOR: char = '.';

pub const ARRAY_SUFFIX: &str = "[]";
// Joins multiple bounds of one type parameter at its declaration site
pub const BOUND_CONJUNCTION: &str = " & ";

pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";

// Default-value provider referenced by generated stub bodies
pub const DEFAULT_VALUE_PROVIDER: &str = "stubsynth.runtime.DefaultValues";
pub const DEFAULT_VALUE_PROVIDER_METHOD: &str = "newInstance";

// Options handed to the build service unless configured otherwise
pub const DEFAULT_COMPILER_OPTIONS: &[&str] = &["-Xlint:unchecked"];

pub const DEFAULT_JAVAC: &str = "javac";

// Environment overrides read by Config::from_env
pub const ENV_JAVAC: &str = "STUBSYNTH_JAVAC";
pub const ENV_VALUE_PROVIDER: &str = "STUBSYNTH_VALUE_PROVIDER";
pub const ENV_CLASSPATH: &str = "STUBSYNTH_CLASSPATH";

// Signature reader: upper bound on loop iterations over a single signature
pub const SIGNATURE_MAX_ITERS: usize = 200_000;
// Erasure: maximum type-variable indirections followed before giving up on Object
pub const ERASURE_MAX_DEPTH: usize = 64;

// Declaring types whose frames belong to the stack capture mechanism itself
pub const STACK_CAPTURE_TYPES: &[&str] = &["java.lang.Thread"];

// File name reported for frames without source information
pub const UNKNOWN_SOURCE: &str = "Unknown Source";
pub const LINE_UNKNOWN: i32 = -1;
pub const LINE_NATIVE: i32 = -2;

// First four bytes of every class file
pub const CLASS_FILE_MAGIC: [u8; 4] = [0xCA, 0xFE, 0xBA, 0xBE];

// JVM access flags (JVMS 4.1, 4.6)
pub mod access_flags {
    pub const ACC_PUBLIC: u16 = 0x0001;
    pub const ACC_PRIVATE: u16 = 0x0002;
    pub const ACC_PROTECTED: u16 = 0x0004;
    pub const ACC_STATIC: u16 = 0x0008;
    pub const ACC_FINAL: u16 = 0x0010;
    pub const ACC_SYNCHRONIZED: u16 = 0x0020;
    pub const ACC_BRIDGE: u16 = 0x0040;
    pub const ACC_VARARGS: u16 = 0x0080;
    pub const ACC_NATIVE: u16 = 0x0100;
    pub const ACC_INTERFACE: u16 = 0x0200;
    pub const ACC_ABSTRACT: u16 = 0x0400;
    pub const ACC_STRICT: u16 = 0x0800;
    pub const ACC_SYNTHETIC: u16 = 0x1000;
}
