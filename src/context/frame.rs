use crate::consts::{LINE_NATIVE, UNKNOWN_SOURCE};
use std::fmt;

/// One entry of a captured call stack
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackFrame {
    /// Binary name of the declaring type, possibly carrying nesting markers
    pub declaring_type: String,
    pub method_name: String,
    pub file_name: Option<String>,
    /// Line number; negative when unknown (-1) or native (-2)
    pub line_number: i32,
}

impl StackFrame {
    pub fn new(declaring_type: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            method_name: method_name.into(),
            file_name: None,
            line_number: crate::consts::LINE_UNKNOWN,
        }
    }

    pub fn at(mut self, file_name: impl Into<String>, line_number: i32) -> Self {
        self.file_name = Some(file_name.into());
        self.line_number = line_number;
        self
    }

    pub fn is_native(&self) -> bool {
        self.line_number == LINE_NATIVE
    }

    /// `<file>:<line>`
    pub fn location(&self) -> String {
        format!("{}:{}", self.file_name.as_deref().unwrap_or(UNKNOWN_SOURCE), self.line_number)
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.declaring_type, self.method_name)?;
        match (&self.file_name, self.line_number) {
            _ if self.is_native() => f.write_str("Native Method")?,
            (Some(file), line) if line >= 0 => write!(f, "{}:{}", file, line)?,
            (Some(file), _) => f.write_str(file)?,
            (None, _) => f.write_str(UNKNOWN_SOURCE)?,
        }
        f.write_str(")")
    }
}

/// Captured stack of one thread, most recent frame first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ThreadStack {
    pub name: String,
    pub frames: Vec<StackFrame>,
}

impl ThreadStack {
    pub fn new(name: impl Into<String>, frames: Vec<StackFrame>) -> Self {
        Self { name: name.into(), frames }
    }
}
