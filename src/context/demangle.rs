// Recovering readable names from compiler-synthesized ones.
//
// Lambda bodies compile to methods like `lambda$should_do_y$0`; anonymous
// and async helper classes get binary names like `MyTest$should_run$1`.
// The meaningful part sits between the first and second nesting marker.

use super::frame::StackFrame;
use crate::consts::NESTING_MARKER;

/// Declaring type with any nested suffix removed: `a.MyTest$1` -> `a.MyTest`.
///
/// A marker in the first position is part of the name, not a nesting marker.
pub fn outer_type_name(binary_name: &str) -> &str {
    match binary_name.find(NESTING_MARKER) {
        Some(idx) if idx > 0 => &binary_name[..idx],
        _ => binary_name,
    }
}

/// Text between the first and second marker of `name`, to the end when there
/// is no second marker; `name` itself when it has no marker.
pub fn demangle(name: &str) -> &str {
    let Some(begin) = name.find(NESTING_MARKER) else {
        return name;
    };
    let rest = &name[begin + NESTING_MARKER.len_utf8()..];
    match rest.find(NESTING_MARKER) {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Test case name recorded by `frame`: the demangled declaring type when the
/// frame runs inside a synthesized nested type, else the demangled method.
pub fn test_case_name(frame: &StackFrame) -> &str {
    if outer_type_name(&frame.declaring_type).len() < frame.declaring_type.len() {
        demangle(&frame.declaring_type)
    } else {
        demangle(&frame.method_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demangle_literals() {
        assert_eq!(demangle("lambda$should_do_y$0"), "should_do_y");
        assert_eq!(demangle("should_do_x"), "should_do_x");
        assert_eq!(demangle("lambda$$0"), "");
        assert_eq!(demangle("access$000"), "000");
        assert_eq!(demangle("com.example.MyTest$should_async$1"), "should_async");
    }

    #[test]
    fn test_outer_type_name() {
        assert_eq!(outer_type_name("com.example.MyTest$1"), "com.example.MyTest");
        assert_eq!(outer_type_name("com.example.MyTest$Inner$2"), "com.example.MyTest");
        assert_eq!(outer_type_name("com.example.MyTest"), "com.example.MyTest");
        assert_eq!(outer_type_name("$Proxy12"), "$Proxy12");
    }

    #[test]
    fn test_case_name_prefers_nested_type() {
        let lambda = StackFrame::new("com.example.MyTest", "lambda$should_do_y$0");
        assert_eq!(test_case_name(&lambda), "should_do_y");

        let async_body = StackFrame::new("com.example.MyTest$should_run_async$1", "run");
        assert_eq!(test_case_name(&async_body), "should_run_async");

        let plain = StackFrame::new("com.example.MyTest", "should_do_x");
        assert_eq!(test_case_name(&plain), "should_do_x");
    }
}
