//! Call-context resolution
//!
//! Answers three questions from captured stacks: which real method a stub
//! was called from, which test case is running, and where the caller of an
//! invoker sits in source.
//!
//! Positions are counted from the first frame past the leading run of
//! capture-mechanism frames and declared utility frames, then a declared
//! number of intermediate frames is skipped. Capture types only count in
//! that leading run: a `Thread.run` further down is ordinary caller code.
//! Debug builds assert that the selected frame is not a declared utility.
//!
//! None of the queries fail: a missing frame yields an empty string.

pub mod demangle;
pub mod dump;
pub mod frame;

pub use dump::ThreadDump;
pub use frame::{StackFrame, ThreadStack};

use crate::consts::STACK_CAPTURE_TYPES;
use demangle::{outer_type_name, test_case_name};

/// Provider of captured stacks, most recent frame first
pub trait StackSource {
    /// Frames of the calling thread
    fn current_thread(&self) -> Vec<StackFrame>;

    /// Frames of every live thread. Order is unspecified and the snapshot
    /// may already be stale when it is read.
    fn all_threads(&self) -> Vec<ThreadStack>;
}

impl<S: StackSource + ?Sized> StackSource for &S {
    fn current_thread(&self) -> Vec<StackFrame> {
        (**self).current_thread()
    }

    fn all_threads(&self) -> Vec<ThreadStack> {
        (**self).all_threads()
    }
}

pub struct StackContextResolver<S> {
    source: S,
    utility_types: Vec<String>,
    source_method_skip: usize,
    caller_skip: usize,
}

impl<S: StackSource> StackContextResolver<S> {
    /// Resolver that skips one stub frame to find the source method and one
    /// invoker frame to find the caller location
    pub fn new(source: S) -> Self {
        Self {
            source,
            utility_types: Vec::new(),
            source_method_skip: 1,
            caller_skip: 1,
        }
    }

    /// Declare a type whose frames belong to the resolver's own call chain
    pub fn with_utility_type(mut self, binary_name: impl Into<String>) -> Self {
        self.utility_types.push(binary_name.into());
        self
    }

    /// Frames between the first caller frame and the source method
    pub fn with_source_method_skip(mut self, skip: usize) -> Self {
        self.source_method_skip = skip;
        self
    }

    /// Frames between the first caller frame and the caller to report
    pub fn with_caller_skip(mut self, skip: usize) -> Self {
        self.caller_skip = skip;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Name of the method that invoked the stub currently executing
    pub fn current_source_method_name(&self) -> String {
        let frames = self.source.current_thread();
        self.caller_frame(&frames, self.source_method_skip)
            .map(|f| f.method_name.clone())
            .unwrap_or_default()
    }

    /// Name of the running test case of `test_class`, or `""`.
    ///
    /// Best effort: see [`find_test_case`](Self::find_test_case).
    pub fn current_test_case_name(&self, test_class: &str) -> String {
        self.find_test_case(test_class).unwrap_or_default()
    }

    /// Search the calling thread, then every live thread, for the outermost
    /// frame of `test_class`.
    ///
    /// The other threads are visited in whatever order the source reports
    /// them, and their stacks may have moved on since capture; the first
    /// match found wins.
    pub fn find_test_case(&self, test_class: &str) -> Option<String> {
        if let Some(name) = first_test_frame(&self.source.current_thread(), test_class) {
            return Some(name);
        }
        log::trace!("test case of {} not on current thread, scanning all threads", test_class);
        self.source
            .all_threads()
            .iter()
            .find_map(|thread| first_test_frame(&thread.frames, test_class))
    }

    /// `<file>:<line>` of the caller of the invoker that called this query
    pub fn previous_stack_location(&self) -> String {
        let frames = self.source.current_thread();
        self.caller_frame(&frames, self.caller_skip)
            .map(StackFrame::location)
            .unwrap_or_default()
    }

    fn is_capture(frame: &StackFrame) -> bool {
        STACK_CAPTURE_TYPES.contains(&frame.declaring_type.as_str())
    }

    fn is_utility(&self, frame: &StackFrame) -> bool {
        let outer = outer_type_name(&frame.declaring_type);
        self.utility_types.iter().any(|t| t == outer || *t == frame.declaring_type)
    }

    fn caller_frame<'f>(&self, frames: &'f [StackFrame], skip: usize) -> Option<&'f StackFrame> {
        let first_caller = frames.iter().position(|f| !Self::is_capture(f) && !self.is_utility(f))?;
        let frame = frames.get(first_caller + skip)?;
        debug_assert!(
            !self.is_utility(frame),
            "frame {} belongs to the resolver's own call chain; skip count is wrong",
            frame
        );
        Some(frame)
    }
}

// Oldest matching frame wins: the test method sits below any helpers it calls
fn first_test_frame(frames: &[StackFrame], test_class: &str) -> Option<String> {
    frames
        .iter()
        .rev()
        .find(|f| outer_type_name(&f.declaring_type) == test_class)
        .map(|f| test_case_name(f).to_string())
        .filter(|name| !name.is_empty())
}
