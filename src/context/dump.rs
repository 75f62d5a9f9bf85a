//! Thread dump reader
//!
//! Parses `jstack` output and `printStackTrace` text into per-thread
//! stacks so a captured dump can serve as a [`StackSource`].

use super::frame::{StackFrame, ThreadStack};
use super::StackSource;
use crate::common::error::{Error, Result};
use crate::consts::{LINE_NATIVE, LINE_UNKNOWN, UNKNOWN_SOURCE};

/// Stacks of every thread in a dump, in dump order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadDump {
    threads: Vec<ThreadStack>,
    current: usize,
}

impl ThreadDump {
    pub fn new(threads: Vec<ThreadStack>) -> Self {
        Self { threads, current: 0 }
    }

    /// Parse dump text.
    ///
    /// Frames that appear before any thread header belong to an unnamed
    /// thread. Frames of `Caused by:` sections are not part of the thread's
    /// stack and are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut threads: Vec<ThreadStack> = Vec::new();
        let mut in_cause = false;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if let Some(name) = thread_header(raw) {
                threads.push(ThreadStack::new(name, Vec::new()));
                in_cause = false;
            } else if line.starts_with("Caused by:") || line.starts_with("Suppressed:") {
                in_cause = true;
            } else if let Some(frame_text) = line.strip_prefix("at ") {
                if in_cause {
                    continue;
                }
                let frame = parse_frame(frame_text).map_err(|msg| Error::thread_dump_error(idx + 1, msg))?;
                if threads.is_empty() {
                    threads.push(ThreadStack::default());
                }
                if let Some(thread) = threads.last_mut() {
                    thread.frames.push(frame);
                }
            }
            // state lines, lock annotations, "... n more" and banners carry no frames
        }

        log::debug!("thread dump: parsed {} thread(s)", threads.len());
        Ok(Self::new(threads))
    }

    /// Treat the named thread as the calling thread; unknown names are ignored
    pub fn with_current_thread(mut self, name: &str) -> Self {
        if let Some(idx) = self.threads.iter().position(|t| t.name == name) {
            self.current = idx;
        }
        self
    }

    pub fn threads(&self) -> &[ThreadStack] {
        &self.threads
    }

    pub fn thread(&self, name: &str) -> Option<&ThreadStack> {
        self.threads.iter().find(|t| t.name == name)
    }
}

impl StackSource for ThreadDump {
    fn current_thread(&self) -> Vec<StackFrame> {
        self.threads.get(self.current).map(|t| t.frames.clone()).unwrap_or_default()
    }

    fn all_threads(&self) -> Vec<ThreadStack> {
        self.threads.clone()
    }
}

// `"main" #1 prio=5 ...` or `Exception in thread "main" java.lang...`
fn thread_header(raw: &str) -> Option<String> {
    let rest = raw
        .strip_prefix('"')
        .or_else(|| raw.trim_start().strip_prefix("Exception in thread \""))?;
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

/// `[loader/][module@version/]pkg.Type.method(File.java:42)`
fn parse_frame(text: &str) -> std::result::Result<StackFrame, String> {
    let open = text.find('(').ok_or_else(|| format!("missing location in frame '{}'", text))?;
    let close = text[open..]
        .find(')')
        .map(|i| open + i)
        .ok_or_else(|| format!("unterminated location in frame '{}'", text))?;
    let qualified = &text[..open];
    let (type_part, method_name) = qualified
        .rsplit_once('.')
        .ok_or_else(|| format!("missing method name in frame '{}'", text))?;
    if method_name.is_empty() {
        return Err(format!("missing method name in frame '{}'", text));
    }

    let mut frame = StackFrame::new(strip_module_prefix(type_part), method_name);
    let location = &text[open + 1..close];
    match location {
        "Native Method" => frame.line_number = LINE_NATIVE,
        UNKNOWN_SOURCE => frame.line_number = LINE_UNKNOWN,
        _ => match location.rsplit_once(':') {
            Some((file, line)) if line.chars().all(|c| c.is_ascii_digit()) && !line.is_empty() => {
                if file != UNKNOWN_SOURCE {
                    frame.file_name = Some(file.to_string());
                }
                frame.line_number = line.parse().map_err(|_| format!("line number out of range in frame '{}'", text))?;
            }
            _ => frame.file_name = Some(location.to_string()),
        },
    }
    Ok(frame)
}

// Hidden classes keep their `/0x...` suffix; loader and module prefixes go.
fn strip_module_prefix(type_part: &str) -> &str {
    let mut start = 0;
    let mut offset = 0;
    for segment in type_part.split('/') {
        if !segment.starts_with("0x") && !segment.is_empty() {
            start = offset;
        }
        offset += segment.len() + 1;
    }
    &type_part[start..]
}
