//! Throwable values: message, cause chain, suppressed list and stack frames
//!
//! A [`Throwable`] owns its cause, so the chain is finite by construction.
//! Walkers still cap traversal at `RuntimeConfig::cause_chain_limit` links.
//!
//! Frames are captured with `#[track_caller]`: the frame recorded is the
//! source location that constructed the throwable (or last called
//! [`Throwable::fill_in_stack_trace`]).

use crate::config::RuntimeConfig;
use crate::error::{Error, Result};
use crate::identity::{string_hash, Identity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::panic::Location;
use tracing::warn;

/// Line number marking a native frame
pub const NATIVE_LINE: i32 = -2;

/// One frame of a captured stack trace
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackTraceElement {
    declaring_class: String,
    method_name: String,
    file_name: Option<String>,
    line_number: i32,
}

impl StackTraceElement {
    /// Build a frame; a negative `line_number` means unknown, [`NATIVE_LINE`] means native
    pub fn new(
        declaring_class: impl Into<String>,
        method_name: impl Into<String>,
        file_name: Option<String>,
        line_number: i32,
    ) -> Self {
        StackTraceElement {
            declaring_class: declaring_class.into(),
            method_name: method_name.into(),
            file_name,
            line_number,
        }
    }

    fn from_location(location: &Location<'_>, method: &str) -> Self {
        let file = location.file();
        let module = file
            .trim_end_matches(".rs")
            .replace(['/', '\\'], "::");
        let short_file = file.rsplit(['/', '\\']).next().unwrap_or(file);
        StackTraceElement::new(
            module,
            method,
            Some(short_file.to_string()),
            i32::try_from(location.line()).unwrap_or(i32::MAX),
        )
    }

    /// Owning type or module of the frame
    pub fn get_class_name(&self) -> &str {
        &self.declaring_class
    }

    /// Method of the frame
    pub fn get_method_name(&self) -> &str {
        &self.method_name
    }

    /// Source file, if known
    pub fn get_file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Source line; negative when unknown
    pub fn get_line_number(&self) -> i32 {
        self.line_number
    }

    /// True when the frame is native
    pub fn is_native_method(&self) -> bool {
        self.line_number == NATIVE_LINE
    }
}

impl Identity for StackTraceElement {
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn hash_code(&self) -> i32 {
        let mut h = string_hash(&self.declaring_class)
            .wrapping_mul(31)
            .wrapping_add(string_hash(&self.method_name));
        h = h
            .wrapping_mul(31)
            .wrapping_add(self.file_name.as_deref().map_or(0, string_hash));
        h.wrapping_mul(31).wrapping_add(self.line_number)
    }
}

impl fmt::Display for StackTraceElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_class, self.method_name)?;
        match (&self.file_name, self.line_number) {
            _ if self.is_native_method() => f.write_str("(Native Method)"),
            (Some(file), line) if line >= 0 => write!(f, "({}:{})", file, line),
            (Some(file), _) => write!(f, "({})", file),
            (None, _) => f.write_str("(Unknown Source)"),
        }
    }
}

/// Error value with an owned cause chain, suppressed list and frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Throwable {
    kind: String,
    message: Option<String>,
    cause: Option<Box<Throwable>>,
    suppressed: Vec<Throwable>,
    stack_trace: Vec<StackTraceElement>,
}

impl Throwable {
    /// New throwable of `kind` with a message; captures the caller frame
    #[track_caller]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::build(kind.into(), Some(message.into()), None, Location::caller())
    }

    /// New throwable without a message
    #[track_caller]
    pub fn without_message(kind: impl Into<String>) -> Self {
        Self::build(kind.into(), None, None, Location::caller())
    }

    /// New throwable with a message and a cause
    #[track_caller]
    pub fn with_cause(kind: impl Into<String>, message: impl Into<String>, cause: Throwable) -> Self {
        Self::build(
            kind.into(),
            Some(message.into()),
            Some(Box::new(cause)),
            Location::caller(),
        )
    }

    /// New throwable whose message is the cause's text form
    #[track_caller]
    pub fn from_cause(kind: impl Into<String>, cause: Throwable) -> Self {
        let message = cause.to_string();
        Self::build(kind.into(), Some(message), Some(Box::new(cause)), Location::caller())
    }

    fn build(
        kind: String,
        message: Option<String>,
        cause: Option<Box<Throwable>>,
        location: &Location<'_>,
    ) -> Self {
        Throwable {
            kind,
            message,
            cause,
            suppressed: Vec::new(),
            stack_trace: vec![StackTraceElement::from_location(location, "<init>")],
        }
    }

    /// Kind name, e.g. `ArithmeticError`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The detail message
    pub fn get_message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The detail message (no localization is performed)
    pub fn get_localized_message(&self) -> Option<&str> {
        self.get_message()
    }

    /// The direct cause
    pub fn get_cause(&self) -> Option<&Throwable> {
        self.cause.as_deref()
    }

    /// Set the cause once.
    ///
    /// # Errors
    ///
    /// Returns `Error::IllegalState` if a cause is already set.
    pub fn init_cause(&mut self, cause: Throwable) -> Result<&mut Self> {
        if self.cause.is_some() {
            return Err(Error::illegal_state("Can't overwrite cause"));
        }
        self.cause = Some(Box::new(cause));
        Ok(self)
    }

    /// Append a suppressed throwable
    pub fn add_suppressed(&mut self, suppressed: Throwable) {
        self.suppressed.push(suppressed);
    }

    /// Suppressed throwables in insertion order
    pub fn get_suppressed(&self) -> &[Throwable] {
        &self.suppressed
    }

    /// Captured frames, top first
    pub fn get_stack_trace(&self) -> &[StackTraceElement] {
        &self.stack_trace
    }

    /// Replace the frames, keeping at most `stack_frame_limit` of them
    pub fn set_stack_trace(&mut self, mut frames: Vec<StackTraceElement>) {
        let limit = RuntimeConfig::global().stack_frame_limit;
        if frames.len() > limit {
            warn!(
                target: "valuekit::throwable",
                frames = frames.len(),
                limit,
                "stack trace truncated"
            );
            frames.truncate(limit);
        }
        self.stack_trace = frames;
    }

    /// Re-capture the frame at the caller's location
    #[track_caller]
    pub fn fill_in_stack_trace(&mut self) -> &mut Self {
        self.stack_trace = vec![StackTraceElement::from_location(
            Location::caller(),
            "fill_in_stack_trace",
        )];
        self
    }

    /// Walk the cause chain (excluding `self`), bounded by `cause_chain_limit`
    pub fn causes(&self) -> Causes<'_> {
        Causes {
            next: self.get_cause(),
            remaining: RuntimeConfig::global().cause_chain_limit,
        }
    }

    /// Deepest reachable cause, or `self` when there is none
    pub fn root_cause(&self) -> &Throwable {
        self.causes().last().unwrap_or(self)
    }

    /// Write the trace, suppressed entries and cause chain to `out`
    ///
    /// # Errors
    ///
    /// Returns any error raised by `out`.
    pub fn print_stack_trace_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.write_entry(out, "", "")?;
        for cause in self.causes() {
            cause.write_entry(out, "Caused by: ", "")?;
        }
        Ok(())
    }

    /// Write the trace to standard error
    pub fn print_stack_trace(&self) {
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        if let Err(e) = self.print_stack_trace_to(&mut handle) {
            warn!(target: "valuekit::throwable", error = %e, "failed to print stack trace");
        }
    }

    /// The trace as produced by [`Throwable::print_stack_trace_to`]
    pub fn stack_trace_string(&self) -> String {
        let mut buf = Vec::new();
        // writing to a Vec cannot fail
        let _ = self.print_stack_trace_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn write_entry<W: Write>(&self, out: &mut W, caption: &str, indent: &str) -> io::Result<()> {
        writeln!(out, "{}{}{}", indent, caption, self)?;
        for frame in &self.stack_trace {
            writeln!(out, "{}\tat {}", indent, frame)?;
        }
        let nested = format!("{}\t", indent);
        for suppressed in &self.suppressed {
            suppressed.write_entry(out, "Suppressed: ", &nested)?;
            for cause in suppressed.causes() {
                cause.write_entry(out, "Caused by: ", &nested)?;
            }
        }
        Ok(())
    }
}

/// Bounded iterator over a cause chain
pub struct Causes<'a> {
    next: Option<&'a Throwable>,
    remaining: usize,
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a Throwable;

    fn next(&mut self) -> Option<&'a Throwable> {
        let current = self.next?;
        if self.remaining == 0 {
            warn!(
                target: "valuekit::throwable",
                kind = %current.kind,
                "cause chain truncated"
            );
            self.next = None;
            return None;
        }
        self.remaining -= 1;
        self.next = current.get_cause();
        Some(current)
    }
}

impl fmt::Display for Throwable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.kind, message),
            None => f.write_str(&self.kind),
        }
    }
}

impl std::error::Error for Throwable {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn std::error::Error + 'static))
    }
}

impl From<&Error> for Throwable {
    #[track_caller]
    fn from(err: &Error) -> Self {
        Throwable::new(err.kind_name(), err.to_string())
    }
}

impl From<Error> for Throwable {
    #[track_caller]
    fn from(err: Error) -> Self {
        Throwable::new(err.kind_name(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(depth: usize) -> Throwable {
        let mut t = Throwable::new("E", "0");
        for i in 1..depth {
            t = Throwable::with_cause("E", i.to_string(), t);
        }
        t
    }

    #[test]
    fn test_display_kind_and_message() {
        assert_eq!(Throwable::new("IoError", "closed").to_string(), "IoError: closed");
        assert_eq!(Throwable::without_message("IoError").to_string(), "IoError");
    }

    #[test]
    fn test_captures_constructing_frame() {
        let line = line!() + 1;
        let t = Throwable::new("E", "m");
        let frame = &t.get_stack_trace()[0];
        assert_eq!(frame.get_line_number() as u32, line);
        assert_eq!(frame.get_file_name(), Some("throwable.rs"));
        assert_eq!(frame.get_method_name(), "<init>");
        assert!(frame.get_class_name().ends_with("throwable"));
    }

    #[test]
    fn test_init_cause_once() {
        let mut t = Throwable::new("Outer", "o");
        t.init_cause(Throwable::new("Inner", "i")).unwrap();
        assert_eq!(t.get_cause().unwrap().kind(), "Inner");

        let err = t.init_cause(Throwable::new("Other", "x")).unwrap_err();
        assert!(err.is_illegal_state());
        assert_eq!(err.to_string(), "Can't overwrite cause");
        assert_eq!(t.get_cause().unwrap().kind(), "Inner");
    }

    #[test]
    fn test_constructor_cause_blocks_init_cause() {
        let mut t = Throwable::with_cause("Outer", "o", Throwable::new("Inner", "i"));
        assert!(t.init_cause(Throwable::new("X", "x")).is_err());
    }

    #[test]
    fn test_from_cause_uses_cause_text() {
        let t = Throwable::from_cause("Wrapper", Throwable::new("Inner", "boom"));
        assert_eq!(t.get_message(), Some("Inner: boom"));
    }

    #[test]
    fn test_suppressed_append_only_order() {
        let mut t = Throwable::new("Primary", "p");
        t.add_suppressed(Throwable::new("S1", "a"));
        t.add_suppressed(Throwable::new("S2", "b"));
        let kinds: Vec<&str> = t.get_suppressed().iter().map(|s| s.kind()).collect();
        assert_eq!(kinds, vec!["S1", "S2"]);
    }

    #[test]
    fn test_causes_walk_in_order() {
        let t = chain(4);
        let messages: Vec<&str> = t.causes().filter_map(|c| c.get_message()).collect();
        assert_eq!(messages, vec!["2", "1", "0"]);
        assert_eq!(t.root_cause().get_message(), Some("0"));
    }

    #[test]
    fn test_causes_walk_is_bounded() {
        let limit = RuntimeConfig::global().cause_chain_limit;
        let t = chain(limit + 10);
        assert_eq!(t.causes().count(), limit);
    }

    #[test]
    fn test_fill_in_stack_trace_recaptures() {
        let mut t = Throwable::new("E", "m");
        let before = t.get_stack_trace()[0].get_line_number();
        t.fill_in_stack_trace();
        let after = &t.get_stack_trace()[0];
        assert_ne!(after.get_line_number(), before);
        assert_eq!(after.get_method_name(), "fill_in_stack_trace");
    }

    #[test]
    fn test_set_stack_trace() {
        let mut t = Throwable::new("E", "m");
        let frames = vec![
            StackTraceElement::new("app::Main", "run", Some("main.rs".into()), 10),
            StackTraceElement::new("app::Main", "main", Some("main.rs".into()), 3),
        ];
        t.set_stack_trace(frames.clone());
        assert_eq!(t.get_stack_trace(), frames.as_slice());
    }

    #[test]
    fn test_print_stack_trace_layout() {
        let mut t = Throwable::with_cause("Outer", "o", Throwable::new("Inner", "i"));
        t.set_stack_trace(vec![StackTraceElement::new("a::B", "c", Some("b.rs".into()), 7)]);
        t.add_suppressed(Throwable::without_message("Quiet"));
        let text = t.stack_trace_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Outer: o");
        assert_eq!(lines[1], "\tat a::B.c(b.rs:7)");
        assert_eq!(lines[2], "\tSuppressed: Quiet");
        assert!(text.contains("Caused by: Inner: i"));
    }

    #[test]
    fn test_stack_trace_element_display() {
        let frame = StackTraceElement::new("a::B", "c", Some("b.rs".into()), 7);
        assert_eq!(frame.to_string(), "a::B.c(b.rs:7)");
        let native = StackTraceElement::new("a::B", "c", None, NATIVE_LINE);
        assert!(native.is_native_method());
        assert_eq!(native.to_string(), "a::B.c(Native Method)");
        let unknown = StackTraceElement::new("a::B", "c", None, -1);
        assert_eq!(unknown.to_string(), "a::B.c(Unknown Source)");
        let no_line = StackTraceElement::new("a::B", "c", Some("b.rs".into()), -1);
        assert_eq!(no_line.to_string(), "a::B.c(b.rs)");
    }

    #[test]
    fn test_stack_trace_element_identity() {
        let a = StackTraceElement::new("a::B", "c", Some("b.rs".into()), 7);
        let b = StackTraceElement::new("a::B", "c", Some("b.rs".into()), 7);
        assert!(a.equals(&b));
        assert_eq!(a.hash_code(), b.hash_code());
    }

    #[test]
    fn test_from_error() {
        let t = Throwable::from(&Error::arithmetic("/ by zero"));
        assert_eq!(t.kind(), "ArithmeticError");
        assert_eq!(t.to_string(), "ArithmeticError: / by zero");
    }

    #[test]
    fn test_error_source_follows_cause() {
        use std::error::Error as _;
        let t = Throwable::with_cause("Outer", "o", Throwable::new("Inner", "i"));
        assert_eq!(t.source().unwrap().to_string(), "Inner: i");
    }
}
