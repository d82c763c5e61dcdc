//! Output sinks for `__PRINT__`
//!
//! The interpreter never writes to stdout directly. Each printed value is
//! handed to an [`OutputSink`]:
//! - [`CapturedOutput`]: Records values in memory with their source location
//! - [`WriterOutput`]: Writes one value per line to any [`Write`]r
//!
//! Values emitted before a runtime error stay in the sink.

use crate::memory::value::Value;
use crate::parser::ast::SourceLocation;
use std::io::{self, Write};

/// Destination for printed values
pub trait OutputSink {
    fn emit(&mut self, value: &Value, location: SourceLocation) -> io::Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn emit(&mut self, value: &Value, location: SourceLocation) -> io::Result<()> {
        (**self).emit(value, location)
    }
}

/// In-memory sink
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub lines: Vec<PrintedValue>,
}

/// A printed value with the location of the `__PRINT__` that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintedValue {
    pub value: Value,
    pub location: SourceLocation,
}

impl CapturedOutput {
    pub fn new() -> Self {
        CapturedOutput { lines: Vec::new() }
    }

    /// Printed values in order
    pub fn values(&self) -> Vec<Value> {
        self.lines.iter().map(|line| line.value).collect()
    }

    /// Printed values as they would appear on a terminal
    pub fn get_output(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.value.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl OutputSink for CapturedOutput {
    fn emit(&mut self, value: &Value, location: SourceLocation) -> io::Result<()> {
        self.lines.push(PrintedValue {
            value: *value,
            location,
        });
        Ok(())
    }
}

/// Sink writing each value on its own line
#[derive(Debug)]
pub struct WriterOutput<W: Write> {
    writer: W,
}

impl<W: Write> WriterOutput<W> {
    pub fn new(writer: W) -> Self {
        WriterOutput { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriterOutput<W> {
    fn emit(&mut self, value: &Value, _location: SourceLocation) -> io::Result<()> {
        writeln!(self.writer, "{}", value)?;
        self.writer.flush()
    }
}
