//! Element-oriented XML writing.
//!
//! Frequencies are persisted through the small [`ElementSink`] interface so
//! the model does not depend on a particular writer. [`XmlElementWriter`] is
//! the quick-xml backed implementation used by the collector.

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::SinkError;

/// Destination for nested, text-valued XML elements.
pub trait ElementSink {
    /// Open a new element.
    fn start_element(&mut self, name: &str) -> Result<(), SinkError>;

    /// Write a complete element containing only text.
    fn write_element(&mut self, name: &str, text: &str) -> Result<(), SinkError>;

    /// Close the most recently opened element.
    fn end_element(&mut self) -> Result<(), SinkError>;

    /// Name of what is being written to, used in error reports.
    fn target(&self) -> &str;
}

/// [`ElementSink`] over a `quick_xml::Writer`.
pub struct XmlElementWriter<W: Write> {
    writer: Writer<W>,
    open: Vec<String>,
    target: String,
}

impl<W: Write> XmlElementWriter<W> {
    /// Create a writer with two-space indentation.
    pub fn new(inner: W, target: impl Into<String>) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
            open: Vec::new(),
            target: target.into(),
        }
    }

    /// Emit the `<?xml ...?>` declaration.
    pub fn write_declaration(&mut self) -> Result<(), SinkError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(|e| SinkError::io(e.to_string()))
    }

    /// Number of elements opened but not yet closed.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Finish writing and return the underlying stream.
    ///
    /// Fails if any element is still open.
    pub fn finish(self) -> Result<W, SinkError> {
        if let Some(name) = self.open.last() {
            return Err(SinkError::format(format!("element <{}> was never closed", name)));
        }
        Ok(self.writer.into_inner())
    }
}

fn check_name(name: &str) -> Result<(), SinkError> {
    let valid = name
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(SinkError::format(format!("invalid element name {:?}", name)))
    }
}

impl<W: Write> ElementSink for XmlElementWriter<W> {
    fn start_element(&mut self, name: &str) -> Result<(), SinkError> {
        check_name(name)?;
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(|e| SinkError::io(e.to_string()))?;
        self.open.push(name.to_string());
        Ok(())
    }

    fn write_element(&mut self, name: &str, text: &str) -> Result<(), SinkError> {
        check_name(name)?;
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .and_then(|_| self.writer.write_event(Event::Text(BytesText::new(text))))
            .and_then(|_| self.writer.write_event(Event::End(BytesEnd::new(name))))
            .map_err(|e| SinkError::io(e.to_string()))
    }

    fn end_element(&mut self) -> Result<(), SinkError> {
        let name = self
            .open
            .pop()
            .ok_or_else(|| SinkError::format("end_element without an open element"))?;
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(|e| SinkError::io(e.to_string()))
    }

    fn target(&self) -> &str {
        &self.target
    }
}
