// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Thin element-oriented wrapper over the `quick-xml` event writer.
//!
//! Callers think in elements, not events, and text content is escaped on the
//! way through. Indentation is fixed at two spaces so generated documents are
//! byte-stable across runs.

use crate::error::XmlError;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

/// An indenting XML writer backed by an in-memory buffer.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Creates a writer and emits the XML declaration.
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration cannot be written.
    pub fn new() -> Result<Self, XmlError> {
        let mut inner: Writer<Vec<u8>> = Writer::new_with_indent(Vec::new(), b' ', 2);
        inner.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(Self { inner })
    }

    /// Opens an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be written.
    pub fn start_element(&mut self, name: &str) -> Result<(), XmlError> {
        self.inner.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    /// Opens an element carrying attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be written.
    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<(), XmlError> {
        let mut start: BytesStart<'_> = BytesStart::new(name);
        for (key, value) in attrs {
            start.push_attribute((*key, *value));
        }
        self.inner.write_event(Event::Start(start))?;
        Ok(())
    }

    /// Writes `<name>text</name>` with the text escaped.
    ///
    /// # Errors
    ///
    /// Returns an error if any event cannot be written.
    pub fn text_element(&mut self, name: &str, text: &str) -> Result<(), XmlError> {
        self.inner.write_event(Event::Start(BytesStart::new(name)))?;
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Closes an element.
    ///
    /// # Errors
    ///
    /// Returns an error if the event cannot be written.
    pub fn end_element(&mut self, name: &str) -> Result<(), XmlError> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Finishes the document and returns it as a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is not valid UTF-8.
    pub fn into_string(self) -> Result<String, XmlError> {
        let mut text: String = String::from_utf8(self.inner.into_inner())?;
        text.push('\n');
        Ok(text)
    }
}
