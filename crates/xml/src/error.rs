// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while producing a QReport document.
///
/// Schema-equivalence findings are not errors: they travel inside the
/// artifact so the caller can inspect what was produced. These variants
/// cover only failures to produce any document at all.
#[derive(Debug)]
pub enum XmlError {
    /// The underlying writer failed. Writing into an in-memory buffer, this
    /// indicates an escaping or encoding fault rather than an I/O fault.
    Write(quick_xml::Error),
    /// The produced bytes were not valid UTF-8.
    Encoding(std::string::FromUtf8Error),
    /// The document timestamp could not be formatted.
    Timestamp(time::error::Format),
}

impl std::fmt::Display for XmlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Write(source) => write!(f, "Failed to write XML document: {source}"),
            Self::Encoding(source) => write!(f, "Generated XML is not valid UTF-8: {source}"),
            Self::Timestamp(source) => write!(f, "Failed to format document timestamp: {source}"),
        }
    }
}

impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Write(source) => Some(source),
            Self::Encoding(source) => Some(source),
            Self::Timestamp(source) => Some(source),
        }
    }
}

impl From<quick_xml::Error> for XmlError {
    fn from(source: quick_xml::Error) -> Self {
        Self::Write(source)
    }
}

impl From<std::string::FromUtf8Error> for XmlError {
    fn from(source: std::string::FromUtf8Error) -> Self {
        Self::Encoding(source)
    }
}

impl From<time::error::Format> for XmlError {
    fn from(source: time::error::Format) -> Self {
        Self::Timestamp(source)
    }
}
