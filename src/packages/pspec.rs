// src/packages/pspec.rs

//! pspec.xml metadata reader
//!
//! A pspec file describes one package. Only two values are needed here:
//!
//! ```xml
//! <PISI>
//!     <Source>
//!         <Description>Text shown in listings</Description>
//!     </Source>
//!     <History>
//!         <Update release="5">...</Update>  <!-- latest -->
//!         <Update release="4">...</Update>
//!     </History>
//! </PISI>
//! ```
//!
//! Files are re-read on every call; nothing is cached.

use super::traits::Release;
use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Read the trimmed `Source/Description` text of a pspec file
pub fn read_description(path: &Path) -> Result<String> {
    let fields = PspecFields::parse_file(path)?;

    if !fields.has_source {
        return Err(malformed(path, "missing <Source> section"));
    }
    fields
        .description
        .map(|text| text.trim().to_string())
        .ok_or_else(|| malformed(path, "missing <Description> in <Source>"))
}

/// Read the release of the latest `History/Update` entry of a pspec file
pub fn read_release(path: &Path) -> Result<Release> {
    let fields = PspecFields::parse_file(path)?;

    if !fields.has_history {
        return Err(malformed(path, "missing <History> section"));
    }
    let latest = fields
        .latest_update
        .ok_or_else(|| malformed(path, "missing <Update> in <History>"))?;
    let value = latest
        .ok_or_else(|| malformed(path, "latest <Update> has no release attribute"))?;

    let release = value.parse().map_err(|_| Error::InvalidReleaseFormat {
        path: path.to_path_buf(),
        value: value.clone(),
    })?;

    debug!("{}: release {}", path.display(), release);
    Ok(release)
}

fn malformed(path: &Path, reason: &str) -> Error {
    Error::MalformedMetadata {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

/// Values collected in a single pass over a pspec document
#[derive(Debug, Default)]
struct PspecFields {
    has_source: bool,
    has_history: bool,
    /// Text of the first `Source/Description`
    description: Option<String>,
    /// `None` when no `Update` was seen, `Some(None)` when the first
    /// `Update` carries no release attribute
    latest_update: Option<Option<String>>,
}

impl PspecFields {
    fn parse_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::InvalidData => malformed(path, "file is not valid UTF-8"),
            _ => Error::Io(e),
        })?;
        Self::parse(&content).map_err(|reason| malformed(path, &reason))
    }

    /// Walk the document keeping the stack of open element names
    ///
    /// Only direct children of the root count: `<Source>` and `<History>`
    /// at depth 1, `<Description>` and `<Update>` at depth 2.
    fn parse(xml_content: &str) -> std::result::Result<Self, String> {
        let mut reader = Reader::from_str(xml_content);
        reader.trim_text(true);

        let mut fields = Self::default();
        let mut stack: Vec<Vec<u8>> = Vec::new();
        let mut buf = Vec::new();
        let mut description_text: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    fields.visit_element(&stack, &e);
                    if fields.description.is_none() && is_description(&stack, &e) {
                        description_text = Some(String::new());
                    }
                    stack.push(e.name().as_ref().to_vec());
                }
                Ok(Event::Empty(e)) => {
                    fields.visit_element(&stack, &e);
                    if fields.description.is_none() && is_description(&stack, &e) {
                        fields.description = Some(String::new());
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(text) = description_text.as_mut() {
                        let unescaped = e
                            .unescape()
                            .map_err(|e| format!("invalid description text: {}", e))?;
                        text.push_str(&unescaped);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(text) = description_text.as_mut() {
                        text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                    if stack.len() == 2 && description_text.is_some() {
                        fields.description = description_text.take();
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(format!("XML error: {}", e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(fields)
    }

    fn visit_element(&mut self, stack: &[Vec<u8>], e: &BytesStart<'_>) {
        let name = e.name();
        match (stack.len(), name.as_ref()) {
            (1, b"Source") => self.has_source = true,
            (1, b"History") => self.has_history = true,
            (2, b"Update") if stack[1] == b"History" && self.latest_update.is_none() => {
                let release = e
                    .attributes()
                    .filter_map(|a| a.ok())
                    .find(|attr| attr.key.as_ref() == b"release")
                    .map(|attr| String::from_utf8_lossy(&attr.value).trim().to_string());
                self.latest_update = Some(release);
            }
            _ => {}
        }
    }
}

fn is_description(stack: &[Vec<u8>], e: &BytesStart<'_>) -> bool {
    stack.len() == 2 && stack[1] == b"Source" && e.name().as_ref() == b"Description"
}
