//! Whole documents: declaration, prolog and the single root element.

use std::path::Path;

use tracing::debug;

use crate::element::Element;
use crate::error::{DocError, DocResult};
use crate::reader;
use crate::writer::{self, WriteOptions};

/// The `<?xml ...?>` declaration of a parsed document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Declaration {
    pub version: String,
    /// `standalone` pseudo-attribute, written back only when present.
    pub standalone: Option<String>,
}

/// A parsed XML document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub declaration: Option<Declaration>,
    /// Comments that precede the root element.
    pub prolog: Vec<String>,
    pub root: Element,
}

impl Document {
    /// Wrap a root element into a document without declaration or prolog.
    pub fn new(root: Element) -> Self {
        Self {
            declaration: None,
            prolog: Vec::new(),
            root,
        }
    }

    /// Parse a document from text.
    pub fn parse(text: &str) -> DocResult<Self> {
        reader::parse(text)
    }

    /// Parse a document from raw bytes (UTF-8, optional BOM).
    pub fn from_bytes(bytes: &[u8]) -> DocResult<Self> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let text = std::str::from_utf8(bytes).map_err(|e| DocError::Encoding(e.to_string()))?;
        reader::parse(text)
    }

    /// Read and parse a document from disk.
    pub fn load(path: &Path) -> DocResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| DocError::io(path, e))?;
        let doc = Self::from_bytes(&bytes)?;
        debug!(
            path = %path.display(),
            root = %doc.root.name,
            elements = doc.root.element_count(),
            "document loaded"
        );
        Ok(doc)
    }

    /// Serialize the document to a string.
    pub fn to_xml_string(&self, options: &WriteOptions) -> String {
        writer::write_document(self, options)
    }

    /// Serialize the document and write it to disk.
    pub fn save(&self, path: &Path, options: &WriteOptions) -> DocResult<()> {
        let text = self.to_xml_string(options);
        std::fs::write(path, text).map_err(|e| DocError::io(path, e))?;
        debug!(path = %path.display(), "document saved");
        Ok(())
    }

    /// First element named `name` in document order, searching from the root.
    pub fn find_first(&self, name: &str) -> Option<&Element> {
        self.root.descendants().into_iter().find(|e| e.name == name)
    }

    /// Mutable counterpart of [`Document::find_first`].
    pub fn find_first_mut(&mut self, name: &str) -> Option<&mut Element> {
        find_first_mut(&mut self.root, name)
    }
}

fn find_first_mut<'a>(element: &'a mut Element, name: &str) -> Option<&'a mut Element> {
    if element.name == name {
        return Some(element);
    }
    element
        .children
        .iter_mut()
        .filter_map(|n| n.as_element_mut())
        .find_map(|child| find_first_mut(child, name))
}
