//! Serialization back to XML text.
//!
//! The output follows the conventions of the .NET `XmlWriter` default
//! settings that produced the original reports: a UTF-8 declaration, no
//! whitespace between nodes, double-quoted attributes and `<tag />` for
//! childless elements.

use std::borrow::Cow;

use quick_xml::escape::partial_escape;

use crate::document::Document;
use crate::element::{Element, Node};

/// Formatting knobs for the writer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Indent nested elements by this many spaces. `None` writes compact XML.
    pub indent: Option<usize>,
}

impl WriteOptions {
    pub fn compact() -> Self {
        Self::default()
    }

    pub fn indented(width: usize) -> Self {
        Self {
            indent: Some(width),
        }
    }
}

pub(crate) fn write_document(doc: &Document, options: &WriteOptions) -> String {
    let mut out = String::new();
    out.push_str(r#"<?xml version="1.0" encoding="utf-8""#);
    if let Some(standalone) = doc.declaration.as_ref().and_then(|d| d.standalone.as_deref()) {
        out.push_str(r#" standalone=""#);
        out.push_str(&escape_attr(standalone));
        out.push('"');
    }
    out.push_str("?>");
    for comment in &doc.prolog {
        newline(&mut out, options, 0);
        push_comment(&mut out, comment);
    }
    newline(&mut out, options, 0);
    write_element(&mut out, &doc.root, options, 0);
    out
}

fn write_element(out: &mut String, element: &Element, options: &WriteOptions, depth: usize) {
    out.push('<');
    out.push_str(&element.name);
    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.name);
        out.push_str("=\"");
        out.push_str(&escape_attr(&attr.value));
        out.push('"');
    }
    if element.children.is_empty() {
        out.push_str(" />");
        return;
    }
    out.push('>');

    // Indenting mixed content would change the text, so only element-only
    // content is laid out on separate lines.
    let layout = options.indent.is_some()
        && element
            .children
            .iter()
            .all(|n| matches!(n, Node::Element(_) | Node::Comment(_)));

    for child in &element.children {
        if layout {
            newline(out, options, depth + 1);
        }
        match child {
            Node::Element(e) => write_element(out, e, options, depth + 1),
            Node::Text(t) => out.push_str(&partial_escape(t.as_str())),
            Node::CData(c) => {
                out.push_str("<![CDATA[");
                out.push_str(c);
                out.push_str("]]>");
            }
            Node::Comment(c) => push_comment(out, c),
        }
    }
    if layout {
        newline(out, options, depth);
    }
    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

fn push_comment(out: &mut String, comment: &str) {
    out.push_str("<!--");
    out.push_str(comment);
    out.push_str("-->");
}

fn newline(out: &mut String, options: &WriteOptions, depth: usize) {
    if let Some(width) = options.indent {
        out.push('\n');
        out.extend(std::iter::repeat(' ').take(width * depth));
    }
}

fn escape_attr(value: &str) -> Cow<'_, str> {
    let escaped = partial_escape(value);
    if !escaped.contains(['"', '\n', '\r', '\t']) {
        return escaped;
    }
    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            '\t' => out.push_str("&#x9;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}
