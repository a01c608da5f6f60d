//! Pull-parser front end: turns `quick-xml` events into an [`Element`] tree.

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::document::{Declaration, Document};
use crate::element::{Attribute, Element, Node};
use crate::error::{DocError, DocResult};

/// Incremental tree builder fed by reader events.
#[derive(Default)]
struct Builder {
    stack: Vec<Element>,
    root: Option<Element>,
    prolog: Vec<String>,
    /// Character data seen since the last markup event. Entity references
    /// arrive as separate events, so text is joined here before it is kept.
    pending: String,
}

impl Builder {
    fn open(&mut self, element: Element) {
        self.flush_text(false);
        self.stack.push(element);
    }

    fn close(&mut self) -> DocResult<()> {
        let sole_content = self.stack.last().is_some_and(|e| e.children.is_empty());
        self.flush_text(sole_content);
        let element = self
            .stack
            .pop()
            .ok_or_else(|| DocError::Malformed("end tag without matching start tag".into()))?;
        self.attach(element)
    }

    fn leaf(&mut self, element: Element) -> DocResult<()> {
        self.flush_text(false);
        self.attach(element)
    }

    fn attach(&mut self, element: Element) -> DocResult<()> {
        match self.stack.last_mut() {
            Some(parent) => parent.push_child(element),
            None if self.root.is_some() => {
                return Err(DocError::Malformed(format!(
                    "second root element <{}>",
                    element.name
                )))
            }
            None => self.root = Some(element),
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> DocResult<()> {
        if self.stack.is_empty() {
            if text.trim().is_empty() {
                return Ok(());
            }
            return Err(DocError::Malformed("text outside the root element".into()));
        }
        self.pending.push_str(text);
        Ok(())
    }

    /// Keep pending text unless it is only whitespace between siblings.
    /// `sole_content` marks text that is the whole body of its element,
    /// which is kept even when blank.
    fn flush_text(&mut self, sole_content: bool) {
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending);
        if !sole_content && text.trim().is_empty() {
            return;
        }
        if let Some(parent) = self.stack.last_mut() {
            parent.push_child(Node::Text(text));
        }
    }

    fn node(&mut self, node: Node) {
        self.flush_text(false);
        match self.stack.last_mut() {
            Some(parent) => parent.push_child(node),
            None => {
                if let (Node::Comment(c), None) = (&node, &self.root) {
                    self.prolog.push(c.clone());
                }
            }
        }
    }

    fn finish(self, declaration: Option<Declaration>) -> DocResult<Document> {
        if let Some(open) = self.stack.last() {
            return Err(DocError::Malformed(format!("unclosed element <{}>", open.name)));
        }
        let root = self
            .root
            .ok_or_else(|| DocError::Malformed("no root element".into()))?;
        Ok(Document {
            declaration,
            prolog: self.prolog,
            root,
        })
    }
}

/// Parse a complete document from text.
pub(crate) fn parse(text: &str) -> DocResult<Document> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut builder = Builder::default();
    let mut declaration = None;

    loop {
        let event = reader.read_event().map_err(|e| DocError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        match event {
            Event::Decl(decl) => {
                let version = decl
                    .version()
                    .map(|v| String::from_utf8_lossy(&v).into_owned())
                    .unwrap_or_else(|_| "1.0".to_string());
                let standalone = decl
                    .standalone()
                    .and_then(|r| r.ok())
                    .map(|v| String::from_utf8_lossy(&v).into_owned());
                declaration = Some(Declaration {
                    version,
                    standalone,
                });
            }
            Event::Start(start) => builder.open(element_from(&start)?),
            Event::Empty(start) => builder.leaf(element_from(&start)?)?,
            Event::End(_) => builder.close()?,
            Event::Text(t) => builder.text(&unescaped(&t)?)?,
            Event::GeneralRef(r) => {
                let name = utf8(&r)?;
                builder.text(&unescaped(format!("&{name};").as_bytes())?)?;
            }
            Event::CData(c) => builder.node(Node::CData(utf8(&c)?.to_string())),
            Event::Comment(c) => builder.node(Node::Comment(utf8(&c)?.to_string())),
            Event::Eof => break,
            _ => {}
        }
    }

    builder.finish(declaration)
}

fn element_from(start: &BytesStart<'_>) -> DocResult<Element> {
    let mut element = Element::new(utf8(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DocError::Malformed(e.to_string()))?;
        let key = utf8(attr.key.as_ref())?;
        let value = unescaped(&attr.value)?;
        element.attributes.push(Attribute::new(key, value));
    }
    Ok(element)
}

fn utf8(bytes: &[u8]) -> DocResult<&str> {
    std::str::from_utf8(bytes).map_err(|e| DocError::Encoding(e.to_string()))
}

fn unescaped(bytes: &[u8]) -> DocResult<String> {
    let raw = utf8(bytes)?;
    unescape(raw)
        .map(|s| s.into_owned())
        .map_err(|e| DocError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declaration_and_prolog() {
        let doc = parse(
            r#"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<!--This file represents the results of running a test suite-->
<test-results name="a.dll" total="1" />"#,
        )
        .unwrap();
        let decl = doc.declaration.unwrap();
        assert_eq!(decl.version, "1.0");
        assert_eq!(decl.standalone.as_deref(), Some("no"));
        assert_eq!(
            doc.prolog,
            vec!["This file represents the results of running a test suite".to_string()]
        );
        assert_eq!(doc.root.attr("total"), Some("1"));
    }

    #[test]
    fn drops_inter_element_whitespace() {
        let doc = parse("<a>\n  <b />\n  <c />\n</a>").unwrap();
        assert_eq!(doc.root.children.len(), 2);
    }

    #[test]
    fn blank_element_body_is_kept() {
        let doc = parse("<Output>\n  <StdOut>   </StdOut>\n  <StdErr />\n</Output>").unwrap();
        assert_eq!(doc.root.children.len(), 2);
        let stdout = doc.root.find_child("StdOut").unwrap();
        assert_eq!(stdout.children, vec![Node::Text("   ".into())]);
        assert!(doc.root.find_child("StdErr").unwrap().children.is_empty());
    }

    #[test]
    fn keeps_text_and_resolves_entities() {
        let doc = parse("<m>a &amp; b &lt;c&gt; &#65;</m>").unwrap();
        assert_eq!(doc.root.children, vec![Node::Text("a & b <c> A".into())]);
    }

    #[test]
    fn whitespace_between_entities_is_kept() {
        let doc = parse("<m>&lt; &gt;</m>").unwrap();
        assert_eq!(doc.root.text(), "< >");
    }

    #[test]
    fn attribute_values_are_unescaped() {
        let doc = parse(r#"<a v="x &quot;y&quot; &amp; z" />"#).unwrap();
        assert_eq!(doc.root.attr("v"), Some(r#"x "y" & z"#));
    }

    #[test]
    fn keeps_cdata_and_comments() {
        let doc = parse("<a><!-- note --><![CDATA[<raw>]]></a>").unwrap();
        assert_eq!(
            doc.root.children,
            vec![Node::Comment(" note ".into()), Node::CData("<raw>".into())]
        );
    }

    #[test]
    fn rejects_mismatched_tags() {
        let err = parse("<a><b></a>").unwrap_err();
        assert!(matches!(err, DocError::Xml { .. } | DocError::Malformed(_)));
    }

    #[test]
    fn rejects_two_roots() {
        let err = parse("<a /><b />").unwrap_err();
        assert!(matches!(err, DocError::Malformed(_) | DocError::Xml { .. }));
    }

    #[test]
    fn rejects_empty_input() {
        let err = parse("   ").unwrap_err();
        assert!(matches!(err, DocError::Malformed(_)));
    }

    #[test]
    fn rejects_unclosed_root() {
        let err = parse("<a><b />").unwrap_err();
        assert!(matches!(err, DocError::Malformed(_) | DocError::Xml { .. }));
    }
}
