//! document.rs - The mutable XML tree the rewriter operates on.
//!
//! Attribute values and text are stored in their raw, already-escaped form so
//! that everything the rewriter does not touch is written back exactly as it
//! was read. Only [`Attribute::set_value`] escapes, for freshly generated
//! values.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;

use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute as XmlAttribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use crate::errors::AnonymizerError;

/// A parsed document: prolog, exactly one root element, epilog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub prolog: Vec<Node>,
    pub root: Element,
    pub epilog: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Raw (escaped) character data.
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    DocType(String),
    Declaration(XmlDeclaration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDeclaration {
    pub version: String,
    pub encoding: Option<String>,
    pub standalone: Option<String>,
}

impl Default for XmlDeclaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some("UTF-8".to_string()),
            standalone: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified tag name, prefix included.
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
    /// Written as `<TAG/>` rather than `<TAG></TAG>`.
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    raw_value: String,
}

impl Attribute {
    /// Builds an attribute from an already-escaped value.
    pub fn from_raw(name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_value: raw_value.into(),
        }
    }

    pub fn raw_value(&self) -> &str {
        &self.raw_value
    }

    /// Replaces the value, escaping markup characters.
    pub fn set_value(&mut self, value: &str) {
        self.raw_value = escape(value).into_owned();
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Child elements, skipping text and other node kinds.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Depth-first, pre-order iteration over this element and its descendants.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(element) = stack.pop() {
            out.push(element);
            let children: Vec<&Element> = element.child_elements().collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }
}

impl Document {
    /// Whether the prolog carries an `<?xml ...?>` declaration.
    pub fn has_declaration(&self) -> bool {
        self.prolog.iter().any(|n| matches!(n, Node::Declaration(_)))
    }

    /// Serializes the tree. When `ensure_declaration` is set and the prolog has
    /// no declaration, a UTF-8 declaration is written first.
    pub fn to_xml_bytes(&self, ensure_declaration: bool) -> Result<Vec<u8>, AnonymizerError> {
        let mut writer = Writer::new(Vec::new());

        if ensure_declaration && !self.has_declaration() {
            write_node(&mut writer, &Node::Declaration(XmlDeclaration::default()))?;
            writer
                .get_mut()
                .push(b'\n');
        }
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.epilog {
            write_node(&mut writer, node)?;
        }

        Ok(writer.into_inner())
    }

    pub fn to_xml_string(&self, ensure_declaration: bool) -> Result<String, AnonymizerError> {
        let bytes = self.to_xml_bytes(ensure_declaration)?;
        String::from_utf8(bytes).map_err(|e| AnonymizerError::Serialization(e.to_string()))
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), AnonymizerError> {
    writer
        .write_event(event)
        .map_err(|e| AnonymizerError::Serialization(e.to_string()))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), AnonymizerError> {
    match node {
        Node::Element(element) => write_element(writer, element),
        Node::Text(raw) => emit(writer, Event::Text(BytesText::from_escaped(raw.as_str()))),
        Node::CData(content) => emit(writer, Event::CData(BytesCData::new(content.as_str()))),
        Node::Comment(raw) => emit(writer, Event::Comment(BytesText::from_escaped(raw.as_str()))),
        Node::ProcessingInstruction(raw) => emit(writer, Event::PI(BytesPI::new(raw.as_str()))),
        Node::DocType(raw) => emit(writer, Event::DocType(BytesText::from_escaped(raw.as_str()))),
        Node::Declaration(decl) => emit(
            writer,
            Event::Decl(BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            )),
        ),
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), AnonymizerError> {
    let mut start = BytesStart::new(element.name.as_str());
    for attr in &element.attributes {
        // Values read from single-quoted attributes may hold a literal `"`.
        let value: Cow<'_, str> = if attr.raw_value.contains('"') {
            Cow::Owned(attr.raw_value.replace('"', "&quot;"))
        } else {
            Cow::Borrowed(attr.raw_value.as_str())
        };
        start.push_attribute(XmlAttribute {
            key: QName(attr.name.as_bytes()),
            value: match value {
                Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                Cow::Owned(s) => Cow::Owned(s.into_bytes()),
            },
        });
    }

    if element.self_closing && element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_escapes_markup() {
        let mut attr = Attribute::from_raw("_StreetAddress", "1 Main");
        attr.set_value("12 A & B <Ave>");
        assert_eq!(attr.raw_value(), "12 A &amp; B &lt;Ave&gt;");
    }

    #[test]
    fn test_serialize_self_closing_and_nested() {
        let mut child = Element::new("_CREDITOR");
        child.attributes.push(Attribute::from_raw("_Name", "ABC &amp; Co"));
        child.self_closing = true;
        let mut root = Element::new("RESPONSE");
        root.children.push(Node::Element(child));
        let doc = Document {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        };
        assert_eq!(
            doc.to_xml_string(false).unwrap(),
            r#"<RESPONSE><_CREDITOR _Name="ABC &amp; Co"/></RESPONSE>"#
        );
    }

    #[test]
    fn test_declaration_added_only_when_missing() {
        let doc = Document {
            prolog: Vec::new(),
            root: Element::new("A"),
            epilog: Vec::new(),
        };
        let out = doc.to_xml_string(true).unwrap();
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(out.ends_with("<A></A>"));
    }

    #[test]
    fn test_double_quote_in_raw_value_is_escaped_on_write() {
        let mut root = Element::new("A");
        root.attributes.push(Attribute::from_raw("note", r#"say "hi""#));
        root.self_closing = true;
        let doc = Document {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        };
        assert_eq!(doc.to_xml_string(false).unwrap(), r#"<A note="say &quot;hi&quot;"/>"#);
    }

    #[test]
    fn test_descendants_pre_order() {
        let mut b = Element::new("B");
        b.children.push(Node::Element(Element::new("C")));
        let mut a = Element::new("A");
        a.children.push(Node::Element(b));
        a.children.push(Node::Text("\n".to_string()));
        a.children.push(Node::Element(Element::new("D")));
        let names: Vec<&str> = a.descendants().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C", "D"]);
    }
}
