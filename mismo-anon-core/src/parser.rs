//! parser.rs - Turns raw input into a [`Document`], optionally repairing it.
//!
//! Parsing is a pluggable strategy behind the [`DocumentParser`] trait:
//!
//! * [`StrictParser`] builds the tree from quick-xml events and rejects bare
//!   `&` and stray `<` in content, which quick-xml would otherwise pass through
//!   into the output unescaped.
//! * [`RecoveringParser`] runs the strict parser, and on failure applies
//!   [`repair_markup`] and tries again. When a single stray `<` still breaks
//!   the parse, that `<` is escaped and the parse retried, a bounded number
//!   of times.
//!
//! Error messages never quote document content, not even tag or attribute
//! names; they carry byte offsets only.
//!
//! License: MIT OR APACHE 2.0

use std::borrow::Cow;
use std::fmt;

use log::debug;
use once_cell::sync::Lazy;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;

use crate::config::ParserConfig;
use crate::document::{Attribute, Document, Element, Node, XmlDeclaration};
use crate::errors::AnonymizerError;

/// Matches a character or entity reference at the start of the haystack.
static REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^&(?:#[0-9]+|#x[0-9A-Fa-f]+|[A-Za-z_:][A-Za-z0-9._:\-]*);").unwrap()
});

/// A strategy for parsing decoded document text.
pub trait DocumentParser: Send + Sync + fmt::Debug {
    fn parse(&self, input: &str) -> Result<Document, AnonymizerError>;

    /// Short identifier used in logs.
    fn name(&self) -> &'static str;
}

/// Selects the parser strategy described by `config`.
pub fn parser_for(config: &ParserConfig) -> Box<dyn DocumentParser> {
    let strict = StrictParser::new(config.max_depth);
    if config.recover {
        Box::new(RecoveringParser::new(strict))
    } else {
        Box::new(strict)
    }
}

/// Decodes raw bytes as UTF-8, dropping a leading byte order mark.
pub fn decode_input(raw: &[u8]) -> Result<&str, AnonymizerError> {
    let text = std::str::from_utf8(raw).map_err(|e| {
        AnonymizerError::malformed(format!("input is not valid UTF-8 (byte {})", e.valid_up_to()))
    })?;
    Ok(strip_bom(text))
}

pub(crate) fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// A strict-parse failure. `tag_at` is the offset of the `<` that opened the
/// offending tag, when a single tag is to blame.
#[derive(Debug)]
struct ParseFailure {
    error: AnonymizerError,
    tag_at: Option<usize>,
}

impl From<AnonymizerError> for ParseFailure {
    fn from(error: AnonymizerError) -> Self {
        Self { error, tag_at: None }
    }
}

#[derive(Debug, Clone)]
pub struct StrictParser {
    max_depth: usize,
}

impl Default for StrictParser {
    fn default() -> Self {
        Self::new(ParserConfig::default().max_depth)
    }
}

impl StrictParser {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl StrictParser {
    fn build(&self, input: &str) -> Result<Document, ParseFailure> {
        let mut reader = Reader::from_str(input);
        // Tag matching is done by the builder so failures can point at the tag.
        reader.config_mut().check_end_names = false;
        let mut builder = TreeBuilder::new(self.max_depth);

        loop {
            let tag_start = reader.buffer_position() as usize;
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    let message = describe_xml_error(&e, reader.error_position());
                    return Err(AnonymizerError::malformed(message).into());
                }
            };
            let at_tag = |error: AnonymizerError| ParseFailure {
                error,
                tag_at: tag_offset(input, tag_start),
            };
            let position = reader.buffer_position();
            match event {
                Event::Start(start) => {
                    let element = element_from(&start, false, tag_start).map_err(at_tag)?;
                    builder.open(element, tag_start)?;
                }
                Event::Empty(start) => {
                    let element = element_from(&start, true, tag_start).map_err(at_tag)?;
                    builder.empty(element, tag_start)?;
                }
                Event::End(end) => {
                    let name = utf8(end.name().into_inner(), tag_start)?;
                    builder.close(name, tag_start).map_err(at_tag)?;
                }
                Event::Text(text) => builder.text(utf8(&text, position)?, position)?,
                Event::CData(cdata) => builder.misc(Node::CData(utf8(&cdata, position)?.to_string())),
                Event::Comment(comment) => {
                    builder.misc(Node::Comment(utf8(&comment, position)?.to_string()))
                }
                Event::PI(pi) => {
                    builder.misc(Node::ProcessingInstruction(utf8(&pi, position)?.to_string()))
                }
                Event::DocType(doctype) => {
                    builder.misc(Node::DocType(utf8(&doctype, position)?.to_string()))
                }
                Event::Decl(decl) => {
                    let invalid = || {
                        AnonymizerError::malformed(format!("invalid XML declaration at byte {}", position))
                    };
                    let version = decl.version().map_err(|_| invalid())?;
                    let encoding = decl.encoding().transpose().map_err(|_| invalid())?;
                    let standalone = decl.standalone().transpose().map_err(|_| invalid())?;
                    builder.misc(Node::Declaration(XmlDeclaration {
                        version: String::from_utf8_lossy(&version).into_owned(),
                        encoding: encoding.map(|e| String::from_utf8_lossy(&e).into_owned()),
                        standalone: standalone.map(|s| String::from_utf8_lossy(&s).into_owned()),
                    }));
                }
                Event::Eof => break,
            }
        }

        builder.finish().map_err(ParseFailure::from)
    }
}

impl DocumentParser for StrictParser {
    fn parse(&self, input: &str) -> Result<Document, AnonymizerError> {
        self.build(input).map_err(|failure| failure.error)
    }

    fn name(&self) -> &'static str {
        "strict"
    }
}

/// Most stray `<` escapes attempted on one document.
const MAX_TAG_REPAIRS: usize = 32;

/// Strict parsing with escaping-repair retries.
#[derive(Debug, Clone, Default)]
pub struct RecoveringParser {
    strict: StrictParser,
}

impl RecoveringParser {
    pub fn new(strict: StrictParser) -> Self {
        Self { strict }
    }
}

impl DocumentParser for RecoveringParser {
    fn parse(&self, input: &str) -> Result<Document, AnonymizerError> {
        let first = match self.strict.build(input) {
            Ok(document) => return Ok(document),
            Err(failure) => failure,
        };
        debug!("Strict parse failed ({}); attempting escaping repairs.", first.error);

        let mut candidate = repair_markup(input).into_owned();
        let mut failure = if candidate == input {
            first
        } else {
            match self.strict.build(&candidate) {
                Ok(document) => return Ok(document),
                Err(failure) => failure,
            }
        };

        for _ in 0..MAX_TAG_REPAIRS {
            let Some(at) = failure.tag_at.filter(|&at| is_stray_tag(&candidate, at)) else {
                break;
            };
            debug!("Escaping stray '<' at byte {} and retrying.", at);
            candidate.replace_range(at..at + 1, "&lt;");
            candidate = repair_markup(&candidate).into_owned();
            failure = match self.strict.build(&candidate) {
                Ok(document) => return Ok(document),
                Err(failure) => failure,
            };
        }

        debug!("Parse still failing after repairs: {}", failure.error);
        Err(failure.error)
    }

    fn name(&self) -> &'static str {
        "recovering"
    }
}

/// Offset of the `<` that opened the tag the reader was positioned at.
fn tag_offset(input: &str, near: usize) -> Option<usize> {
    let end = (near + 1).min(input.len());
    input.as_bytes()[..end].iter().rposition(|&b| b == b'<')
}

/// Whether the tag opened at `at` may be turned into text. Tags carrying an
/// `=` are kept as markup so attribute values never escape classification.
fn is_stray_tag(input: &str, at: usize) -> bool {
    let Some(tag) = input.get(at..).filter(|rest| rest.starts_with('<')) else {
        return false;
    };
    let span = tag.find('>').map_or(tag, |end| &tag[..end]);
    !span.contains('=')
}

/// Escapes the bounded class of stray characters strict XML rejects:
///
/// * `&` that does not start a character or entity reference becomes `&amp;`
/// * `<` in text that cannot start markup becomes `&lt;`
/// * `<` inside a quoted attribute value becomes `&lt;`
///
/// Comments, CDATA sections, processing instructions and doctype declarations
/// are copied untouched. Returns `Cow::Borrowed` when nothing needed repair.
pub fn repair_markup(input: &str) -> Cow<'_, str> {
    #[derive(Clone, Copy)]
    enum State {
        Text,
        Tag,
        Quoted(u8),
    }

    let bytes = input.as_bytes();
    let mut out = String::new();
    let mut copied = 0usize;
    let mut state = State::Text;
    let mut i = 0usize;

    while i < bytes.len() {
        let b = bytes[i];
        match state {
            State::Text => match b {
                b'<' => {
                    let rest = &input[i..];
                    if rest.starts_with("<!--") {
                        i = skip_past(input, i + 4, "-->");
                        continue;
                    } else if rest.starts_with("<![CDATA[") {
                        i = skip_past(input, i + 9, "]]>");
                        continue;
                    } else if rest.starts_with("<?") {
                        i = skip_past(input, i + 2, "?>");
                        continue;
                    } else if rest.starts_with("<!") {
                        i = skip_declaration(bytes, i + 2);
                        continue;
                    } else if starts_tag(&rest[1..]) {
                        state = State::Tag;
                    } else {
                        replace_byte(input, &mut out, &mut copied, i, "&lt;");
                    }
                }
                b'&' if !is_reference_at(input, i) => replace_byte(input, &mut out, &mut copied, i, "&amp;"),
                _ => {}
            },
            State::Tag => match b {
                b'"' | b'\'' => state = State::Quoted(b),
                b'>' => state = State::Text,
                _ => {}
            },
            State::Quoted(quote) => match b {
                _ if b == quote => state = State::Tag,
                b'<' => replace_byte(input, &mut out, &mut copied, i, "&lt;"),
                b'&' if !is_reference_at(input, i) => replace_byte(input, &mut out, &mut copied, i, "&amp;"),
                _ => {}
            },
        }
        i += 1;
    }

    if copied == 0 {
        return Cow::Borrowed(input);
    }
    out.push_str(&input[copied..]);
    Cow::Owned(out)
}

/// Copies pending input up to `at`, then writes `with` in place of the byte at `at`.
fn replace_byte(input: &str, out: &mut String, copied: &mut usize, at: usize, with: &str) {
    out.push_str(&input[*copied..at]);
    out.push_str(with);
    *copied = at + 1;
}

/// Offset of the first `&` in `raw` that does not begin a reference.
pub fn find_bare_ampersand(raw: &str) -> Option<usize> {
    raw.match_indices('&')
        .map(|(i, _)| i)
        .find(|&i| !is_reference_at(raw, i))
}

fn is_reference_at(haystack: &str, at: usize) -> bool {
    REFERENCE.is_match(&haystack[at..])
}

fn skip_past(input: &str, from: usize, terminator: &str) -> usize {
    input[from.min(input.len())..]
        .find(terminator)
        .map_or(input.len(), |pos| from + pos + terminator.len())
}

/// Skips a `<!...>` declaration, honouring an internal `[...]` subset and quotes.
fn skip_declaration(bytes: &[u8], from: usize) -> usize {
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return i + 1,
                _ => {}
            },
        }
        i += 1;
    }
    bytes.len()
}

/// Whether the text following a `<` opens a start or end tag.
fn starts_tag(after_lt: &str) -> bool {
    let after_slash = after_lt.strip_prefix('/').unwrap_or(after_lt);
    after_slash.chars().next().is_some_and(is_name_start)
}

fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == ':' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    is_name_start(c) || c.is_ascii_digit() || c == '-' || c == '.'
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start) && chars.all(is_name_char)
}

fn utf8(bytes: &[u8], position: impl fmt::Display) -> Result<&str, AnonymizerError> {
    std::str::from_utf8(bytes)
        .map_err(|_| AnonymizerError::malformed(format!("invalid UTF-8 near byte {}", position)))
}

/// quick-xml's ill-formedness errors name the tags involved, so only the
/// kind of failure and its offset are kept.
fn describe_xml_error(err: &quick_xml::Error, position: impl fmt::Display) -> String {
    match err {
        quick_xml::Error::Syntax(e) => format!("{} at byte {}", e, position),
        quick_xml::Error::IllFormed(_) => format!("ill-formed markup at byte {}", position),
        _ => format!("unreadable markup at byte {}", position),
    }
}

fn element_from(
    start: &BytesStart<'_>,
    self_closing: bool,
    position: impl fmt::Display + Copy,
) -> Result<Element, AnonymizerError> {
    let name = utf8(start.name().into_inner(), position)?;
    if !is_valid_name(name) {
        return Err(AnonymizerError::malformed(format!(
            "invalid element name at byte {}",
            position
        )));
    }

    let mut element = Element::new(name);
    element.self_closing = self_closing;

    for attr in start.attributes() {
        let invalid = || {
            AnonymizerError::malformed(format!("invalid attribute in the tag at byte {}", position))
        };
        let attr = attr.map_err(|_| invalid())?;
        let key = utf8(attr.key.into_inner(), position)?;
        if !is_valid_name(key) {
            return Err(invalid());
        }
        let raw = utf8(&attr.value, position)?;
        if raw.contains('<') {
            return Err(AnonymizerError::malformed(format!(
                "unescaped '<' in an attribute value of the tag at byte {}",
                position
            )));
        }
        if find_bare_ampersand(raw).is_some() {
            return Err(AnonymizerError::malformed(format!(
                "unescaped '&' in an attribute value of the tag at byte {}",
                position
            )));
        }
        element.attributes.push(Attribute::from_raw(key, raw));
    }

    Ok(element)
}

/// Assembles the tree from a flat event stream and enforces document structure.
struct TreeBuilder {
    stack: Vec<Element>,
    prolog: Vec<Node>,
    root: Option<Element>,
    epilog: Vec<Node>,
    max_depth: usize,
}

impl TreeBuilder {
    fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            prolog: Vec::new(),
            root: None,
            epilog: Vec::new(),
            max_depth,
        }
    }

    fn check_open(&self, at: usize) -> Result<(), AnonymizerError> {
        if self.stack.is_empty() && self.root.is_some() {
            return Err(AnonymizerError::malformed(format!(
                "element at byte {} follows the root element",
                at
            )));
        }
        if self.stack.len() >= self.max_depth {
            return Err(AnonymizerError::malformed(format!(
                "element nesting exceeds the maximum depth of {}",
                self.max_depth
            )));
        }
        Ok(())
    }

    fn open(&mut self, element: Element, at: usize) -> Result<(), AnonymizerError> {
        self.check_open(at)?;
        self.stack.push(element);
        Ok(())
    }

    fn empty(&mut self, element: Element, at: usize) -> Result<(), AnonymizerError> {
        self.check_open(at)?;
        self.attach(element);
        Ok(())
    }

    fn close(&mut self, name: &str, at: usize) -> Result<(), AnonymizerError> {
        let element = match self.stack.pop() {
            Some(element) if element.name == name => element,
            Some(_) => {
                return Err(AnonymizerError::malformed(format!(
                    "closing tag at byte {} does not match the open element",
                    at
                )))
            }
            None => {
                return Err(AnonymizerError::malformed(format!(
                    "closing tag at byte {} has no matching start tag",
                    at
                )))
            }
        };
        self.attach(element);
        Ok(())
    }

    fn attach(&mut self, element: Element) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(Node::Element(element)),
            None => self.root = Some(element),
        }
    }

    fn text(&mut self, raw: &str, position: impl fmt::Display) -> Result<(), AnonymizerError> {
        if self.stack.is_empty() {
            if !raw.trim().is_empty() {
                return Err(AnonymizerError::malformed(format!(
                    "text outside the root element near byte {}",
                    position
                )));
            }
        } else if find_bare_ampersand(raw).is_some() {
            return Err(AnonymizerError::malformed(format!(
                "unescaped '&' in text near byte {}",
                position
            )));
        }
        self.misc(Node::Text(raw.to_string()));
        Ok(())
    }

    fn misc(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        } else if self.root.is_none() {
            self.prolog.push(node);
        } else {
            self.epilog.push(node);
        }
    }

    fn finish(self) -> Result<Document, AnonymizerError> {
        if !self.stack.is_empty() {
            return Err(AnonymizerError::malformed(format!(
                "document ended with {} unclosed element(s)",
                self.stack.len()
            )));
        }
        let root = self
            .root
            .ok_or_else(|| AnonymizerError::malformed("document has no root element"))?;
        Ok(Document {
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}
