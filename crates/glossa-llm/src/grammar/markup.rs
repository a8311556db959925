//! Minimal XML-like element tree used by the tool invocation grammar
//!
//! [`MarkupWriter`] emits one element per line and keeps a stack of open tags
//! so nesting is always balanced. [`parse_element`] is a strict reader: it
//! rejects mismatched or unclosed tags, stray `<` and unknown entities, which
//! is what lets the invocation parser fail loudly on malformed replies.

use thiserror::Error;

/// Deepest element nesting the reader accepts
pub const MAX_DEPTH: usize = 64;

/// Escape text content for inclusion between tags
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    out
}

/// Turn an arbitrary key into a usable tag name
///
/// Characters that cannot appear in a name become `_`; a name that would
/// start with a digit or punctuation gets a leading `_`.
pub fn sanitize_tag(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if is_name_char(c) { c } else { '_' })
        .collect();

    if !out.starts_with(is_name_start) {
        out.insert(0, '_');
    }
    out
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Line-oriented builder for well-formed markup
#[derive(Debug, Default)]
pub struct MarkupWriter {
    out: String,
    open: Vec<String>,
}

impl MarkupWriter {
    /// Create an empty writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line of free text (escaped) outside any element
    pub fn line(&mut self, text: &str) -> &mut Self {
        self.out.push_str(&escape_text(text));
        self.out.push('\n');
        self
    }

    /// Open an element; it stays open until [`Self::close`]
    pub fn open(&mut self, tag: &str) -> &mut Self {
        let tag = sanitize_tag(tag);
        self.out.push('<');
        self.out.push_str(&tag);
        self.out.push_str(">\n");
        self.open.push(tag);
        self
    }

    /// Close the most recently opened element
    pub fn close(&mut self) -> &mut Self {
        if let Some(tag) = self.open.pop() {
            self.out.push_str("</");
            self.out.push_str(&tag);
            self.out.push_str(">\n");
        }
        self
    }

    /// Write a complete element holding escaped text
    pub fn leaf(&mut self, tag: &str, text: &str) -> &mut Self {
        let tag = sanitize_tag(tag);
        self.out.push('<');
        self.out.push_str(&tag);
        self.out.push('>');
        self.out.push_str(&escape_text(text));
        self.out.push_str("</");
        self.out.push_str(&tag);
        self.out.push_str(">\n");
        self
    }

    /// Close any elements still open and return the text
    pub fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.close();
        }
        self.out
    }
}

/// A parsed element
///
/// `text` holds the character data that precedes the first child element,
/// entity-decoded and untrimmed. Text following a child is not kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name
    pub tag: String,
    /// Leading character data
    pub text: String,
    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// First direct child with the given tag
    pub fn child(&self, tag: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.tag == tag)
    }

}

/// Markup that could not be read as a single element tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason} at byte {offset}")]
pub struct MarkupError {
    /// Byte offset where reading stopped
    pub offset: usize,
    /// What went wrong
    pub reason: String,
}

/// Parse a document containing exactly one root element
pub fn parse_element(input: &str) -> Result<Element, MarkupError> {
    Reader { src: input, pos: 0 }.document()
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn error(&self, reason: impl Into<String>) -> MarkupError {
        MarkupError {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn document(mut self) -> Result<Element, MarkupError> {
        self.skip_misc()?;
        if !self.rest().starts_with('<') {
            return Err(self.error("expected a root element"));
        }

        let root = self.element(1)?;

        self.skip_misc()?;
        if !self.rest().is_empty() {
            return Err(self.error("content after the root element"));
        }
        Ok(root)
    }

    /// Skip whitespace, comments and processing instructions
    fn skip_misc(&mut self) -> Result<(), MarkupError> {
        loop {
            let trimmed = self.rest().trim_start();
            self.pos = self.src.len() - trimmed.len();
            if trimmed.starts_with("<!--") {
                self.skip_past("-->")?;
            } else if trimmed.starts_with("<?") {
                self.skip_past("?>")?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_past(&mut self, terminator: &str) -> Result<(), MarkupError> {
        match self.rest().find(terminator) {
            Some(idx) => {
                self.pos += idx + terminator.len();
                Ok(())
            }
            None => Err(self.error(format!("unterminated construct, expected `{terminator}`"))),
        }
    }

    /// Read an element starting at `<`, including all of its content
    fn element(&mut self, depth: usize) -> Result<Element, MarkupError> {
        if depth > MAX_DEPTH {
            return Err(self.error(format!("elements nested deeper than {MAX_DEPTH}")));
        }

        let (tag, self_closing) = self.start_tag()?;
        let mut element = Element {
            tag,
            ..Element::default()
        };
        if self_closing {
            return Ok(element);
        }

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error(format!("unclosed element <{}>", element.tag)));
            }

            if rest.starts_with("</") {
                self.pos += 2;
                let name = self.name()?;
                self.skip_whitespace();
                self.expect('>')?;
                if name != element.tag {
                    return Err(self.error(format!("mismatched tag: expected </{}>, found </{name}>", element.tag)));
                }
                return Ok(element);
            }

            if rest.starts_with("<!--") {
                self.skip_past("-->")?;
            } else if rest.starts_with("<?") {
                self.skip_past("?>")?;
            } else if let Some(cdata) = rest.strip_prefix("<![CDATA[") {
                let end = cdata
                    .find("]]>")
                    .ok_or_else(|| self.error("unterminated CDATA section"))?;
                if element.children.is_empty() {
                    element.text.push_str(&cdata[..end]);
                }
                self.pos += "<![CDATA[".len() + end + "]]>".len();
            } else if rest.starts_with('<') {
                let child = self.element(depth + 1)?;
                element.children.push(child);
            } else {
                let end = rest.find('<').unwrap_or(rest.len());
                let decoded = decode_entities(&rest[..end]).map_err(|reason| self.error(reason))?;
                if element.children.is_empty() {
                    element.text.push_str(&decoded);
                }
                self.pos += end;
            }
        }
    }

    /// Read `<name attr="v" ...>` or `<name/>`, returning the name
    fn start_tag(&mut self) -> Result<(String, bool), MarkupError> {
        self.expect('<')?;
        let tag = self.name()?;

        loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok((tag, true));
            }
            if rest.starts_with('>') {
                self.pos += 1;
                return Ok((tag, false));
            }
            if rest.is_empty() {
                return Err(self.error(format!("unterminated start tag <{tag}")));
            }
            self.attribute()?;
        }
    }

    /// Read and discard `name="value"`
    fn attribute(&mut self) -> Result<(), MarkupError> {
        self.name()?;
        self.skip_whitespace();
        self.expect('=')?;
        self.skip_whitespace();

        let quote = self
            .rest()
            .chars()
            .next()
            .filter(|c| *c == '"' || *c == '\'')
            .ok_or_else(|| self.error("attribute value must be quoted"))?;
        self.pos += 1;

        let end = self
            .rest()
            .find(quote)
            .ok_or_else(|| self.error("unterminated attribute value"))?;
        let value = &self.rest()[..end];
        if value.contains('<') {
            return Err(self.error("`<` not allowed in attribute value"));
        }
        decode_entities(value).map_err(|reason| self.error(reason))?;
        self.pos += end + 1;
        Ok(())
    }

    fn name(&mut self) -> Result<String, MarkupError> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        match chars.next() {
            Some((_, c)) if is_name_start(c) || c == ':' => {}
            _ => return Err(self.error("invalid tag name")),
        }

        let end = chars
            .find(|(_, c)| !(is_name_char(*c) || *c == ':'))
            .map_or(rest.len(), |(idx, _)| idx);
        let name = rest[..end].to_owned();
        self.pos += end;
        Ok(name)
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    fn expect(&mut self, ch: char) -> Result<(), MarkupError> {
        if self.rest().starts_with(ch) {
            self.pos += ch.len_utf8();
            Ok(())
        } else {
            Err(self.error(format!("expected `{ch}`")))
        }
    }
}

/// Decode predefined entities and character references
fn decode_entities(raw: &str) -> Result<String, String> {
    if !raw.contains('&') {
        return Ok(raw.to_owned());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or_else(|| "unterminated entity reference".to_owned())?;
        let entity = &after[..semi];

        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => decode_char_ref(entity).ok_or_else(|| format!("unknown entity `&{entity};`"))?,
        };
        out.push(decoded);
        rest = &after[semi + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

fn decode_char_ref(entity: &str) -> Option<char> {
    let code = entity.strip_prefix('#')?;
    let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => code.parse().ok()?,
    };
    char::from_u32(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_balances_and_escapes() {
        let mut writer = MarkupWriter::new();
        writer.open("tools").leaf("tool_name", "a<b & c").open("parameters");
        let out = writer.finish();

        assert_eq!(
            out,
            "<tools>\n<tool_name>a&lt;b &amp; c</tool_name>\n<parameters>\n</parameters>\n</tools>\n"
        );
    }

    #[test]
    fn sanitize_rewrites_invalid_names() {
        assert_eq!(sanitize_tag("city name"), "city_name");
        assert_eq!(sanitize_tag("1st"), "_1st");
        assert_eq!(sanitize_tag("<x>"), "_x_");
        assert_eq!(sanitize_tag("max_tokens"), "max_tokens");
    }

    #[test]
    fn reads_nested_tree() {
        let root = parse_element("<a>\n<b>one</b><c><d>two</d></c></a>").unwrap();
        assert_eq!(root.tag, "a");
        assert_eq!(root.text, "\n");
        assert_eq!(root.child("b").unwrap().text, "one");
        assert_eq!(root.child("c").unwrap().child("d").unwrap().text, "two");
    }

    #[test]
    fn decodes_entities_and_cdata() {
        let root = parse_element("<v>x &lt; y &amp;&#65;&#x42;<![CDATA[<raw>]]></v>").unwrap();
        assert_eq!(root.text, "x < y &AB<raw>");
    }

    #[test]
    fn tolerates_attributes_comments_and_self_closing() {
        let root = parse_element("<?xml version=\"1.0\"?><a k='v'><!-- note --><b/></a>").unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].tag, "b");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_element("<a><b></a>").is_err());
        assert!(parse_element("<a>").is_err());
        assert!(parse_element("<a>1 < 2</a>").is_err());
        assert!(parse_element("<a>&nbsp;</a>").is_err());
        assert!(parse_element("<a></a><b></b>").is_err());
        assert!(parse_element("plain text").is_err());
    }

    #[test]
    fn nesting_is_limited() {
        let within = format!("{}{}", "<a>".repeat(MAX_DEPTH), "</a>".repeat(MAX_DEPTH));
        assert!(parse_element(&within).is_ok());

        let beyond = format!("{}{}", "<a>".repeat(MAX_DEPTH + 1), "</a>".repeat(MAX_DEPTH + 1));
        let err = parse_element(&beyond).unwrap_err();
        assert!(err.reason.contains("nested deeper"));
    }

    #[test]
    fn round_trips_writer_output() {
        let mut writer = MarkupWriter::new();
        writer.open("root").leaf("q", "\"quoted\" & <tagged>");
        let root = parse_element(&writer.finish()).unwrap();
        assert_eq!(root.child("q").unwrap().text, "\"quoted\" & <tagged>");
    }
}
