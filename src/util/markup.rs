//! Markup helpers: escaping, a small tag/text event parser, and text extraction
//!
//! The parser understands the subset of HTML that the highlighter emits and that an
//! editable surface typically hands back: elements with an optional `class`
//! attribute, void elements like `<br>`, comments, and character entities. A `<`
//! that does not start a tag is kept as literal text.

use std::fmt;

/// Elements that never have children or a closing tag
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta", "wbr"];

/// Longest entity body we try to decode (`&#x10ffff;` fits)
const MAX_ENTITY_LEN: usize = 10;

/// A single parse event, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    /// Start of an element
    Open { tag: String, class: Option<String> },
    /// End of an element (also emitted for void and self-closing elements)
    Close { tag: String },
    /// Decoded character data
    Text(String),
}

/// Reasons a markup string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// A tag or comment opened at `offset` (in characters) never closes
    UnterminatedTag { offset: usize },
    /// A closing tag does not match the innermost open element
    UnbalancedClose { expected: String, found: String },
    /// A closing tag appears with no open element
    UnexpectedClose { tag: String },
}

impl fmt::Display for MarkupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedTag { offset } => write!(f, "unterminated tag at offset {}", offset),
            Self::UnbalancedClose { expected, found } => {
                write!(f, "expected </{}> but found </{}>", expected, found)
            }
            Self::UnexpectedClose { tag } => write!(f, "unexpected </{}>", tag),
        }
    }
}

impl std::error::Error for MarkupError {}

/// Append `ch` to `out`, escaping characters that would otherwise start markup
pub fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        _ => out.push(ch),
    }
}

/// Append `text` to `out` with markup-significant characters escaped
pub fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        push_escaped(out, ch);
    }
}

/// Parse markup into a flat event stream.
///
/// Elements still open at the end of input are closed implicitly.
pub fn parse_markup(input: &str) -> Result<Vec<MarkupEvent>, MarkupError> {
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let mut events = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut i = 0;

    while i < len {
        let next = chars.get(i + 1).copied();
        match chars[i] {
            '<' if starts_with(&chars, i, "<!--") => {
                flush_text(&mut text, &mut events);
                i = skip_comment(&chars, i)?;
            }
            '<' if next.is_some_and(|c| c.is_ascii_alphabetic()) => {
                flush_text(&mut text, &mut events);
                let tag = read_open_tag(&chars, i)?;
                i = tag.next;
                let is_void = tag.self_closing || VOID_TAGS.contains(&tag.name.as_str());
                events.push(MarkupEvent::Open {
                    tag: tag.name.clone(),
                    class: tag.class,
                });
                if is_void {
                    events.push(MarkupEvent::Close { tag: tag.name });
                } else {
                    open.push(tag.name);
                }
            }
            '<' if next == Some('/')
                && chars.get(i + 2).is_some_and(|c| c.is_ascii_alphabetic()) =>
            {
                flush_text(&mut text, &mut events);
                let (name, after) = read_close_tag(&chars, i)?;
                i = after;
                if VOID_TAGS.contains(&name.as_str()) {
                    continue;
                }
                match open.pop() {
                    Some(expected) if expected == name => {
                        events.push(MarkupEvent::Close { tag: name })
                    }
                    Some(expected) => {
                        return Err(MarkupError::UnbalancedClose {
                            expected,
                            found: name,
                        })
                    }
                    None => return Err(MarkupError::UnexpectedClose { tag: name }),
                }
            }
            '&' => {
                let (ch, after) = decode_entity(&chars, i);
                text.push(ch);
                i = after;
            }
            ch => {
                text.push(ch);
                i += 1;
            }
        }
    }

    flush_text(&mut text, &mut events);
    while let Some(tag) = open.pop() {
        events.push(MarkupEvent::Close { tag });
    }
    Ok(events)
}

/// Extract the plain text content of `input`.
///
/// Malformed markup is never fatal: the input is returned verbatim as literal text.
pub fn extract_text(input: &str) -> String {
    match parse_markup(input) {
        Ok(events) => events
            .into_iter()
            .filter_map(|event| match event {
                MarkupEvent::Text(text) => Some(text),
                _ => None,
            })
            .collect(),
        Err(e) => {
            tracing::warn!("Malformed markup ({}), treating input as literal text", e);
            input.to_string()
        }
    }
}

fn flush_text(text: &mut String, events: &mut Vec<MarkupEvent>) {
    if !text.is_empty() {
        events.push(MarkupEvent::Text(std::mem::take(text)));
    }
}

fn starts_with(chars: &[char], at: usize, pattern: &str) -> bool {
    let mut i = at;
    for expected in pattern.chars() {
        if chars.get(i) != Some(&expected) {
            return false;
        }
        i += 1;
    }
    true
}

fn skip_comment(chars: &[char], start: usize) -> Result<usize, MarkupError> {
    let mut i = start + 4;
    while i < chars.len() {
        if starts_with(chars, i, "-->") {
            return Ok(i + 3);
        }
        i += 1;
    }
    Err(MarkupError::UnterminatedTag { offset: start })
}

struct OpenTag {
    name: String,
    class: Option<String>,
    self_closing: bool,
    next: usize,
}

fn read_name(chars: &[char], mut i: usize) -> (String, usize) {
    let mut name = String::new();
    while let Some(&c) = chars.get(i) {
        if c.is_ascii_alphanumeric() || c == '-' {
            name.push(c.to_ascii_lowercase());
            i += 1;
        } else {
            break;
        }
    }
    (name, i)
}

fn read_open_tag(chars: &[char], start: usize) -> Result<OpenTag, MarkupError> {
    let unterminated = MarkupError::UnterminatedTag { offset: start };
    let (name, mut i) = read_name(chars, start + 1);
    let mut class = None;

    loop {
        while chars.get(i).is_some_and(|c| c.is_whitespace()) {
            i += 1;
        }
        match chars.get(i) {
            None => return Err(unterminated),
            Some('>') => {
                return Ok(OpenTag {
                    name,
                    class,
                    self_closing: false,
                    next: i + 1,
                })
            }
            Some('/') if chars.get(i + 1) == Some(&'>') => {
                return Ok(OpenTag {
                    name,
                    class,
                    self_closing: true,
                    next: i + 2,
                })
            }
            Some(_) => {}
        }

        let attr_start = i;
        while chars
            .get(i)
            .is_some_and(|&c| !c.is_whitespace() && !matches!(c, '=' | '>' | '/'))
        {
            i += 1;
        }
        if i == attr_start {
            // Stray '/' inside the tag
            i += 1;
            continue;
        }
        let attr: String = chars[attr_start..i].iter().collect();

        if chars.get(i) != Some(&'=') {
            continue;
        }
        i += 1;
        let value = match chars.get(i) {
            Some(&quote) if quote == '\'' || quote == '"' => {
                let value_start = i + 1;
                let Some(len) = chars[value_start..].iter().position(|&c| c == quote) else {
                    return Err(unterminated);
                };
                i = value_start + len + 1;
                chars[value_start..value_start + len].iter().collect::<String>()
            }
            _ => {
                let value_start = i;
                while chars
                    .get(i)
                    .is_some_and(|&c| !c.is_whitespace() && c != '>')
                {
                    i += 1;
                }
                chars[value_start..i].iter().collect::<String>()
            }
        };
        if attr.eq_ignore_ascii_case("class") {
            class = Some(value);
        }
    }
}

fn read_close_tag(chars: &[char], start: usize) -> Result<(String, usize), MarkupError> {
    let (name, mut i) = read_name(chars, start + 2);
    while chars.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    if chars.get(i) == Some(&'>') {
        Ok((name, i + 1))
    } else {
        Err(MarkupError::UnterminatedTag { offset: start })
    }
}

/// Decode the entity starting at `start` (which holds `&`).
/// Unknown or unterminated entities decode to a literal `&`.
fn decode_entity(chars: &[char], start: usize) -> (char, usize) {
    let literal = ('&', start + 1);
    let window_end = (start + 2 + MAX_ENTITY_LEN).min(chars.len());
    let Some(len) = chars[start + 1..window_end].iter().position(|&c| c == ';') else {
        return literal;
    };
    let body: String = chars[start + 1..start + 1 + len].iter().collect();
    let next = start + len + 2;

    let decoded = match body.as_str() {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => body
            .strip_prefix("#x")
            .or_else(|| body.strip_prefix("#X"))
            .map(|hex| u32::from_str_radix(hex, 16))
            .or_else(|| body.strip_prefix('#').map(|dec| dec.parse::<u32>()))
            .and_then(Result::ok)
            .and_then(char::from_u32),
    };

    match decoded {
        Some(ch) => (ch, next),
        None => literal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_from_highlight_markup() {
        let markup =
            "<span>ab</span><span> </span><span class='highlight'>cd<font class='color-highlight'>!</font></span>";
        assert_eq!(extract_text(markup), "ab cd!");
    }

    #[test]
    fn test_extract_text_decodes_entities() {
        assert_eq!(extract_text("a &amp; b &lt;c&gt;"), "a & b <c>");
        assert_eq!(extract_text("&#39;&#x41;&nbsp;"), "'A\u{a0}");
        assert_eq!(extract_text("fish &chips"), "fish &chips");
        assert_eq!(extract_text("&bogus;"), "&bogus;");
    }

    #[test]
    fn test_lone_angle_bracket_is_text() {
        assert_eq!(extract_text("a < b"), "a < b");
        assert_eq!(extract_text("1<2"), "1<2");
    }

    #[test]
    fn test_malformed_markup_falls_back_to_literal() {
        assert_eq!(extract_text("a<b"), "a<b");
        assert_eq!(extract_text("<span>x</font>"), "<span>x</font>");
        assert_eq!(extract_text("x</span>"), "x</span>");
    }

    #[test]
    fn test_comments_and_void_tags() {
        assert_eq!(extract_text("a<!-- note -->b<br>c"), "abc");
        assert_eq!(extract_text("<br/>"), "");
    }

    #[test]
    fn test_parse_reads_class_attribute() {
        let events = parse_markup("<span class=\"highlight\">x</span>").unwrap();
        assert_eq!(
            events,
            vec![
                MarkupEvent::Open {
                    tag: "span".to_string(),
                    class: Some("highlight".to_string())
                },
                MarkupEvent::Text("x".to_string()),
                MarkupEvent::Close {
                    tag: "span".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_parse_closes_open_elements_at_end() {
        let events = parse_markup("<div><span>x").unwrap();
        assert_eq!(events.len(), 5);
        assert_eq!(
            events.last(),
            Some(&MarkupEvent::Close {
                tag: "div".to_string()
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_markup("<span class='x>"),
            Err(MarkupError::UnterminatedTag { offset: 0 })
        ));
        assert!(matches!(
            parse_markup("<span></font>"),
            Err(MarkupError::UnbalancedClose { .. })
        ));
        assert!(matches!(
            parse_markup("</span>"),
            Err(MarkupError::UnexpectedClose { .. })
        ));
    }

    #[test]
    fn test_escape_into() {
        let mut out = String::new();
        escape_into(&mut out, "a<b>&c");
        assert_eq!(out, "a&lt;b&gt;&amp;c");
    }
}
