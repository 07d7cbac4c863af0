//! Character classification for tokenizing and validating text

/// Whitespace class used for token boundaries.
///
/// Mirrors what a browser's `String.prototype.trim` strips: Unicode White_Space
/// except NEL (U+0085), plus the byte order mark (U+FEFF).
pub fn is_blank(ch: char) -> bool {
    match ch {
        '\u{feff}' => true,
        '\u{85}' => false,
        _ => ch.is_whitespace(),
    }
}

/// Token class, either a blank run or a visible run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Whitespace characters
    Blank,
    /// Everything else
    Visible,
}

/// Get the token class of a character
pub fn char_class(ch: char) -> CharClass {
    if is_blank(ch) {
        CharClass::Blank
    } else {
        CharClass::Visible
    }
}

/// Whitespace accepted by every allow-list profile
pub fn is_line_space(ch: char) -> bool {
    matches!(ch, ' ' | '\r' | '\n')
}

/// Punctuation accepted by the strict profile
pub fn is_strict_punctuation(ch: char) -> bool {
    matches!(
        ch,
        ':' | ',' | '/' | '\'' | '?' | '.' | '+' | '-' | '(' | ')' | '*'
    )
}

/// Punctuation accepted by the extended profile (a superset of strict)
pub fn is_extended_punctuation(ch: char) -> bool {
    is_strict_punctuation(ch)
        || matches!(
            ch,
            '=' | '@' | '#' | '&' | '{' | '}' | ';' | '<' | '>' | '_' | '!' | '"' | '%'
        )
}

/// Number of characters (Unicode scalar values) in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_matches_trim_semantics() {
        assert!(is_blank(' '));
        assert!(is_blank('\t'));
        assert!(is_blank('\n'));
        assert!(is_blank('\u{a0}'));
        assert!(is_blank('\u{feff}'));
        assert!(is_blank('\u{2003}'));
        assert!(!is_blank('\u{85}'));
        assert!(!is_blank('a'));
    }

    #[test]
    fn test_char_class() {
        assert_eq!(char_class(' '), CharClass::Blank);
        assert_eq!(char_class('x'), CharClass::Visible);
        assert_eq!(char_class('!'), CharClass::Visible);
    }

    #[test]
    fn test_extended_is_superset_of_strict() {
        for ch in [':', ',', '/', '\'', '?', '.', '+', '-', '(', ')', '*'] {
            assert!(is_strict_punctuation(ch));
            assert!(is_extended_punctuation(ch));
        }
        assert!(!is_strict_punctuation('!'));
        assert!(is_extended_punctuation('!'));
        assert!(!is_extended_punctuation('$'));
    }

    #[test]
    fn test_line_space_excludes_tab() {
        assert!(is_line_space(' '));
        assert!(is_line_space('\n'));
        assert!(is_line_space('\r'));
        assert!(!is_line_space('\t'));
    }

    #[test]
    fn test_char_len_counts_scalars() {
        assert_eq!(char_len("héllo"), 5);
        assert_eq!(char_len(""), 0);
    }
}
