//! Lossless whitespace/non-whitespace tokenizer

use crate::util::text::char_class;

/// Split `text` into alternating maximal runs of whitespace and non-whitespace.
///
/// Tokens borrow from `text`, and concatenating them reproduces `text` exactly.
/// Empty input yields a single empty token.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices();

    let Some((_, first)) = chars.next() else {
        return vec![""];
    };

    let mut start = 0;
    let mut class = char_class(first);
    for (idx, ch) in chars {
        let next_class = char_class(ch);
        if next_class != class {
            tokens.push(&text[start..idx]);
            start = idx;
            class = next_class;
        }
    }
    tokens.push(&text[start..]);
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_one_empty_token() {
        assert_eq!(tokenize(""), vec![""]);
    }

    #[test]
    fn test_alternating_runs() {
        assert_eq!(tokenize("ab cd"), vec!["ab", " ", "cd"]);
        assert_eq!(tokenize("hello  world"), vec!["hello", "  ", "world"]);
    }

    #[test]
    fn test_leading_and_trailing_whitespace() {
        assert_eq!(tokenize("  x\n"), vec!["  ", "x", "\n"]);
        assert_eq!(tokenize(" \t\n "), vec![" \t\n "]);
    }

    #[test]
    fn test_punctuation_stays_in_word() {
        assert_eq!(tokenize("cd! ?x"), vec!["cd!", " ", "?x"]);
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(tokenize("héllo\u{a0}wörld"), vec!["héllo", "\u{a0}", "wörld"]);
    }

    #[test]
    fn test_round_trip() {
        for text in ["", "a", " ", "a b", " a\tb\r\nc ", "ünï cödé  "] {
            assert_eq!(tokenize(text).concat(), text);
        }
    }
}
