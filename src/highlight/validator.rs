//! Allow-list validation and per-token markup rendering.
//!
//! A valid token renders as `<span>token</span>`. A token with at least one
//! disallowed character renders inside a highlighted span, with each disallowed
//! character wrapped in its own `<font>` tag:
//!
//! ```text
//! <span class='highlight'>cd<font class='color-highlight'>!</font></span>
//! ```

use serde::{Deserialize, Serialize};

use crate::util::markup::push_escaped;
use crate::util::text::{is_extended_punctuation, is_line_space, is_strict_punctuation};

/// Character filter function type. Returns true if the character is allowed.
pub type CharFilter = fn(char) -> bool;

/// Opening tag of a token without invalid characters
pub const VALID_OPEN: &str = "<span>";
/// Opening tag of a token with at least one invalid character
pub const HIGHLIGHT_OPEN: &str = "<span class='highlight'>";
/// Closing tag of either token container
pub const TOKEN_CLOSE: &str = "</span>";
/// Opening tag around a single invalid character
pub const INVALID_OPEN: &str = "<font class='color-highlight'>";
/// Closing tag around a single invalid character
pub const INVALID_CLOSE: &str = "</font>";

/// Built-in allow-list profiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllowListProfile {
    /// ASCII alphanumerics, `: , / ' ? . + - ( ) *`, space, CR and LF
    #[default]
    Strict,
    /// Strict plus `= @ # & { } ; < > _ ! " %`
    Extended,
}

impl AllowListProfile {
    /// The character filter implementing this profile
    pub fn filter(self) -> CharFilter {
        match self {
            Self::Strict => is_strict_char,
            Self::Extended => is_extended_char,
        }
    }
}

fn is_strict_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_strict_punctuation(c) || is_line_space(c)
}

fn is_extended_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_extended_punctuation(c) || is_line_space(c)
}

/// The set of characters considered valid. Fixed once constructed.
#[derive(Debug, Clone)]
pub struct AllowList {
    filter: CharFilter,
    extra: Vec<char>,
}

impl Default for AllowList {
    fn default() -> Self {
        Self::from_profile(AllowListProfile::default())
    }
}

impl AllowList {
    pub fn from_profile(profile: AllowListProfile) -> Self {
        Self {
            filter: profile.filter(),
            extra: Vec::new(),
        }
    }

    pub fn strict() -> Self {
        Self::from_profile(AllowListProfile::Strict)
    }

    pub fn extended() -> Self {
        Self::from_profile(AllowListProfile::Extended)
    }

    /// Also accept every character of `chars`
    pub fn with_extra(mut self, chars: &str) -> Self {
        for ch in chars.chars() {
            if !self.extra.contains(&ch) {
                self.extra.push(ch);
            }
        }
        self
    }

    /// Check if a character passes the allow-list
    pub fn is_allowed(&self, ch: char) -> bool {
        (self.filter)(ch) || self.extra.contains(&ch)
    }
}

/// Rendered form of one token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedToken {
    pub markup: String,
    /// Number of invalid-character tags in `markup`
    pub invalid_count: usize,
}

/// Decides which characters are invalid and renders tokens to markup
#[derive(Debug, Clone, Default)]
pub struct Validator {
    allow_list: AllowList,
}

impl Validator {
    pub fn new(allow_list: AllowList) -> Self {
        Self { allow_list }
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    /// True if any character of `text` is outside the allow-list
    pub fn contains_invalid(&self, text: &str) -> bool {
        text.chars().any(|c| !self.allow_list.is_allowed(c))
    }

    pub fn count_invalid(&self, text: &str) -> usize {
        text.chars().filter(|&c| !self.allow_list.is_allowed(c)).count()
    }

    /// Render one token, tagging each invalid character individually
    pub fn validate(&self, token: &str) -> ValidatedToken {
        let invalid_count = self.count_invalid(token);
        let mut markup = String::with_capacity(token.len() + VALID_OPEN.len() + TOKEN_CLOSE.len());

        if invalid_count == 0 {
            markup.push_str(VALID_OPEN);
            for ch in token.chars() {
                push_escaped(&mut markup, ch);
            }
        } else {
            markup.push_str(HIGHLIGHT_OPEN);
            for ch in token.chars() {
                if self.allow_list.is_allowed(ch) {
                    push_escaped(&mut markup, ch);
                } else {
                    markup.push_str(INVALID_OPEN);
                    push_escaped(&mut markup, ch);
                    markup.push_str(INVALID_CLOSE);
                }
            }
        }
        markup.push_str(TOKEN_CLOSE);

        tracing::trace!(token, invalid_count, "validated token");
        ValidatedToken {
            markup,
            invalid_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::markup::extract_text;

    #[test]
    fn test_valid_token_uses_plain_span() {
        let v = Validator::default();
        let out = v.validate("hello");
        assert_eq!(out.markup, "<span>hello</span>");
        assert_eq!(out.invalid_count, 0);
    }

    #[test]
    fn test_invalid_characters_tagged_individually() {
        let v = Validator::default();
        let out = v.validate("cd!");
        assert_eq!(
            out.markup,
            "<span class='highlight'>cd<font class='color-highlight'>!</font></span>"
        );
        assert_eq!(out.invalid_count, 1);

        let out = v.validate("a$$b");
        assert_eq!(out.invalid_count, 2);
        assert_eq!(out.markup.matches(INVALID_CLOSE).count(), 2);
        assert_eq!(extract_text(&out.markup), "a$$b");
    }

    #[test]
    fn test_whitespace_tokens() {
        let v = Validator::default();
        assert_eq!(v.validate(" \r\n").invalid_count, 0);
        // Tabs and non-breaking spaces are outside the allow-list
        assert_eq!(v.validate("\t").invalid_count, 1);
        assert_eq!(v.validate("\u{a0}").invalid_count, 1);
    }

    #[test]
    fn test_markup_characters_are_escaped() {
        let v = Validator::new(AllowList::extended());
        let out = v.validate("a<b>");
        assert_eq!(out.markup, "<span>a&lt;b&gt;</span>");
        assert_eq!(out.invalid_count, 0);

        let strict = Validator::default();
        let out = strict.validate("</font>");
        assert_eq!(out.invalid_count, 2);
        assert_eq!(extract_text(&out.markup), "</font>");
    }

    #[test]
    fn test_profiles() {
        let strict = AllowList::strict();
        let extended = AllowList::extended();
        assert!(!strict.is_allowed('@'));
        assert!(extended.is_allowed('@'));
        assert!(!extended.is_allowed('$'));
        assert!(!strict.is_allowed('é'));
        assert!(strict.is_allowed('Z'));
    }

    #[test]
    fn test_extra_characters() {
        let list = AllowList::strict().with_extra("$é");
        assert!(list.is_allowed('$'));
        assert!(list.is_allowed('é'));
        assert!(!list.is_allowed('@'));
    }

    #[test]
    fn test_contains_invalid() {
        let v = Validator::default();
        assert!(!v.contains_invalid(""));
        assert!(!v.contains_invalid("ab cd"));
        assert!(v.contains_invalid("ab cd!"));
    }
}
