//! Utility modules

pub mod markup;
pub mod text;

pub use markup::{escape_into, extract_text, parse_markup, MarkupError, MarkupEvent};
pub use text::{char_class, char_len, is_blank, CharClass};
