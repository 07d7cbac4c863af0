//! Incremental allow-list highlighting.
//!
//! Per edit the data flows leaf-first through these modules:
//!
//! - [`tokenizer`]: split previous and current text into whitespace/non-whitespace runs
//! - [`diff`]: locate the token window that changed
//! - [`validator`]: render each token of the window, tagging invalid characters
//! - [`node_cache`]: one rendered record per token, patched by splicing
//! - [`patch`]: choose full rebuild vs. partial splice (or skip)
//! - [`engine`]: owns the cache and previous text across edits
//!
//! # Example
//!
//! ```
//! use charguard::highlight::{HighlightEngine, Render};
//!
//! let mut engine = HighlightEngine::default();
//! engine.process("ab cd");
//! let outcome = engine.process("ab cd!");
//!
//! assert!(matches!(outcome.render, Render::Partial { start: 1, end: 2, .. }));
//! assert_eq!(outcome.data.invalid_character_count, 1);
//! ```

pub mod diff;
pub mod engine;
pub mod node_cache;
pub mod patch;
pub mod tokenizer;
pub mod validator;

pub use diff::{diff, DiffResult};
pub use engine::{EditOutcome, EditorData, HighlightEngine, Render};
pub use node_cache::{NodeCache, NodeRecord};
pub use patch::{patch, PatchOutcome, PatchResult};
pub use tokenizer::tokenize;
pub use validator::{AllowList, AllowListProfile, CharFilter, ValidatedToken, Validator};
