//! The incremental highlight engine: owns the node cache and the previous text

use serde::Serialize;

use super::diff::diff;
use super::node_cache::NodeCache;
use super::patch::{patch, PatchOutcome};
use super::validator::{AllowList, Validator};
use crate::util::markup::extract_text;

/// How the rendering surface should change after an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Render {
    /// Replace the surface's entire content
    Full { markup: String },
    /// Replace rendered nodes `start..=end` with `fragments`, in order
    Partial {
        start: usize,
        end: usize,
        fragments: Vec<String>,
    },
    /// Nothing to redraw
    Unchanged,
}

impl Render {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Data reported to the caller after every processed edit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditorData {
    /// Rendered markup (or the plain text when the render was skipped)
    pub content: String,
    pub plain_text: String,
    pub invalid_character_count: usize,
}

/// Result of processing one edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub render: Render,
    pub data: EditorData,
}

/// Incremental diff-and-highlight engine.
///
/// Holds exactly one piece of mutable state (the node cache plus the text it
/// renders), so invocations against one engine must be serialized by the caller.
#[derive(Debug, Clone, Default)]
pub struct HighlightEngine {
    validator: Validator,
    cache: NodeCache,
    previous_text: String,
    /// A skipped render left edits inside the surface's nodes, so surface node
    /// indices no longer match cache records
    surface_stale: bool,
}

impl HighlightEngine {
    pub fn new(allow_list: AllowList) -> Self {
        Self {
            validator: Validator::new(allow_list),
            cache: NodeCache::new(),
            previous_text: String::new(),
            surface_stale: false,
        }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn node_cache(&self) -> &NodeCache {
        &self.cache
    }

    /// Text the node cache currently renders
    pub fn previous_text(&self) -> &str {
        &self.previous_text
    }

    /// Markup of everything currently cached
    pub fn markup(&self) -> String {
        self.cache.markup()
    }

    pub fn invalid_count(&self) -> usize {
        self.cache.invalid_count()
    }

    /// Process an edit given as markup or plain text.
    ///
    /// Plain text is re-derived through markup extraction first; input that cannot
    /// be parsed as markup is treated as literal text.
    pub fn process_value(&mut self, value: &str) -> EditOutcome {
        let text = extract_text(value);
        self.process(&text)
    }

    /// Process an edit given as plain text
    pub fn process(&mut self, text: &str) -> EditOutcome {
        if text.is_empty() {
            self.reset();
            return EditOutcome {
                render: Render::Full {
                    markup: String::new(),
                },
                data: EditorData::default(),
            };
        }

        let window = diff(&self.previous_text, text);
        match patch(&self.cache, &window, &self.validator) {
            PatchOutcome::Unchanged => {
                self.surface_stale = true;
                EditOutcome {
                    render: Render::Unchanged,
                    data: EditorData {
                        content: text.to_string(),
                        plain_text: text.to_string(),
                        invalid_character_count: self.cache.invalid_count(),
                    },
                }
            }
            PatchOutcome::Applied(result) => {
                let render = if result.is_full_rebuild || self.surface_stale {
                    if self.surface_stale {
                        tracing::debug!("Surface drifted after a skipped render, redrawing all");
                    }
                    Render::Full {
                        markup: result.node_cache.markup(),
                    }
                } else {
                    Render::Partial {
                        start: window.start_node_index,
                        end: window.end_node_index,
                        fragments: result
                            .modified_subrange
                            .into_iter()
                            .map(|record| record.markup)
                            .collect(),
                    }
                };
                self.cache = result.node_cache;
                self.previous_text = text.to_string();
                self.surface_stale = false;

                EditOutcome {
                    render,
                    data: EditorData {
                        content: self.cache.markup(),
                        plain_text: text.to_string(),
                        invalid_character_count: self.cache.invalid_count(),
                    },
                }
            }
        }
    }

    /// Forget all rendered state
    pub fn reset(&mut self) {
        self.cache = NodeCache::new();
        self.previous_text.clear();
        self.surface_stale = false;
    }
}
