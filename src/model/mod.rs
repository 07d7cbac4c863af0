//! Editor component model - the complete state of one highlighted text control
//!
//! Holds the highlight engine plus the control flags a host needs to draw the
//! surrounding chrome (placeholder, floating label, error state).

use crate::config::EngineConfig;
use crate::highlight::{EditorData, HighlightEngine};
use crate::surface::CursorOffset;

/// State of one highlighted text control
#[derive(Debug, Clone)]
pub struct HighlightEditor {
    pub engine: HighlightEngine,
    pub config: EngineConfig,
    /// Bumped on every raw edit; debounced work for older revisions is dropped
    pub revision: u64,
    pub focused: bool,
    /// Whether the control has ever been focused
    pub touched: bool,
    pub disabled: bool,
    /// Last data emitted to the host
    pub value: EditorData,
    /// Caret captured before the last processed edit
    pub last_caret: Option<CursorOffset>,
}

impl Default for HighlightEditor {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl HighlightEditor {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: HighlightEngine::new(config.allow_list()),
            config,
            revision: 0,
            focused: false,
            touched: false,
            disabled: false,
            value: EditorData::default(),
            last_caret: None,
        }
    }

    /// Plain text trims to nothing
    pub fn is_empty(&self) -> bool {
        self.value.plain_text.trim().is_empty()
    }

    /// Required-field error: empty after the user has interacted with it
    pub fn error_state(&self) -> bool {
        self.is_empty() && self.touched && !self.disabled
    }

    pub fn should_label_float(&self) -> bool {
        (self.focused || !self.is_empty()) && !self.disabled
    }

    /// The placeholder shows only while there is no text at all, whitespace included
    pub fn show_placeholder(&self) -> bool {
        self.value.plain_text.is_empty()
    }

    pub fn placeholder(&self) -> &str {
        &self.config.placeholder
    }

    pub fn invalid_character_count(&self) -> usize {
        self.value.invalid_character_count
    }
}
