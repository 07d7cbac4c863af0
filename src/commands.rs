//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.

use crate::highlight::{EditorData, Render};
use crate::surface::CursorOffset;

/// Commands returned by update functions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// Start debounce timer for edit processing.
    /// After delay_ms, the host sends Msg::InputReady with the same revision
    DebounceInput { revision: u64, delay_ms: u64 },
    /// Replace the surface's whole content
    RenderAll { markup: String },
    /// Replace rendered nodes `start..=end` with `fragments`
    ReplaceNodes {
        start: usize,
        end: usize,
        fragments: Vec<String>,
    },
    /// Place a collapsed caret at a plain-text offset
    RestoreCaret { offset: usize },
    ClearSelection,
    /// Report the processed edit to the host
    Emit(EditorData),
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Create a batch of commands
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        Cmd::Batch(cmds)
    }

    /// Check if this command changes what the surface displays
    pub fn needs_render(&self) -> bool {
        match self {
            Cmd::RenderAll { .. } | Cmd::ReplaceNodes { .. } => true,
            Cmd::Batch(cmds) => cmds.iter().any(|c| c.needs_render()),
            Cmd::None
            | Cmd::DebounceInput { .. }
            | Cmd::RestoreCaret { .. }
            | Cmd::ClearSelection
            | Cmd::Emit(_) => false,
        }
    }

    /// The data emitted by this command, searching batches
    pub fn emitted(&self) -> Option<&EditorData> {
        match self {
            Cmd::Emit(data) => Some(data),
            Cmd::Batch(cmds) => cmds.iter().find_map(|c| c.emitted()),
            _ => None,
        }
    }

    /// Commands restoring `caret` after a render; the caret end is used
    pub fn restore_caret(caret: Option<CursorOffset>) -> Option<Cmd> {
        caret.map(|c| Cmd::RestoreCaret { offset: c.end })
    }
}

impl From<Render> for Cmd {
    fn from(render: Render) -> Self {
        match render {
            Render::Full { markup } => Cmd::RenderAll { markup },
            Render::Partial {
                start,
                end,
                fragments,
            } => Cmd::ReplaceNodes {
                start,
                end,
                fragments,
            },
            Render::Unchanged => Cmd::None,
        }
    }
}
