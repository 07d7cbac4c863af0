//! Message types for the Elm-style architecture
//!
//! All state changes of the editor component flow through these message types.

use crate::surface::{capture_offset, CursorOffset, RenderSurface};

/// What the update function needs to know about the rendering surface after an edit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSnapshot {
    /// Plain text currently shown by the surface
    pub text: String,
    /// Selection as plain-text offsets, None when it could not be captured
    pub caret: Option<CursorOffset>,
}

impl EditSnapshot {
    pub fn new(text: impl Into<String>, caret: Option<CursorOffset>) -> Self {
        Self {
            text: text.into(),
            caret,
        }
    }

    /// Read text and selection from a surface.
    ///
    /// Caret failures are logged and leave the caret empty; the edit still goes through.
    pub fn capture<S: RenderSurface + ?Sized>(surface: &S) -> Self {
        let caret = match capture_offset(surface) {
            Ok(offset) => Some(offset),
            Err(e) => {
                tracing::debug!("No caret captured: {}", e);
                None
            }
        };
        Self {
            text: surface.plain_text(),
            caret,
        }
    }
}

/// Top-level message type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Raw edit event from the surface; starts (or restarts) the debounce window
    Input,
    /// The debounce window for `revision` elapsed
    InputReady {
        revision: u64,
        snapshot: EditSnapshot,
    },
    /// The surface lost focus; processes immediately and clears the selection
    Blur(EditSnapshot),
    /// The surface gained focus
    Focus,
    /// External write of the value, as markup or plain text
    SetValue(String),
    SetDisabled(bool),
}
