//! Caret mapping between a surface selection and plain-text offsets

use std::fmt;
use std::ops::ControlFlow;

use super::RenderSurface;
use crate::util::text::char_len;

/// Selection as plain-text character offsets, `start <= end`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorOffset {
    pub start: usize,
    pub end: usize,
}

impl CursorOffset {
    /// Create an offset pair, normalizing the order
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A collapsed caret at `offset`
    pub const fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Check if start == end
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Why a caret could not be captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretError {
    /// The surface reports no selection
    NoSelection,
    /// Anchor or focus lies outside the surface's subtree
    SelectionOutOfScope,
}

impl fmt::Display for CaretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSelection => write!(f, "no selection"),
            Self::SelectionOutOfScope => write!(f, "selection out of scope"),
        }
    }
}

impl std::error::Error for CaretError {}

/// Depth-first, pre-order walk from `node`. Stops as soon as `visit` breaks.
pub fn walk<S, B>(
    surface: &S,
    node: S::Node,
    visit: &mut impl FnMut(S::Node) -> ControlFlow<B>,
) -> ControlFlow<B>
where
    S: RenderSurface + ?Sized,
{
    visit(node)?;
    for &child in surface.children(node) {
        walk(surface, child, visit)?;
    }
    ControlFlow::Continue(())
}

/// Reduce the surface's live selection to plain-text offsets.
///
/// Text lengths of nodes preceding the anchor (resp. focus) are summed, then the
/// node-local offset is added.
pub fn capture_offset<S: RenderSurface + ?Sized>(surface: &S) -> Result<CursorOffset, CaretError> {
    let selection = surface.selection().ok_or(CaretError::NoSelection)?;
    let root = surface.root();

    if selection.anchor_node == root {
        return Ok(CursorOffset::new(
            selection.anchor_offset,
            selection.focus_offset,
        ));
    }
    if !surface.contains(selection.anchor_node) || !surface.contains(selection.focus_node) {
        return Err(CaretError::SelectionOutOfScope);
    }

    let targets = [selection.anchor_node, selection.focus_node];
    let mut found = [false; 2];
    let mut lengths = [0usize; 2];
    let _ = walk(surface, root, &mut |node| {
        for i in 0..2 {
            if node == targets[i] {
                found[i] = true;
                if found[1 - i] {
                    return ControlFlow::Break(());
                }
            }
        }
        if let Some(text) = surface.text(node).filter(|t| !t.is_empty()) {
            let len = char_len(text);
            for i in 0..2 {
                if !found[i] {
                    lengths[i] += len;
                }
            }
        }
        ControlFlow::Continue(())
    });

    Ok(CursorOffset::new(
        lengths[0] + selection.anchor_offset,
        lengths[1] + selection.focus_offset,
    ))
}

/// Place a collapsed caret at plain-text `offset`.
///
/// Returns false, leaving the selection untouched, when `offset` is past the end
/// of the rendered text. A surface with no text nodes (a cleared document) has no
/// caret position at all, so even offset 0 returns false there.
pub fn restore_offset<S: RenderSurface + ?Sized>(surface: &mut S, offset: usize) -> bool {
    let root = surface.root();
    let mut remaining = offset;
    let target = walk(&*surface, root, &mut |node| {
        if let Some(text) = surface.text(node) {
            let len = char_len(text);
            if len >= remaining {
                return ControlFlow::Break((node, remaining));
            }
            remaining -= len;
        }
        ControlFlow::Continue(())
    });

    match target {
        ControlFlow::Break((node, local)) => {
            surface.set_caret(node, local);
            true
        }
        ControlFlow::Continue(()) => {
            tracing::debug!(offset, "caret offset past end of rendered text");
            false
        }
    }
}
