//! Rendering surface abstraction and caret mapping.
//!
//! The engine never owns the visual tree. A [`RenderSurface`] exposes the rendered
//! node tree and the live selection; [`cursor`] converts that selection into a
//! plain-text offset before an edit and places the caret back afterwards.
//! [`MarkupSurface`] is an in-memory surface built from the engine's markup.

pub mod cursor;
pub mod markup_tree;

pub use cursor::{capture_offset, restore_offset, walk, CaretError, CursorOffset};
pub use markup_tree::{MarkupSurface, NodeId};

/// Raw selection as reported by a surface: node-local offsets on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSelection<N> {
    pub anchor_node: N,
    pub anchor_offset: usize,
    pub focus_node: N,
    pub focus_offset: usize,
}

impl<N: Copy> RawSelection<N> {
    /// A collapsed selection (caret) at `offset` inside `node`
    pub fn caret(node: N, offset: usize) -> Self {
        Self {
            anchor_node: node,
            anchor_offset: offset,
            focus_node: node,
            focus_offset: offset,
        }
    }
}

/// A rendered node tree plus a selection, as seen by the caret mapper
pub trait RenderSurface {
    /// Handle to one node of the tree
    type Node: Copy + Eq + std::fmt::Debug;

    /// The container element holding all rendered content
    fn root(&self) -> Self::Node;

    /// Children of `node` in document order
    fn children(&self, node: Self::Node) -> &[Self::Node];

    /// Text of `node` if it is a text node, None for elements
    fn text(&self, node: Self::Node) -> Option<&str>;

    /// The live selection, if any
    fn selection(&self) -> Option<RawSelection<Self::Node>>;

    /// Place a collapsed caret at `offset` inside `node`
    fn set_caret(&mut self, node: Self::Node, offset: usize);

    fn clear_selection(&mut self);

    /// Whether `node` is `root` or one of its descendants
    fn contains(&self, node: Self::Node) -> bool {
        walk(self, self.root(), &mut |n| {
            if n == node {
                std::ops::ControlFlow::Break(())
            } else {
                std::ops::ControlFlow::Continue(())
            }
        })
        .is_break()
    }

    /// Concatenated text of every text node, in document order
    fn plain_text(&self) -> String {
        let mut text = String::new();
        let _ = walk(self, self.root(), &mut |n| {
            if let Some(t) = self.text(n) {
                text.push_str(t);
            }
            std::ops::ControlFlow::<()>::Continue(())
        });
        text
    }
}
