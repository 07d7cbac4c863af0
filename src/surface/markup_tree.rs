//! In-memory rendering surface backed by a parsed markup tree.
//!
//! Behaves like the editable container the highlighter renders into: the engine's
//! markup is parsed into element and text nodes under a single root, rendered
//! nodes can be swapped by index range, and a selection can be placed on any node.
//! Typing helpers simulate user edits for the CLI, tests and benchmarks.

use std::ops::ControlFlow;

use super::cursor::{capture_offset, restore_offset, walk};
use super::{RawSelection, RenderSurface};
use crate::commands::Cmd;
use crate::highlight::Render;
use crate::util::markup::{escape_into, parse_markup, MarkupEvent};
use crate::util::text::char_len;

const VOID_TAGS: &[&str] = &["br", "hr", "img", "input", "link", "meta", "wbr"];

/// Index of a node in the surface arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element { tag: String, class: Option<String> },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A markup tree under a single root element, plus the current selection
#[derive(Debug, Clone)]
pub struct MarkupSurface {
    nodes: Vec<Node>,
    root: NodeId,
    selection: Option<RawSelection<NodeId>>,
}

impl Default for MarkupSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupSurface {
    /// Empty surface with a `div` root
    pub fn new() -> Self {
        let root = Node {
            kind: NodeKind::Element {
                tag: "div".to_string(),
                class: None,
            },
            parent: None,
            children: Vec::new(),
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            selection: None,
        }
    }

    pub fn from_markup(markup: &str) -> Self {
        let mut surface = Self::new();
        surface.set_content(markup);
        surface
    }

    /// Replace the whole content of the root
    pub fn set_content(&mut self, markup: &str) {
        let root = self.root;
        for child in std::mem::take(&mut self.nodes[root.0].children) {
            self.nodes[child.0].parent = None;
        }
        let ids = self.parse_fragment(markup);
        self.adopt(root, 0, ids);
        self.drop_stale_selection();
    }

    /// Replace root children `start..=end` with the nodes of `fragments`.
    /// Indices past the end are clamped, so `start == child_count()` appends.
    pub fn replace_nodes(&mut self, start: usize, end: usize, fragments: &[String]) {
        let root = self.root;
        let count = self.nodes[root.0].children.len();
        let start = start.min(count);
        let end = end.saturating_add(1).clamp(start, count);

        let removed: Vec<NodeId> = self.nodes[root.0].children.drain(start..end).collect();
        for id in removed {
            self.nodes[id.0].parent = None;
        }

        let mut ids = Vec::new();
        for fragment in fragments {
            ids.extend(self.parse_fragment(fragment));
        }
        self.adopt(root, start, ids);
        self.drop_stale_selection();
    }

    /// Apply an engine render to this surface
    pub fn apply(&mut self, render: &Render) {
        match render {
            Render::Full { markup } => self.set_content(markup),
            Render::Partial {
                start,
                end,
                fragments,
            } => self.replace_nodes(*start, *end, fragments),
            Render::Unchanged => {}
        }
    }

    /// Execute the surface-side effects of `cmd`.
    ///
    /// Returns the commands a surface cannot perform (timers, data emission) so the
    /// host can handle them.
    pub fn execute(&mut self, cmd: Cmd) -> Vec<Cmd> {
        let mut pending = Vec::new();
        self.execute_into(cmd, &mut pending);
        pending
    }

    fn execute_into(&mut self, cmd: Cmd, pending: &mut Vec<Cmd>) {
        match cmd {
            Cmd::None => {}
            Cmd::RenderAll { markup } => self.set_content(&markup),
            Cmd::ReplaceNodes {
                start,
                end,
                fragments,
            } => self.replace_nodes(start, end, &fragments),
            Cmd::RestoreCaret { offset } => {
                restore_offset(self, offset);
            }
            Cmd::ClearSelection => self.clear_selection(),
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.execute_into(cmd, pending);
                }
            }
            other @ (Cmd::DebounceInput { .. } | Cmd::Emit(_)) => pending.push(other),
        }
    }

    pub fn set_selection(&mut self, selection: RawSelection<NodeId>) {
        self.selection = Some(selection);
    }

    /// Number of rendered nodes directly under the root
    pub fn child_count(&self) -> usize {
        self.nodes[self.root.0].children.len()
    }

    /// All text nodes in document order
    pub fn text_nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let _ = walk(self, self.root, &mut |id| {
            if matches!(self.nodes[id.0].kind, NodeKind::Text(_)) {
                nodes.push(id);
            }
            ControlFlow::<()>::Continue(())
        });
        nodes
    }

    /// Serialize the root's content back to markup
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for &child in &self.nodes[self.root.0].children {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Insert `text` at the caret (end of text when there is no caret) and move
    /// the caret after it
    pub fn type_text(&mut self, text: &str) {
        let offset = self.caret_offset();
        let (node, local) = match self.leaf_at(offset) {
            Some(found) => found,
            None => {
                let id = self.alloc(NodeKind::Text(String::new()));
                let root = self.root;
                let at = self.child_count();
                self.adopt(root, at, vec![id]);
                (id, 0)
            }
        };
        if let NodeKind::Text(content) = &mut self.nodes[node.0].kind {
            let byte = byte_index(content, local);
            content.insert_str(byte, text);
        }
        self.set_caret(node, local + char_len(text));
    }

    /// Delete the character before the caret
    pub fn backspace(&mut self) {
        let offset = self.caret_offset();
        if offset == 0 {
            return;
        }
        let mut remaining = offset - 1;
        let target = walk(&*self, self.root, &mut |id| {
            if let NodeKind::Text(content) = &self.nodes[id.0].kind {
                let len = char_len(content);
                if remaining < len {
                    return ControlFlow::Break((id, remaining));
                }
                remaining -= len;
            }
            ControlFlow::Continue(())
        });
        if let ControlFlow::Break((node, local)) = target {
            if let NodeKind::Text(content) = &mut self.nodes[node.0].kind {
                let byte = byte_index(content, local);
                content.remove(byte);
            }
            restore_offset(self, offset - 1);
        }
    }

    fn caret_offset(&self) -> usize {
        capture_offset(self)
            .map(|c| c.end)
            .unwrap_or_else(|_| char_len(&self.plain_text()))
    }

    /// Text node and local offset covering plain-text `offset`
    fn leaf_at(&self, offset: usize) -> Option<(NodeId, usize)> {
        let mut remaining = offset;
        match walk(self, self.root, &mut |id| {
            if let NodeKind::Text(content) = &self.nodes[id.0].kind {
                let len = char_len(content);
                if len >= remaining {
                    return ControlFlow::Break((id, remaining));
                }
                remaining -= len;
            }
            ControlFlow::Continue(())
        }) {
            ControlFlow::Break(found) => Some(found),
            ControlFlow::Continue(()) => None,
        }
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn adopt(&mut self, parent: NodeId, at: usize, ids: Vec<NodeId>) {
        for &id in &ids {
            self.nodes[id.0].parent = Some(parent);
        }
        self.nodes[parent.0].children.splice(at..at, ids);
    }

    /// Build detached nodes for `markup`, returning the top-level ones.
    /// Malformed markup becomes a single literal text node.
    fn parse_fragment(&mut self, markup: &str) -> Vec<NodeId> {
        let events = match parse_markup(markup) {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("Rendering malformed markup as text: {}", e);
                vec![MarkupEvent::Text(markup.to_string())]
            }
        };

        let mut top = Vec::new();
        let mut open: Vec<NodeId> = Vec::new();
        for event in events {
            let kind = match event {
                MarkupEvent::Open { tag, class } => NodeKind::Element { tag, class },
                MarkupEvent::Text(text) => NodeKind::Text(text),
                MarkupEvent::Close { .. } => {
                    open.pop();
                    continue;
                }
            };
            let is_element = matches!(kind, NodeKind::Element { .. });
            let id = self.alloc(kind);
            match open.last() {
                Some(&parent) => {
                    self.nodes[id.0].parent = Some(parent);
                    self.nodes[parent.0].children.push(id);
                }
                None => top.push(id),
            }
            if is_element {
                open.push(id);
            }
        }
        top
    }

    fn drop_stale_selection(&mut self) {
        if let Some(sel) = self.selection {
            if !self.contains(sel.anchor_node) || !self.contains(sel.focus_node) {
                self.selection = None;
            }
        }
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Text(text) => escape_into(out, text),
            NodeKind::Element { tag, class } => {
                out.push('<');
                out.push_str(tag);
                if let Some(class) = class {
                    out.push_str(" class='");
                    out.push_str(class);
                    out.push('\'');
                }
                out.push('>');
                if VOID_TAGS.contains(&tag.as_str()) {
                    return;
                }
                for &child in &node.children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(i, _)| i)
}

impl RenderSurface for MarkupSurface {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }

    fn selection(&self) -> Option<RawSelection<NodeId>> {
        self.selection
    }

    fn set_caret(&mut self, node: NodeId, offset: usize) {
        self.selection = Some(RawSelection::caret(node, offset));
    }

    fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Follows parent links, so detached subtrees are never contained
    fn contains(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.root {
                return true;
            }
            current = self.nodes.get(id.0).and_then(|n| n.parent);
        }
        false
    }
}
