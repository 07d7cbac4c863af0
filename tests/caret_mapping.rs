//! Caret capture and restore across re-renders of a markup surface

mod common;

use charguard::highlight::HighlightEngine;
use charguard::surface::{
    capture_offset, restore_offset, CursorOffset, MarkupSurface, RawSelection, RenderSurface,
};

fn rendered(engine: &HighlightEngine) -> MarkupSurface {
    MarkupSurface::from_markup(&engine.markup())
}

#[test]
fn test_caret_follows_inserted_character() {
    let mut engine = HighlightEngine::default();
    engine.process("hello");
    let mut surface = rendered(&engine);

    assert!(restore_offset(&mut surface, 5));
    surface.type_text("$");
    let caret = capture_offset(&surface).unwrap();
    assert_eq!(caret, CursorOffset::caret(6));

    let outcome = engine.process(&surface.plain_text());
    surface.apply(&outcome.render);
    assert!(restore_offset(&mut surface, caret.end));
    assert_eq!(capture_offset(&surface), Ok(CursorOffset::caret(6)));
}

#[test]
fn test_caret_survives_partial_render() {
    let mut engine = HighlightEngine::default();
    engine.process("ab cd ef");
    let mut surface = rendered(&engine);

    // Type inside the middle word
    assert!(restore_offset(&mut surface, 4));
    surface.type_text("%");
    let caret = capture_offset(&surface).unwrap();
    assert_eq!(surface.plain_text(), "ab c%d ef");

    let outcome = engine.process(&surface.plain_text());
    surface.apply(&outcome.render);
    assert_eq!(surface.to_markup(), engine.markup());
    assert!(restore_offset(&mut surface, caret.end));
    assert_eq!(capture_offset(&surface), Ok(CursorOffset::caret(5)));
}

#[test]
fn test_selection_range_is_normalized() {
    let mut engine = HighlightEngine::default();
    engine.process("one two");
    let mut surface = rendered(&engine);
    let leaves = surface.text_nodes();
    surface.set_selection(RawSelection {
        anchor_node: leaves[2],
        anchor_offset: 2,
        focus_node: leaves[0],
        focus_offset: 1,
    });
    assert_eq!(capture_offset(&surface), Ok(CursorOffset { start: 1, end: 6 }));
}

#[test]
fn test_selection_on_root_uses_raw_offsets() {
    let mut surface = MarkupSurface::from_markup("<span>abc</span>");
    let root = surface.root();
    surface.set_selection(RawSelection::caret(root, 1));
    assert_eq!(capture_offset(&surface), Ok(CursorOffset::caret(1)));
}

#[test]
fn test_restore_past_end_leaves_selection() {
    let mut surface = MarkupSurface::from_markup("<span>abc</span>");
    assert!(restore_offset(&mut surface, 1));
    let before = surface.selection();
    assert!(!restore_offset(&mut surface, 99));
    assert_eq!(surface.selection(), before);
}
