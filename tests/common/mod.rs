//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use charguard::commands::Cmd;
use charguard::config::EngineConfig;
use charguard::highlight::{
    tokenize, AllowList, EditOutcome, EditorData, HighlightEngine, NodeCache, Validator,
};
use charguard::messages::{EditSnapshot, Msg};
use charguard::model::HighlightEditor;
use charguard::surface::MarkupSurface;
use charguard::update::update;

/// Opening tag wrapping each invalid character
pub const INVALID_TAG: &str = "<font class='color-highlight'>";

/// Run every text through one engine in order, returning the last outcome
pub fn process_all(engine: &mut HighlightEngine, texts: &[&str]) -> EditOutcome {
    let mut last = engine.process("");
    for text in texts {
        last = engine.process(text);
    }
    last
}

/// Cache built from scratch for `text`
pub fn full_build(text: &str, allow_list: AllowList) -> NodeCache {
    NodeCache::build(&tokenize(text), &Validator::new(allow_list))
}

pub fn count_invalid_tags(markup: &str) -> usize {
    markup.matches(INVALID_TAG).count()
}

/// Editor with default config and a surface showing nothing yet
pub fn editor_with_surface() -> (HighlightEditor, MarkupSurface) {
    (
        HighlightEditor::new(EngineConfig::default()),
        MarkupSurface::new(),
    )
}

/// Drive one debounced edit through `update` and execute the resulting commands
/// on `surface`, returning the emitted data
pub fn settle(editor: &mut HighlightEditor, surface: &mut MarkupSurface) -> Option<EditorData> {
    let Some(Cmd::DebounceInput { revision, .. }) = update(editor, Msg::Input) else {
        return None;
    };
    let cmd = update(
        editor,
        Msg::InputReady {
            revision,
            snapshot: EditSnapshot::capture(surface),
        },
    )?;
    surface.execute(cmd).into_iter().find_map(|c| match c {
        Cmd::Emit(data) => Some(data),
        _ => None,
    })
}
