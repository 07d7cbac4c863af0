//! Update functions for the Elm-style architecture
//!
//! All state transformations of the editor component flow through these functions.

use crate::commands::Cmd;
use crate::highlight::EditOutcome;
use crate::messages::{EditSnapshot, Msg};
use crate::model::HighlightEditor;
use crate::surface::CursorOffset;

/// Main update function
pub fn update(model: &mut HighlightEditor, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::Input => {
            if model.disabled {
                return None;
            }
            model.revision += 1;
            Some(Cmd::DebounceInput {
                revision: model.revision,
                delay_ms: model.config.debounce_ms,
            })
        }

        Msg::InputReady { revision, snapshot } => {
            if model.disabled {
                return None;
            }
            // Skip if the surface has been edited since debounce started
            if model.revision != revision {
                tracing::debug!(
                    "Skipping stale input: revision {} != request revision {}",
                    model.revision,
                    revision
                );
                return None;
            }
            Some(process_snapshot(model, snapshot))
        }

        Msg::Blur(snapshot) => {
            model.focused = false;
            // Pending debounced input is superseded by this immediate pass
            model.revision += 1;
            if model.disabled {
                return Some(Cmd::ClearSelection);
            }
            let cmd = process_snapshot(model, snapshot);
            Some(Cmd::batch(vec![cmd, Cmd::ClearSelection]))
        }

        Msg::Focus => {
            if !model.disabled {
                model.focused = true;
                model.touched = true;
            }
            None
        }

        Msg::SetValue(value) => {
            model.revision += 1;
            let outcome = model.engine.process_value(&value);
            let caret = model.last_caret;
            Some(finish_edit(model, outcome, caret))
        }

        Msg::SetDisabled(disabled) => {
            model.disabled = disabled;
            if disabled {
                model.focused = false;
            }
            None
        }
    }
}

fn process_snapshot(model: &mut HighlightEditor, snapshot: EditSnapshot) -> Cmd {
    tracing::debug!(
        "Processing edit rev={} ({} chars, caret {:?})",
        model.revision,
        snapshot.text.chars().count(),
        snapshot.caret
    );
    // A failed capture keeps the previous caret and skips the restore
    if snapshot.caret.is_some() {
        model.last_caret = snapshot.caret;
    }
    let outcome = model.engine.process(&snapshot.text);
    finish_edit(model, outcome, snapshot.caret)
}

/// Render, put the caret back, then report the data
fn finish_edit(
    model: &mut HighlightEditor,
    outcome: EditOutcome,
    caret: Option<CursorOffset>,
) -> Cmd {
    let mut cmds = Vec::with_capacity(3);
    if !outcome.render.is_unchanged() {
        cmds.push(Cmd::from(outcome.render));
        cmds.extend(Cmd::restore_caret(caret));
    }
    model.value = outcome.data.clone();
    cmds.push(Cmd::Emit(outcome.data));
    Cmd::batch(cmds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    fn ready(model: &mut HighlightEditor, text: &str, caret: usize) -> Option<Cmd> {
        update(model, Msg::Input);
        let revision = model.revision;
        update(
            model,
            Msg::InputReady {
                revision,
                snapshot: EditSnapshot::new(text, Some(CursorOffset::caret(caret))),
            },
        )
    }

    #[test]
    fn test_input_starts_debounce() {
        let mut model = HighlightEditor::new(EngineConfig {
            debounce_ms: 250,
            ..EngineConfig::default()
        });
        assert_eq!(
            update(&mut model, Msg::Input),
            Some(Cmd::DebounceInput {
                revision: 1,
                delay_ms: 250
            })
        );
    }

    #[test]
    fn test_stale_revision_is_ignored() {
        let mut model = HighlightEditor::default();
        update(&mut model, Msg::Input);
        update(&mut model, Msg::Input);
        let cmd = update(
            &mut model,
            Msg::InputReady {
                revision: 1,
                snapshot: EditSnapshot::new("a$", None),
            },
        );
        assert_eq!(cmd, None);
        assert!(model.engine.node_cache().is_empty());
    }

    #[test]
    fn test_ready_renders_restores_and_emits() {
        let mut model = HighlightEditor::default();
        let cmd = ready(&mut model, "a$", 2).unwrap();
        let Cmd::Batch(cmds) = cmd else {
            panic!("expected batch");
        };
        assert!(matches!(cmds[0], Cmd::RenderAll { .. }));
        assert_eq!(cmds[1], Cmd::RestoreCaret { offset: 2 });
        assert!(matches!(cmds[2], Cmd::Emit(_)));
        assert_eq!(model.invalid_character_count(), 1);
    }

    #[test]
    fn test_disabled_ignores_input() {
        let mut model = HighlightEditor::default();
        update(&mut model, Msg::SetDisabled(true));
        assert_eq!(update(&mut model, Msg::Input), None);
        assert_eq!(model.revision, 0);
    }

    #[test]
    fn test_blur_clears_selection_and_cancels_pending() {
        let mut model = HighlightEditor::default();
        update(&mut model, Msg::Focus);
        update(&mut model, Msg::Input);
        let pending = model.revision;
        let cmd = update(&mut model, Msg::Blur(EditSnapshot::new("ok", None))).unwrap();
        assert!(!model.focused);
        assert!(model.touched);
        let Cmd::Batch(cmds) = cmd else {
            panic!("expected batch");
        };
        assert_eq!(cmds.last(), Some(&Cmd::ClearSelection));

        let stale = update(
            &mut model,
            Msg::InputReady {
                revision: pending,
                snapshot: EditSnapshot::new("ok!", None),
            },
        );
        assert_eq!(stale, None);
    }

    #[test]
    fn test_set_value_extracts_markup() {
        let mut model = HighlightEditor::default();
        let cmd = update(
            &mut model,
            Msg::SetValue("<span>a</span><span>%</span>".to_string()),
        )
        .unwrap();
        assert_eq!(model.value.plain_text, "a%");
        assert_eq!(cmd.emitted().map(|d| d.invalid_character_count), Some(1));
    }
}
