use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use charguard::cli::{CliArgs, InputSource, OutputMode, RunConfig};
use charguard::commands::Cmd;
use charguard::highlight::HighlightEngine;
use charguard::messages::{EditSnapshot, Msg};
use charguard::model::HighlightEditor;
use charguard::surface::{restore_offset, MarkupSurface};
use charguard::update::update;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    charguard::tracing::init();

    let config = args.into_config().map_err(anyhow::Error::msg)?;
    let inputs = read_inputs(&config.input)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for (name, text) in inputs {
        tracing::debug!("Highlighting {} ({} bytes)", name, text.len());
        if config.replay {
            replay(&config, &text, &mut out)?;
        } else {
            highlight(&config, &text, &mut out)?;
        }
    }
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn read_inputs(source: &InputSource) -> Result<Vec<(String, String)>> {
    match source {
        InputSource::Stdin => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(vec![("<stdin>".to_string(), text)])
        }
        InputSource::Files(paths) => paths.iter().map(|p| read_file(p)).collect(),
    }
}

fn read_file(path: &Path) -> Result<(String, String)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok((path.display().to_string(), text))
}

/// One-shot highlight of a whole document
fn highlight(config: &RunConfig, text: &str, out: &mut impl Write) -> Result<()> {
    let mut engine = HighlightEngine::new(config.engine.allow_list());
    let outcome = engine.process(text);
    match config.output {
        OutputMode::Markup => writeln!(out, "{}", engine.markup())?,
        OutputMode::Json => {
            serde_json::to_writer(&mut *out, &outcome.data)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Feed each line as the next state of one document, through the editor component
/// and an in-memory surface, reporting the render decision per step
fn replay(config: &RunConfig, text: &str, out: &mut impl Write) -> Result<()> {
    let mut editor = HighlightEditor::new(config.engine.clone());
    let mut surface = MarkupSurface::new();
    let mut previous = String::new();

    for (step, line) in text.lines().enumerate() {
        apply_edit(&mut surface, &previous, line);
        previous = line.to_string();

        #[cfg(debug_assertions)]
        let before = charguard::tracing::CacheSnapshot::from_engine(&editor.engine);

        let cmd = match update(&mut editor, Msg::Input) {
            Some(Cmd::DebounceInput { revision, .. }) => update(
                &mut editor,
                Msg::InputReady {
                    revision,
                    snapshot: EditSnapshot::capture(&surface),
                },
            ),
            other => other,
        }
        .unwrap_or_default();

        #[cfg(debug_assertions)]
        if let Some(change) =
            before.diff(&charguard::tracing::CacheSnapshot::from_engine(&editor.engine))
        {
            tracing::debug!("step {}: {}", step + 1, change);
        }

        let decision = describe(&cmd);
        surface.execute(cmd);

        match config.output {
            OutputMode::Markup => writeln!(
                out,
                "step {}: {} (invalid: {})",
                step + 1,
                decision,
                editor.invalid_character_count()
            )?,
            OutputMode::Json => {
                let record = serde_json::json!({
                    "step": step + 1,
                    "render": decision,
                    "invalid_character_count": editor.invalid_character_count(),
                    "markup": surface.to_markup(),
                });
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

/// Replay the change from `previous` to `next` on the surface as typing
fn apply_edit(surface: &mut MarkupSurface, previous: &str, next: &str) {
    let old: Vec<char> = previous.chars().collect();
    let new: Vec<char> = next.chars().collect();
    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(old.len().min(new.len()) - prefix)
        .take_while(|(a, b)| a == b)
        .count();

    restore_offset(surface, old.len() - suffix);
    for _ in prefix..old.len() - suffix {
        surface.backspace();
    }
    let inserted: String = new[prefix..new.len() - suffix].iter().collect();
    if !inserted.is_empty() {
        surface.type_text(&inserted);
    }
}

fn describe(cmd: &Cmd) -> String {
    match cmd {
        Cmd::RenderAll { .. } => "full".to_string(),
        Cmd::ReplaceNodes { start, end, .. } => format!("partial {}..={}", start, end),
        Cmd::Batch(cmds) => cmds
            .iter()
            .map(describe)
            .find(|d| d != "unchanged")
            .unwrap_or_else(|| "unchanged".to_string()),
        _ => "unchanged".to_string(),
    }
}
