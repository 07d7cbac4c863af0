//! charguard - incremental allow-list highlighting for freeform text
//!
//! This crate provides the highlight engine, a caret mapper over an abstract
//! rendering surface, and an editor component implementing the Elm Architecture
//! pattern on top of them.

pub mod cli;
pub mod commands;
pub mod config;
pub mod highlight;
pub mod messages;
pub mod model;
pub mod surface;
pub mod tracing;
pub mod update;
pub mod util;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::EngineConfig;
pub use highlight::{EditorData, HighlightEngine, Render};
pub use messages::{EditSnapshot, Msg};
pub use model::HighlightEditor;
pub use surface::{CursorOffset, MarkupSurface, RenderSurface};
