//! Command-line argument parsing
//!
//! Supports:
//! - Highlighting files or stdin
//! - JSON output of the emitted editor data
//! - Replay mode, feeding each input line as a successive document snapshot
//! - Allow-list profile and config file overrides

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::EngineConfig;
use crate::highlight::AllowListProfile;

/// Highlight characters outside an allow-list
#[derive(Parser, Debug)]
#[command(
    name = "charguard",
    version,
    about = "Highlight characters outside an allow-list"
)]
pub struct CliArgs {
    /// Files to highlight (stdin when empty)
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Allow-list profile, overriding the config file
    #[arg(short = 'p', long, value_enum)]
    pub profile: Option<ProfileArg>,

    /// Print the emitted editor data as JSON instead of markup
    #[arg(long)]
    pub json: bool,

    /// Treat each input line as the next snapshot of one document
    #[arg(short = 'r', long)]
    pub replay: bool,

    /// Read configuration from this file instead of the default location
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProfileArg {
    Strict,
    Extended,
}

impl From<ProfileArg> for AllowListProfile {
    fn from(arg: ProfileArg) -> Self {
        match arg {
            ProfileArg::Strict => AllowListProfile::Strict,
            ProfileArg::Extended => AllowListProfile::Extended,
        }
    }
}

/// Where input text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    Files(Vec<PathBuf>),
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Markup,
    Json,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: InputSource,
    pub output: OutputMode,
    pub replay: bool,
    pub engine: EngineConfig,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration, loading the config file
    pub fn into_config(self) -> Result<RunConfig, String> {
        let mut engine = match &self.config {
            Some(path) if !path.is_file() => {
                return Err(format!("Config file not found: {}", path.display()));
            }
            Some(path) => EngineConfig::load_from(path),
            None => EngineConfig::load(),
        };
        if let Some(profile) = self.profile {
            engine.allow_list = profile.into();
        }

        if let Some(dir) = self.paths.iter().find(|p| p.is_dir()) {
            return Err(format!("Cannot highlight a directory: {}", dir.display()));
        }
        let input = if self.paths.is_empty() {
            InputSource::Stdin
        } else {
            InputSource::Files(self.paths)
        };

        Ok(RunConfig {
            input,
            output: if self.json {
                OutputMode::Json
            } else {
                OutputMode::Markup
            },
            replay: self.replay,
            engine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(paths: Vec<PathBuf>) -> CliArgs {
        CliArgs {
            paths,
            profile: None,
            json: false,
            replay: false,
            config: None,
        }
    }

    #[test]
    fn test_no_paths_reads_stdin() {
        let config = args(vec![]).into_config().unwrap();
        assert_eq!(config.input, InputSource::Stdin);
        assert_eq!(config.output, OutputMode::Markup);
    }

    #[test]
    fn test_profile_overrides_config() {
        let mut cli = args(vec![PathBuf::from("notes.txt")]);
        cli.profile = Some(ProfileArg::Extended);
        cli.json = true;
        let config = cli.into_config().unwrap();
        assert_eq!(config.engine.allow_list, AllowListProfile::Extended);
        assert_eq!(config.output, OutputMode::Json);
        assert_eq!(
            config.input,
            InputSource::Files(vec![PathBuf::from("notes.txt")])
        );
    }

    #[test]
    fn test_directory_is_rejected() {
        let dir = std::env::temp_dir();
        assert!(args(vec![dir]).into_config().is_err());
    }

    #[test]
    fn test_missing_config_file_is_rejected() {
        let mut cli = args(vec![]);
        cli.config = Some(PathBuf::from("/nonexistent/charguard.yaml"));
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn test_parse_from_command_line() {
        let cli = CliArgs::parse_from(["charguard", "--replay", "-p", "strict", "a.txt"]);
        assert!(cli.replay);
        assert_eq!(cli.profile, Some(ProfileArg::Strict));
        assert_eq!(cli.paths, vec![PathBuf::from("a.txt")]);
    }
}
