//! Configuration and CLI argument handling

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};

use crate::services::{FixedAnswer, InitPrompt, StdinPrompt};

/// How the first-run "create a timer?" question gets answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InitPolicy {
    /// Ask on the terminal
    Ask,
    /// Create the data file without asking
    Yes,
    /// Never create it; track in memory only
    No,
}

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "project-time")]
#[command(about = "Tracks active coding time per project from editor focus and save events")]
#[command(version)]
pub struct Config {
    /// Project root to track (defaults to the current directory)
    #[arg(long, value_name = "PATH")]
    pub project: Option<PathBuf>,

    /// Run without a project root; nothing is saved
    #[arg(long, conflicts_with = "project")]
    pub ephemeral: bool,

    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Answer for the first-run timer initialization prompt
    #[arg(long, value_enum, default_value_t = InitPolicy::Ask)]
    pub init: InitPolicy,

    /// Minutes between automatic checkpoints (0 disables)
    #[arg(short, long, default_value = "5")]
    pub checkpoint_interval: u64,

    /// Print the stored time for the project and exit
    #[arg(long)]
    pub show: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Resolve the project root. `None` means in-memory only: either
    /// `--ephemeral` was given or the current directory is unavailable.
    pub fn project_root(&self) -> anyhow::Result<Option<PathBuf>> {
        if self.ephemeral {
            return Ok(None);
        }

        match &self.project {
            Some(path) => {
                if !path.is_dir() {
                    bail!("Project path {} is not a directory", path.display());
                }
                let root = path
                    .canonicalize()
                    .with_context(|| format!("Failed to resolve project path {}", path.display()))?;
                Ok(Some(root))
            }
            None => Ok(std::env::current_dir().ok()),
        }
    }

    /// The prompt implementation selected by `--init`
    pub fn prompt(&self) -> Box<dyn InitPrompt> {
        match self.init {
            InitPolicy::Ask => Box::new(StdinPrompt),
            InitPolicy::Yes => Box::new(FixedAnswer(true)),
            InitPolicy::No => Box::new(FixedAnswer(false)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("project-time").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn defaults() {
        let config = parse(&[]);
        assert_eq!(config.address(), "127.0.0.1:20554");
        assert_eq!(config.init, InitPolicy::Ask);
        assert_eq!(config.checkpoint_interval, 5);
        assert_eq!(config.log_level(), "info");
        assert!(!config.show);
    }

    #[test]
    fn init_policy_values() {
        assert_eq!(parse(&["--init", "yes"]).init, InitPolicy::Yes);
        assert_eq!(parse(&["--init", "no"]).init, InitPolicy::No);
    }

    #[test]
    fn ephemeral_has_no_root() {
        let config = parse(&["--ephemeral"]);
        assert!(config.project_root().unwrap().is_none());
    }

    #[test]
    fn ephemeral_conflicts_with_project() {
        let result = Config::try_parse_from(["project-time", "--ephemeral", "--project", "/tmp"]);
        assert!(result.is_err());
    }

    #[test]
    fn explicit_project_is_canonicalized() {
        let tmp = TempDir::new().unwrap();
        let config = parse(&["--project", tmp.path().to_str().unwrap()]);
        assert_eq!(
            config.project_root().unwrap(),
            Some(tmp.path().canonicalize().unwrap())
        );
    }

    #[test]
    fn missing_project_dir_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let config = parse(&["--project", missing.to_str().unwrap()]);
        assert!(config.project_root().is_err());
    }
}
