//! # meshport CLI Module
//!
//! This module implements the CLI interface for meshport.
//!
//! ## Available Commands
//!
//! - `model import` - Import a model from a file, directory, CSV set or URL

mod commands;

use crate::config::Config;
use clap::{Args, Parser, Subcommand};
use meshport_core::{ImportError, Renderer};
use std::path::PathBuf;

pub use commands::*;

/// Usage text attached to argument errors of `model import`.
pub const IMPORT_USAGE: &str = "Usage: meshport model import [ file | filePath | URL ]\nRun 'meshport model import --help' to see detailed help message";

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// meshport - Meshery model importer
///
/// Uploads model definitions to a Meshery registry and reports what was
/// registered.
#[derive(Parser, Debug)]
#[command(name = "meshport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Registry base URL (overrides configuration)
    #[arg(long, global = true, value_name = "BASE_URL")]
    pub url: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage models
    Model {
        #[command(subcommand)]
        command: ModelCommands,
    },
}

/// `model` subcommands.
#[derive(Subcommand, Debug)]
pub enum ModelCommands {
    /// Import models from a file, directory, CSV set or URL
    #[command(after_help = "Examples:\n  \
        meshport model import -f ./model.yaml\n  \
        meshport model import ./models/kubernetes\n  \
        meshport model import ./csv-export/\n  \
        meshport model import https://github.com/meshery/meshery/raw/master/model.tar")]
    Import(ImportArgs),
}

/// Arguments of `model import`.
#[derive(Args, Debug, Clone, Default)]
pub struct ImportArgs {
    /// File, directory or URL to import
    #[arg(short, long, value_name = "PATH|URL")]
    pub file: Option<String>,

    /// File, directory or URL to import
    #[arg(value_name = "PATH|URL")]
    pub inputs: Vec<String>,
}

impl ImportArgs {
    /// The single input to import, from the flag or the positional argument.
    pub fn input(&self) -> Result<&str, ImportError> {
        let usage = |reason: &str| ImportError::Usage(format!("{reason}\n\n{IMPORT_USAGE}"));

        match (self.file.as_deref(), self.inputs.as_slice()) {
            (Some(file), []) => Ok(file),
            (None, [input]) => Ok(input.as_str()),
            (None, []) => Err(usage("[ file | filepath | URL ] isn't specified")),
            (Some(_), _) => Err(usage(
                "specify the input either with --file or as an argument, not both",
            )),
            (None, _) => Err(usage("too many arguments")),
        }
    }
}

// =============================================================================
// ARGUMENT NORMALIZATION
// =============================================================================

/// Lowercase long flag names so `--FILE` and `--File` mean `--file`.
///
/// Only the name is touched; values and `--name=value` payloads keep their
/// case, and everything after `--` is passed through.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut passthrough = false;
    args.into_iter()
        .map(|arg| {
            if passthrough || !arg.starts_with("--") {
                return arg;
            }
            if arg == "--" {
                passthrough = true;
                return arg;
            }
            match arg.split_once('=') {
                Some((name, value)) => format!("{}={}", name.to_lowercase(), value),
                None => arg.to_lowercase(),
            }
        })
        .collect()
}

/// Pick a renderer for a stream.
///
/// Styling needs a terminal and no `NO_COLOR` in the environment.
pub fn renderer_for(is_terminal: bool) -> Renderer {
    let no_color = std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    if is_terminal && !no_color {
        Renderer::styled()
    } else {
        Renderer::plain()
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli, renderer: Renderer) -> Result<(), ImportError> {
    match cli.command {
        Commands::Model {
            command: ModelCommands::Import(args),
        } => {
            let input = args.input()?;
            let config = Config::resolve(cli.config.as_deref(), cli.url)?;
            cmd_model_import(&config, input, renderer).await
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn args(file: Option<&str>, inputs: &[&str]) -> ImportArgs {
        ImportArgs {
            file: file.map(str::to_string),
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn flag_or_positional_is_accepted() {
        assert_eq!(args(Some("a.yaml"), &[]).input().ok(), Some("a.yaml"));
        assert_eq!(args(None, &["b.yaml"]).input().ok(), Some("b.yaml"));
    }

    #[test]
    fn missing_input_carries_usage() {
        let err = args(None, &[]).input().expect_err("usage");
        let text = err.to_string();
        assert!(text.starts_with("[ file | filepath | URL ] isn't specified"));
        assert!(text.ends_with(IMPORT_USAGE));
    }

    #[test]
    fn extra_positionals_are_rejected() {
        let err = args(None, &["a", "b"]).input().expect_err("usage");
        assert!(err.to_string().starts_with("too many arguments"));
    }

    #[test]
    fn flag_and_positional_are_rejected() {
        let err = args(Some("a"), &["b"]).input().expect_err("usage");
        assert!(matches!(err, ImportError::Usage(_)));
    }

    #[test]
    fn normalization_keeps_values() {
        let out = normalize_args(
            ["meshport", "model", "import", "--FILE", "./My.YAML", "--Url=http://X"]
                .map(String::from),
        );
        assert_eq!(
            out,
            vec!["meshport", "model", "import", "--file", "./My.YAML", "--url=http://X"]
        );
    }

    #[test]
    fn normalization_stops_at_double_dash() {
        let out = normalize_args(["import", "--", "--WEIRD"].map(String::from));
        assert_eq!(out, vec!["import", "--", "--WEIRD"]);
    }
}
