//! Command-line argument parsing for slate.
//!
//! This module provides the `Cli` struct which encapsulates all command-line
//! options and methods for parsing them.

use crate::config::{Config, ConfigValue};
use crate::core::error::{EditorError, Result};
use std::path::PathBuf;

const USAGE: &str = "\
slate - A small terminal text editor

Usage: slate [OPTIONS] [FILE]

Options:
  -h, --help             Show this help message
  -s, --syntax NAME      Highlight as NAME (plain, c, rust, python, shell)
  -N, --no-line-numbers  Hide the line number gutter
  -l, --log FILE         Write a trace log to FILE (filter with SLATE_LOG)";

/// Command-line interface configuration.
#[derive(Debug, Default, PartialEq)]
pub struct Cli {
    /// File(s) to open
    pub files: Vec<PathBuf>,

    /// Language override
    pub syntax: Option<String>,

    /// Hide line numbers
    pub no_line_numbers: bool,

    /// Log file path
    pub log: Option<PathBuf>,

    /// Help was requested
    pub help: bool,
}

impl Cli {
    /// Parse the process's command-line arguments.
    pub fn parse() -> Result<Self> {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parse arguments, excluding the program name.
    ///
    /// Returns an error for unknown flags or a flag missing its value.
    pub fn parse_from<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cli = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => cli.help = true,
                "-N" | "--no-line-numbers" => cli.no_line_numbers = true,
                "-s" | "--syntax" => {
                    let name = args
                        .next()
                        .ok_or_else(|| EditorError::Cli("--syntax requires a value".into()))?;
                    cli.syntax = Some(name);
                }
                "-l" | "--log" => {
                    let path = args
                        .next()
                        .ok_or_else(|| EditorError::Cli("--log requires a value".into()))?;
                    cli.log = Some(PathBuf::from(path));
                }
                "--" => cli.files.extend(args.by_ref().map(PathBuf::from)),
                flag if flag.starts_with('-') && flag.len() > 1 => {
                    return Err(EditorError::Cli(format!(
                        "Unknown flag: {}. Use --help for usage.",
                        flag
                    )));
                }
                _ => {
                    // Positional arguments are files
                    cli.files.push(PathBuf::from(arg));
                }
            }
        }

        Ok(cli)
    }

    pub fn usage() -> &'static str {
        USAGE
    }

    /// Apply CLI overrides to a configuration object.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(syntax) = &self.syntax {
            config.set("syntax", ConfigValue::String(syntax.clone()));
        }
        if self.no_line_numbers {
            config.set("line-numbers", false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli> {
        Cli::parse_from(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_files_and_flags() {
        let cli = parse(&["--syntax", "rust", "-N", "main.rs", "--log", "/tmp/slate.log"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("main.rs")]);
        assert_eq!(cli.syntax.as_deref(), Some("rust"));
        assert!(cli.no_line_numbers);
        assert_eq!(cli.log, Some(PathBuf::from("/tmp/slate.log")));
        assert!(!cli.help);
    }

    #[test]
    fn test_missing_value_and_unknown_flag() {
        assert!(matches!(parse(&["--syntax"]), Err(EditorError::Cli(_))));
        assert!(matches!(parse(&["--frobnicate"]), Err(EditorError::Cli(_))));
    }

    #[test]
    fn test_double_dash_ends_flags() {
        let cli = parse(&["--", "-odd-name"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("-odd-name")]);
    }

    #[test]
    fn test_apply_to_config() {
        let mut config = Config::default();
        config.set("line-numbers", true);
        let cli = parse(&["-s", "python", "--no-line-numbers"]).unwrap();
        cli.apply_to_config(&mut config);
        assert_eq!(config.get_string("syntax"), Some("python"));
        assert_eq!(config.get_bool("line-numbers"), Some(false));

        let mut untouched = Config::default();
        Cli::default().apply_to_config(&mut untouched);
        assert!(untouched.settings.is_empty());
    }
}
