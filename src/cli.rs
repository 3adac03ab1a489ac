use clap::Parser;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::input::InputStructure;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only report failures
    Quiet,
    /// Show the standard run summary
    #[default]
    Normal,
    /// Show per-document failure detail
    Verbose,
    /// Show all available debugging information
    Debug,
}

/// Flatten XML-encoded records into a tab-separated table
#[derive(Parser, Debug, Clone)]
#[command(name = "flatten-xml")]
#[command(about = "Flatten XML-encoded records into a tab-separated table")]
#[command(version)]
pub struct Cli {
    /// Input file holding the XML documents
    #[arg(help = "Input file holding the XML documents")]
    pub input: Option<PathBuf>,

    /// Output file for the tab-separated table
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// How documents are packed into the input file
    #[arg(short = 'm', long = "mode", value_enum)]
    pub mode: Option<InputStructure>,

    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Namespace declaration as alias=URI (repeatable)
    #[arg(
        short = 'n',
        long = "namespace",
        value_name = "ALIAS=URI",
        action = clap::ArgAction::Append
    )]
    pub namespaces: Vec<String>,

    /// Candidate record path, tried in the given order (repeatable)
    #[arg(
        short = 'p',
        long = "record-path",
        value_name = "PATH",
        action = clap::ArgAction::Append
    )]
    pub record_paths: Vec<String>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", help = "Enable verbose output")]
    pub verbose: bool,

    /// Enable quiet mode (failures only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parse the repeatable alias=URI declarations into an ordered table.
    pub fn namespace_table(&self) -> Result<IndexMap<String, String>, String> {
        let mut table = IndexMap::new();
        for pair in &self.namespaces {
            match pair.split_once('=') {
                Some((alias, uri)) if !alias.is_empty() && !uri.is_empty() => {
                    table.insert(alias.to_string(), uri.to_string());
                }
                _ => {
                    return Err(format!(
                        "Invalid namespace declaration '{}' (expected ALIAS=URI)",
                        pair
                    ));
                }
            }
        }
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(input) = &self.input
            && !input.exists()
        {
            return Err(format!("Input file does not exist: {}", input.display()));
        }
        if let Some(config) = &self.config
            && !config.exists()
        {
            return Err(format!(
                "Configuration file does not exist: {}",
                config.display()
            ));
        }
        self.namespace_table()?;
        Ok(())
    }
}
