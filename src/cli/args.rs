//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `extract`: Scan sources, merge keys into the translation tables and
//!   optionally machine-translate new entries
//! - `init`: Write a default configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::config::{ConfigOverrides, ConfigSource};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }
}

/// Configuration file selection, shared by commands that load config.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Config file path (default: search upwards for .keyharvestrc.json)
    #[arg(long, value_name = "PATH", conflicts_with = "no_config")]
    pub config: Option<PathBuf>,

    /// Ignore config files, use defaults and flags only
    #[arg(long)]
    pub no_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConfigArgs {
    pub fn source(&self) -> ConfigSource {
        if self.no_config {
            ConfigSource::Disabled
        } else if let Some(path) = &self.config {
            ConfigSource::File(path.clone())
        } else {
            ConfigSource::Search
        }
    }
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Directory searched for modules (overrides config file)
    #[arg(long, value_name = "PATH")]
    pub root_dir: Option<String>,

    /// Globs of files to scan inside each module, comma separated
    #[arg(long, value_delimiter = ',', value_name = "GLOBS")]
    pub files: Option<Vec<String>>,

    /// Key pattern with one capturing group. Repeat for several patterns.
    #[arg(long, value_name = "REGEX")]
    pub key_patterns: Option<Vec<String>>,

    /// Output directory for tables, relative to each module
    #[arg(long, value_name = "PATH")]
    pub out_dir: Option<String>,

    /// Languages to generate tables for, comma separated
    #[arg(long, value_delimiter = ',', value_name = "LANGS")]
    pub languages: Option<Vec<String>>,

    /// Language whose values are written by hand and translated from
    #[arg(long, value_name = "LANG")]
    pub base_language: Option<String>,

    /// Machine-translate newly added keys
    #[arg(short, long)]
    pub translate: bool,

    /// Machine-translate every key, replacing existing values (implies --translate)
    #[arg(short = 'F', long)]
    pub force_translate: bool,

    /// Only machine-translate these languages, comma separated
    #[arg(long, value_delimiter = ',', value_name = "LANGS")]
    pub translate_languages: Option<Vec<String>>,

    /// Only process the module with this directory name
    #[arg(short, long, value_name = "NAME")]
    pub module: Option<String>,

    /// Copy the index template into each output directory if missing
    #[arg(long)]
    pub copy_index: bool,

    /// Copy the index template into each output directory, replacing it
    #[arg(long)]
    pub force_copy_index: bool,
}

impl ExtractArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            root_dir: self.root_dir.clone(),
            files: self.files.clone(),
            key_patterns: self.key_patterns.clone(),
            out_dir: self.out_dir.clone(),
            languages: self.languages.clone(),
            base_language: self.base_language.clone(),
            translate: self.translate,
            force_translate: self.force_translate,
            translate_languages: self.translate_languages.clone(),
            module: self.module.clone(),
            copy_index: self.copy_index,
            force_copy_index: self.force_copy_index,
        }
    }
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub args: ExtractArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract keys from source files into per-module translation tables
    Extract(ExtractCommand),
    /// Initialize a new .keyharvestrc.json configuration file
    Init,
}
