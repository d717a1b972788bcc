use std::path::PathBuf;

use crate::core::ExtractReport;

#[derive(Debug)]
pub enum CommandSummary {
    Extract(ExtractSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ExtractSummary {
    pub report: ExtractReport,
    /// Directory modules were searched in.
    pub root_dir: PathBuf,
    /// Paths are printed relative to this directory.
    pub cwd: PathBuf,
    pub verbose: bool,
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
}

/// Result of running keyharvest commands
#[derive(Debug)]
pub struct CommandResult {
    pub summary: CommandSummary,
}
