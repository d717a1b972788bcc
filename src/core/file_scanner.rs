use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use colored::Colorize;
use glob::Pattern;
use walkdir::WalkDir;

use super::{SourceFile, module_name};

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal paths relative to the root.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// A path that could not be traversed or read. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct ScanResult {
    /// Module directories that passed the module filter, in path order.
    pub modules: Vec<PathBuf>,
    pub sources: Vec<SourceFile>,
    pub warnings: Vec<ScanWarning>,
}

#[derive(Debug, Clone)]
pub struct ScanOptions<'a> {
    pub root_dir: &'a Path,
    pub module_index_files: &'a [String],
    pub files: &'a [String],
    pub ignores: &'a [String],
    /// Only keep modules whose directory has this name.
    pub module: Option<&'a str>,
    pub verbose: bool,
}

/// Compiled ignore rules: glob patterns plus literal path prefixes.
struct Ignores {
    literal_paths: Vec<PathBuf>,
    glob_patterns: Vec<Pattern>,
}

impl Ignores {
    fn new(root_dir: &Path, patterns: &[String]) -> Self {
        let mut literal_paths = Vec::new();
        let mut glob_patterns = Vec::new();

        for p in patterns {
            if is_glob_pattern(p) {
                // Validated with the config; an invalid pattern never reaches here.
                if let Ok(pattern) = Pattern::new(p) {
                    glob_patterns.push(pattern);
                }
            } else {
                literal_paths.push(root_dir.join(p));
            }
        }

        Self {
            literal_paths,
            glob_patterns,
        }
    }

    fn is_ignored(&self, path: &Path) -> bool {
        self.literal_paths.iter().any(|p| path.starts_with(p))
            || self.glob_patterns.iter().any(|p| p.matches_path(path))
    }
}

/// Walk `root_dir` and enumerate every (module, file) pair.
///
/// A directory is a module when it directly contains one of the
/// `module_index_files`. Each module scans every file below it matching
/// `files`, so files of a nested module also belong to the enclosing one.
///
/// Unreadable paths are collected as warnings; only a missing root is an error.
pub fn scan_sources(options: &ScanOptions<'_>) -> Result<ScanResult> {
    let root_dir = options.root_dir;
    if !root_dir.is_dir() {
        bail!(
            "Root directory '{}' does not exist or is not a directory.\n\
             Hint: Check the 'rootDir' setting.",
            root_dir.display()
        );
    }

    let ignores = Ignores::new(root_dir, options.ignores);
    let file_patterns: Vec<Pattern> = options
        .files
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let mut result = ScanResult::default();
    let modules = discover_modules(options, &ignores, &mut result.warnings);

    for module in modules {
        if options.verbose {
            eprintln!("{} {}", "module".bold().cyan(), module.display());
        }
        scan_module(&module, &file_patterns, &ignores, options.verbose, &mut result);
        result.modules.push(module);
    }

    Ok(result)
}

fn discover_modules(
    options: &ScanOptions<'_>,
    ignores: &Ignores,
    warnings: &mut Vec<ScanWarning>,
) -> Vec<PathBuf> {
    let mut modules = Vec::new();

    for entry in WalkDir::new(options.root_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                push_walk_warning(warnings, &e, options.verbose);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || ignores.is_ignored(path) {
            continue;
        }

        let is_index = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| options.module_index_files.iter().any(|f| f == n));
        if !is_index {
            continue;
        }

        if let Some(dir) = path.parent() {
            let keep = options.module.is_none_or(|name| module_name(dir) == name);
            if keep {
                modules.push(dir.to_path_buf());
            }
        }
    }

    modules.sort();
    modules.dedup();
    modules
}

fn scan_module(
    module: &Path,
    file_patterns: &[Pattern],
    ignores: &Ignores,
    verbose: bool,
    result: &mut ScanResult,
) {
    for entry in WalkDir::new(module).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                push_walk_warning(&mut result.warnings, &e, verbose);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || ignores.is_ignored(path) {
            continue;
        }

        let relative = path.strip_prefix(module).unwrap_or(path);
        if !file_patterns.iter().any(|p| p.matches_path(relative)) {
            continue;
        }

        match fs::read_to_string(path) {
            Ok(content) => {
                if verbose {
                    eprintln!("  {} {}", "scan".dimmed(), path.display());
                }
                result
                    .sources
                    .push(SourceFile::new(module, path, content));
            }
            Err(e) => {
                if verbose {
                    eprintln!(
                        "{} Cannot read {}: {}",
                        "warning:".bold().yellow(),
                        path.display(),
                        e
                    );
                }
                result.warnings.push(ScanWarning {
                    path: path.to_string_lossy().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }
}

fn push_walk_warning(warnings: &mut Vec<ScanWarning>, error: &walkdir::Error, verbose: bool) {
    if verbose {
        eprintln!("{} Cannot access path: {}", "warning:".bold().yellow(), error);
    }
    warnings.push(ScanWarning {
        path: error
            .path()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default(),
        error: error.to_string(),
    });
}
