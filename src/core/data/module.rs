use std::path::{Path, PathBuf};

/// One scanned file, tagged with the module that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path of the owning module directory.
    pub module: PathBuf,
    pub path: PathBuf,
    pub content: String,
}

impl SourceFile {
    pub fn new(
        module: impl Into<PathBuf>,
        path: impl Into<PathBuf>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            path: path.into(),
            content: content.into(),
        }
    }
}

/// Observed keys of a module: deduplicated and sorted by code point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleKeys {
    pub module: PathBuf,
    pub keys: Vec<String>,
    /// Number of files that contributed to this module.
    pub file_count: usize,
}

/// Directory name of a module, matched by the `--module` filter.
pub fn module_name(module: &Path) -> &str {
    module
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
}
