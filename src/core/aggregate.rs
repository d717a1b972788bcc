//! Grouping of extracted keys by owning module.

use std::{collections::BTreeMap, path::PathBuf};

use super::{KeyPatterns, ModuleKeys, SourceFile};

/// Deduplicate and sort raw keys by code point.
///
/// Sorted output keeps table files stable across runs, which keeps diffs
/// reviewable.
pub fn normalize_keys(mut raw: Vec<String>) -> Vec<String> {
    raw.sort_unstable();
    raw.dedup();
    raw
}

#[derive(Debug, Default)]
struct RawModule {
    keys: Vec<String>,
    file_count: usize,
}

/// Per-module accumulator threaded through the scan.
///
/// Built by folding source files in; nothing outside the fold can observe
/// or mutate it until [`ModuleKeyCollector::finish`] hands back the result.
#[derive(Debug, Default)]
pub struct ModuleKeyCollector {
    modules: BTreeMap<PathBuf, RawModule>,
}

impl ModuleKeyCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module that may end up with no files at all.
    pub fn register(mut self, module: PathBuf) -> Self {
        self.modules.entry(module).or_default();
        self
    }

    /// Record the keys of one file. The module is registered even when the
    /// file has no keys, so its tables are still pruned.
    pub fn add(mut self, module: PathBuf, keys: Vec<String>) -> Self {
        let entry = self.modules.entry(module).or_default();
        entry.keys.extend(keys);
        entry.file_count += 1;
        self
    }

    /// Modules in path order, each with normalized keys.
    pub fn finish(self) -> Vec<ModuleKeys> {
        self.modules
            .into_iter()
            .map(|(module, raw)| ModuleKeys {
                module,
                keys: normalize_keys(raw.keys),
                file_count: raw.file_count,
            })
            .collect()
    }
}

/// Extract and aggregate keys from every source file.
///
/// Every module in `modules` is part of the result, with or without files.
pub fn collect_module_keys<M, I>(modules: M, sources: I, patterns: &KeyPatterns) -> Vec<ModuleKeys>
where
    M: IntoIterator<Item = PathBuf>,
    I: IntoIterator<Item = SourceFile>,
{
    let collector = modules
        .into_iter()
        .fold(ModuleKeyCollector::new(), ModuleKeyCollector::register);

    sources
        .into_iter()
        .fold(collector, |collector, file| {
            let keys = patterns.extract(&file.content);
            collector.add(file.module, keys)
        })
        .finish()
}
