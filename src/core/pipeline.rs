use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Config;

use super::{
    BackfillEvent, BackfillPlan, KeyPatterns, ModuleKeys, RetentionRules, ScanOptions,
    ScanResult, ScanWarning, SkipReason, TranslatePolicy, TranslationFailure, Translator,
    backfill, collect_module_keys, copy_index_template, merge_table, read_table, scan_sources,
    table_path, write_table,
};

/// Result of processing one (module, language) table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOutcome {
    pub language: String,
    pub path: PathBuf,
    pub added: usize,
    pub removed: usize,
    pub translated: usize,
    pub failures: Vec<TranslationFailure>,
    /// Why no translation was attempted, if it wasn't.
    pub skipped: Option<SkipReason>,
    /// Read or write error. When reading failed the file was left untouched.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutcome {
    pub module: PathBuf,
    pub file_count: usize,
    pub key_count: usize,
    pub tables: Vec<TableOutcome>,
    pub index_copied: Option<PathBuf>,
    pub index_error: Option<String>,
}

#[derive(Debug, Default)]
pub struct ExtractReport {
    pub modules: Vec<ModuleOutcome>,
    pub files_scanned: usize,
    pub warnings: Vec<ScanWarning>,
}

impl ExtractReport {
    pub fn tables(&self) -> impl Iterator<Item = &TableOutcome> {
        self.modules.iter().flat_map(|m| m.tables.iter())
    }

    pub fn error_count(&self) -> usize {
        self.tables().filter(|t| t.error.is_some()).count()
            + self.modules.iter().filter(|m| m.index_error.is_some()).count()
    }

    pub fn failed_translation_count(&self) -> usize {
        self.tables().map(|t| t.failures.len()).sum()
    }
}

/// Live progress, emitted while the run is in flight.
#[derive(Debug)]
pub enum Progress<'a> {
    Translation {
        module: &'a Path,
        language: &'a str,
        event: BackfillEvent<'a>,
    },
    Table {
        module: &'a Path,
        outcome: &'a TableOutcome,
    },
}

/// Everything a run needs, compiled from a validated [`Config`].
pub struct ExtractContext {
    pub config: Config,
    /// `rootDir` resolved against the working directory.
    pub root_dir: PathBuf,
    pub cwd: PathBuf,
    pub verbose: bool,
    patterns: KeyPatterns,
    rules: RetentionRules,
    policy: TranslatePolicy,
}

impl ExtractContext {
    pub fn new(config: Config, cwd: &Path, verbose: bool) -> Result<Self> {
        let patterns = KeyPatterns::new(&config.key_patterns)?;
        let rules = RetentionRules::from_config(&config.keep_key_rules)?;
        let policy = TranslatePolicy {
            base_language: config.base_language.clone(),
            translate: config.translate,
            force_translate: config.force_translate,
            languages: config.translate_languages.clone(),
        };

        Ok(Self {
            root_dir: cwd.join(&config.root_dir),
            cwd: cwd.to_path_buf(),
            config,
            verbose,
            patterns,
            rules,
            policy,
        })
    }

    /// Add rules beyond the configured ones, e.g. predicates from library users.
    pub fn rules_mut(&mut self) -> &mut RetentionRules {
        &mut self.rules
    }

    pub fn scan(&self) -> Result<ScanResult> {
        scan_sources(&ScanOptions {
            root_dir: &self.root_dir,
            module_index_files: &self.config.module_index_files,
            files: &self.config.files,
            ignores: &self.config.ignores,
            module: self.config.module.as_deref(),
            verbose: self.verbose,
        })
    }

    /// Scan, merge, translate and write every module's tables.
    ///
    /// Modules and languages are processed one after another. Only a scan
    /// of a missing root fails the run; every other problem is recorded in
    /// the report.
    pub fn run<F>(&self, translator: Option<&dyn Translator>, mut on_progress: F) -> Result<ExtractReport>
    where
        F: FnMut(Progress<'_>),
    {
        let scan = self.scan()?;
        let files_scanned = scan.sources.len();
        let modules = collect_module_keys(scan.modules, scan.sources, &self.patterns);

        let outcomes = modules
            .iter()
            .map(|module| self.process_module(module, translator, &mut on_progress))
            .collect();

        Ok(ExtractReport {
            modules: outcomes,
            files_scanned,
            warnings: scan.warnings,
        })
    }

    fn process_module<F>(
        &self,
        module: &ModuleKeys,
        translator: Option<&dyn Translator>,
        on_progress: &mut F,
    ) -> ModuleOutcome
    where
        F: FnMut(Progress<'_>),
    {
        let out_dir = module.module.join(&self.config.out_dir);
        let (index_copied, index_error) = match self.copy_index(&out_dir) {
            Ok(copied) => (copied, None),
            Err(e) => (None, Some(format!("{:#}", e))),
        };

        let tables = self
            .config
            .languages
            .iter()
            .map(|language| {
                let outcome = self.process_table(module, language, translator, on_progress);
                on_progress(Progress::Table {
                    module: &module.module,
                    outcome: &outcome,
                });
                outcome
            })
            .collect();

        ModuleOutcome {
            module: module.module.clone(),
            file_count: module.file_count,
            key_count: module.keys.len(),
            tables,
            index_copied,
            index_error,
        }
    }

    fn copy_index(&self, out_dir: &Path) -> Result<Option<PathBuf>> {
        let Some(template) = &self.config.index_template else {
            return Ok(None);
        };
        if !self.config.copy_index && !self.config.force_copy_index {
            return Ok(None);
        }
        copy_index_template(
            &self.cwd.join(template),
            out_dir,
            self.config.force_copy_index,
        )
    }

    fn process_table<F>(
        &self,
        module: &ModuleKeys,
        language: &str,
        translator: Option<&dyn Translator>,
        on_progress: &mut F,
    ) -> TableOutcome
    where
        F: FnMut(Progress<'_>),
    {
        let path = table_path(&module.module, &self.config.out_dir, language);
        let mut outcome = TableOutcome {
            language: language.to_string(),
            path: path.clone(),
            added: 0,
            removed: 0,
            translated: 0,
            failures: Vec::new(),
            skipped: None,
            error: None,
        };

        let existing = match read_table(&path) {
            Ok(table) => table,
            Err(e) => {
                outcome.error = Some(format!("{:#}", e));
                return outcome;
            }
        };

        let mut merged = merge_table(&module.keys, &existing, &self.rules);
        outcome.added = merged.added.len();
        outcome.removed = merged.removed.len();

        match (self.policy.plan(language, &merged), translator) {
            (BackfillPlan::Keys(keys), Some(translator)) => {
                let result = backfill(
                    translator,
                    &self.config.base_language,
                    language,
                    &keys,
                    |event| {
                        on_progress(Progress::Translation {
                            module: &module.module,
                            language,
                            event,
                        })
                    },
                );
                result.apply_to(&mut merged.table);
                outcome.translated = result.values.len();
                outcome.failures = result.failures;
            }
            (BackfillPlan::Keys(_), None) => {
                outcome.skipped = Some(SkipReason::TranslationOff);
            }
            (BackfillPlan::Skip(reason), _) => {
                outcome.skipped = Some(reason);
            }
        }

        if let Err(e) = write_table(&path, &merged.table) {
            outcome.error = Some(format!("{:#}", e));
        }

        outcome
    }
}
