//! Core extraction engine.
//!
//! ## Pipeline
//!
//! ```text
//! file_scanner  (module, file content) pairs
//!      ↓
//! extractor     raw keys per file
//!      ↓
//! aggregate     deduplicated, sorted keys per module
//!      ↓
//! merge         reconcile with the persisted table, per language
//!      ↓
//! backfill      sequential machine translation of the gaps
//!      ↓
//! store         write the table back
//! ```
//!
//! [`ExtractContext`] drives the whole sequence; every stage is also usable
//! on its own.

pub mod aggregate;
pub mod backfill;
pub mod data;
pub mod extractor;
pub mod file_scanner;
pub mod merge;
pub mod pipeline;
pub mod retention;
pub mod store;

pub use aggregate::{ModuleKeyCollector, collect_module_keys, normalize_keys};
pub use backfill::{Backfill, BackfillEvent, TranslationFailure, Translator, backfill};
pub use data::{ModuleKeys, SourceFile, TranslationTable, module_name};
pub use extractor::KeyPatterns;
pub use file_scanner::{ScanOptions, ScanResult, ScanWarning, scan_sources};
pub use merge::{BackfillPlan, MergedTable, SkipReason, TranslatePolicy, merge_table};
pub use pipeline::{ExtractContext, ExtractReport, ModuleOutcome, Progress, TableOutcome};
pub use retention::{
    ExactRule, PatternRule, PredicateRule, RetainKey, RetentionRule, RetentionRules,
};
pub use store::{copy_index_template, read_table, table_path, write_table};
