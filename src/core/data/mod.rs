//! Core data types shared by the extraction pipeline.
//!
//! - `module`: scanned source files and the observed keys of a module
//! - `table`: the persisted per-language translation table

pub mod module;
pub mod table;

pub use module::{ModuleKeys, SourceFile, module_name};
pub use table::TranslationTable;
