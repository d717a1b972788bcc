//! keyharvest - translation key extractor for module-structured front-end projects
//!
//! keyharvest scans each module's source files for translation keys, merges
//! them into one JSON table per language (keeping hand-written values and
//! pruning keys no longer used) and can machine-translate newly added keys
//! through an external command.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands, output)
//! - `config`: Configuration file loading, CLI overrides and validation
//! - `core`: Extraction engine (scan, aggregate, merge, backfill, store)
//! - `translator`: External-command translation backend

pub mod cli;
pub mod config;
pub mod core;
pub mod translator;
