//! Reading and writing translation table files.
//!
//! One JSON object per module and language: `<module>/<outDir>/<language>.json`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use super::TranslationTable;

pub fn table_path(module: &Path, out_dir: &str, language: &str) -> PathBuf {
    module.join(out_dir).join(format!("{}.json", language))
}

/// Load a table. A missing or blank file is an empty table.
pub fn read_table(path: &Path) -> Result<TranslationTable> {
    if !path.exists() {
        return Ok(TranslationTable::new());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(TranslationTable::new());
    }

    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON: {}", path.display()))?;
    match value {
        Value::Object(map) => Ok(map.into()),
        _ => bail!("Root of JSON file must be an object: {}", path.display()),
    }
}

/// Save a table with 2-space indentation and a trailing newline, creating
/// parent directories as needed. Keys are written in table order.
pub fn write_table(path: &Path, table: &TranslationTable) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(table).context("Failed to serialize JSON")?;

    fs::write(path, format!("{}\n", content))
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}

/// Copy the loader stub into a module's output directory.
///
/// Returns the destination when a copy happened. Without `force` an
/// existing stub is left alone.
pub fn copy_index_template(template: &Path, out_dir: &Path, force: bool) -> Result<Option<PathBuf>> {
    let file_name = template
        .file_name()
        .with_context(|| format!("Invalid index template path: {}", template.display()))?;
    let dest = out_dir.join(file_name);

    if dest.exists() && !force {
        return Ok(None);
    }

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create directory: {}", out_dir.display()))?;
    fs::copy(template, &dest).with_context(|| {
        format!(
            "Failed to copy {} to {}",
            template.display(),
            dest.display()
        )
    })?;

    Ok(Some(dest))
}
