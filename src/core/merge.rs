//! Reconciliation of observed keys against a persisted translation table.
//!
//! ## Merge
//!
//! 1. Existing entries matched by a retention rule are kept, observed or not,
//!    and stay in front.
//! 2. Observed keys carry their existing value forward; unseen ones get the
//!    key itself as placeholder and are reported as added.
//! 3. Everything else in the old table is dropped. This is not reversible:
//!    a key the key patterns fail to find is pruned with its translation.
//!
//! ## Backfill planning
//!
//! The base language is never machine-translated. Other languages are
//! translated only when translation is on and the language is not excluded
//! by `translateLanguages`; the keys are either the added ones or, under
//! force mode, the whole table.

use super::{RetentionRules, TranslationTable};

/// Which languages get machine translation, and how much of each table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatePolicy {
    pub base_language: String,
    pub translate: bool,
    pub force_translate: bool,
    /// Empty means every non-base language.
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    BaseLanguage,
    TranslationOff,
    LanguageExcluded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackfillPlan {
    Skip(SkipReason),
    /// Keys to translate, in table order. May be empty.
    Keys(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTable {
    pub table: TranslationTable,
    /// Observed keys that were not in the old table, in table order.
    pub added: Vec<String>,
    /// Old keys that were neither observed nor retained, in old table order.
    pub removed: Vec<String>,
}

/// Merge `observed` (deduplicated, sorted) into `existing`.
///
/// Retained entries of the old table come first, in their old order, and
/// observed keys keep that position when they are among them. Newly observed
/// retained keys follow, then the remaining observed keys. Retained keys thus
/// always precede the rest, so a merged table merged again with the same
/// observed keys comes out identical, key order included.
pub fn merge_table(
    observed: &[String],
    existing: &TranslationTable,
    rules: &RetentionRules,
) -> MergedTable {
    let mut table = TranslationTable::new();

    for (key, value) in existing.iter() {
        if rules.retains(key) {
            table.insert(key, value.clone());
        }
    }

    let (retained, others): (Vec<&String>, Vec<&String>) =
        observed.iter().partition(|key| rules.retains(key));

    let mut added = Vec::new();
    for key in retained.into_iter().chain(others) {
        match existing.get(key) {
            Some(value) => table.insert(key.as_str(), value.clone()),
            None => {
                table.insert(key.as_str(), key.as_str());
                added.push(key.clone());
            }
        }
    }

    let removed = existing
        .keys()
        .filter(|key| !table.contains_key(key))
        .map(str::to_string)
        .collect();

    MergedTable {
        table,
        added,
        removed,
    }
}

impl TranslatePolicy {
    /// Decide what to machine-translate for `language` after a merge.
    pub fn plan(&self, language: &str, merged: &MergedTable) -> BackfillPlan {
        if language == self.base_language {
            return BackfillPlan::Skip(SkipReason::BaseLanguage);
        }
        if !self.translate {
            return BackfillPlan::Skip(SkipReason::TranslationOff);
        }
        if !self.languages.is_empty() && !self.languages.iter().any(|l| l == language) {
            return BackfillPlan::Skip(SkipReason::LanguageExcluded);
        }

        let keys = if self.force_translate {
            merged.table.keys().map(str::to_string).collect()
        } else {
            merged.added.clone()
        };
        BackfillPlan::Keys(keys)
    }
}
