//! Sequential machine translation of table entries.

use anyhow::Result;

use super::TranslationTable;

/// The translate capability: turn `text` in language `from` into language `to`.
pub trait Translator {
    fn translate(&self, from: &str, to: &str, text: &str) -> Result<String>;
}

impl<F> Translator for F
where
    F: Fn(&str, &str, &str) -> Result<String>,
{
    fn translate(&self, from: &str, to: &str, text: &str) -> Result<String> {
        self(from, to, text)
    }
}

/// Progress of a single key, reported as soon as its call returns.
#[derive(Debug)]
pub enum BackfillEvent<'a> {
    Translated { key: &'a str, value: &'a str },
    Failed { key: &'a str, error: &'a anyhow::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationFailure {
    pub key: String,
    pub error: String,
}

/// Partial result of a backfill: failed keys are simply absent from `values`.
#[derive(Debug, Default)]
pub struct Backfill {
    pub values: Vec<(String, String)>,
    pub failures: Vec<TranslationFailure>,
}

impl Backfill {
    /// Write the translated values over the table's placeholders.
    pub fn apply_to(&self, table: &mut TranslationTable) {
        for (key, value) in &self.values {
            table.insert(key.as_str(), value.as_str());
        }
    }
}

/// Translate `keys` one at a time.
///
/// Each call finishes before the next starts, so the backend never sees
/// more than one request from us. A failing key is reported and skipped;
/// the remaining keys are still translated.
pub fn backfill<T, F>(
    translator: &T,
    from: &str,
    to: &str,
    keys: &[String],
    mut on_event: F,
) -> Backfill
where
    T: Translator + ?Sized,
    F: FnMut(BackfillEvent<'_>),
{
    let mut result = Backfill::default();

    for key in keys {
        match translator.translate(from, to, key) {
            Ok(value) => {
                on_event(BackfillEvent::Translated {
                    key,
                    value: &value,
                });
                result.values.push((key.clone(), value));
            }
            Err(error) => {
                on_event(BackfillEvent::Failed { key, error: &error });
                result.failures.push(TranslationFailure {
                    key: key.clone(),
                    error: format!("{:#}", error),
                });
            }
        }
    }

    result
}
