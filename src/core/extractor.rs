//! Key extraction from raw file content.

use anyhow::{Context, Result, bail};
use regex::Regex;

/// Compiled set of key patterns.
///
/// Each pattern has exactly one capturing group; its match is the key.
/// `Regex` keeps no match position between calls, so one compiled set is
/// shared by every file.
#[derive(Debug, Clone)]
pub struct KeyPatterns {
    patterns: Vec<Regex>,
}

impl KeyPatterns {
    pub fn new<S: AsRef<str>>(sources: &[S]) -> Result<Self> {
        if sources.is_empty() {
            bail!("'keyPatterns' must contain at least one regular expression");
        }

        let mut patterns = Vec::with_capacity(sources.len());
        for source in sources {
            let source = source.as_ref();
            let regex = Regex::new(source)
                .with_context(|| format!("Invalid regular expression in 'keyPatterns': {}", source))?;
            // captures_len counts the implicit whole-match group.
            let groups = regex.captures_len() - 1;
            if groups != 1 {
                bail!(
                    "Key pattern {} must have exactly one capturing group, found {}",
                    source,
                    groups
                );
            }
            patterns.push(regex);
        }

        Ok(Self { patterns })
    }

    /// All keys referenced in `content`, in order of appearance, duplicates included.
    pub fn extract(&self, content: &str) -> Vec<String> {
        let mut found: Vec<(usize, &str)> = Vec::new();

        for pattern in &self.patterns {
            for caps in pattern.captures_iter(content) {
                if let Some(key) = caps.get(1) {
                    found.push((key.start(), key.as_str()));
                }
            }
        }

        // Stable sort: matches at the same offset keep pattern order.
        found.sort_by_key(|(offset, _)| *offset);
        found.into_iter().map(|(_, key)| key.to_string()).collect()
    }
}
