//! Rules protecting keys from pruning.
//!
//! A table entry whose key matches any rule survives a merge even when the
//! key no longer appears in source, e.g. shared `G/...` keys that other
//! modules look up at runtime.

use std::{fmt, sync::Arc};

use anyhow::{Context, Result};
use enum_dispatch::enum_dispatch;
use regex::Regex;

use crate::config::KeepKeyRule;

#[enum_dispatch]
pub trait RetainKey {
    fn retains(&self, key: &str) -> bool;
}

/// Keeps exactly one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactRule(pub String);

impl RetainKey for ExactRule {
    fn retains(&self, key: &str) -> bool {
        self.0 == key
    }
}

/// Keeps every key the expression matches anywhere.
#[derive(Debug, Clone)]
pub struct PatternRule(pub Regex);

impl RetainKey for PatternRule {
    fn retains(&self, key: &str) -> bool {
        self.0.is_match(key)
    }
}

/// Keeps every key the predicate accepts. Only available through the library API.
#[derive(Clone)]
pub struct PredicateRule(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl PredicateRule {
    pub fn new(predicate: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }
}

impl fmt::Debug for PredicateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PredicateRule(..)")
    }
}

impl RetainKey for PredicateRule {
    fn retains(&self, key: &str) -> bool {
        (self.0)(key)
    }
}

#[enum_dispatch(RetainKey)]
#[derive(Debug, Clone)]
pub enum RetentionRule {
    Exact(ExactRule),
    Pattern(PatternRule),
    Predicate(PredicateRule),
}

impl TryFrom<&KeepKeyRule> for RetentionRule {
    type Error = anyhow::Error;

    fn try_from(rule: &KeepKeyRule) -> Result<Self> {
        Ok(match rule {
            KeepKeyRule::Exact(key) => ExactRule(key.clone()).into(),
            KeepKeyRule::Regex { regex } => {
                let regex = Regex::new(regex).with_context(|| {
                    format!("Invalid regular expression in 'keepKeyRules': {}", regex)
                })?;
                PatternRule(regex).into()
            }
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetentionRules {
    rules: Vec<RetentionRule>,
}

impl RetentionRules {
    pub fn new(rules: Vec<RetentionRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(rules: &[KeepKeyRule]) -> Result<Self> {
        let rules = rules
            .iter()
            .map(RetentionRule::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn push(&mut self, rule: impl Into<RetentionRule>) {
        self.rules.push(rule.into());
    }

    /// True when any rule retains `key`.
    pub fn retains(&self, key: &str) -> bool {
        self.rules.iter().any(|rule| rule.retains(key))
    }
}
