use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{KeyPatterns, RetentionRules};

pub const CONFIG_FILE_NAME: &str = ".keyharvestrc.json";

/// Default key pattern: `t('key')`, `$t("key")`.
pub const DEFAULT_KEY_PATTERN: &str = r#"(?:\$)?t\(['"](.+?)['"]"#;

/// A rule protecting keys from pruning, as written in the config file.
///
/// A plain string keeps exactly that key, `{ "regex": "..." }` keeps every
/// key the expression matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum KeepKeyRule {
    Exact(String),
    Regex { regex: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_root_dir")]
    pub root_dir: String,
    #[serde(default = "default_module_index_files")]
    pub module_index_files: Vec<String>,
    #[serde(default = "default_files")]
    pub files: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
    #[serde(default = "default_key_patterns")]
    pub key_patterns: Vec<String>,
    #[serde(default = "default_out_dir")]
    pub out_dir: String,
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_base_language")]
    pub base_language: String,
    #[serde(default = "default_keep_key_rules")]
    pub keep_key_rules: Vec<KeepKeyRule>,
    #[serde(default)]
    pub translate: bool,
    #[serde(default)]
    pub force_translate: bool,
    /// Languages to machine-translate. Empty means every non-base language.
    #[serde(default)]
    pub translate_languages: Vec<String>,
    /// Argv of the external translator; `{from}`, `{to}` and `{text}` are substituted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_command: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_template: Option<String>,
    #[serde(default)]
    pub copy_index: bool,
    #[serde(default)]
    pub force_copy_index: bool,
    /// Only process the module whose directory has this name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

fn default_root_dir() -> String {
    "src".to_string()
}

fn default_module_index_files() -> Vec<String> {
    vec!["main.js".to_string()]
}

fn default_files() -> Vec<String> {
    ["**/*.vue", "**/*.js"].map(String::from).to_vec()
}

fn default_ignores() -> Vec<String> {
    vec!["**/node_modules/**".to_string()]
}

fn default_key_patterns() -> Vec<String> {
    vec![DEFAULT_KEY_PATTERN.to_string()]
}

fn default_out_dir() -> String {
    "lang".to_string()
}

fn default_languages() -> Vec<String> {
    ["zh", "en"].map(String::from).to_vec()
}

fn default_base_language() -> String {
    "zh".to_string()
}

fn default_keep_key_rules() -> Vec<KeepKeyRule> {
    vec![KeepKeyRule::Regex {
        regex: "^G/+".to_string(),
    }]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            module_index_files: default_module_index_files(),
            files: default_files(),
            ignores: default_ignores(),
            key_patterns: default_key_patterns(),
            out_dir: default_out_dir(),
            languages: default_languages(),
            base_language: default_base_language(),
            keep_key_rules: default_keep_key_rules(),
            translate: false,
            force_translate: false,
            translate_languages: Vec::new(),
            translate_command: None,
            index_template: None,
            copy_index: false,
            force_copy_index: false,
            module: None,
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Every error returned here is fatal: the run stops before any
    /// translation table is read or written.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.files {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'files': \"{}\"", pattern))?;
        }
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        KeyPatterns::new(&self.key_patterns)?;
        RetentionRules::from_config(&self.keep_key_rules)?;

        if self.languages.is_empty() {
            bail!("'languages' must contain at least one language");
        }
        if !self.languages.contains(&self.base_language) {
            bail!(
                "Base language '{}' is not listed in 'languages' ({})",
                self.base_language,
                self.languages.join(", ")
            );
        }
        for lang in &self.translate_languages {
            if !self.languages.contains(lang) {
                bail!(
                    "Language '{}' in 'translateLanguages' is not listed in 'languages'",
                    lang
                );
            }
        }

        if self.wants_translation()
            && self
                .translate_command
                .as_ref()
                .is_none_or(|argv| argv.is_empty())
        {
            bail!(
                "Translation was requested but no 'translateCommand' is configured.\n\
                 Hint: Set 'translateCommand' in {}.",
                CONFIG_FILE_NAME
            );
        }

        Ok(())
    }

    /// True when at least one language could be machine-translated this run.
    pub fn wants_translation(&self) -> bool {
        self.translate && self.languages.iter().any(|l| *l != self.base_language)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Where the file layer of the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Search upwards from the working directory.
    Search,
    /// Use this file; it must exist.
    File(PathBuf),
    /// Defaults and CLI flags only.
    Disabled,
}

/// Values given on the command line. `None`/`false` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_dir: Option<String>,
    pub files: Option<Vec<String>>,
    pub key_patterns: Option<Vec<String>>,
    pub out_dir: Option<String>,
    pub languages: Option<Vec<String>>,
    pub base_language: Option<String>,
    pub translate: bool,
    pub force_translate: bool,
    pub translate_languages: Option<Vec<String>>,
    pub module: Option<String>,
    pub copy_index: bool,
    pub force_copy_index: bool,
}

impl ConfigOverrides {
    fn apply(&self, config: &mut Config) {
        if let Some(root_dir) = &self.root_dir {
            config.root_dir = root_dir.clone();
        }
        if let Some(files) = &self.files {
            config.files = files.clone();
        }
        if let Some(key_patterns) = &self.key_patterns {
            config.key_patterns = key_patterns.clone();
        }
        if let Some(out_dir) = &self.out_dir {
            config.out_dir = out_dir.clone();
        }
        if let Some(languages) = &self.languages {
            config.languages = languages.clone();
        }
        if let Some(base_language) = &self.base_language {
            config.base_language = base_language.clone();
        }
        if let Some(translate_languages) = &self.translate_languages {
            config.translate_languages = translate_languages.clone();
        }
        if let Some(module) = &self.module {
            config.module = Some(module.clone());
        }
        // Force translation is meaningless without translation.
        if self.translate || self.force_translate {
            config.translate = true;
        }
        if self.force_translate {
            config.force_translate = true;
        }
        if self.copy_index {
            config.copy_index = true;
        }
        if self.force_copy_index {
            config.force_copy_index = true;
        }
    }
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    pub config: Config,
    /// The file the config was read from, if any.
    pub path: Option<PathBuf>,
}

fn read_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve the effective configuration: defaults < config file < CLI flags.
///
/// The returned value is validated and never changes for the rest of the run.
pub fn resolve_config(
    cwd: &Path,
    source: &ConfigSource,
    overrides: &ConfigOverrides,
) -> Result<ConfigLoadResult> {
    let path = match source {
        ConfigSource::Search => find_config_file(cwd),
        ConfigSource::File(path) => {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                cwd.join(path)
            };
            if !path.exists() {
                bail!("Config file '{}' does not exist", path.display());
            }
            Some(path)
        }
        ConfigSource::Disabled => None,
    };

    let mut config = match &path {
        Some(path) => read_config_file(path)?,
        None => Config::default(),
    };

    overrides.apply(&mut config);
    config.validate()?;

    Ok(ConfigLoadResult { config, path })
}
