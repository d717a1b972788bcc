use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["rootDir"], "src");
    assert_eq!(parsed["outDir"], "lang");
    assert_eq!(parsed["baseLanguage"], "zh");
    assert_eq!(parsed["languages"], serde_json::json!(["zh", "en"]));
    assert_eq!(parsed["keepKeyRules"], serde_json::json!([{ "regex": "^G/+" }]));

    assert!(
        content.contains("\n  \"rootDir\""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Created"));
    assert!(test.root().join(".keyharvestrc.json").exists());

    let content = test.read_file(".keyharvestrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".keyharvestrc.json", "{}")?;

    let output = test.command().arg("init").output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains(".keyharvestrc.json already exists"));
    assert_eq!(test.read_file(".keyharvestrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file("src/home/main.js", "t('首页')")?;

    let output = test.extract_command().output()?;
    assert!(
        output.status.success(),
        "Extract should work with initialized config. stderr: {}",
        stderr(&output)
    );
    assert!(test.root().join("src/home/lang/en.json").exists());

    Ok(())
}
