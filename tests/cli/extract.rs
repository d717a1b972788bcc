use anyhow::Result;
use insta::assert_snapshot;
use serde_json::json;

use crate::{CliTest, stderr, stdout};

/// Translator stub: prefixes the target language, fails on text containing "坏".
const FAKE_TRANSLATOR: &str = r#"{
  "translateCommand": [
    "/bin/sh",
    "-c",
    "case \"$2\" in *坏*) echo 'quota exceeded' >&2; exit 1;; esac; printf '%s:%s\\n' \"$1\" \"$2\"",
    "sh",
    "{to}",
    "{text}"
  ]
}"#;

fn user_module() -> Result<CliTest> {
    CliTest::with_files(&[
        ("src/user/main.js", "import i18n from './lang'\nt('你好')"),
        (
            "src/user/views/profile.vue",
            r#"<template><p>{{ $t("再见") }} {{ $t('你好') }}</p></template>"#,
        ),
    ])
}

#[test]
fn test_extract_writes_every_language() -> Result<()> {
    let test = user_module()?;

    let output = test.extract_command().arg("--no-config").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_snapshot!(stdout(&output).trim_end(), @r"
    ✓ Wrote src/user/lang/zh.json (+2, -0, base language)
    ✓ Wrote src/user/lang/en.json (+2, -0)
    ✓ Extracted 2 key(s) from 2 file(s) in 1 module(s), wrote 2 table(s)
      - added: 4, removed: 0, translated: 0
    ");
    assert_snapshot!(test.read_file("src/user/lang/en.json")?.trim_end(), @r#"
    {
      "你好": "你好",
      "再见": "再见"
    }
    "#);
    assert_eq!(
        test.read_file("src/user/lang/zh.json")?,
        test.read_file("src/user/lang/en.json")?
    );

    Ok(())
}

#[test]
fn test_second_run_changes_nothing() -> Result<()> {
    let test = user_module()?;
    test.write_file(
        "src/user/lang/en.json",
        r#"{"G/common.ok": "OK", "你好": "Hello", "unused": "x"}"#,
    )?;

    test.extract_command().arg("--no-config").output()?;
    let first = test.read_file("src/user/lang/en.json")?;

    let output = test.extract_command().arg("--no-config").output()?;
    let second = test.read_file("src/user/lang/en.json")?;

    assert_eq!(first, second);
    assert!(stdout(&output).contains("✓ Wrote src/user/lang/en.json (+0, -0)"));

    Ok(())
}

#[test]
fn test_prunes_unused_and_keeps_retained_keys() -> Result<()> {
    let test = CliTest::with_files(&[
        ("src/shop/main.js", "t('hello'); t('new.key')"),
        (
            "src/shop/lang/en.json",
            r#"{"old.unused": "v", "hello": "Hello", "G/shared": "Shared"}"#,
        ),
    ])?;

    let output = test.extract_command().arg("--no-config").output()?;

    assert!(output.status.success());
    assert_snapshot!(test.read_file("src/shop/lang/en.json")?.trim_end(), @r#"
    {
      "G/shared": "Shared",
      "hello": "Hello",
      "new.key": "new.key"
    }
    "#);
    assert!(stdout(&output).contains("✓ Wrote src/shop/lang/en.json (+1, -1)"));

    Ok(())
}

#[test]
fn test_keep_key_rules_from_config() -> Result<()> {
    let test = CliTest::with_files(&[
        ("src/shop/main.js", ""),
        (
            "src/shop/lang/zh.json",
            r#"{"menu.title": "菜单", "dyn.a": "A", "dyn.b": "B", "old": "旧"}"#,
        ),
        (
            ".keyharvestrc.json",
            r#"{ "keepKeyRules": ["menu.title", { "regex": "^dyn\\." }] }"#,
        ),
    ])?;

    let output = test.extract_command().output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_json("src/shop/lang/zh.json")?,
        json!({ "menu.title": "菜单", "dyn.a": "A", "dyn.b": "B" })
    );

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_translate_fills_non_base_languages() -> Result<()> {
    let test = user_module()?;
    test.write_file(".keyharvestrc.json", FAKE_TRANSLATOR)?;
    test.write_file("src/user/lang/en.json", r#"{"你好": "Hello"}"#)?;

    let output = test.extract_command().arg("-t").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_json("src/user/lang/zh.json")?,
        json!({ "你好": "你好", "再见": "再见" })
    );
    assert_eq!(
        test.read_json("src/user/lang/en.json")?,
        json!({ "你好": "Hello", "再见": "en:再见" })
    );

    let stdout = stdout(&output);
    assert!(stdout.contains("→ en:再见"));
    assert!(!stdout.contains("en:你好"));
    assert!(stdout.contains("✓ Wrote src/user/lang/en.json (+1, -0, 1 translated)"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_force_translate_replaces_values() -> Result<()> {
    let test = user_module()?;
    test.write_file(".keyharvestrc.json", FAKE_TRANSLATOR)?;
    test.write_file("src/user/lang/en.json", r#"{"你好": "Hello"}"#)?;

    let output = test.extract_command().arg("-F").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_json("src/user/lang/en.json")?,
        json!({ "你好": "en:你好", "再见": "en:再见" })
    );

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_translation_failure_keeps_placeholder() -> Result<()> {
    let test = CliTest::with_files(&[
        ("src/user/main.js", "t('好'); t('坏')"),
        (".keyharvestrc.json", FAKE_TRANSLATOR),
    ])?;

    let output = test.extract_command().arg("-t").output()?;

    assert!(output.status.success());
    assert_eq!(
        test.read_json("src/user/lang/en.json")?,
        json!({ "坏": "坏", "好": "en:好" })
    );
    assert!(stdout(&output).contains("quota exceeded"));
    assert!(stderr(&output).contains("warning: 1 translation(s) failed, placeholders kept"));

    Ok(())
}

#[cfg(unix)]
#[test]
fn test_translate_languages_subset() -> Result<()> {
    let test = user_module()?;
    test.write_file(".keyharvestrc.json", FAKE_TRANSLATOR)?;

    let output = test
        .extract_command()
        .args(["-t", "--languages", "zh,en,ko", "--translate-languages", "ko"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_json("src/user/lang/en.json")?,
        json!({ "你好": "你好", "再见": "再见" })
    );
    assert_eq!(
        test.read_json("src/user/lang/ko.json")?,
        json!({ "你好": "ko:你好", "再见": "ko:再见" })
    );
    assert!(
        stdout(&output)
            .contains("✓ Wrote src/user/lang/en.json (+2, -0, excluded from translation)")
    );

    Ok(())
}

#[test]
fn test_translate_without_command_is_fatal() -> Result<()> {
    let test = user_module()?;

    let output = test.extract_command().args(["--no-config", "-t"]).output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).starts_with("Error:"));
    assert!(!test.root().join("src/user/lang").exists());

    Ok(())
}

#[test]
fn test_base_language_must_be_listed() -> Result<()> {
    let test = user_module()?;
    test.write_file(
        ".keyharvestrc.json",
        r#"{ "languages": ["en", "ko"], "baseLanguage": "zh" }"#,
    )?;

    let output = test.extract_command().output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(!test.root().join("src/user/lang").exists());

    Ok(())
}

#[test]
fn test_invalid_key_pattern_is_fatal() -> Result<()> {
    let test = user_module()?;

    let output = test
        .extract_command()
        .args(["--no-config", "--key-patterns", "t\\('.+?'"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));
    assert!(!test.root().join("src/user/lang").exists());

    Ok(())
}

#[test]
fn test_missing_root_dir_is_fatal() -> Result<()> {
    let test = user_module()?;

    let output = test
        .extract_command()
        .args(["--no-config", "--root-dir", "app"])
        .output()?;

    assert_eq!(output.status.code(), Some(2));

    Ok(())
}

#[test]
fn test_module_filter() -> Result<()> {
    let test = CliTest::with_files(&[
        ("src/user/main.js", "t('a')"),
        ("src/order/main.js", "t('b')"),
    ])?;

    let output = test
        .extract_command()
        .args(["--no-config", "-m", "order"])
        .output()?;

    assert!(output.status.success());
    assert!(test.root().join("src/order/lang/zh.json").exists());
    assert!(!test.root().join("src/user/lang").exists());

    Ok(())
}

#[test]
fn test_flags_override_config_file() -> Result<()> {
    let test = user_module()?;
    test.write_file(
        ".keyharvestrc.json",
        r#"{ "languages": ["zh", "en"], "outDir": "i18n" }"#,
    )?;

    let output = test
        .extract_command()
        .args(["--languages", "zh,ja"])
        .output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(test.root().join("src/user/i18n/ja.json").exists());
    assert!(!test.root().join("src/user/i18n/en.json").exists());

    Ok(())
}

#[test]
fn test_unparseable_table_is_left_untouched() -> Result<()> {
    let test = user_module()?;
    test.write_file("src/user/lang/en.json", "{ hand edited")?;

    let output = test.extract_command().arg("--no-config").output()?;

    assert!(output.status.success());
    assert_eq!(test.read_file("src/user/lang/en.json")?, "{ hand edited");
    assert!(stdout(&output).contains("✘ error: src/user/lang/en.json"));
    assert!(stderr(&output).contains("error: 1 file(s) could not be updated"));
    assert!(test.root().join("src/user/lang/zh.json").exists());

    Ok(())
}

#[test]
fn test_copy_index_template() -> Result<()> {
    let test = user_module()?;
    test.write_file("templates/index.js", "export default {}\n")?;
    test.write_file(
        ".keyharvestrc.json",
        r#"{ "indexTemplate": "templates/index.js" }"#,
    )?;

    test.extract_command().output()?;
    assert!(!test.root().join("src/user/lang/index.js").exists());

    let output = test.extract_command().arg("--copy-index").output()?;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        test.read_file("src/user/lang/index.js")?,
        "export default {}\n"
    );
    assert!(stdout(&output).contains("✓ Copied src/user/lang/index.js"));

    Ok(())
}

#[test]
fn test_no_modules_found() -> Result<()> {
    let test = CliTest::with_files(&[("src/util.js", "t('x')")])?;

    let output = test.extract_command().arg("--no-config").output()?;

    assert!(output.status.success());
    assert_snapshot!(stdout(&output).trim_end(), @"warning: No modules found under src");

    Ok(())
}

#[test]
fn test_verbose_lists_scanned_files() -> Result<()> {
    let test = user_module()?;

    let output = test.extract_command().args(["--no-config", "-v"]).output()?;

    let stderr = stderr(&output);
    assert!(stderr.contains("no config file, using defaults"));
    assert!(stderr.contains("profile.vue"));

    Ok(())
}

#[test]
fn test_unreadable_source_is_named() -> Result<()> {
    let test = user_module()?;
    std::fs::write(test.root().join("src/user/legacy.js"), [0xff, 0xfe, 0x00])?;

    let output = test.extract_command().arg("--no-config").output()?;

    assert!(output.status.success());
    assert!(stderr(&output).contains("warning: Cannot read src/user/legacy.js:"));
    assert!(test.root().join("src/user/lang/en.json").exists());

    Ok(())
}
