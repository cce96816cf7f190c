// codectx-core/tests/config_tests.rs
use anyhow::Result;
use std::io::Write;
use tempfile::Builder;

use codectx_core::config::{ConfigFile, OutputFormat};
use codectx_core::ConfigError;

fn config_file(suffix: &str, contents: &str) -> Result<tempfile::NamedTempFile> {
    let mut file = Builder::new().suffix(suffix).tempfile()?;
    file.write_all(contents.as_bytes())?;
    Ok(file)
}

#[test]
fn test_load_json_config() -> Result<()> {
    let file = config_file(
        ".json",
        r#"{
            "outFile": "snapshot.md",
            "format": "md",
            "depth": 2,
            "include": ["src/**"],
            "exclude": ["src/generated/**"],
            "maxBytes": 1024,
            "redact": false,
            "respectGitignore": false
        }"#,
    )?;
    let config = ConfigFile::load_from_file(file.path())?;

    assert_eq!(config.out_file.as_deref(), Some("snapshot.md"));
    assert_eq!(config.format, Some(OutputFormat::Md));
    assert_eq!(config.depth, Some(2));
    assert_eq!(config.include, Some(vec!["src/**".to_string()]));
    assert_eq!(config.exclude, Some(vec!["src/generated/**".to_string()]));
    assert_eq!(config.max_bytes, Some(1024));
    assert_eq!(config.redact, Some(false));
    assert_eq!(config.respect_gitignore, Some(false));
    Ok(())
}

#[test]
fn test_load_yaml_config_with_missing_fields() -> Result<()> {
    let file = config_file(
        ".yaml",
        r#"
format: markdown
include:
  - "**/*.rs"
"#,
    )?;
    let config = ConfigFile::load_from_file(file.path())?;

    assert_eq!(config.format, Some(OutputFormat::Md));
    assert_eq!(config.include, Some(vec!["**/*.rs".to_string()]));
    assert_eq!(config.depth, None);
    assert_eq!(config.redact, None);
    Ok(())
}

#[test]
fn test_empty_json_object_is_all_defaults() -> Result<()> {
    let file = config_file(".json", "{}")?;
    assert_eq!(ConfigFile::load_from_file(file.path())?, ConfigFile::default());
    Ok(())
}

#[test]
fn test_malformed_json_is_reported() -> Result<()> {
    let file = config_file(".json", "{ \"depth\": ")?;
    let err = ConfigFile::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Json { .. }));
    Ok(())
}

#[test]
fn test_wrong_type_in_yaml_is_reported() -> Result<()> {
    let file = config_file(".yml", "depth: deep\n")?;
    let err = ConfigFile::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Yaml { .. }));
    Ok(())
}

#[test]
fn test_missing_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = ConfigFile::load_from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.json"));
}
