// codectx/tests/extract_cli_tests.rs
//! End-to-end tests for `codectx extract`, run against the compiled binary.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn codectx() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("codectx"));
    cmd.env_remove("RUST_LOG").env_remove("CODECTX_CONFIG");
    cmd
}

fn write(root: &Path, relative: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Three text files (one holding a secret), a lockfile and a binary asset.
fn fixture(root: &Path) {
    write(root, "src/main.rs", "fn main() {}\n");
    write(root, "src/config.rs", "// settings\r\nAPI_KEY=supersecret\r\n");
    write(root, "README.md", "# Demo\n");
    write(root, "package-lock.json", "{}");
    write(root, "assets/logo.png", [0x89u8, b'P', b'N', b'G', 0, 0]);
}

#[test]
fn test_extract_text_output() -> Result<()> {
    let root = tempdir()?;
    let out_dir = tempdir()?;
    fixture(root.path());
    let out = out_dir.path().join("ctx.txt");

    codectx()
        .arg("extract")
        .arg(root.path())
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out)?;
    assert!(text.starts_with("LLM Context\n"));
    assert!(text.contains("Command: extract "));
    assert!(text.contains("Config: format=text depth=4 maxBytes=500000 redact=true respectGitignore=true\n"));
    assert!(text.contains("Folder Tree\nsrc/\n  config.rs\n  main.rs\nREADME.md\n"));
    assert!(text.contains("Count: 3\n"));
    assert!(text.contains("Skipped Files\nassets/logo.png - binary\npackage-lock.json - excluded\n"));
    assert!(text.contains("File: src/config.rs\n"));
    assert!(text.contains("// settings\nAPI_KEY=[REDACTED]\n"));
    assert!(!text.contains("supersecret"));
    assert!(!text.contains('\r'));
    Ok(())
}

#[test]
fn test_extract_markdown_output() -> Result<()> {
    let root = tempdir()?;
    let out_dir = tempdir()?;
    fixture(root.path());
    let out = out_dir.path().join("ctx.md");

    codectx()
        .arg("extract")
        .arg(root.path())
        .args(["--format", "md", "--depth", "1", "--out"])
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out)?;
    assert!(text.starts_with("# LLM Context\n\n"));
    assert!(text.contains("## Folder Tree\n\n```\nsrc/\nREADME.md\n```\n"));
    assert!(text.contains("### src/main.rs\n\n- Size: 13 bytes\n"));
    assert!(text.contains("```rs\nfn main() {}\n\n```\n"));
    assert!(text.contains("- package-lock.json (excluded)\n"));
    Ok(())
}

#[test]
fn test_no_redact_keeps_secrets() -> Result<()> {
    let root = tempdir()?;
    let out_dir = tempdir()?;
    fixture(root.path());
    let out = out_dir.path().join("ctx.txt");

    codectx()
        .arg("extract")
        .arg(root.path())
        .arg("--no-redact")
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out)?;
    assert!(text.contains("API_KEY=supersecret\n"));
    assert!(text.contains("redact=false"));
    Ok(())
}

#[test]
fn test_config_file_and_command_line_precedence() -> Result<()> {
    let root = tempdir()?;
    let out_dir = tempdir()?;
    fixture(root.path());
    let out = out_dir.path().join("ctx.out");
    let config = out_dir.path().join("codectx.json");
    let config_json = serde_json::json!({
        "format": "md",
        "include": ["src/**"],
        "maxBytes": 1000
    });
    fs::write(&config, serde_json::to_string_pretty(&config_json)?)?;

    codectx()
        .arg("extract")
        .arg(root.path())
        .args(["--include", "README.md", "--config"])
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let text = fs::read_to_string(&out)?;
    assert!(text.starts_with("# LLM Context"));
    assert!(text.contains("- Includes: README.md\n"));
    assert!(text.contains("maxBytes=1000"));
    assert!(text.contains("- Count: 1\n"));
    assert!(!text.contains("### src/main.rs"));
    Ok(())
}

#[test]
fn test_default_output_location() -> Result<()> {
    let root = tempdir()?;
    fixture(root.path());

    for _ in 0..2 {
        codectx()
            .current_dir(root.path())
            .args(["extract", "."])
            .assert()
            .success();
    }

    let out_dir = root.path().join("code-context");
    let entries: Vec<String> = fs::read_dir(&out_dir)?
        .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
        .collect::<Result<_, _>>()?;
    // Two runs within the same second share a name.
    assert!(!entries.is_empty() && entries.len() <= 2);

    let root_name = root.path().file_name().unwrap().to_string_lossy().into_owned();
    for name in &entries {
        assert!(name.starts_with(&format!("{}_context_", root_name)));
        assert!(name.ends_with(".txt"));
        let text = fs::read_to_string(out_dir.join(name))?;
        assert!(!text.contains("File: code-context/"));
    }
    Ok(())
}

#[test]
fn test_output_under_root_is_excluded() -> Result<()> {
    let root = tempdir()?;
    fixture(root.path());
    write(root.path(), "snapshot.txt", "stale output\n");

    codectx()
        .current_dir(root.path())
        .args(["extract", ".", "--out", "snapshot.txt"])
        .assert()
        .success();

    let text = fs::read_to_string(root.path().join("snapshot.txt"))?;
    assert!(text.contains("snapshot.txt - excluded\n"));
    assert!(!text.contains("File: snapshot.txt"));
    assert!(!text.contains("stale output"));
    Ok(())
}

#[test]
fn test_gitignore_toggle() -> Result<()> {
    let root = tempdir()?;
    let out_dir = tempdir()?;
    fixture(root.path());
    write(root.path(), ".gitignore", "README.md\n");
    let out = out_dir.path().join("ctx.txt");

    codectx().arg("extract").arg(root.path()).arg("--out").arg(&out).assert().success();
    let text = fs::read_to_string(&out)?;
    assert!(text.contains("README.md - excluded\n"));

    codectx()
        .arg("extract")
        .arg(root.path())
        .arg("--no-gitignore")
        .arg("--out")
        .arg(&out)
        .assert()
        .success();
    let text = fs::read_to_string(&out)?;
    assert!(text.contains("File: README.md\n"));
    Ok(())
}

#[test]
fn test_verbose_reports_summary() -> Result<()> {
    let root = tempdir()?;
    let out_dir = tempdir()?;
    fixture(root.path());
    let out = out_dir.path().join("ctx.txt");

    codectx()
        .arg("extract")
        .arg(root.path())
        .arg("--out")
        .arg(&out)
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 files to"))
        .stdout(predicate::str::contains("Skipped 2 files (excluded: 1, binary: 1)"));
    Ok(())
}

#[test]
fn test_quiet_run_prints_nothing() -> Result<()> {
    let root = tempdir()?;
    let out_dir = tempdir()?;
    fixture(root.path());

    codectx()
        .args(["--quiet", "extract"])
        .arg(root.path())
        .arg("--out")
        .arg(out_dir.path().join("ctx.txt"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
    Ok(())
}

#[test]
fn test_missing_root_fails() -> Result<()> {
    let dir = tempdir()?;
    codectx()
        .arg("extract")
        .arg(dir.path().join("does-not-exist"))
        .arg("--out")
        .arg(dir.path().join("ctx.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to scan"))
        .stderr(predicate::str::contains("not accessible"));
    Ok(())
}

#[test]
fn test_invalid_glob_fails() -> Result<()> {
    let root = tempdir()?;
    let out_dir = tempdir()?;
    fixture(root.path());

    codectx()
        .arg("extract")
        .arg(root.path())
        .args(["--include", "src/[oops"])
        .arg("--out")
        .arg(out_dir.path().join("ctx.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid glob pattern 'src/[oops'"));
    Ok(())
}
