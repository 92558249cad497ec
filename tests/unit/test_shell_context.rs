//! Unit tests for tokenizing, path resolution and built-in parsing

use shellwrap::shell::{resolve_path, tokenize, Command, ShellContext};
use shellwrap::Error;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_tokenize_respects_quotes() {
    assert_eq!(
        tokenize(r#"grep "hello world" 'a b' file.txt"#),
        vec!["grep", "hello world", "a b", "file.txt"]
    );
}

#[test]
fn test_tokenize_collapses_whitespace() {
    assert_eq!(tokenize("\tcd \t  /tmp  "), vec!["cd", "/tmp"]);
}

#[test]
fn test_resolve_absolute_ignores_base() {
    let base = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    let literal = other.path().to_string_lossy().to_string();

    let resolved = resolve_path(base.path(), &literal).unwrap();
    assert_eq!(resolved, other.path().canonicalize().unwrap());
}

#[test]
fn test_resolve_falls_back_to_base() {
    let base = TempDir::new().unwrap();
    fs::write(base.path().join("only-here-7f3a.png"), b"png").unwrap();

    let resolved = resolve_path(base.path(), "only-here-7f3a.png").unwrap();
    assert!(resolved.is_absolute());
    assert!(resolved.ends_with("only-here-7f3a.png"));
}

#[test]
fn test_resolve_reports_candidate() {
    let base = TempDir::new().unwrap();
    match resolve_path(base.path(), "missing-9c1d") {
        Err(Error::PathNotFound { path }) => assert_eq!(path, "missing-9c1d"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn test_context_parent_directory() {
    let base = TempDir::new().unwrap();
    let nested = base.path().join("inner");
    fs::create_dir(&nested).unwrap();

    let context = ShellContext::open(&nested).unwrap();
    context.change_directory("..").unwrap();
    assert_eq!(
        context.working_directory(),
        base.path().canonicalize().unwrap()
    );
}

#[test]
fn test_command_parse_table() {
    assert_eq!(Command::parse("exit"), Command::Exit);
    assert_eq!(
        Command::parse("cd 'with space'"),
        Command::ChangeDirectory(Some("with space".to_string()))
    );
    assert_eq!(Command::parse("view"), Command::View(Vec::new()));
    assert_eq!(
        Command::parse("echo cd /tmp"),
        Command::External("echo cd /tmp".to_string())
    );
    assert_eq!(Command::parse(""), Command::Empty);
}
