use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const CATALOG: &str = r#"[
  {"name":"Curry Pork","ingredients":[{"amount":"2","unit":"lbs","name":"pork"},{"amount":"1","name":"onion"}]},
  {"name":"Curry Pie","ingredients":[{"amount":"1","unit":"cup","name":"flour"}]},
  {"name":"Grilled Salmon","ingredients":[{"amount":"1","unit":"lb","name":"salmon"}]}
]"#;

fn cookbook(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cookbook"))
        .arg("--catalog")
        .arg(dir.join("catalog.json"))
        .arg("--prefs")
        .arg(dir.join("prefs"))
        .args(args)
        .output()
        .expect("run cookbook")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn setup() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("catalog.json"), CATALOG).unwrap();
    dir
}

#[test]
fn search_requires_every_term() {
    let dir = setup();
    let out = cookbook(dir.path(), &["search", "curry", "pork"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("Curry Pork"));
    assert!(!text.contains("Curry Pie"));

    let out = cookbook(dir.path(), &["search", "pork", "pie"]);
    assert!(stdout(&out).trim().is_empty());
}

#[test]
fn shopping_list_persists_and_aggregates() {
    let dir = setup();
    assert!(cookbook(dir.path(), &["shop", "set", "0", "2"]).status.success());
    assert_eq!(fs::read_to_string(dir.path().join("prefs/shopping_list.txt")).unwrap(), "0 2");

    let text = stdout(&cookbook(dir.path(), &["shop", "list"]));
    assert!(text.contains("4 pounds pork"));
    assert!(text.contains("2 onion"));

    let out = cookbook(dir.path(), &["shop", "set", "0", "-1"]);
    assert!(!out.status.success());
    assert_eq!(fs::read_to_string(dir.path().join("prefs/shopping_list.txt")).unwrap(), "0 2");
}

#[test]
fn favorites_toggle_and_list() {
    let dir = setup();
    assert!(cookbook(dir.path(), &["favorite", "toggle", "2"]).status.success());
    assert!(cookbook(dir.path(), &["favorite", "add", "1"]).status.success());
    assert_eq!(fs::read_to_string(dir.path().join("prefs/favorites.txt")).unwrap(), "1 2");

    let text = stdout(&cookbook(dir.path(), &["favorites"]));
    let pie = text.find("Curry Pie").unwrap();
    let salmon = text.find("Grilled Salmon").unwrap();
    assert!(pie < salmon);

    assert!(!cookbook(dir.path(), &["favorite", "add", "9"]).status.success());
}

#[test]
fn browse_rejects_unknown_categories() {
    let dir = setup();
    assert!(stdout(&cookbook(dir.path(), &["browse", "seafood"])).contains("Grilled Salmon"));
    assert!(!cookbook(dir.path(), &["browse", "desserts"]).status.success());
}

#[test]
fn corrupt_preferences_are_discarded() {
    let dir = setup();
    fs::create_dir_all(dir.path().join("prefs")).unwrap();
    fs::write(dir.path().join("prefs/favorites.txt"), "0 x").unwrap();
    fs::write(dir.path().join("prefs/shopping_list.txt"), "0 9").unwrap();

    let out = cookbook(dir.path(), &["list"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Curry Pork"));

    assert!(cookbook(dir.path(), &["shop", "set", "1", "1"]).status.success());
    assert_eq!(fs::read_to_string(dir.path().join("prefs/shopping_list.txt")).unwrap(), "1 1");
}
