use gdindex_core::{IndexConfig, WarningKind};
use gdindex_scan::{FileWalker, IgnoreRules, hash_file};
use std::fs;
use tempfile::TempDir;

fn create_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::create_dir_all(root.join("scripts")).unwrap();
    fs::create_dir_all(root.join("third_party/lib")).unwrap();
    fs::create_dir_all(root.join("_cw_index/index")).unwrap();
    fs::create_dir_all(root.join(".git/objects")).unwrap();

    fs::write(root.join("scripts/main.gd"), "extends Node").unwrap();
    fs::write(root.join("scripts/scratch.bak"), "old").unwrap();
    fs::write(root.join("third_party/lib/vendor.gd"), "extends Node").unwrap();
    fs::write(root.join("_cw_index/index/manifest.json"), "[]").unwrap();
    fs::write(root.join(".git/objects/ab"), "blob").unwrap();
    fs::write(root.join("README.md"), "# Game").unwrap();
    fs::write(
        root.join(".indexignore"),
        "# local rules\nthird_party/\n*.bak\n\nbad[pattern\n",
    )
    .unwrap();

    temp
}

#[test]
fn test_walk_with_project_rules() {
    let temp = create_project();
    let config = IndexConfig::in_place(temp.path());
    let rules = IgnoreRules::from_config(&config).unwrap();

    assert!(rules.patterns().contains(&"third_party/**".to_string()));
    assert_eq!(rules.warnings().len(), 1);
    assert_eq!(rules.warnings()[0].kind, WarningKind::InvalidPattern);

    let outcome = FileWalker::new(rules).walk(temp.path()).unwrap();
    let paths: Vec<&str> = outcome.files.iter().map(|f| f.rel_path.as_str()).collect();

    assert_eq!(paths, vec![".indexignore", "README.md", "scripts/main.gd"]);
    // .git, third_party, _cw_index
    assert_eq!(outcome.pruned_dirs, 3);
}

#[test]
fn test_ignore_file_can_be_disabled() {
    let temp = create_project();
    let config = IndexConfig::builder()
        .root(temp.path())
        .output_dir(temp.path().join("_cw_index"))
        .ignore_file(None::<String>)
        .build()
        .unwrap();
    let rules = IgnoreRules::from_config(&config).unwrap();

    let outcome = FileWalker::new(rules).walk(temp.path()).unwrap();
    assert!(
        outcome
            .files
            .iter()
            .any(|f| f.rel_path == "third_party/lib/vendor.gd")
    );
}

#[test]
fn test_digests_are_reproducible() {
    let temp = create_project();
    let path = temp.path().join("scripts/main.gd");
    assert_eq!(hash_file(&path).unwrap(), hash_file(&path).unwrap());
}
