use std::path::PathBuf;

use java_find_usages::indexer::roots::ProjectFileIndex;
use java_find_usages::indexer::{discover_java_files, index_project};
use java_find_usages::model::ClassKind;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/sample-project")
        .canonicalize()
        .unwrap()
}

#[test]
fn test_discovers_java_files_in_order() {
    let files = discover_java_files(&fixture_path());
    let names: Vec<&str> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap())
        .collect();

    assert_eq!(names.len(), 6, "Files: {:?}", names);
    assert!(names.contains(&"Main.java"));
    assert!(names.contains(&"Baz.java"));
    let mut sorted = files.clone();
    sorted.sort();
    assert_eq!(files, sorted);
}

#[test]
fn test_build_directories_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("src/app")).unwrap();
    std::fs::create_dir_all(dir.path().join("build/generated")).unwrap();
    std::fs::create_dir_all(dir.path().join(".hidden")).unwrap();
    std::fs::write(dir.path().join("src/app/A.java"), "package app; class A {}").unwrap();
    std::fs::write(dir.path().join("build/generated/B.java"), "class B {}").unwrap();
    std::fs::write(dir.path().join(".hidden/C.java"), "class C {}").unwrap();

    let files = discover_java_files(dir.path());
    assert_eq!(files, vec![dir.path().join("src/app/A.java")]);
}

#[test]
fn test_index_registers_packages_and_classes() {
    let index = index_project(&fixture_path(), &[]);
    let model = &index.model;

    for package in ["", "com", "com.example", "com.example.api", "com.example.model"] {
        assert!(
            model.package_by_name(package).is_some(),
            "Expected package {:?}",
            package
        );
    }

    let kinds: Vec<(Option<&str>, ClassKind)> = model
        .classes()
        .map(|(_, c)| (c.qualified_name.as_deref(), c.kind))
        .collect();
    assert!(kinds.contains(&(Some("com.example.api.Baz"), ClassKind::Interface)));
    assert!(kinds.contains(&(Some("com.example.model.Status"), ClassKind::Enum)));
    assert!(kinds.contains(&(Some("com.example.model.Audited"), ClassKind::AnnotationType)));
    assert!(kinds.contains(&(None, ClassKind::Anonymous)));
    assert_eq!(model.stats().files, 6);
}

#[test]
fn test_source_roots_inferred_from_packages() {
    let root = fixture_path();
    let index = index_project(&root, &[]);
    let source_root = root.join("src/main/java");

    assert_eq!(index.roots.source_roots(), &[source_root.clone()]);
    assert_eq!(
        index
            .roots
            .package_name_for_directory(&source_root.join("com/example/api"))
            .as_deref(),
        Some("com.example.api")
    );
    assert_eq!(index.roots.package_name_for_directory(&root.join("src")), None);
}

#[test]
fn test_class_roots_are_kept() {
    let root = fixture_path();
    let classes = root.join("build/classes");
    let index = index_project(&root, &[classes.clone()]);

    assert_eq!(index.roots.class_roots(), &[classes.clone()]);
    assert_eq!(
        index.roots.class_root_for(&classes.join("com/example")),
        Some(classes.as_path())
    );
    assert_eq!(
        index
            .roots
            .package_name_for_directory(&classes.join("com/example"))
            .as_deref(),
        Some("com.example")
    );
}

#[test]
fn test_unparsable_text_still_indexes() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("Broken.java"), "class Broken { void f( }").unwrap();

    let index = index_project(dir.path(), &[]);
    assert_eq!(index.model.stats().files, 1);
}
