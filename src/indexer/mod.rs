pub mod java_parser;
pub mod roots;

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::model::{FileData, JavaModel};
use java_parser::{extract_package, parse_java_source, JavaFileExtractor};
use roots::SourceRoots;

/// The program model of a project together with its root layout.
#[derive(Debug, Default)]
pub struct ProjectIndex {
    pub root: PathBuf,
    pub model: JavaModel,
    pub roots: SourceRoots,
}

/// Discover all .java files under the given root, skipping build dirs and hidden dirs.
pub fn discover_java_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.file_type().is_dir() && e.depth() > 0 {
                return !name.starts_with('.')
                    && name != "build"
                    && name != "target"
                    && name != "out"
                    && name != "node_modules";
            }
            true
        })
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file() && e.path().extension().is_some_and(|ext| ext == "java")
        })
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Parse all discovered files in parallel and build the program model.
///
/// `class_roots` are added to the source roots inferred from package
/// declarations.
pub fn index_project(root: &Path, class_roots: &[PathBuf]) -> ProjectIndex {
    let files = discover_java_files(root);
    debug!("Discovered {} Java files", files.len());

    let parsed: Vec<(PathBuf, String, tree_sitter::Tree)> = files
        .par_iter()
        .filter_map(|path| {
            let source = match std::fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => {
                    warn!("Failed to read {}: {}", path.display(), e);
                    return None;
                }
            };
            match parse_java_source(&source) {
                Ok(tree) => Some((path.clone(), source, tree)),
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            }
        })
        .collect();

    let mut model = JavaModel::new();
    let mut declared_packages: Vec<(PathBuf, Option<String>)> = Vec::with_capacity(parsed.len());

    for (path, source, tree) in &parsed {
        let root_node = tree.root_node();
        let src = source.as_bytes();
        let package = extract_package(&root_node, src);

        add_directories(&mut model, root, path);
        add_packages(&mut model, package.as_deref());

        let file = model.add_file(FileData::new(path.clone(), package.clone(), source));
        JavaFileExtractor::new(&mut model, file, src).extract(&root_node, package.as_deref());
        declared_packages.push((path.clone(), package));
    }

    let mut roots = SourceRoots::infer(
        declared_packages
            .iter()
            .map(|(path, package)| (path.as_path(), package.as_deref())),
    );
    for class_root in class_roots {
        roots.add_class_root(class_root.clone());
    }

    debug!("{}", model.stats());
    ProjectIndex {
        root: root.to_path_buf(),
        model,
        roots,
    }
}

/// Registers the file's directory and its ancestors up to the project root.
fn add_directories(model: &mut JavaModel, root: &Path, file: &Path) {
    let mut dir = file.parent();
    while let Some(d) = dir {
        if !d.starts_with(root) {
            break;
        }
        model.add_directory(d.to_path_buf());
        if d == root {
            break;
        }
        dir = d.parent();
    }
}

/// Registers a package and every enclosing package.
fn add_packages(model: &mut JavaModel, package: Option<&str>) {
    let Some(package) = package else {
        model.add_package("");
        return;
    };
    let mut end = 0;
    for segment in package.split('.') {
        end += segment.len();
        model.add_package(&package[..end]);
        end += 1;
    }
}
