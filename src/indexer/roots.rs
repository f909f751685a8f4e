//! Source and class roots of a project, and the directory -> package mapping
//! they imply.
use std::path::{Path, PathBuf};

use tracing::debug;

/// Project structure queries needed to name packages.
pub trait ProjectFileIndex: Send + Sync {
    /// The innermost source root containing `path`.
    fn source_root_for(&self, path: &Path) -> Option<&Path>;

    /// The innermost class (compiled output) root containing `path`.
    fn class_root_for(&self, path: &Path) -> Option<&Path>;

    /// Qualified name of the package a directory represents, or `None` when
    /// the directory is outside every root or a segment is not a Java
    /// identifier. A root itself is the default package, `""`.
    fn package_name_for_directory(&self, dir: &Path) -> Option<String> {
        let root = self
            .source_root_for(dir)
            .or_else(|| self.class_root_for(dir))?;
        let relative = dir.strip_prefix(root).ok()?;

        let mut segments = Vec::new();
        for component in relative.components() {
            let segment = component.as_os_str().to_str()?;
            if !is_java_identifier(segment) {
                return None;
            }
            segments.push(segment);
        }
        Some(segments.join("."))
    }
}

pub fn is_java_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[derive(Debug, Clone, Default)]
pub struct SourceRoots {
    source_roots: Vec<PathBuf>,
    class_roots: Vec<PathBuf>,
}

impl SourceRoots {
    pub fn new(source_roots: Vec<PathBuf>, class_roots: Vec<PathBuf>) -> Self {
        let mut roots = Self::default();
        for root in source_roots {
            roots.add_source_root(root);
        }
        for root in class_roots {
            roots.add_class_root(root);
        }
        roots
    }

    /// Infer source roots from `(file, declared package)` pairs: the root is
    /// the file's directory with the package path stripped from its end.
    /// Files whose directory does not match their package are ignored.
    pub fn infer<'a>(files: impl IntoIterator<Item = (&'a Path, Option<&'a str>)>) -> Self {
        let mut roots = Self::default();
        for (file, package) in files {
            let Some(dir) = file.parent() else {
                continue;
            };
            match root_for_package(dir, package.unwrap_or("")) {
                Some(root) => roots.add_source_root(root),
                None => debug!(
                    "Package {:?} does not match directory of {}",
                    package,
                    file.display()
                ),
            }
        }
        roots
    }

    pub fn add_source_root(&mut self, root: PathBuf) {
        if !self.source_roots.contains(&root) {
            self.source_roots.push(root);
        }
    }

    pub fn add_class_root(&mut self, root: PathBuf) {
        if !self.class_roots.contains(&root) {
            self.class_roots.push(root);
        }
    }

    pub fn source_roots(&self) -> &[PathBuf] {
        &self.source_roots
    }

    pub fn class_roots(&self) -> &[PathBuf] {
        &self.class_roots
    }
}

impl ProjectFileIndex for SourceRoots {
    fn source_root_for(&self, path: &Path) -> Option<&Path> {
        innermost_root(&self.source_roots, path)
    }

    fn class_root_for(&self, path: &Path) -> Option<&Path> {
        innermost_root(&self.class_roots, path)
    }
}

fn innermost_root<'a>(roots: &'a [PathBuf], path: &Path) -> Option<&'a Path> {
    roots
        .iter()
        .filter(|root| path.starts_with(root))
        .max_by_key(|root| root.components().count())
        .map(PathBuf::as_path)
}

fn root_for_package(dir: &Path, package: &str) -> Option<PathBuf> {
    let mut root = dir;
    if !package.is_empty() {
        for segment in package.rsplit('.') {
            if root.file_name()?.to_str()? != segment {
                return None;
            }
            root = root.parent()?;
        }
    }
    Some(root.to_path_buf())
}
