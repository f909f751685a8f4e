use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::DescriptorError;
use crate::indexer::ProjectIndex;
use crate::model::{Element, FileId, JavaModel};
use crate::provider::FindUsagesProvider;

/// Everything the find-usages UI shows for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementDescription {
    pub kind: String,
    pub can_find_usages: bool,
    pub help_id: String,
    pub descriptive_name: String,
    pub node_text: String,
    pub full_node_text: String,
    /// `package (in root)` for package directories, the path otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

pub fn describe(
    provider: &FindUsagesProvider<'_>,
    element: Element,
    project_root: &Path,
) -> ElementDescription {
    let model = provider.model();
    let package_location = match element {
        Element::Directory(id) => Some(provider.directory_package_name(id, true)),
        _ => None,
    };
    let location = model.location(element).map(|loc| {
        let path = &model.file(loc.file).path;
        format!(
            "{}:{}:{}",
            path.strip_prefix(project_root).unwrap_or(path).display(),
            loc.line,
            loc.column
        )
    });

    ElementDescription {
        kind: provider.type_name(element),
        can_find_usages: provider.can_find_usages_for(element),
        help_id: provider.help_id(element).to_string(),
        descriptive_name: provider.descriptive_name(element),
        node_text: provider.node_text(element, false),
        full_node_text: provider.node_text(element, true),
        package_location,
        location,
    }
}

/// Resolve a user query to elements. Tried in order, the first kind of
/// match wins: a directory or file path, a qualified class name, a package
/// name, `Class.member` / `Class#member`, then simple names.
pub fn resolve_symbol(index: &ProjectIndex, symbol: &str) -> Vec<Element> {
    let model = &index.model;
    let symbol = symbol.trim();
    if symbol.is_empty() {
        return Vec::new();
    }

    if let Some(element) = resolve_path(index, symbol) {
        return vec![element];
    }

    let classes: Vec<Element> = model
        .classes()
        .filter(|(_, c)| c.qualified_name.as_deref() == Some(symbol))
        .map(|(id, _)| Element::Class(id))
        .collect();
    if !classes.is_empty() {
        return classes;
    }

    if let Some(package) = model.package_by_name(symbol) {
        return vec![Element::Package(package)];
    }

    if let Some((owner, member)) = symbol.rsplit_once('#').or_else(|| symbol.rsplit_once('.')) {
        let members = resolve_member(model, owner, member);
        if !members.is_empty() {
            return members;
        }
    }

    resolve_simple_name(model, symbol)
}

/// The element at a 1-based position of an indexed file.
pub fn resolve_position(
    index: &ProjectIndex,
    file: &Path,
    line: usize,
    column: Option<usize>,
) -> Result<Element, DescriptorError> {
    let path = absolutize(&index.root, file);
    let file_id = lookup(&path, |p| index.model.file_by_path(p))
        .ok_or_else(|| DescriptorError::FileNotIndexed(path.display().to_string()))?;

    let found = match column {
        Some(column) => index.model.element_at(file_id, line, column),
        None => first_element_on_line(&index.model, file_id, line),
    };
    found.ok_or_else(|| {
        DescriptorError::ElementNotFound(format!("{}:{}", path.display(), line))
    })
}

/// The declaration whose name starts leftmost on `line`, falling back to
/// whatever encloses the start of the line.
fn first_element_on_line(model: &JavaModel, file: FileId, line: usize) -> Option<Element> {
    let width = model.file(file).line_width(line)?;
    (1..=width)
        .filter_map(|column| model.element_at(file, line, column))
        .find(|element| {
            model
                .location(*element)
                .is_some_and(|loc| loc.line == line)
        })
        .or_else(|| model.element_at(file, line, 1))
}

fn absolutize(root: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        root.join(path)
    } else {
        path.to_path_buf()
    }
}

/// Looks a path up as given, then in canonical form.
fn lookup<T>(path: &Path, find: impl Fn(&Path) -> Option<T>) -> Option<T> {
    find(path).or_else(|| path.canonicalize().ok().and_then(|p| find(&p)))
}

fn resolve_path(index: &ProjectIndex, symbol: &str) -> Option<Element> {
    let candidate = absolutize(&index.root, Path::new(symbol));
    lookup(&candidate, |p| index.model.directory_by_path(p))
        .map(Element::Directory)
        .or_else(|| lookup(&candidate, |p| index.model.file_by_path(p)).map(Element::File))
}

fn resolve_member(model: &JavaModel, owner: &str, member: &str) -> Vec<Element> {
    let owners: Vec<_> = model
        .classes()
        .filter(|(_, c)| {
            c.qualified_name.as_deref() == Some(owner) || c.name.as_deref() == Some(owner)
        })
        .map(|(id, _)| id)
        .collect();
    if owners.is_empty() {
        return Vec::new();
    }

    let methods = model
        .methods()
        .filter(|(_, m)| {
            m.name == member && m.containing_class.is_some_and(|c| owners.contains(&c))
        })
        .map(|(id, _)| Element::Method(id));
    let fields = model
        .fields()
        .filter(|(_, f)| {
            f.name == member && f.containing_class.is_some_and(|c| owners.contains(&c))
        })
        .map(|(id, _)| Element::Field(id));
    methods.chain(fields).collect()
}

fn resolve_simple_name(model: &JavaModel, name: &str) -> Vec<Element> {
    let mut results: Vec<Element> = model
        .classes()
        .filter(|(_, c)| c.name.as_deref() == Some(name))
        .map(|(id, _)| Element::Class(id))
        .collect();
    results.extend(
        model
            .methods()
            .filter(|(_, m)| m.name == name)
            .map(|(id, _)| Element::Method(id)),
    );
    results.extend(
        model
            .fields()
            .filter(|(_, f)| f.name == name)
            .map(|(id, _)| Element::Field(id)),
    );
    results.extend(
        model
            .labels()
            .filter(|(_, l)| l.label == name)
            .map(|(id, _)| Element::LabeledStatement(id)),
    );
    results
}
