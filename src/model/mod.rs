//! Read-only program model of an indexed Java project.
//!
//! Element data lives in per-kind arenas owned by [`JavaModel`]; an
//! [`Element`] is a copyable handle tagged with its kind.

use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

macro_rules! element_id {
    ($($name:ident),* $(,)?) => {$(
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }

            fn next(len: usize) -> Self {
                Self(len as u32)
            }
        }
    )*};
}

element_id!(
    DirectoryId,
    PackageId,
    FileId,
    ClassId,
    MethodId,
    FieldId,
    ParameterId,
    LocalVariableId,
    LabelId,
    ThrowSiteId,
    MetaOwnerId,
    OtherId,
);

/// A handle to one program element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    Directory(DirectoryId),
    Package(PackageId),
    File(FileId),
    Class(ClassId),
    Field(FieldId),
    Parameter(ParameterId),
    LocalVariable(LocalVariableId),
    Method(MethodId),
    LabeledStatement(LabelId),
    ThrowSite(ThrowSiteId),
    MetaOwner(MetaOwnerId),
    Other(OtherId),
}

impl Element {
    /// Name of the element's concrete type, used for registry lookups.
    pub fn type_tag<'m>(&self, model: &'m JavaModel) -> &'m str {
        match self {
            Element::Directory(_) => "directory",
            Element::Package(_) => "package",
            Element::File(_) => "file",
            Element::Class(_) => "class",
            Element::Field(_) => "field",
            Element::Parameter(_) => "parameter",
            Element::LocalVariable(_) => "local_variable",
            Element::Method(_) => "method",
            Element::LabeledStatement(_) => "labeled_statement",
            Element::ThrowSite(_) => "throw_site",
            Element::MetaOwner(id) => &model.meta_owner(*id).type_tag,
            Element::Other(id) => &model.other(*id).type_tag,
        }
    }
}

/// Where an element was declared. Lines and columns are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: FileId,
    pub line: usize,
    pub column: usize,
    /// Byte range of the identifier (or of the whole node when it has none).
    pub name_range: Range<usize>,
    /// Byte range of the whole declaration.
    pub extent: Range<usize>,
}

#[derive(Debug, Clone)]
pub struct DirectoryData {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct PackageData {
    /// Empty for the default package.
    pub qualified_name: String,
}

#[derive(Debug, Clone)]
pub struct FileData {
    pub path: PathBuf,
    pub package: Option<String>,
    line_starts: Vec<usize>,
    len: usize,
}

impl FileData {
    pub fn new(path: PathBuf, package: Option<String>, source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            path,
            package,
            line_starts,
            len: source.len(),
        }
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Byte offset of a 1-based line and column.
    pub fn offset_at(&self, line: usize, column: usize) -> Option<usize> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        Some(start + column.saturating_sub(1))
    }

    /// Width in bytes of a 1-based line, including its terminator.
    pub fn line_width(&self, line: usize) -> Option<usize> {
        let start = *self.line_starts.get(line.checked_sub(1)?)?;
        let end = self.line_starts.get(line).copied().unwrap_or(self.len);
        Some(end - start)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    AnnotationType,
    Record,
    TypeParameter,
    Anonymous,
}

#[derive(Debug, Clone)]
pub struct ClassData {
    /// `None` for anonymous classes.
    pub name: Option<String>,
    /// `None` for local, anonymous and type-parameter classes.
    pub qualified_name: Option<String>,
    pub kind: ClassKind,
    pub containing_class: Option<ClassId>,
    pub location: Option<Location>,
}

impl ClassData {
    /// Annotation types are interfaces too.
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, ClassKind::Interface | ClassKind::AnnotationType)
    }

    pub fn is_anonymous(&self) -> bool {
        self.kind == ClassKind::Anonymous
    }
}

#[derive(Debug, Clone)]
pub struct MethodData {
    pub name: String,
    /// `None` for constructors.
    pub return_type: Option<String>,
    pub parameters: Vec<ParameterId>,
    pub containing_class: Option<ClassId>,
    pub is_constructor: bool,
    pub location: Option<Location>,
}

#[derive(Debug, Clone)]
pub struct FieldData {
    pub name: String,
    pub type_text: String,
    pub containing_class: Option<ClassId>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationScope {
    Method(MethodId),
    CatchSection,
    ForeachLoop,
    Lambda,
    Other,
}

#[derive(Debug, Clone)]
pub struct ParameterData {
    pub name: String,
    /// Empty when the type is inferred.
    pub type_text: String,
    pub scope: DeclarationScope,
    pub location: Option<Location>,
}

#[derive(Debug, Clone)]
pub struct LocalVariableData {
    pub name: String,
    pub type_text: String,
    pub location: Option<Location>,
}

#[derive(Debug, Clone)]
pub struct LabelData {
    pub label: String,
    pub location: Option<Location>,
}

#[derive(Debug, Clone)]
pub struct ThrowSiteData {
    /// Type of the thrown exception, when it could be determined.
    pub exception_type: Option<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone)]
pub struct MetaData {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct MetaOwnerData {
    pub name: String,
    pub type_tag: String,
    pub metadata: Option<MetaData>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone)]
pub struct OtherData {
    pub type_tag: String,
    pub text: String,
    pub location: Option<Location>,
}

#[derive(Debug, Default)]
pub struct JavaModel {
    directories: Vec<DirectoryData>,
    packages: Vec<PackageData>,
    files: Vec<FileData>,
    classes: Vec<ClassData>,
    methods: Vec<MethodData>,
    fields: Vec<FieldData>,
    parameters: Vec<ParameterData>,
    locals: Vec<LocalVariableData>,
    labels: Vec<LabelData>,
    throw_sites: Vec<ThrowSiteData>,
    meta_owners: Vec<MetaOwnerData>,
    others: Vec<OtherData>,
    directory_by_path: HashMap<PathBuf, DirectoryId>,
    package_by_name: HashMap<String, PackageId>,
    file_by_path: HashMap<PathBuf, FileId>,
}

impl JavaModel {
    pub fn new() -> Self {
        Self::default()
    }

    // ── construction ───────────────────────────────────────────────────

    /// Adds a directory, or returns the existing id for the same path.
    pub fn add_directory(&mut self, path: PathBuf) -> DirectoryId {
        if let Some(id) = self.directory_by_path.get(&path) {
            return *id;
        }
        let id = DirectoryId::next(self.directories.len());
        self.directory_by_path.insert(path.clone(), id);
        self.directories.push(DirectoryData { path });
        id
    }

    /// Adds a package, or returns the existing id for the same name.
    pub fn add_package(&mut self, qualified_name: &str) -> PackageId {
        if let Some(id) = self.package_by_name.get(qualified_name) {
            return *id;
        }
        let id = PackageId::next(self.packages.len());
        self.package_by_name.insert(qualified_name.to_string(), id);
        self.packages.push(PackageData {
            qualified_name: qualified_name.to_string(),
        });
        id
    }

    pub fn add_file(&mut self, data: FileData) -> FileId {
        let id = FileId::next(self.files.len());
        self.file_by_path.insert(data.path.clone(), id);
        self.files.push(data);
        id
    }

    pub fn add_class(&mut self, data: ClassData) -> ClassId {
        let id = ClassId::next(self.classes.len());
        self.classes.push(data);
        id
    }

    pub fn add_method(&mut self, data: MethodData) -> MethodId {
        let id = MethodId::next(self.methods.len());
        self.methods.push(data);
        id
    }

    pub fn add_field(&mut self, data: FieldData) -> FieldId {
        let id = FieldId::next(self.fields.len());
        self.fields.push(data);
        id
    }

    /// Adds a parameter. Parameters scoped to a method are appended to
    /// that method's parameter list.
    pub fn add_parameter(&mut self, data: ParameterData) -> ParameterId {
        let id = ParameterId::next(self.parameters.len());
        if let DeclarationScope::Method(method) = data.scope {
            self.methods[method.index()].parameters.push(id);
        }
        self.parameters.push(data);
        id
    }

    pub fn add_local_variable(&mut self, data: LocalVariableData) -> LocalVariableId {
        let id = LocalVariableId::next(self.locals.len());
        self.locals.push(data);
        id
    }

    pub fn add_label(&mut self, data: LabelData) -> LabelId {
        let id = LabelId::next(self.labels.len());
        self.labels.push(data);
        id
    }

    pub fn add_throw_site(&mut self, data: ThrowSiteData) -> ThrowSiteId {
        let id = ThrowSiteId::next(self.throw_sites.len());
        self.throw_sites.push(data);
        id
    }

    pub fn add_meta_owner(&mut self, data: MetaOwnerData) -> MetaOwnerId {
        let id = MetaOwnerId::next(self.meta_owners.len());
        self.meta_owners.push(data);
        id
    }

    pub fn add_other(&mut self, data: OtherData) -> OtherId {
        let id = OtherId::next(self.others.len());
        self.others.push(data);
        id
    }

    // ── accessors ──────────────────────────────────────────────────────

    pub fn directory(&self, id: DirectoryId) -> &DirectoryData {
        &self.directories[id.index()]
    }

    pub fn package(&self, id: PackageId) -> &PackageData {
        &self.packages[id.index()]
    }

    pub fn file(&self, id: FileId) -> &FileData {
        &self.files[id.index()]
    }

    pub fn class(&self, id: ClassId) -> &ClassData {
        &self.classes[id.index()]
    }

    pub fn method(&self, id: MethodId) -> &MethodData {
        &self.methods[id.index()]
    }

    pub fn field(&self, id: FieldId) -> &FieldData {
        &self.fields[id.index()]
    }

    pub fn parameter(&self, id: ParameterId) -> &ParameterData {
        &self.parameters[id.index()]
    }

    pub fn local_variable(&self, id: LocalVariableId) -> &LocalVariableData {
        &self.locals[id.index()]
    }

    pub fn label(&self, id: LabelId) -> &LabelData {
        &self.labels[id.index()]
    }

    pub fn throw_site(&self, id: ThrowSiteId) -> &ThrowSiteData {
        &self.throw_sites[id.index()]
    }

    pub fn meta_owner(&self, id: MetaOwnerId) -> &MetaOwnerData {
        &self.meta_owners[id.index()]
    }

    pub fn other(&self, id: OtherId) -> &OtherData {
        &self.others[id.index()]
    }

    pub fn directory_by_path(&self, path: &Path) -> Option<DirectoryId> {
        self.directory_by_path.get(path).copied()
    }

    pub fn package_by_name(&self, qualified_name: &str) -> Option<PackageId> {
        self.package_by_name.get(qualified_name).copied()
    }

    pub fn file_by_path(&self, path: &Path) -> Option<FileId> {
        self.file_by_path.get(path).copied()
    }

    pub fn directories(&self) -> impl Iterator<Item = (DirectoryId, &DirectoryData)> {
        self.directories
            .iter()
            .enumerate()
            .map(|(i, d)| (DirectoryId::next(i), d))
    }

    pub fn packages(&self) -> impl Iterator<Item = (PackageId, &PackageData)> {
        self.packages
            .iter()
            .enumerate()
            .map(|(i, d)| (PackageId::next(i), d))
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &FileData)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, d)| (FileId::next(i), d))
    }

    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassData)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(i, d)| (ClassId::next(i), d))
    }

    pub fn methods(&self) -> impl Iterator<Item = (MethodId, &MethodData)> {
        self.methods
            .iter()
            .enumerate()
            .map(|(i, d)| (MethodId::next(i), d))
    }

    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &FieldData)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, d)| (FieldId::next(i), d))
    }

    pub fn parameters(&self) -> impl Iterator<Item = (ParameterId, &ParameterData)> {
        self.parameters
            .iter()
            .enumerate()
            .map(|(i, d)| (ParameterId::next(i), d))
    }

    pub fn local_variables(&self) -> impl Iterator<Item = (LocalVariableId, &LocalVariableData)> {
        self.locals
            .iter()
            .enumerate()
            .map(|(i, d)| (LocalVariableId::next(i), d))
    }

    pub fn labels(&self) -> impl Iterator<Item = (LabelId, &LabelData)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, d)| (LabelId::next(i), d))
    }

    pub fn throw_sites(&self) -> impl Iterator<Item = (ThrowSiteId, &ThrowSiteData)> {
        self.throw_sites
            .iter()
            .enumerate()
            .map(|(i, d)| (ThrowSiteId::next(i), d))
    }

    pub fn others(&self) -> impl Iterator<Item = (OtherId, &OtherData)> {
        self.others
            .iter()
            .enumerate()
            .map(|(i, d)| (OtherId::next(i), d))
    }

    /// Declaration location of an element, if it has one.
    pub fn location(&self, element: Element) -> Option<&Location> {
        match element {
            Element::Directory(_) | Element::Package(_) | Element::File(_) => None,
            Element::Class(id) => self.class(id).location.as_ref(),
            Element::Field(id) => self.field(id).location.as_ref(),
            Element::Parameter(id) => self.parameter(id).location.as_ref(),
            Element::LocalVariable(id) => self.local_variable(id).location.as_ref(),
            Element::Method(id) => self.method(id).location.as_ref(),
            Element::LabeledStatement(id) => self.label(id).location.as_ref(),
            Element::ThrowSite(id) => self.throw_site(id).location.as_ref(),
            Element::MetaOwner(id) => self.meta_owner(id).location.as_ref(),
            Element::Other(id) => self.other(id).location.as_ref(),
        }
    }

    fn located_elements(&self) -> impl Iterator<Item = Element> + '_ {
        let classes = (0..self.classes.len()).map(|i| Element::Class(ClassId::next(i)));
        let methods = (0..self.methods.len()).map(|i| Element::Method(MethodId::next(i)));
        let fields = (0..self.fields.len()).map(|i| Element::Field(FieldId::next(i)));
        let parameters =
            (0..self.parameters.len()).map(|i| Element::Parameter(ParameterId::next(i)));
        let locals =
            (0..self.locals.len()).map(|i| Element::LocalVariable(LocalVariableId::next(i)));
        let labels = (0..self.labels.len()).map(|i| Element::LabeledStatement(LabelId::next(i)));
        let throws = (0..self.throw_sites.len()).map(|i| Element::ThrowSite(ThrowSiteId::next(i)));
        let metas = (0..self.meta_owners.len()).map(|i| Element::MetaOwner(MetaOwnerId::next(i)));
        let others = (0..self.others.len()).map(|i| Element::Other(OtherId::next(i)));
        classes
            .chain(methods)
            .chain(fields)
            .chain(parameters)
            .chain(locals)
            .chain(labels)
            .chain(throws)
            .chain(metas)
            .chain(others)
    }

    /// The element at a 1-based position of an indexed file.
    ///
    /// An element whose name covers the position wins; otherwise the
    /// innermost declaration enclosing it.
    pub fn element_at(&self, file: FileId, line: usize, column: usize) -> Option<Element> {
        let offset = self.file(file).offset_at(line, column)?;

        let mut by_name: Option<(Element, usize)> = None;
        let mut by_extent: Option<(Element, usize)> = None;

        for element in self.located_elements() {
            let Some(loc) = self.location(element) else {
                continue;
            };
            if loc.file != file {
                continue;
            }
            if loc.name_range.start <= offset && offset < loc.name_range.end {
                let width = loc.name_range.len();
                if by_name.map_or(true, |(_, w)| width < w) {
                    by_name = Some((element, width));
                }
            } else if loc.extent.start <= offset && offset < loc.extent.end {
                let width = loc.extent.len();
                if by_extent.map_or(true, |(_, w)| width < w) {
                    by_extent = Some((element, width));
                }
            }
        }

        by_name.or(by_extent).map(|(element, _)| element)
    }

    pub fn stats(&self) -> ModelStats {
        ModelStats {
            files: self.files.len(),
            packages: self.packages.len(),
            classes: self.classes.len(),
            methods: self.methods.len(),
            variables: self.fields.len() + self.parameters.len() + self.locals.len(),
            throw_sites: self.throw_sites.len(),
        }
    }
}

#[derive(Debug)]
pub struct ModelStats {
    pub files: usize,
    pub packages: usize,
    pub classes: usize,
    pub methods: usize,
    pub variables: usize,
    pub throw_sites: usize,
}

impl std::fmt::Display for ModelStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Indexed {} files: {} packages, {} classes, {} methods, {} variables, {} throw sites",
            self.files, self.packages, self.classes, self.methods, self.variables, self.throw_sites
        )
    }
}
