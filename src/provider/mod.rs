//! Presentation of program elements in find-usages UI: whether an element
//! can be searched, which help topic applies, its kind label and its
//! display text.

pub mod throw_search;
pub mod type_names;

use std::path::Path;

use crate::format::{format_method, format_variable, FormatOptions};
use crate::indexer::roots::ProjectFileIndex;
use crate::messages::{keys, MessageBundle};
use crate::model::{ClassId, ClassKind, DeclarationScope, DirectoryId, Element, JavaModel};

pub use throw_search::{ThrowSearch, ThrowSiteSearch};
pub use type_names::TypeNameRegistry;

static DEFAULT_THROW_SEARCH: ThrowSiteSearch = ThrowSiteSearch;

/// Help topic shown by the find-usages dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpId {
    FindPackageUsages,
    FindClassUsages,
    FindMethodUsages,
    FindThrowUsages,
    FindOtherUsages,
}

impl HelpId {
    pub fn as_str(&self) -> &'static str {
        match self {
            HelpId::FindPackageUsages => "reference.dialogs.findUsages.package",
            HelpId::FindClassUsages => "reference.dialogs.findUsages.class",
            HelpId::FindMethodUsages => "reference.dialogs.findUsages.method",
            HelpId::FindThrowUsages => "reference.dialogs.findUsages.throwUsages",
            HelpId::FindOtherUsages => "reference.dialogs.findUsages.other",
        }
    }
}

impl std::fmt::Display for HelpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless find-usages presentation for Java elements.
///
/// Every query reads the model as it is at call time and never fails:
/// unmatched kinds yield `false`, the generic help topic or `""`.
#[derive(Clone, Copy)]
pub struct FindUsagesProvider<'a> {
    model: &'a JavaModel,
    messages: &'a MessageBundle,
    file_index: &'a dyn ProjectFileIndex,
    throw_search: &'a dyn ThrowSearch,
    type_names: Option<&'a TypeNameRegistry>,
}

impl<'a> FindUsagesProvider<'a> {
    pub fn new(
        model: &'a JavaModel,
        messages: &'a MessageBundle,
        file_index: &'a dyn ProjectFileIndex,
    ) -> Self {
        Self {
            model,
            messages,
            file_index,
            throw_search: &DEFAULT_THROW_SEARCH,
            type_names: None,
        }
    }

    pub fn with_throw_search(mut self, throw_search: &'a dyn ThrowSearch) -> Self {
        self.throw_search = throw_search;
        self
    }

    pub fn with_type_names(mut self, type_names: &'a TypeNameRegistry) -> Self {
        self.type_names = Some(type_names);
        self
    }

    pub fn model(&self) -> &'a JavaModel {
        self.model
    }

    pub fn can_find_usages_for(&self, element: Element) -> bool {
        match element {
            Element::Directory(id) => self
                .directory_package(id)
                .is_some_and(|name| !name.is_empty()),
            Element::Class(_)
            | Element::Field(_)
            | Element::Parameter(_)
            | Element::LocalVariable(_)
            | Element::Method(_)
            | Element::Package(_)
            | Element::LabeledStatement(_) => true,
            Element::MetaOwner(id) => self.model.meta_owner(id).metadata.is_some(),
            Element::ThrowSite(_) | Element::File(_) | Element::Other(_) => {
                self.is_throw_searchable(element)
            }
        }
    }

    pub fn help_id(&self, element: Element) -> HelpId {
        match element {
            Element::Package(_) => HelpId::FindPackageUsages,
            Element::Class(_) => HelpId::FindClassUsages,
            Element::Method(_) => HelpId::FindMethodUsages,
            _ if self.is_throw_searchable(element) => HelpId::FindThrowUsages,
            _ => HelpId::FindOtherUsages,
        }
    }

    /// Generic kind label, e.g. "method", "field" or "interface".
    pub fn type_name(&self, element: Element) -> String {
        let key = match element {
            Element::Directory(_) => keys::TERMS_DIRECTORY,
            Element::File(_) => keys::TERMS_FILE,
            _ if self.is_throw_searchable(element) => keys::EXCEPTION,
            Element::Package(_) => keys::PACKAGE,
            Element::LabeledStatement(_) => keys::LABEL,
            Element::Class(id) => match self.model.class(id).kind {
                ClassKind::AnnotationType => keys::ANNOTATION_INTERFACE,
                ClassKind::Enum => keys::ENUM,
                ClassKind::Interface => keys::INTERFACE,
                ClassKind::TypeParameter => keys::TYPE_PARAMETER,
                ClassKind::Class | ClassKind::Record | ClassKind::Anonymous => keys::CLASS,
            },
            Element::Field(_) => keys::FIELD,
            Element::Parameter(_) => keys::PARAMETER,
            Element::LocalVariable(_) => keys::VARIABLE,
            Element::Method(id) if self.model.method(id).is_constructor => keys::CONSTRUCTOR,
            Element::Method(_) => keys::METHOD,
            Element::ThrowSite(_) | Element::MetaOwner(_) | Element::Other(_) => {
                return self.registered_type_name(element);
            }
        };
        self.messages.message(key, &[])
    }

    pub fn descriptive_name(&self, element: Element) -> String {
        match element {
            _ if self.is_throw_searchable(element) => {
                self.throw_search.searchable_type_name(self.model, element)
            }
            Element::Directory(id) => self.directory_package_name(id, false),
            Element::Package(id) => self.package_name(&self.model.package(id).qualified_name),
            Element::File(id) => presentable_path(&self.model.file(id).path),
            Element::LabeledStatement(id) => self.model.label(id).label.clone(),
            Element::Class(id) => {
                let class = self.model.class(id);
                if class.is_anonymous() {
                    self.messages.message(keys::ANONYMOUS_CLASS, &[])
                } else {
                    class
                        .qualified_name
                        .clone()
                        .or_else(|| class.name.clone())
                        .unwrap_or_default()
                }
            }
            Element::Method(id) => {
                let method = self.model.method(id);
                let formatted = format_method(
                    self.model,
                    method,
                    FormatOptions::SHOW_NAME | FormatOptions::SHOW_PARAMETERS,
                    FormatOptions::SHOW_TYPE,
                );
                match method.containing_class {
                    Some(class) => self.containing_class_description(class, &formatted),
                    None => formatted,
                }
            }
            Element::Field(id) => {
                let field = self.model.field(id);
                let formatted =
                    format_variable(&field.name, &field.type_text, FormatOptions::SHOW_NAME);
                match field.containing_class {
                    Some(class) => self.containing_class_description(class, &formatted),
                    None => formatted,
                }
            }
            Element::Parameter(id) => {
                let param = self.model.parameter(id);
                format_variable(&param.name, &param.type_text, FormatOptions::SHOW_NAME)
            }
            Element::LocalVariable(id) => {
                let local = self.model.local_variable(id);
                format_variable(&local.name, &local.type_text, FormatOptions::SHOW_NAME)
            }
            Element::ThrowSite(_) | Element::MetaOwner(_) | Element::Other(_) => String::new(),
        }
    }

    /// Text for a node of the usages tree.
    pub fn node_text(&self, element: Element, use_full_name: bool) -> String {
        let variable_options =
            FormatOptions::TYPE_AFTER | FormatOptions::SHOW_TYPE | FormatOptions::SHOW_NAME;

        match element {
            Element::Directory(id) => self.directory_package_name(id, false),
            Element::Package(id) => self.package_name(&self.model.package(id).qualified_name),
            Element::File(id) => {
                let file = self.model.file(id);
                if use_full_name {
                    presentable_path(&file.path)
                } else {
                    file.name()
                }
            }
            Element::LabeledStatement(id) => self.model.label(id).label.clone(),
            _ if self.is_throw_searchable(element) => {
                self.throw_search.searchable_type_name(self.model, element)
            }
            Element::Class(id) => {
                let class = self.model.class(id);
                let qualified = class.qualified_name.as_ref().filter(|_| use_full_name);
                qualified.or(class.name.as_ref()).cloned().unwrap_or_default()
            }
            Element::Method(id) => {
                let method = self.model.method(id);
                if use_full_name {
                    let text = format_method(
                        self.model,
                        method,
                        FormatOptions::TYPE_AFTER
                            | FormatOptions::SHOW_TYPE
                            | FormatOptions::SHOW_NAME
                            | FormatOptions::SHOW_PARAMETERS,
                        FormatOptions::SHOW_TYPE,
                    );
                    self.qualified_membership(text, method.containing_class)
                } else {
                    format_method(
                        self.model,
                        method,
                        FormatOptions::SHOW_NAME | FormatOptions::SHOW_PARAMETERS,
                        FormatOptions::SHOW_TYPE,
                    )
                }
            }
            Element::Parameter(id) => {
                let param = self.model.parameter(id);
                let formatted = format_variable(&param.name, &param.type_text, variable_options);
                match param.scope {
                    DeclarationScope::Method(method_id) => {
                        let method = self.model.method(method_id);
                        let signature = format_method(
                            self.model,
                            method,
                            FormatOptions::SHOW_NAME | FormatOptions::SHOW_PARAMETERS,
                            FormatOptions::SHOW_TYPE,
                        );
                        let text = self
                            .messages
                            .message(keys::VARIABLE_OF_METHOD, &[&formatted, &signature]);
                        self.qualified_membership(text, method.containing_class)
                    }
                    _ => formatted,
                }
            }
            Element::Field(id) => {
                let field = self.model.field(id);
                let text = format_variable(&field.name, &field.type_text, variable_options);
                self.qualified_membership(text, field.containing_class)
            }
            Element::LocalVariable(id) => {
                let local = self.model.local_variable(id);
                format_variable(&local.name, &local.type_text, variable_options)
            }
            Element::ThrowSite(_) | Element::MetaOwner(_) | Element::Other(_) => String::new(),
        }
    }

    /// Presentable name of a package: its qualified name, or the default
    /// package label when that is empty.
    pub fn package_name(&self, qualified_name: &str) -> String {
        if qualified_name.is_empty() {
            self.messages.message(keys::DEFAULT_PACKAGE, &[])
        } else {
            qualified_name.to_string()
        }
    }

    /// Package name of a directory, or its path when it is not a package.
    /// With `include_root_dir` the source or class root is appended.
    pub fn directory_package_name(&self, id: DirectoryId, include_root_dir: bool) -> String {
        let directory = self.model.directory(id);
        let Some(qualified) = self.directory_package(id) else {
            return presentable_path(&directory.path);
        };

        let package_name = self.package_name(&qualified);
        if include_root_dir {
            if let Some(root) = self.root_directory_for_package(id) {
                return self
                    .messages
                    .message(keys::PACKAGE_IN_DIRECTORY, &[&package_name, &root]);
            }
        }
        package_name
    }

    pub fn root_directory_for_package(&self, id: DirectoryId) -> Option<String> {
        let path = &self.model.directory(id).path;
        self.file_index
            .source_root_for(path)
            .or_else(|| self.file_index.class_root_for(path))
            .map(presentable_path)
    }

    fn directory_package(&self, id: DirectoryId) -> Option<String> {
        self.file_index
            .package_name_for_directory(&self.model.directory(id).path)
    }

    fn is_throw_searchable(&self, element: Element) -> bool {
        self.throw_search.is_searchable(self.model, element)
    }

    fn registered_type_name(&self, element: Element) -> String {
        self.type_names
            .and_then(|names| names.type_name(element.type_tag(self.model)))
            .map(String::from)
            .unwrap_or_default()
    }

    /// "`formatted` of class/interface/enum/annotation type `Name`", chosen
    /// by the declaring type's kind.
    fn containing_class_description(&self, class_id: ClassId, formatted: &str) -> String {
        let class = self.model.class(class_id);
        let name = class.name.as_deref().unwrap_or_default();
        let key = match class.kind {
            ClassKind::Anonymous => {
                return self.messages.message(keys::OF_ANONYMOUS_CLASS, &[formatted]);
            }
            ClassKind::Interface => keys::OF_INTERFACE,
            ClassKind::Enum => keys::OF_ENUM,
            ClassKind::AnnotationType => keys::OF_ANNOTATION_TYPE,
            ClassKind::Class | ClassKind::Record | ClassKind::TypeParameter => keys::OF_CLASS,
        };
        self.messages.message(key, &[formatted, name])
    }

    /// Appends "of interface/class `qualified.Name`" when the declaring
    /// type has a qualified name.
    fn qualified_membership(&self, text: String, class_id: Option<ClassId>) -> String {
        let Some(class) = class_id.map(|id| self.model.class(id)) else {
            return text;
        };
        let Some(qualified) = class.qualified_name.as_deref() else {
            return text;
        };
        let key = if class.is_interface() {
            keys::OF_INTERFACE
        } else {
            keys::OF_CLASS
        };
        self.messages.message(key, &[&text, qualified])
    }
}

pub fn presentable_path(path: &Path) -> String {
    path.display().to_string()
}
