use tree_sitter::Node;

use crate::error::DescriptorError;
use crate::model::{
    ClassData, ClassId, ClassKind, DeclarationScope, FieldData, FileId, JavaModel, LabelData,
    LocalVariableData, Location, MethodData, OtherData, ParameterData, ThrowSiteData,
};

/// Parse Java source text with tree-sitter.
pub fn parse_java_source(source: &str) -> Result<tree_sitter::Tree, DescriptorError> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&tree_sitter_java::LANGUAGE.into())?;
    parser
        .parse(source, None)
        .ok_or_else(|| DescriptorError::ParseError("parser returned no tree".to_string()))
}

pub fn node_text<'a>(node: &Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

/// The package declared at the top of a compilation unit.
pub fn extract_package(root: &Node, src: &[u8]) -> Option<String> {
    let mut cursor = root.walk();
    for child in root.children(&mut cursor) {
        if child.kind() == "package_declaration" {
            let mut inner = child.walk();
            for c in child.children(&mut inner) {
                if c.kind() == "scoped_identifier" || c.kind() == "identifier" {
                    return Some(node_text(&c, src).to_string());
                }
            }
        }
    }
    None
}

/// Lexical context while walking a file.
#[derive(Debug, Clone, Default)]
struct Scope {
    class: Option<ClassId>,
    /// Prefix for qualified names of nested types; `None` inside code blocks
    /// and anonymous classes, where declared types have no qualified name.
    qualifier: Option<String>,
}

impl Scope {
    fn qualify(&self, name: &str) -> Option<String> {
        self.qualifier.as_ref().map(|prefix| {
            if prefix.is_empty() {
                name.to_string()
            } else {
                format!("{}.{}", prefix, name)
            }
        })
    }

    fn code_block(&self) -> Scope {
        Scope {
            qualifier: None,
            ..self.clone()
        }
    }
}

/// Adds the declarations of one parsed file to the model.
pub struct JavaFileExtractor<'m, 's> {
    model: &'m mut JavaModel,
    src: &'s [u8],
    file: FileId,
    /// Visible `(name, type)` bindings of locals and parameters, innermost last.
    bindings: Vec<(String, String)>,
}

impl<'m, 's> JavaFileExtractor<'m, 's> {
    pub fn new(model: &'m mut JavaModel, file: FileId, src: &'s [u8]) -> Self {
        Self {
            model,
            src,
            file,
            bindings: Vec::new(),
        }
    }

    pub fn extract(mut self, root: &Node, package: Option<&str>) {
        let scope = Scope {
            qualifier: Some(package.unwrap_or_default().to_string()),
            ..Scope::default()
        };
        self.visit_children(root, &scope);
    }

    fn text(&self, node: &Node) -> String {
        node_text(node, self.src).to_string()
    }

    fn location(&self, name: &Node, extent: &Node) -> Option<Location> {
        Some(Location {
            file: self.file,
            line: name.start_position().row + 1,
            column: name.start_position().column + 1,
            name_range: name.byte_range(),
            extent: extent.byte_range(),
        })
    }

    fn visit_children(&mut self, node: &Node, scope: &Scope) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(&child, scope);
        }
    }

    /// Visits children with bindings that go out of scope afterwards.
    fn visit_block(&mut self, node: &Node, scope: &Scope) {
        let mark = self.bindings.len();
        self.visit_children(node, scope);
        self.bindings.truncate(mark);
    }

    fn visit(&mut self, node: &Node, scope: &Scope) {
        match node.kind() {
            "class_declaration"
            | "interface_declaration"
            | "enum_declaration"
            | "annotation_type_declaration"
            | "record_declaration" => self.declare_class(node, scope),
            "method_declaration"
            | "constructor_declaration"
            | "annotation_type_element_declaration" => self.declare_method(node, scope),
            "field_declaration" | "constant_declaration" => self.declare_fields(node, scope),
            "enum_constant" => self.declare_enum_constant(node, scope),
            "local_variable_declaration" => self.declare_locals(node, scope),
            // initializer and compact constructor bodies are blocks too
            "block" | "switch_block" | "for_statement" | "try_with_resources_statement" => {
                self.visit_block(node, &scope.code_block())
            }
            "catch_clause" => self.declare_catch(node, scope),
            "enhanced_for_statement" => self.declare_foreach(node, scope),
            "lambda_expression" => self.declare_lambda(node, scope),
            "labeled_statement" => self.declare_label(node, scope),
            "throw_statement" => self.declare_throw(node, scope),
            "object_creation_expression" => self.visit_object_creation(node, scope),
            "import_declaration" => {
                self.model.add_other(OtherData {
                    type_tag: "import_declaration".to_string(),
                    text: self.text(node),
                    location: self.location(node, node),
                });
            }
            "resource" => {
                // try-with-resources: `Type name = value`
                if let (Some(name), Some(ty)) = (
                    node.child_by_field_name("name"),
                    node.child_by_field_name("type"),
                ) {
                    let type_text = self.text(&ty);
                    self.add_local(&name, &type_text, node);
                }
                self.visit_children(node, scope);
            }
            _ => self.visit_children(node, scope),
        }
    }

    fn declare_class(&mut self, node: &Node, scope: &Scope) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let name = self.text(&name_node);
        let kind = match node.kind() {
            "interface_declaration" => ClassKind::Interface,
            "enum_declaration" => ClassKind::Enum,
            "annotation_type_declaration" => ClassKind::AnnotationType,
            "record_declaration" => ClassKind::Record,
            _ => ClassKind::Class,
        };
        let qualified_name = scope.qualify(&name);
        let id = self.model.add_class(ClassData {
            name: Some(name),
            qualified_name: qualified_name.clone(),
            kind,
            containing_class: scope.class,
            location: self.location(&name_node, node),
        });

        self.declare_type_parameters(node);

        let inner = Scope {
            class: Some(id),
            qualifier: qualified_name,
        };

        if kind == ClassKind::Record {
            if let Some(components) = node.child_by_field_name("parameters") {
                let mut cursor = components.walk();
                for component in components.named_children(&mut cursor) {
                    if let Some((name_node, type_text)) = self.formal_parameter(&component) {
                        self.model.add_field(FieldData {
                            name: self.text(&name_node),
                            type_text,
                            containing_class: Some(id),
                            location: self.location(&name_node, &component),
                        });
                    }
                }
            }
        }

        if let Some(body) = node.child_by_field_name("body") {
            let mark = self.bindings.len();
            self.visit_children(&body, &inner);
            self.bindings.truncate(mark);
        }
    }

    fn declare_type_parameters(&mut self, owner: &Node) {
        let Some(params) = owner.child_by_field_name("type_parameters") else {
            return;
        };
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            if param.kind() != "type_parameter" {
                continue;
            }
            let mut inner = param.walk();
            let name_node = param
                .named_children(&mut inner)
                .find(|c| c.kind() == "type_identifier" || c.kind() == "identifier");
            if let Some(name_node) = name_node {
                self.model.add_class(ClassData {
                    name: Some(self.text(&name_node)),
                    qualified_name: None,
                    kind: ClassKind::TypeParameter,
                    containing_class: None,
                    location: self.location(&name_node, &param),
                });
            }
        }
    }

    fn declare_method(&mut self, node: &Node, scope: &Scope) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let is_constructor = node.kind() == "constructor_declaration";
        let return_type = if is_constructor {
            None
        } else {
            node.child_by_field_name("type").map(|t| {
                let mut text = self.text(&t);
                if let Some(dims) = node.child_by_field_name("dimensions") {
                    text.push_str(&self.text(&dims));
                }
                text
            })
        };

        let id = self.model.add_method(MethodData {
            name: self.text(&name_node),
            return_type,
            parameters: Vec::new(),
            containing_class: scope.class,
            is_constructor,
            location: self.location(&name_node, node),
        });

        self.declare_type_parameters(node);

        let mark = self.bindings.len();
        if let Some(params) = node.child_by_field_name("parameters") {
            self.declare_parameters(&params, DeclarationScope::Method(id));
        }

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "throws" {
                self.declare_throws_clause(&child);
            }
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.visit_children(&body, &scope.code_block());
        }
        self.bindings.truncate(mark);
    }

    fn declare_parameters(&mut self, params: &Node, declared_in: DeclarationScope) {
        let mut cursor = params.walk();
        for param in params.named_children(&mut cursor) {
            match param.kind() {
                "formal_parameter" | "spread_parameter" => {
                    if let Some((name_node, type_text)) = self.formal_parameter(&param) {
                        self.add_parameter(&name_node, type_text, declared_in, &param);
                    }
                }
                // `(a, b) -> ...`
                "identifier" => {
                    self.add_parameter(&param, String::new(), declared_in, &param);
                }
                _ => {}
            }
        }
    }

    /// Name node and type text of a `formal_parameter` or `spread_parameter`.
    fn formal_parameter<'t>(&self, param: &Node<'t>) -> Option<(Node<'t>, String)> {
        match param.kind() {
            "formal_parameter" => {
                let name = param.child_by_field_name("name")?;
                let mut type_text = param
                    .child_by_field_name("type")
                    .map(|t| self.text(&t))
                    .unwrap_or_default();
                if let Some(dims) = param.child_by_field_name("dimensions") {
                    type_text.push_str(&self.text(&dims));
                }
                Some((name, type_text))
            }
            "spread_parameter" => {
                let mut cursor = param.walk();
                let mut type_text = String::new();
                let mut name = None;
                for child in param.named_children(&mut cursor) {
                    match child.kind() {
                        "modifiers" | "annotation" | "marker_annotation" => {}
                        "variable_declarator" => name = child.child_by_field_name("name"),
                        _ if type_text.is_empty() => type_text = self.text(&child),
                        _ => {}
                    }
                }
                type_text.push_str("...");
                name.map(|n| (n, type_text))
            }
            _ => None,
        }
    }

    fn add_parameter(
        &mut self,
        name_node: &Node,
        type_text: String,
        declared_in: DeclarationScope,
        extent: &Node,
    ) {
        let name = self.text(name_node);
        self.bindings.push((name.clone(), type_text.clone()));
        self.model.add_parameter(ParameterData {
            name,
            type_text,
            scope: declared_in,
            location: self.location(name_node, extent),
        });
    }

    fn declare_throws_clause(&mut self, throws: &Node) {
        let mut cursor = throws.walk();
        for ty in throws.named_children(&mut cursor) {
            self.model.add_throw_site(ThrowSiteData {
                exception_type: Some(self.text(&ty)),
                location: self.location(&ty, &ty),
            });
        }
    }

    fn declare_fields(&mut self, node: &Node, scope: &Scope) {
        let base_type = node
            .child_by_field_name("type")
            .map(|t| self.text(&t))
            .unwrap_or_default();

        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();
        let initializer_scope = scope.code_block();
        for declarator in declarators {
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            let type_text = self.declarator_type(&base_type, &declarator);
            self.model.add_field(FieldData {
                name: self.text(&name_node),
                type_text,
                containing_class: scope.class,
                location: self.location(&name_node, &declarator),
            });
            if let Some(value) = declarator.child_by_field_name("value") {
                self.visit(&value, &initializer_scope);
            }
        }
    }

    fn declare_enum_constant(&mut self, node: &Node, scope: &Scope) {
        let Some(name_node) = node.child_by_field_name("name") else {
            return;
        };
        let enum_name = scope
            .class
            .and_then(|id| self.model.class(id).name.clone())
            .unwrap_or_default();
        self.model.add_field(FieldData {
            name: self.text(&name_node),
            type_text: enum_name,
            containing_class: scope.class,
            location: self.location(&name_node, node),
        });

        let code = scope.code_block();
        if let Some(arguments) = node.child_by_field_name("arguments") {
            self.visit_children(&arguments, &code);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.declare_anonymous_class(&name_node, node, &body, &code);
        }
    }

    fn declare_locals(&mut self, node: &Node, scope: &Scope) {
        let base_type = node
            .child_by_field_name("type")
            .map(|t| self.text(&t))
            .unwrap_or_default();

        let mut cursor = node.walk();
        let declarators: Vec<Node> = node
            .children_by_field_name("declarator", &mut cursor)
            .collect();
        for declarator in declarators {
            let Some(name_node) = declarator.child_by_field_name("name") else {
                continue;
            };
            let type_text = self.declarator_type(&base_type, &declarator);
            // the initializer is visited before the name is in scope
            if let Some(value) = declarator.child_by_field_name("value") {
                self.visit(&value, scope);
            }
            self.add_local(&name_node, &type_text, &declarator);
        }
    }

    fn add_local(&mut self, name_node: &Node, type_text: &str, extent: &Node) {
        let name = self.text(name_node);
        self.bindings.push((name.clone(), type_text.to_string()));
        self.model.add_local_variable(LocalVariableData {
            name,
            type_text: type_text.to_string(),
            location: self.location(name_node, extent),
        });
    }

    /// `int[] a, b[]` gives `b` the type `int[][]`.
    fn declarator_type(&self, base_type: &str, declarator: &Node) -> String {
        match declarator.child_by_field_name("dimensions") {
            Some(dims) => format!("{}{}", base_type, self.text(&dims)),
            None => base_type.to_string(),
        }
    }

    fn declare_catch(&mut self, node: &Node, scope: &Scope) {
        let mark = self.bindings.len();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() != "catch_formal_parameter" {
                continue;
            }
            let Some(name_node) = child.child_by_field_name("name") else {
                continue;
            };
            let mut inner = child.walk();
            let type_text = child
                .named_children(&mut inner)
                .find(|c| c.kind() == "catch_type")
                .map(|t| self.text(&t))
                .unwrap_or_default();
            self.add_parameter(&name_node, type_text, DeclarationScope::CatchSection, &child);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.visit(&body, scope);
        }
        self.bindings.truncate(mark);
    }

    fn declare_foreach(&mut self, node: &Node, scope: &Scope) {
        let mark = self.bindings.len();
        if let Some(value) = node.child_by_field_name("value") {
            self.visit(&value, scope);
        }
        if let Some(name_node) = node.child_by_field_name("name") {
            let type_text = node
                .child_by_field_name("type")
                .map(|t| self.text(&t))
                .unwrap_or_default();
            self.add_parameter(&name_node, type_text, DeclarationScope::ForeachLoop, node);
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.visit(&body, scope);
        }
        self.bindings.truncate(mark);
    }

    fn declare_lambda(&mut self, node: &Node, scope: &Scope) {
        self.model.add_other(OtherData {
            type_tag: "lambda_expression".to_string(),
            text: self.text(node),
            location: self.location(node, node),
        });

        let mark = self.bindings.len();
        if let Some(params) = node.child_by_field_name("parameters") {
            match params.kind() {
                "identifier" => {
                    self.add_parameter(&params, String::new(), DeclarationScope::Lambda, &params)
                }
                _ => self.declare_parameters(&params, DeclarationScope::Lambda),
            }
        }
        if let Some(body) = node.child_by_field_name("body") {
            self.visit(&body, &scope.code_block());
        }
        self.bindings.truncate(mark);
    }

    fn declare_label(&mut self, node: &Node, scope: &Scope) {
        let mut cursor = node.walk();
        let label = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "identifier");
        if let Some(label) = label {
            self.model.add_label(LabelData {
                label: self.text(&label),
                location: self.location(&label, node),
            });
        }
        self.visit_children(node, scope);
    }

    fn declare_throw(&mut self, node: &Node, scope: &Scope) {
        if let Some(expr) = node.named_child(0) {
            let exception_type = self.thrown_type(&expr);
            self.model.add_throw_site(ThrowSiteData {
                exception_type,
                location: self.location(&expr, node),
            });
        }
        self.visit_children(node, scope);
    }

    /// Best-effort static type of a thrown expression.
    fn thrown_type(&self, expr: &Node) -> Option<String> {
        match expr.kind() {
            "object_creation_expression" | "cast_expression" => {
                expr.child_by_field_name("type").map(|t| self.text(&t))
            }
            "parenthesized_expression" => expr.named_child(0).and_then(|e| self.thrown_type(&e)),
            "identifier" => {
                let name = node_text(expr, self.src);
                self.bindings
                    .iter()
                    .rev()
                    .find(|(n, _)| n == name)
                    .map(|(_, ty)| ty.clone())
                    .filter(|ty| !ty.is_empty())
            }
            _ => None,
        }
    }

    fn visit_object_creation(&mut self, node: &Node, scope: &Scope) {
        let mut cursor = node.walk();
        let body = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "class_body");

        if let Some(arguments) = node.child_by_field_name("arguments") {
            self.visit_children(&arguments, scope);
        }
        match (body, node.child_by_field_name("type")) {
            (Some(body), Some(ty)) => self.declare_anonymous_class(&ty, node, &body, scope),
            (Some(body), None) => self.declare_anonymous_class(node, node, &body, scope),
            _ => {}
        }
    }

    fn declare_anonymous_class(&mut self, name: &Node, extent: &Node, body: &Node, scope: &Scope) {
        let id = self.model.add_class(ClassData {
            name: None,
            qualified_name: None,
            kind: ClassKind::Anonymous,
            containing_class: scope.class,
            location: self.location(name, extent),
        });
        let inner = Scope {
            class: Some(id),
            qualifier: None,
        };
        let mark = self.bindings.len();
        self.visit_children(body, &inner);
        self.bindings.truncate(mark);
    }
}
