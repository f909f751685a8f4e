//! Labels for element types that have no dedicated kind label.

use std::collections::HashMap;

/// Extensible map from an element's type tag to its label.
#[derive(Debug, Clone, Default)]
pub struct TypeNameRegistry {
    names: HashMap<String, String>,
}

impl TypeNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels for the extra element types the Java indexer produces.
    pub fn java_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("lambda_expression", "lambda expression");
        registry.register("import_declaration", "import statement");
        registry
    }

    /// Registers `label` for `type_tag`, replacing any earlier label.
    pub fn register(&mut self, type_tag: impl Into<String>, label: impl Into<String>) {
        self.names.insert(type_tag.into(), label.into());
    }

    pub fn type_name(&self, type_tag: &str) -> Option<&str> {
        self.names.get(type_tag).map(String::as_str)
    }
}
