use std::path::PathBuf;

use java_find_usages::indexer::{index_project, ProjectIndex};
use java_find_usages::messages::MessageBundle;
use java_find_usages::model::{ClassKind, DeclarationScope, Element};
use java_find_usages::provider::{FindUsagesProvider, HelpId, TypeNameRegistry};
use java_find_usages::tools::describe::{describe, resolve_position, resolve_symbol};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/sample-project")
        .canonicalize()
        .unwrap()
}

fn build_index() -> ProjectIndex {
    index_project(&fixture_path(), &[])
}

struct Harness {
    index: ProjectIndex,
    messages: MessageBundle,
    type_names: TypeNameRegistry,
}

impl Harness {
    fn new() -> Self {
        Self {
            index: build_index(),
            messages: MessageBundle::builtin(),
            type_names: TypeNameRegistry::java_defaults(),
        }
    }

    fn provider(&self) -> FindUsagesProvider<'_> {
        FindUsagesProvider::new(&self.index.model, &self.messages, &self.index.roots)
            .with_type_names(&self.type_names)
    }

    fn single(&self, symbol: &str) -> Element {
        let found = resolve_symbol(&self.index, symbol);
        assert_eq!(found.len(), 1, "Expected one match for {}, got {:?}", symbol, found);
        found[0]
    }

    fn directory(&self, relative: &str) -> Element {
        let path = self.index.root.join(relative);
        let id = self
            .index
            .model
            .directory_by_path(&path)
            .unwrap_or_else(|| panic!("Directory {} not indexed", path.display()));
        Element::Directory(id)
    }

    fn parameter(&self, name: &str) -> Element {
        let (id, _) = self
            .index
            .model
            .parameters()
            .find(|(_, p)| p.name == name)
            .unwrap_or_else(|| panic!("Parameter {} not found", name));
        Element::Parameter(id)
    }
}

// ── classes ───────────────────────────────────────────────────────────

#[test]
fn test_interface_is_described_by_kind() {
    let h = Harness::new();
    let p = h.provider();
    let baz = h.single("com.example.api.Baz");

    assert!(p.can_find_usages_for(baz));
    assert_eq!(p.help_id(baz), HelpId::FindClassUsages);
    assert_eq!(p.type_name(baz), "interface");
    assert_eq!(p.descriptive_name(baz), "com.example.api.Baz");
    assert_eq!(p.node_text(baz, false), "Baz");
    assert_eq!(p.node_text(baz, true), "com.example.api.Baz");
}

#[test]
fn test_class_kind_labels() {
    let h = Harness::new();
    let p = h.provider();

    assert_eq!(p.type_name(h.single("com.example.model.Account")), "class");
    assert_eq!(p.type_name(h.single("com.example.model.Status")), "enum");
    assert_eq!(p.type_name(h.single("com.example.model.Audited")), "@interface");
}

#[test]
fn test_default_package_class() {
    let h = Harness::new();
    let p = h.provider();
    let main = h.single("Main");

    assert_eq!(p.descriptive_name(main), "Main");
    assert_eq!(p.node_text(main, true), "Main");
}

#[test]
fn test_anonymous_class_and_its_members() {
    let h = Harness::new();
    let p = h.provider();
    let (anonymous, _) = h
        .index
        .model
        .classes()
        .find(|(_, c)| c.kind == ClassKind::Anonymous)
        .expect("anonymous Runnable should be indexed");
    let anonymous = Element::Class(anonymous);

    assert!(p.can_find_usages_for(anonymous));
    assert_eq!(p.type_name(anonymous), "class");
    assert_eq!(p.descriptive_name(anonymous), "anonymous class");

    let checks = h.single("checks");
    assert_eq!(p.descriptive_name(checks), "checks of anonymous class");
    // no qualified name to append
    assert_eq!(p.node_text(checks, true), "checks:int");
}

// ── methods and members ───────────────────────────────────────────────

#[test]
fn test_interface_method() {
    let h = Harness::new();
    let p = h.provider();
    let bar = h.single("Baz.bar");

    assert!(p.can_find_usages_for(bar));
    assert_eq!(p.help_id(bar), HelpId::FindMethodUsages);
    assert_eq!(p.type_name(bar), "method");
    assert_eq!(p.descriptive_name(bar), "bar(int) of interface Baz");
    assert_eq!(p.node_text(bar, false), "bar(int)");
    assert_eq!(
        p.node_text(bar, true),
        "bar(int):ReturnType of interface com.example.api.Baz"
    );
}

#[test]
fn test_constructor_has_no_return_type() {
    let h = Harness::new();
    let p = h.provider();
    let ctor = resolve_symbol(&h.index, "com.example.model.Account#Account")
        .into_iter()
        .find(|e| matches!(e, Element::Method(_)))
        .expect("constructor should resolve");

    assert_eq!(p.type_name(ctor), "constructor");
    assert_eq!(p.help_id(ctor), HelpId::FindMethodUsages);
    assert_eq!(p.descriptive_name(ctor), "Account(String) of class Account");
    assert_eq!(
        p.node_text(ctor, true),
        "Account(String) of class com.example.model.Account"
    );
}

#[test]
fn test_annotation_element_uses_annotation_template() {
    let h = Harness::new();
    let p = h.provider();
    let value = h.single("Audited.value");

    assert_eq!(p.descriptive_name(value), "value() of annotation type Audited");
    assert_eq!(
        p.node_text(value, true),
        "value():String of interface com.example.model.Audited"
    );
}

#[test]
fn test_fields_and_enum_constants() {
    let h = Harness::new();
    let p = h.provider();

    let owner = h.single("Account.owner");
    assert_eq!(p.type_name(owner), "field");
    assert_eq!(p.help_id(owner), HelpId::FindOtherUsages);
    assert_eq!(p.descriptive_name(owner), "owner of class Account");
    assert_eq!(p.node_text(owner, false), "owner:String of class com.example.model.Account");

    let active = h.single("Status.ACTIVE");
    assert_eq!(p.descriptive_name(active), "ACTIVE of enum Status");
    assert_eq!(p.node_text(active, true), "ACTIVE:Status of class com.example.model.Status");
}

#[test]
fn test_method_parameter_mentions_its_method() {
    let h = Harness::new();
    let p = h.provider();
    let count = h.parameter("count");

    assert!(p.can_find_usages_for(count));
    assert_eq!(p.type_name(count), "parameter");
    assert_eq!(p.descriptive_name(count), "count");
    assert_eq!(
        p.node_text(count, true),
        "count:int of bar(int) of interface com.example.api.Baz"
    );
}

#[test]
fn test_main_args_parameter() {
    let h = Harness::new();
    let p = h.provider();
    let args = h.parameter("args");
    let Element::Parameter(id) = args else {
        unreachable!()
    };
    assert!(matches!(
        h.index.model.parameter(id).scope,
        DeclarationScope::Method(_)
    ));
    assert_eq!(p.node_text(args, false), "args:String[] of main(String[]) of class Main");
}

#[test]
fn test_local_variable_and_label() {
    let h = Harness::new();
    let p = h.provider();

    let (local, _) = h
        .index
        .model
        .local_variables()
        .find(|(_, l)| l.name == "remaining")
        .expect("local should be indexed");
    let local = Element::LocalVariable(local);
    assert_eq!(p.type_name(local), "variable");
    assert_eq!(p.descriptive_name(local), "remaining");
    assert_eq!(p.node_text(local, true), "remaining:long");

    let outer = h.single("outer");
    assert!(p.can_find_usages_for(outer));
    assert_eq!(p.type_name(outer), "label");
    assert_eq!(p.help_id(outer), HelpId::FindOtherUsages);
    assert_eq!(p.node_text(outer, false), "outer");
}

// ── throws and unnamed kinds ──────────────────────────────────────────

#[test]
fn test_throw_site_is_exception() {
    let h = Harness::new();
    let p = h.provider();
    let element = resolve_position(
        &h.index,
        &PathBuf::from("src/main/java/com/example/model/Account.java"),
        15,
        Some(19),
    )
    .unwrap();

    assert!(matches!(element, Element::ThrowSite(_)), "got {:?}", element);
    assert!(p.can_find_usages_for(element));
    assert_eq!(p.help_id(element), HelpId::FindThrowUsages);
    assert_eq!(p.type_name(element), "exception");
    assert_eq!(p.descriptive_name(element), "IllegalStateException");
    assert_eq!(p.node_text(element, true), "IllegalStateException");
}

#[test]
fn test_import_uses_registered_type_name() {
    let h = Harness::new();
    let (import, _) = h
        .index
        .model
        .others()
        .find(|(_, o)| o.type_tag == "import_declaration")
        .expect("import should be indexed");
    let import = Element::Other(import);

    let p = h.provider();
    assert!(!p.can_find_usages_for(import));
    assert_eq!(p.help_id(import), HelpId::FindOtherUsages);
    assert_eq!(p.type_name(import), "import statement");
    assert_eq!(p.descriptive_name(import), "");
    assert_eq!(p.node_text(import, true), "");

    let bare = FindUsagesProvider::new(&h.index.model, &h.messages, &h.index.roots);
    assert_eq!(bare.type_name(import), "");
}

// ── packages, directories, files ──────────────────────────────────────

#[test]
fn test_packages() {
    let h = Harness::new();
    let p = h.provider();

    let package = h.single("com.example.model");
    assert!(p.can_find_usages_for(package));
    assert_eq!(p.help_id(package), HelpId::FindPackageUsages);
    assert_eq!(p.type_name(package), "package");
    assert_eq!(p.descriptive_name(package), "com.example.model");

    let default_package = h.index.model.package_by_name("").expect("default package");
    assert_eq!(
        p.descriptive_name(Element::Package(default_package)),
        "<default>"
    );
}

#[test]
fn test_package_directory() {
    let h = Harness::new();
    let p = h.provider();
    let dir = h.directory("src/main/java/com/example");
    let Element::Directory(id) = dir else {
        unreachable!()
    };

    assert!(p.can_find_usages_for(dir));
    assert_eq!(p.type_name(dir), "directory");
    assert_eq!(p.descriptive_name(dir), "com.example");
    assert_eq!(p.node_text(dir, true), "com.example");

    let root = h.index.root.join("src/main/java");
    assert_eq!(
        p.root_directory_for_package(id).as_deref(),
        Some(root.display().to_string().as_str())
    );
    assert_eq!(
        p.directory_package_name(id, true),
        format!("com.example (in {})", root.display())
    );
}

#[test]
fn test_source_root_and_plain_directories_are_not_searchable() {
    let h = Harness::new();
    let p = h.provider();

    let source_root = h.directory("src/main/java");
    assert!(!p.can_find_usages_for(source_root));
    assert_eq!(p.descriptive_name(source_root), "<default>");

    let plain = h.directory("src/main");
    assert!(!p.can_find_usages_for(plain));
    assert_eq!(
        p.descriptive_name(plain),
        h.index.root.join("src/main").display().to_string()
    );
}

#[test]
fn test_file_node_text() {
    let h = Harness::new();
    let p = h.provider();
    let file = h.single("src/main/java/com/example/model/Account.java");

    assert!(!p.can_find_usages_for(file));
    assert_eq!(p.type_name(file), "file");
    assert_eq!(p.help_id(file), HelpId::FindOtherUsages);
    assert_eq!(p.node_text(file, false), "Account.java");
    assert_eq!(
        p.node_text(file, true),
        h.index
            .root
            .join("src/main/java/com/example/model/Account.java")
            .display()
            .to_string()
    );
}

// ── custom messages ───────────────────────────────────────────────────

#[test]
fn test_message_overrides_change_labels() {
    let h = Harness::new();
    let messages = MessageBundle::builtin().with_overrides(MessageBundle::from_properties(
        "java.terms.method=Methode\njava.terms.of.interface={0} von Schnittstelle {1}\n",
    ));
    let p = FindUsagesProvider::new(&h.index.model, &messages, &h.index.roots);
    let bar = h.single("Baz.bar");

    assert_eq!(p.type_name(bar), "Methode");
    assert_eq!(p.descriptive_name(bar), "bar(int) von Schnittstelle Baz");
}

// ── describe ──────────────────────────────────────────────────────────

#[test]
fn test_describe_by_position() {
    let h = Harness::new();
    let p = h.provider();
    let element = resolve_position(
        &h.index,
        &PathBuf::from("src/main/java/com/example/api/Baz.java"),
        4,
        None,
    )
    .unwrap();
    let description = describe(&p, element, &h.index.root);

    assert_eq!(description.kind, "method");
    assert!(description.can_find_usages);
    assert_eq!(description.help_id, "reference.dialogs.findUsages.method");
    assert_eq!(description.node_text, "bar(int)");
    assert_eq!(
        description.location.as_deref(),
        Some("src/main/java/com/example/api/Baz.java:4:16")
    );
    assert_eq!(description.package_location, None);
}

#[test]
fn test_describe_unknown_file_fails() {
    let h = Harness::new();
    let result = resolve_position(&h.index, &PathBuf::from("src/Missing.java"), 1, None);
    assert!(result.is_err());
}
