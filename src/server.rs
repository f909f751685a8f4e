use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::info;

use crate::indexer::{index_project, ProjectIndex};
use crate::messages::MessageBundle;
use crate::provider::{FindUsagesProvider, TypeNameRegistry};
use crate::tools::describe::{describe, resolve_position, resolve_symbol};
use crate::tools::reference_tokens::{file_reference_tokens, format_tokens, parse_contexts};

#[derive(Clone)]
pub struct DescriptorServer {
    project_root: PathBuf,
    class_roots: Arc<Vec<PathBuf>>,
    index: Arc<RwLock<ProjectIndex>>,
    messages: Arc<MessageBundle>,
    type_names: Arc<TypeNameRegistry>,
    tool_router: ToolRouter<Self>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DescribeElementParams {
    #[schemars(description = "Element to describe: a file or directory path, a qualified class or package name, 'Class.member', or a simple name")]
    pub symbol: Option<String>,
    #[schemars(description = "File containing the element, used together with 'line' instead of 'symbol'")]
    pub file: Option<String>,
    #[schemars(description = "1-based line of the element in 'file'")]
    pub line: Option<usize>,
    #[schemars(description = "Optional 1-based column of the element in 'file'")]
    pub column: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReferenceTokensParams {
    #[schemars(description = "Java file to scan")]
    pub file: String,
    #[schemars(description = "Search contexts: code, comments, strings, foreign, plain. Defaults to code.")]
    pub contexts: Option<Vec<String>>,
}

#[tool_router]
impl DescriptorServer {
    pub fn new(project_root: PathBuf, class_roots: Vec<PathBuf>, messages: MessageBundle) -> Self {
        info!("Indexing Java files in {}", project_root.display());
        let index = index_project(&project_root, &class_roots);
        info!("{}", index.model.stats());

        Self {
            project_root,
            class_roots: Arc::new(class_roots),
            index: Arc::new(RwLock::new(index)),
            messages: Arc::new(messages),
            type_names: Arc::new(TypeNameRegistry::java_defaults()),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Describe a Java element the way a find-usages dialog presents it: whether usages can be searched, the help topic, the kind label ('method', 'interface', 'type parameter', ...), the descriptive name and the short and fully qualified node text. Give either 'symbol' or 'file' plus 'line'.")]
    async fn describe_element(
        &self,
        Parameters(params): Parameters<DescribeElementParams>,
    ) -> Result<CallToolResult, McpError> {
        let index = self.index.read();
        let provider = FindUsagesProvider::new(&index.model, &self.messages, &index.roots)
            .with_type_names(&self.type_names);

        let elements = match (params.symbol.as_deref(), params.file.as_deref(), params.line) {
            (_, Some(file), Some(line)) => {
                match resolve_position(&index, &PathBuf::from(file), line, params.column) {
                    Ok(element) => vec![element],
                    Err(e) => {
                        return Ok(CallToolResult::error(vec![Content::text(e.to_string())]))
                    }
                }
            }
            (Some(symbol), _, _) => resolve_symbol(&index, symbol),
            _ => {
                return Ok(CallToolResult::error(vec![Content::text(
                    "Either 'symbol' or 'file' and 'line' is required.",
                )]))
            }
        };

        let descriptions: Vec<_> = elements
            .into_iter()
            .map(|element| describe(&provider, element, &self.project_root))
            .collect();
        let output = crate::tools::format_descriptions(&descriptions);
        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(description = "List the tokens of a Java file that may contain references when searching in the given contexts (identifiers in code, comments, string literals).")]
    async fn reference_tokens(
        &self,
        Parameters(params): Parameters<ReferenceTokensParams>,
    ) -> Result<CallToolResult, McpError> {
        let context = match parse_contexts(params.contexts.as_deref().unwrap_or_default()) {
            Ok(context) => context,
            Err(e) => return Ok(CallToolResult::error(vec![Content::text(e)])),
        };

        let mut path = PathBuf::from(&params.file);
        if path.is_relative() {
            path = self.project_root.join(path);
        }

        match file_reference_tokens(&path, context) {
            Ok(tokens) => Ok(CallToolResult::success(vec![Content::text(format_tokens(
                &tokens,
            ))])),
            Err(e) => Ok(CallToolResult::error(vec![Content::text(format!(
                "Failed to scan {}: {}",
                path.display(),
                e
            ))])),
        }
    }

    #[tool(description = "Re-index all Java files in the project. Use this after making changes to the codebase so descriptions reflect the current sources.")]
    async fn reindex(&self) -> Result<CallToolResult, McpError> {
        info!("Re-indexing project at {}", self.project_root.display());

        let new_index = index_project(&self.project_root, &self.class_roots);
        let stats = format!("{}", new_index.model.stats());
        info!("{}", stats);

        *self.index.write() = new_index;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Reindex complete. {}",
            stats
        ))]))
    }
}

#[tool_handler]
impl ServerHandler for DescriptorServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "java-find-usages".to_string(),
                title: None,
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Find-usages presentation for Java sources. Indexes .java files using tree-sitter \
                 and provides describe_element, reference_tokens, and reindex tools."
                    .to_string(),
            ),
        }
    }
}
