use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use java_find_usages::indexer::index_project;
use java_find_usages::messages::MessageBundle;
use java_find_usages::provider::{FindUsagesProvider, TypeNameRegistry};
use java_find_usages::server::DescriptorServer;
use java_find_usages::tools::describe::{describe, resolve_position, resolve_symbol};
use java_find_usages::tools::format_descriptions;
use java_find_usages::tools::reference_tokens::{file_reference_tokens, format_tokens, parse_contexts};

#[derive(Parser, Debug)]
#[command(
    name = "java-find-usages",
    about = "Find-usages presentation for Java elements, as a CLI or an MCP server"
)]
struct Args {
    /// Root directory of the Java project to index
    #[arg(short, long, default_value = ".", global = true)]
    project: PathBuf,

    /// Properties file overriding the built-in messages
    #[arg(long, global = true)]
    messages: Option<PathBuf>,

    /// Directory holding compiled classes; may be repeated
    #[arg(long = "class-root", global = true)]
    class_roots: Vec<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the MCP tools over stdio (default)
    Serve,
    /// Describe the elements matching a symbol or a source position
    Describe {
        /// Path, qualified class or package name, Class.member or simple name
        symbol: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, requires = "file")]
        line: Option<usize>,
        #[arg(long, requires = "line")]
        column: Option<usize>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List the tokens of a file that may hold references
    Tokens {
        file: PathBuf,
        /// code, comments, strings, foreign or plain; may be repeated
        #[arg(long = "context")]
        contexts: Vec<String>,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Set up tracing to stderr (stdout is used for MCP stdio transport and CLI output)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .init();

    let args = Args::parse();
    let project_root = args
        .project
        .canonicalize()
        .with_context(|| format!("Project root {} not found", args.project.display()))?;
    let messages = match &args.messages {
        Some(path) => MessageBundle::load(path)?,
        None => MessageBundle::builtin(),
    };
    let class_roots: Vec<PathBuf> = args
        .class_roots
        .iter()
        .map(|root| absolutize(&project_root, root))
        .collect();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            tracing::info!("Starting java-find-usages server for {}", project_root.display());

            let server = DescriptorServer::new(project_root, class_roots, messages);
            let service = server.serve(rmcp::transport::stdio()).await?;
            service.waiting().await?;
        }
        Command::Describe {
            symbol,
            file,
            line,
            column,
            json,
        } => {
            let index = index_project(&project_root, &class_roots);
            let type_names = TypeNameRegistry::java_defaults();
            let provider = FindUsagesProvider::new(&index.model, &messages, &index.roots)
                .with_type_names(&type_names);

            let elements = match (symbol, file, line) {
                (_, Some(file), Some(line)) => {
                    vec![resolve_position(&index, &file, line, column)?]
                }
                (Some(symbol), _, _) => resolve_symbol(&index, &symbol),
                _ => bail!("either a symbol or --file and --line is required"),
            };
            let descriptions: Vec<_> = elements
                .into_iter()
                .map(|element| describe(&provider, element, &project_root))
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&descriptions)?);
            } else {
                println!("{}", format_descriptions(&descriptions));
            }
        }
        Command::Tokens {
            file,
            contexts,
            json,
        } => {
            let context = parse_contexts(&contexts).map_err(anyhow::Error::msg)?;
            let tokens = file_reference_tokens(&absolutize(&project_root, &file), context)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                println!("{}", format_tokens(&tokens));
            }
        }
    }

    Ok(())
}

fn absolutize(root: &Path, path: &Path) -> PathBuf {
    if path.is_relative() {
        root.join(path)
    } else {
        path.to_path_buf()
    }
}
