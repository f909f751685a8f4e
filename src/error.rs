use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DescriptorError {
    #[error("Failed to read message catalog {path}: {source}")]
    MessageCatalog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load Java grammar: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    #[error("Tree-sitter parse error for file: {0}")]
    ParseError(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("File not indexed: {0}")]
    FileNotIndexed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
