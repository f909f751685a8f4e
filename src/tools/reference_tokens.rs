use std::path::Path;

use crate::error::DescriptorError;
use crate::tokens::{reference_tokens, ReferenceToken, SearchContext};

/// Parse a search context name as accepted by the CLI and the MCP tool.
pub fn parse_context(name: &str) -> Option<SearchContext> {
    match name.trim().to_ascii_lowercase().as_str() {
        "code" => Some(SearchContext::IN_CODE),
        "comments" => Some(SearchContext::IN_COMMENTS),
        "strings" => Some(SearchContext::IN_STRINGS),
        "foreign" | "foreign_languages" => Some(SearchContext::IN_FOREIGN_LANGUAGES),
        "plain" | "plain_text" => Some(SearchContext::IN_PLAIN_TEXT),
        _ => None,
    }
}

/// Union of the named contexts; code only when none are given.
pub fn parse_contexts<S: AsRef<str>>(names: &[S]) -> Result<SearchContext, String> {
    if names.is_empty() {
        return Ok(SearchContext::IN_CODE);
    }
    names.iter().try_fold(SearchContext::empty(), |acc, name| {
        parse_context(name.as_ref())
            .map(|ctx| acc | ctx)
            .ok_or_else(|| format!("unknown search context '{}'", name.as_ref()))
    })
}

/// Tokens of a Java file that may hold references in `context`.
pub fn file_reference_tokens(
    file: &Path,
    context: SearchContext,
) -> Result<Vec<ReferenceToken>, DescriptorError> {
    let source = std::fs::read_to_string(file)?;
    reference_tokens(&source, context)
}

pub fn format_tokens(tokens: &[ReferenceToken]) -> String {
    if tokens.is_empty() {
        return "No tokens may hold references in this context.".to_string();
    }

    let mut lines = vec![format!("Found {} token(s):\n", tokens.len())];
    for token in tokens {
        lines.push(format!(
            "  {}:{} - {} `{}`",
            token.line, token.column, token.kind, token.text
        ));
    }
    lines.join("\n")
}
