//! Which Java tokens may contain references, per search context.

use bitflags::bitflags;
use serde::Serialize;

use crate::error::DescriptorError;
use crate::indexer::java_parser::parse_java_source;

bitflags! {
    /// Where a usage search looks for occurrences.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SearchContext: u16 {
        const IN_CODE = 1;
        const IN_COMMENTS = 1 << 1;
        const IN_STRINGS = 1 << 2;
        const IN_FOREIGN_LANGUAGES = 1 << 3;
        const IN_PLAIN_TEXT = 1 << 4;
    }
}

const STRING_LITERAL: &str = "string_literal";
const COMMENT_KINDS: &[&str] = &["line_comment", "block_comment"];
const DOC_TAG_VALUE: &str = "doc_tag_value";
const CODE_KINDS: &[&str] = &["identifier", "type_identifier", DOC_TAG_VALUE];
/// Javadoc tags whose value names a program element.
const REFERENCE_TAGS: &[&str] = &["see", "link", "linkplain", "throws", "exception", "param"];

/// Whether a token of `token_kind` (a tree-sitter-java node kind) can hold
/// a reference when searching in `context`.
pub fn may_have_references(token_kind: &str, context: SearchContext) -> bool {
    if context.contains(SearchContext::IN_STRINGS) && token_kind == STRING_LITERAL {
        return true;
    }
    if context.contains(SearchContext::IN_COMMENTS) && COMMENT_KINDS.contains(&token_kind) {
        return true;
    }
    if context.contains(SearchContext::IN_CODE) && CODE_KINDS.contains(&token_kind) {
        return true;
    }
    // string literals may name things declared in other languages, e.g. property keys
    context.contains(SearchContext::IN_FOREIGN_LANGUAGES) && token_kind == STRING_LITERAL
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceToken {
    pub kind: String,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

/// All tokens of a Java source that may hold references in `context`,
/// in source order.
pub fn reference_tokens(
    source: &str,
    context: SearchContext,
) -> Result<Vec<ReferenceToken>, DescriptorError> {
    let tree = parse_java_source(source)?;
    let src = source.as_bytes();
    let mut tokens = Vec::new();
    collect_tokens(&tree.root_node(), src, context, &mut tokens);
    Ok(tokens)
}

fn collect_tokens(
    node: &tree_sitter::Node,
    src: &[u8],
    context: SearchContext,
    tokens: &mut Vec<ReferenceToken>,
) {
    let text = node.utf8_text(src).unwrap_or("");
    let is_doc_comment = node.kind() == "block_comment" && text.starts_with("/**");
    let matched = may_have_references(node.kind(), context);
    if matched {
        tokens.push(ReferenceToken {
            kind: node.kind().to_string(),
            text: text.to_string(),
            line: node.start_position().row + 1,
            column: node.start_position().column + 1,
        });
    }
    if is_doc_comment && may_have_references(DOC_TAG_VALUE, context) {
        let start = node.start_position();
        for (offset, value) in doc_tag_values(text) {
            let before = &text[..offset];
            let (line, column) = match before.rfind('\n') {
                Some(newline) => (
                    start.row + before.matches('\n').count(),
                    offset - newline - 1,
                ),
                None => (start.row, start.column + offset),
            };
            tokens.push(ReferenceToken {
                kind: DOC_TAG_VALUE.to_string(),
                text: value.to_string(),
                line: line + 1,
                column: column + 1,
            });
        }
    }
    if matched {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_tokens(&child, src, context, tokens);
    }
}

/// Values of reference tags in a javadoc comment, with their byte offsets:
/// `Foo` in `@see Foo`, `Foo#bar` in `{@link Foo#bar(int)}`.
fn doc_tag_values(comment: &str) -> Vec<(usize, &str)> {
    let mut values = Vec::new();
    let mut rest = 0;
    while let Some(at) = comment[rest..].find('@') {
        let tag_start = rest + at + 1;
        let tag_end = comment[tag_start..]
            .find(|c: char| !c.is_ascii_alphabetic())
            .map_or(comment.len(), |i| tag_start + i);
        rest = tag_end;
        if !REFERENCE_TAGS.contains(&&comment[tag_start..tag_end]) {
            continue;
        }

        let value_start = comment[tag_end..]
            .find(|c: char| !c.is_whitespace() && c != '*')
            .map_or(comment.len(), |i| tag_end + i);
        let value_end = comment[value_start..]
            .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '#')))
            .map_or(comment.len(), |i| value_start + i);
        let value = comment[value_start..value_end].trim_end_matches('.');
        if !value.is_empty() {
            values.push((value_start, value));
        }
        rest = value_end.max(rest);
    }
    values
}
