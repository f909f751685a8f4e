//! Localized message catalog.
//!
//! Messages are stored in Java properties format and use `{n}` placeholders.
//! The English catalog is compiled into the binary; a user catalog can
//! override any subset of its entries.

use std::collections::HashMap;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

use tracing::{debug, warn};

use crate::error::DescriptorError;

const BUILTIN_CATALOG: &str = include_str!("../resources/messages/FindUsagesBundle.properties");

/// Message ids referenced by the find-usages provider.
pub mod keys {
    pub const TERMS_DIRECTORY: &str = "terms.directory";
    pub const TERMS_FILE: &str = "terms.file";
    pub const EXCEPTION: &str = "java.terms.exception";
    pub const PACKAGE: &str = "java.terms.package";
    pub const LABEL: &str = "java.terms.label";
    pub const ANNOTATION_INTERFACE: &str = "java.terms.annotation.interface";
    pub const ENUM: &str = "java.terms.enum";
    pub const INTERFACE: &str = "java.terms.interface";
    pub const TYPE_PARAMETER: &str = "java.terms.type.parameter";
    pub const CLASS: &str = "java.terms.class";
    pub const FIELD: &str = "java.terms.field";
    pub const PARAMETER: &str = "java.terms.parameter";
    pub const VARIABLE: &str = "java.terms.variable";
    pub const CONSTRUCTOR: &str = "java.terms.constructor";
    pub const METHOD: &str = "java.terms.method";
    pub const ANONYMOUS_CLASS: &str = "java.terms.anonymous.class";

    pub const OF_ANONYMOUS_CLASS: &str = "java.terms.of.anonymous.class";
    pub const OF_INTERFACE: &str = "java.terms.of.interface";
    pub const OF_ENUM: &str = "java.terms.of.enum";
    pub const OF_ANNOTATION_TYPE: &str = "java.terms.of.annotation.type";
    pub const OF_CLASS: &str = "java.terms.of.class";
    pub const VARIABLE_OF_METHOD: &str = "java.terms.variable.of.method";

    pub const DEFAULT_PACKAGE: &str = "default.package.presentable.name";
    pub const PACKAGE_IN_DIRECTORY: &str = "usage.target.package.in.directory";
}

/// An immutable id -> template map.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    entries: HashMap<String, String>,
}

impl MessageBundle {
    /// The English catalog shipped with the crate.
    pub fn builtin() -> Self {
        Self::from_properties(BUILTIN_CATALOG)
    }

    /// Parse a catalog from properties text. Malformed lines are kept as
    /// keys with empty values, the way `java.util.Properties` does.
    pub fn from_properties(text: &str) -> Self {
        Self {
            entries: parse_properties(text),
        }
    }

    /// Load a user catalog from `path` on top of the builtin one.
    pub fn load(path: &Path) -> Result<Self, DescriptorError> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            DescriptorError::MessageCatalog {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let overrides = Self::from_properties(&text);
        debug!(
            "Loaded {} message overrides from {}",
            overrides.len(),
            path.display()
        );
        Ok(Self::builtin().with_overrides(overrides))
    }

    /// Entries of `other` replace entries of `self` with the same id.
    pub fn with_overrides(mut self, other: MessageBundle) -> Self {
        self.entries.extend(other.entries);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up `key` and substitute positional `args`.
    /// An unknown id renders as `!key!` instead of failing.
    pub fn message(&self, key: &str, args: &[&str]) -> String {
        match self.entries.get(key) {
            Some(template) => format_template(template, args),
            None => {
                warn!("Missing message for key '{}'", key);
                format!("!{}!", key)
            }
        }
    }
}

/// MessageFormat-style substitution: `{n}` is replaced by `args[n]`,
/// `''` is a literal quote and text inside single quotes is not substituted.
pub fn format_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    out.push('\'');
                } else {
                    quoted = !quoted;
                }
            }
            '{' if !quoted => {
                let mut digits = String::new();
                let mut closed = false;
                while let Some(&next) = chars.peek() {
                    chars.next();
                    if next == '}' {
                        closed = true;
                        break;
                    }
                    digits.push(next);
                }
                match digits.trim().parse::<usize>() {
                    Ok(index) if closed && index < args.len() => out.push_str(args[index]),
                    _ => {
                        out.push('{');
                        out.push_str(&digits);
                        if closed {
                            out.push('}');
                        }
                    }
                }
            }
            _ => out.push(c),
        }
    }

    out
}

fn parse_properties(text: &str) -> HashMap<String, String> {
    let mut entries = HashMap::new();
    let mut logical = String::new();

    for raw in text.lines() {
        // continuation lines drop their leading whitespace too
        let line = raw.trim_start();

        if logical.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!'))
        {
            continue;
        }

        if ends_with_continuation(line) {
            logical.push_str(&line[..line.len() - 1]);
            continue;
        }

        logical.push_str(line);
        let (key, value) = split_entry(&logical);
        entries.insert(key, value);
        logical.clear();
    }

    if !logical.is_empty() {
        let (key, value) = split_entry(&logical);
        entries.insert(key, value);
    }

    entries
}

/// An odd number of trailing backslashes continues the line.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (String, String) {
    let mut key = String::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => push_escaped(&mut key, &mut chars),
            '=' | ':' => break,
            c if c.is_whitespace() => {
                while chars.peek().is_some_and(|c| c.is_whitespace()) {
                    chars.next();
                }
                if matches!(chars.peek(), Some('=') | Some(':')) {
                    chars.next();
                }
                break;
            }
            _ => key.push(c),
        }
    }

    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }

    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            push_escaped(&mut value, &mut chars);
        } else {
            value.push(c);
        }
    }

    (key, value)
}

/// Decodes the escape following a backslash, including `\uXXXX` and
/// surrogate pairs written as two such escapes.
fn push_escaped(out: &mut String, chars: &mut Peekable<Chars<'_>>) {
    match chars.next() {
        Some('u') => {
            let Some(unit) = hex_unit(chars) else {
                return;
            };
            if (0xD800..0xDC00).contains(&unit) {
                let mut lookahead = chars.clone();
                if lookahead.next() == Some('\\') && lookahead.next() == Some('u') {
                    let low = hex_unit(&mut lookahead).filter(|u| (0xDC00..0xE000).contains(u));
                    if let Some(low) = low {
                        let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                        if let Some(c) = char::from_u32(code) {
                            out.push(c);
                            *chars = lookahead;
                            return;
                        }
                    }
                }
            }
            out.push(char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        Some(c) => out.push(unescape(c)),
        None => {}
    }
}

/// Four hex digits of a `\u` escape; malformed escapes are dropped.
fn hex_unit(chars: &mut Peekable<Chars<'_>>) -> Option<u32> {
    let digits: String = chars.by_ref().take(4).collect();
    if digits.len() != 4 {
        return None;
    }
    u32::from_str_radix(&digits, 16).ok()
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        other => other,
    }
}
