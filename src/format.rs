//! Text rendering of method and variable signatures.

use bitflags::bitflags;

use crate::model::{JavaModel, MethodData};

bitflags! {
    /// Which parts of a signature to render.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormatOptions: u32 {
        const SHOW_NAME = 1;
        const SHOW_TYPE = 1 << 1;
        /// Render the type as a `:Type` suffix instead of a prefix.
        const TYPE_AFTER = 1 << 2;
        const SHOW_PARAMETERS = 1 << 3;
    }
}

/// Format a variable as `Type name`, `name:Type`, `name` or `Type`.
/// An empty type text is never rendered.
pub fn format_variable(name: &str, type_text: &str, options: FormatOptions) -> String {
    let show_type = options.contains(FormatOptions::SHOW_TYPE) && !type_text.is_empty();
    let type_after = options.contains(FormatOptions::TYPE_AFTER);
    let mut out = String::new();

    if show_type && !type_after {
        out.push_str(type_text);
    }
    if options.contains(FormatOptions::SHOW_NAME) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(name);
    }
    if show_type && type_after {
        if !out.is_empty() {
            out.push(':');
        }
        out.push_str(type_text);
    }

    out
}

/// Format a method signature. Parameters are rendered with
/// `parameter_options`; constructors never show a return type.
pub fn format_method(
    model: &JavaModel,
    method: &MethodData,
    options: FormatOptions,
    parameter_options: FormatOptions,
) -> String {
    let return_type = method
        .return_type
        .as_deref()
        .filter(|t| !method.is_constructor && !t.is_empty());
    let show_type = options.contains(FormatOptions::SHOW_TYPE);
    let type_after = options.contains(FormatOptions::TYPE_AFTER);
    let mut out = String::new();

    if let (true, false, Some(ret)) = (show_type, type_after, return_type) {
        out.push_str(ret);
        out.push(' ');
    }
    if options.contains(FormatOptions::SHOW_NAME) {
        out.push_str(&method.name);
    }
    if options.contains(FormatOptions::SHOW_PARAMETERS) {
        let params: Vec<String> = method
            .parameters
            .iter()
            .map(|id| {
                let param = model.parameter(*id);
                format_variable(&param.name, &param.type_text, parameter_options)
            })
            .collect();
        out.push('(');
        out.push_str(&params.join(", "));
        out.push(')');
    }
    if let (true, true, Some(ret)) = (show_type, type_after, return_type) {
        out.push(':');
        out.push_str(ret);
    }

    out
}
