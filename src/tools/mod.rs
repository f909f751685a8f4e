pub mod describe;
pub mod reference_tokens;

use describe::ElementDescription;

/// Format element descriptions into a human-readable string.
pub fn format_descriptions(descriptions: &[ElementDescription]) -> String {
    if descriptions.is_empty() {
        return "No results found.".to_string();
    }

    let mut lines = Vec::new();
    lines.push(format!("Found {} element(s):\n", descriptions.len()));

    for desc in descriptions {
        let location_display = desc
            .location
            .as_deref()
            .map(|l| format!("  {} - ", l))
            .unwrap_or_else(|| "  ".to_string());
        let kind = if desc.kind.is_empty() {
            "<unnamed kind>"
        } else {
            desc.kind.as_str()
        };
        lines.push(format!(
            "{}{} `{}`",
            location_display, kind, desc.descriptive_name
        ));
        lines.push(format!("      node text: {}", desc.node_text));
        if desc.full_node_text != desc.node_text {
            lines.push(format!("      full text: {}", desc.full_node_text));
        }
        if let Some(package) = desc.package_location.as_deref() {
            lines.push(format!("      package: {}", package));
        }
        let searchable = if desc.can_find_usages { "yes" } else { "no" };
        lines.push(format!(
            "      find usages: {} (help: {})",
            searchable, desc.help_id
        ));
    }

    lines.join("\n")
}
