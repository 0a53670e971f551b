//! Shared helpers for tool use cases.

use loom_domain::ToolCall;

/// Extract a short preview string from tool call arguments, for logs.
///
/// Looks for well-known keys (`query`, `path`, `url`, `city`) first, then
/// falls back to the first string value in key order.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    let keys = ["query", "path", "url", "city"];
    for key in &keys {
        if let Some(s) = call.get_string(key) {
            return truncate_preview(s, 50);
        }
    }
    let mut names: Vec<&String> = call.arguments.keys().collect();
    names.sort();
    names
        .into_iter()
        .find_map(|name| call.get_string(name))
        .map(|s| truncate_preview(s, 50))
        .unwrap_or_default()
}

fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
