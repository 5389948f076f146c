//! Single-line structural rendering of JSON values for log output.

use serde_json::{Map, Value};

/// Nesting levels rendered before containers collapse to a placeholder.
pub const INSPECT_DEPTH: usize = 4;

/// Render `value` on one line, collapsing containers nested deeper than
/// [`INSPECT_DEPTH`] to `[Object]` / `[Array]`. Never emits color codes.
pub fn inspect(value: &Value) -> String {
    let mut out = String::new();
    render(value, 0, &mut out);
    out
}

fn render(value: &Value, level: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::String(s) => push_quoted(s, out),
        Value::Array(items) if items.is_empty() => out.push_str("[]"),
        Value::Array(_) if level > INSPECT_DEPTH => out.push_str("[Array]"),
        Value::Array(items) => {
            out.push_str("[ ");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render(item, level + 1, out);
            }
            out.push_str(" ]");
        }
        Value::Object(map) if map.is_empty() => out.push_str("{}"),
        Value::Object(_) if level > INSPECT_DEPTH => out.push_str("[Object]"),
        Value::Object(map) => render_object(map, level, out),
    }
}

fn render_object(map: &Map<String, Value>, level: usize, out: &mut String) {
    out.push_str("{ ");
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if is_identifier(key) {
            out.push_str(key);
        } else {
            push_quoted(key, out);
        }
        out.push_str(": ");
        render(value, level + 1, out);
    }
    out.push_str(" }");
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn push_quoted(s: &str, out: &mut String) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out.push('\'');
}
