//! Code-block formatting for display.
//!
//! Technique snippets are stored as raw shell text. Before they are handed to
//! a caller, every `code` string anywhere in the payload is wrapped in a
//! fenced `bash` block. The transform is pure: it consumes a value and
//! returns a new one, so a parsed artifact is never formatted twice by
//! accident through shared references. It is not idempotent; applying it to
//! its own output fences the snippets again.

use serde_json::{Map, Value};

/// Key whose string values are rendered as code blocks.
pub const CODE_KEY: &str = "code";

/// Wraps `code` in a fenced shell block.
pub fn fence_code(code: &str) -> String {
    format!("```bash\n{}\n```", code)
}

/// Recursively fences every string stored under a `code` key.
///
/// Objects and arrays are rebuilt with their order preserved; scalars and
/// non-string `code` values are returned unchanged.
pub fn format_code_blocks(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(code) if key == CODE_KEY => Value::String(fence_code(&code)),
                        other => format_code_blocks(other),
                    };
                    (key, value)
                })
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(format_code_blocks).collect()),
        scalar => scalar,
    }
}
