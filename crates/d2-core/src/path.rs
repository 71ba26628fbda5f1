//! Formatting of key paths back into source form.

/// Characters that force a path segment to be quoted.
const SPECIAL: &[char] = &[
    '.', ':', ';', '{', '}', '[', ']', '(', ')', '<', '>', '#', '|', '\'', '"', '\\', '\n',
];

/// Join path segments with `.`, quoting segments that would not re-parse
/// as a single unquoted segment.
pub fn format_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|segment| format_segment(segment.as_ref()))
        .collect::<Vec<_>>()
        .join(".")
}

fn format_segment(segment: &str) -> String {
    let needs_quotes = segment.is_empty()
        || segment.trim() != segment
        || segment.contains(SPECIAL)
        || segment.contains("--")
        || segment.contains("->")
        || segment.contains("<-");
    if needs_quotes {
        format!("\"{}\"", segment.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        segment.to_string()
    }
}
