//! Language tags for block strings.
//!
//! Block strings carry a short tag (`|md ...|`, `|go ...|`). Tags with a
//! known long form are stored under that long form.

use std::{collections::HashMap, sync::LazyLock};

/// The language given to `shape: code` when no block string sets one.
pub const PLAIN_TEXT: &str = "text";

const ALIASES: [(&str, &str); 7] = [
    ("md", "markdown"),
    ("tex", "latex"),
    ("js", "javascript"),
    ("go", "golang"),
    ("py", "python"),
    ("rb", "ruby"),
    ("ts", "typescript"),
];

static SHORT_TO_FULL: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| ALIASES.into_iter().collect());

/// Expand a block-string tag to its long form, or return it unchanged.
pub fn full_name(tag: &str) -> &str {
    SHORT_TO_FULL.get(tag).copied().unwrap_or(tag)
}

/// Languages rendered as formatted text rather than source code.
pub fn is_text(language: &str) -> bool {
    matches!(language, "markdown" | "latex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_expands_aliases() {
        assert_eq!(full_name("md"), "markdown");
        assert_eq!(full_name("ts"), "typescript");
        assert_eq!(full_name("rust"), "rust");
    }

    #[test]
    fn test_is_text() {
        assert!(is_text("markdown"));
        assert!(is_text("latex"));
        assert!(!is_text("golang"));
    }
}
