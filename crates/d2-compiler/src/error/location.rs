//! Resolution of byte offsets into `path:line:column` locations.

use std::fmt;

/// A resolved, 1-based source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    line: usize,
    column: usize,
}

impl Location {
    pub fn new(path: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path, self.line, self.column)
    }
}

/// Line start offsets of a source text.
///
/// Columns count characters, or UTF-16 code units when requested, so
/// positions line up with editors that index text as UTF-16.
#[derive(Debug)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Resolve a byte offset into a location within `path`.
    pub fn locate(&self, path: &str, offset: usize, utf16: bool) -> Location {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|start| *start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column = match self.source.get(line_start..offset) {
            Some(prefix) if utf16 => prefix.encode_utf16().count(),
            Some(prefix) => prefix.chars().count(),
            None => offset - line_start,
        };
        Location::new(path, line + 1, column + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_first_line() {
        let index = LineIndex::new("a -> b\nc");
        assert_eq!(index.locate("x.d2", 5, false), Location::new("x.d2", 1, 6));
    }

    #[test]
    fn test_locate_after_newline() {
        let index = LineIndex::new("a\nbc\nd");
        assert_eq!(index.locate("x.d2", 3, false).to_string(), "x.d2:2:2");
        assert_eq!(index.locate("x.d2", 5, false).to_string(), "x.d2:3:1");
    }

    #[test]
    fn test_locate_counts_utf16_units() {
        // U+1F600 is one char, four UTF-8 bytes and two UTF-16 units.
        let source = "\u{1F600}: x";
        let index = LineIndex::new(source);
        let offset = source.find(':').unwrap();
        assert_eq!(index.locate("x.d2", offset, false).column(), 2);
        assert_eq!(index.locate("x.d2", offset, true).column(), 3);
    }

    #[test]
    fn test_locate_clamps_past_end() {
        let index = LineIndex::new("ab");
        assert_eq!(index.locate("x.d2", 99, false), Location::new("x.d2", 1, 3));
    }
}
