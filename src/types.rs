//! Core types used throughout the project.

use std::fmt;

/// Provenance of a catalog message: where its source string was last seen.
///
/// Advisory only. Line numbers drift as the application evolves and never
/// take part in lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub filename: String,
    pub line: Option<u32>,
}

impl SourceLocation {
    #[must_use]
    pub fn new(filename: impl Into<String>, line: Option<u32>) -> Self {
        Self { filename: filename.into(), line }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{line}", self.filename),
            None => f.write_str(&self.filename),
        }
    }
}

/// A position inside a catalog file (1-indexed line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FilePosition {
    pub line: u32,
}

/// Line-start table of a text, built once per parse.
///
/// Looking up an offset is a binary search over the line starts.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    /// Byte offset of the first byte of every line after the first.
    line_starts: Vec<usize>,
}

impl LineIndex {
    #[must_use]
    pub fn new(text: &str) -> Self {
        let line_starts = text
            .bytes()
            .enumerate()
            .filter(|(_, byte)| *byte == b'\n')
            .map(|(offset, _)| offset + 1)
            .collect();
        Self { line_starts }
    }

    /// 1-indexed line of a byte offset (offsets past the end land on the last line).
    #[must_use]
    pub fn position(&self, offset: usize) -> FilePosition {
        let newlines = self.line_starts.partition_point(|start| *start <= offset);
        FilePosition { line: u32::try_from(newlines).unwrap_or(u32::MAX).saturating_add(1) }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::start(0, 1)]
    #[case::first_line(3, 1)]
    #[case::after_newline(4, 2)]
    #[case::third_line(9, 3)]
    #[case::past_end(100, 3)]
    fn test_line_index_position(#[case] offset: usize, #[case] expected: u32) {
        let index = LineIndex::new("abc\ndef\nghi");
        assert_that!(index.position(offset).line, eq(expected));
    }

    #[googletest::test]
    fn test_line_index_trailing_newline() {
        let index = LineIndex::new("a\n\n");

        expect_that!(index.position(1).line, eq(1));
        expect_that!(index.position(2).line, eq(2));
        expect_that!(index.position(3).line, eq(3));
    }

    #[rstest]
    #[case::with_line(SourceLocation::new("src/report/labels.rs", Some(12)), "src/report/labels.rs:12")]
    #[case::without_line(SourceLocation::new("ui/mainWindow.ui", None), "ui/mainWindow.ui")]
    fn test_display(#[case] location: SourceLocation, #[case] expected: &str) {
        assert_eq!(location.to_string(), expected);
    }
}
