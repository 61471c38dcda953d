//! 1-based exclusive-end line ranges.

use super::OffsetRange;
use serde::{Deserialize, Serialize};

/// A `[start_line, end_line_exclusive)` interval of 1-based line numbers.
///
/// An empty line range is allowed and denotes a position *between* lines
/// (an insertion or deletion point).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    /// First line of the range (1-based, inclusive).
    pub start_line: usize,
    /// One past the last line of the range.
    pub end_line_exclusive: usize,
}

impl LineRange {
    /// Creates a new line range.
    #[must_use]
    pub fn new(start_line: usize, end_line_exclusive: usize) -> Self {
        debug_assert!(start_line >= 1);
        debug_assert!(start_line <= end_line_exclusive);
        Self {
            start_line,
            end_line_exclusive,
        }
    }

    /// Converts a 0-based sequence offset range into a 1-based line range.
    #[must_use]
    pub fn from_offset_range(range: &OffsetRange) -> Self {
        Self::new(range.start + 1, range.end_exclusive + 1)
    }

    /// Number of lines covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end_line_exclusive - self.start_line
    }

    /// Returns true when the range covers no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start_line == self.end_line_exclusive
    }

    /// Last line covered, inclusive. One less than the start for an empty
    /// range; this is the value the diagnostic format prints.
    #[must_use]
    pub const fn end_line_inclusive(&self) -> usize {
        self.end_line_exclusive - 1
    }
}
