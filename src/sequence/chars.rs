//! Character-level sequence adapter with line-boundary tracking.

use super::DiffSequence;
use crate::range::{CharRange, OffsetRange, Position};

/// Element category of a character, used for boundary scoring and for
/// category-aware equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCategory {
    /// Non-newline whitespace.
    Whitespace,
    /// Letters, digits and underscores.
    Word,
    /// Everything else.
    Punctuation,
    /// The `\n` separator between slice lines.
    LineBreak,
}

fn categorize(c: char) -> CharCategory {
    if c == '\n' {
        CharCategory::LineBreak
    } else if c.is_whitespace() {
        CharCategory::Whitespace
    } else if c.is_alphanumeric() || c == '_' {
        CharCategory::Word
    } else {
        CharCategory::Punctuation
    }
}

/// A flattened slice of lines, one element per character, with a parallel
/// table mapping each element back to its 1-based `(line, column)`.
///
/// Lines inside the slice are separated by `\n` elements so that a change
/// covering a separator translates to a range ending at column 1 of the
/// next line. When `consider_whitespace` is false the leading and trailing
/// whitespace of each line is left out of the buffer; the recorded columns
/// still refer to the untrimmed line.
pub struct LinesSliceCharSequence {
    chars: Vec<char>,
    categories: Vec<CharCategory>,
    /// Start position of each element.
    positions: Vec<Position>,
    /// Position after the last element (or the slice origin when empty).
    end_position: Position,
    /// Slice origin; the translation target for an empty slice.
    base: Position,
}

impl LinesSliceCharSequence {
    /// Flattens `lines[line_range]` into a character sequence.
    ///
    /// `line_range` is 0-based into `lines` and may be empty, in which
    /// case the sequence is empty and every translated range collapses to
    /// the insertion point at the start of `line_range`.
    #[must_use]
    pub fn new(lines: &[&str], line_range: &OffsetRange, consider_whitespace: bool) -> Self {
        let base = Position::new(line_range.start + 1, 1);
        let mut chars = Vec::new();
        let mut categories = Vec::new();
        let mut positions = Vec::new();

        let mut last: Option<(usize, char, usize)> = None;
        for (slice_idx, line_idx) in line_range.iter().enumerate() {
            let line = lines[line_idx];
            let line_number = line_idx + 1;
            if slice_idx > 0 {
                // Separator owned by the previous line; it sits after that
                // line's last character.
                let prev_line = lines[line_idx - 1];
                let newline_col = prev_line.chars().count() + 1;
                chars.push('\n');
                categories.push(CharCategory::LineBreak);
                positions.push(Position::new(line_idx, newline_col));
                last = Some((line_idx, '\n', newline_col));
            }
            let (skip_leading, keep_until) = if consider_whitespace {
                (0, line.chars().count())
            } else {
                trimmed_char_span(line)
            };
            for (col0, c) in line.chars().enumerate() {
                if col0 < skip_leading || col0 >= keep_until {
                    continue;
                }
                chars.push(c);
                categories.push(categorize(c));
                positions.push(Position::new(line_number, col0 + 1));
                last = Some((line_number, c, col0 + 1));
            }
        }

        let end_position = match last {
            None => base,
            Some((line, '\n', _)) => Position::new(line + 1, 1),
            Some((line, _, col)) => Position::new(line, col + 1),
        };

        Self {
            chars,
            categories,
            positions,
            end_position,
            base,
        }
    }

    /// The character at `idx`.
    #[must_use]
    pub fn char_at(&self, idx: usize) -> char {
        self.chars[idx]
    }

    /// The category of the character at `idx`.
    #[must_use]
    pub fn category(&self, idx: usize) -> CharCategory {
        self.categories[idx]
    }

    /// Position before element `idx`; for `idx == len` the position after
    /// the last element.
    #[must_use]
    pub fn position_at(&self, idx: usize) -> Position {
        if idx == self.chars.len() {
            self.end_position
        } else {
            self.positions[idx]
        }
    }

    /// Position immediately after element `idx`.
    fn position_after(&self, idx: usize) -> Position {
        let p = self.positions[idx];
        if self.chars[idx] == '\n' {
            Position::new(p.line + 1, 1)
        } else {
            Position::new(p.line, p.column + 1)
        }
    }

    /// Translates an offset range over this sequence into `(line, column)`
    /// coordinates.
    #[must_use]
    pub fn translate(&self, range: &OffsetRange) -> CharRange {
        if self.chars.is_empty() {
            return CharRange::new(self.base, self.base);
        }
        let start = self.position_at(range.start);
        let end = if range.is_empty() {
            start
        } else {
            self.position_after(range.end_exclusive - 1)
        };
        CharRange::new(start, end)
    }

    /// The word (run of word-category characters) containing or starting at
    /// `offset`, if any.
    #[must_use]
    pub fn find_word_containing(&self, offset: usize) -> Option<OffsetRange> {
        if offset >= self.chars.len() || self.categories[offset] != CharCategory::Word {
            return None;
        }
        let mut start = offset;
        while start > 0 && self.categories[start - 1] == CharCategory::Word {
            start -= 1;
        }
        let mut end = offset + 1;
        while end < self.chars.len() && self.categories[end] == CharCategory::Word {
            end += 1;
        }
        Some(OffsetRange::new(start, end))
    }

    /// Like [`Self::find_word_containing`] but splitting at CamelCase humps
    /// and underscores.
    #[must_use]
    pub fn find_subword_containing(&self, offset: usize) -> Option<OffsetRange> {
        let word = self.find_word_containing(offset)?;
        let mut start = offset;
        while start > word.start && !self.is_subword_start(start) {
            start -= 1;
        }
        let mut end = offset + 1;
        while end < word.end_exclusive && !self.is_subword_start(end) {
            end += 1;
        }
        Some(OffsetRange::new(start, end))
    }

    fn is_subword_start(&self, idx: usize) -> bool {
        if idx == 0 {
            return true;
        }
        let prev = self.chars[idx - 1];
        let cur = self.chars[idx];
        prev == '_' || cur == '_' || (prev.is_lowercase() && cur.is_uppercase())
    }
}

const fn category_bonus(cat: Option<CharCategory>) -> i32 {
    match cat {
        // Slice edges are as good a boundary as a line break.
        None | Some(CharCategory::LineBreak) => 10,
        Some(CharCategory::Whitespace) => 3,
        Some(CharCategory::Punctuation) => 2,
        Some(CharCategory::Word) => 0,
    }
}

impl DiffSequence for LinesSliceCharSequence {
    fn len(&self) -> usize {
        self.chars.len()
    }

    /// Weak equality buckets all non-newline whitespace together; a space
    /// and a tab match for the engine but not for `strongly_eq`.
    fn hash(&self, idx: usize) -> u64 {
        if self.categories[idx] == CharCategory::Whitespace {
            ' ' as u64
        } else {
            self.chars[idx] as u64
        }
    }

    fn boundary_score(&self, idx: usize) -> i32 {
        let prev = idx.checked_sub(1).map(|i| self.categories[i]);
        let next = if idx == self.chars.len() {
            None
        } else {
            Some(self.categories[idx])
        };
        if prev == Some(CharCategory::LineBreak) {
            // Start of a line is the preferred boundary inside a slice.
            return 150;
        }
        let mut score = 0;
        if prev != next {
            score += 10;
            if idx > 0
                && idx < self.chars.len()
                && self.chars[idx - 1].is_lowercase()
                && self.chars[idx].is_uppercase()
            {
                score += 1;
            }
        }
        score + category_bonus(prev) + category_bonus(next)
    }

    fn strongly_eq(&self, idx: usize, other: &Self, other_idx: usize) -> bool {
        self.chars[idx] == other.chars[other_idx]
    }
}

/// `(first_kept, one_past_last_kept)` char indices of a line with its
/// leading and trailing whitespace stripped.
fn trimmed_char_span(line: &str) -> (usize, usize) {
    let total = line.chars().count();
    let leading = line.chars().take_while(|c| c.is_whitespace()).count();
    if leading == total {
        return (total, total);
    }
    let trailing = line.chars().rev().take_while(|c| c.is_whitespace()).count();
    (leading, total - trailing)
}
