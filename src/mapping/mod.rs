//! The public result model: line mappings, inner character mappings, and
//! the top-level [`LinesDiff`].

use crate::range::{CharRange, LineRange};
use serde::{Deserialize, Serialize};

/// One character-level mapping between the original and modified files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeMapping {
    /// Range in the original file.
    pub original: CharRange,
    /// Range in the modified file.
    pub modified: CharRange,
}

impl RangeMapping {
    /// Creates a new character mapping.
    #[must_use]
    pub const fn new(original: CharRange, modified: CharRange) -> Self {
        Self { original, modified }
    }

    /// Swaps the original and modified roles.
    #[must_use]
    pub const fn flip(&self) -> Self {
        Self {
            original: self.modified,
            modified: self.original,
        }
    }
}

/// One line-range mapping plus the character-level inner changes that
/// live inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedLineRangeMapping {
    /// Line range in the original file.
    pub original: LineRange,
    /// Line range in the modified file.
    pub modified: LineRange,
    /// Ordered character-level changes inside this mapping.
    pub inner_changes: Vec<RangeMapping>,
}

impl DetailedLineRangeMapping {
    /// Creates a new mapping.
    #[must_use]
    pub const fn new(
        original: LineRange,
        modified: LineRange,
        inner_changes: Vec<RangeMapping>,
    ) -> Self {
        Self {
            original,
            modified,
            inner_changes,
        }
    }

    /// True when the mapping carries no information: both line ranges
    /// empty and no inner changes. Such a mapping must never be emitted.
    #[must_use]
    pub fn is_informationless(&self) -> bool {
        self.original.is_empty() && self.modified.is_empty() && self.inner_changes.is_empty()
    }

    /// Swaps the original and modified roles, inner changes included.
    #[must_use]
    pub fn flip(&self) -> Self {
        Self {
            original: self.modified,
            modified: self.original,
            inner_changes: self.inner_changes.iter().map(RangeMapping::flip).collect(),
        }
    }
}

/// A moved block of lines. Move detection is not implemented; the type
/// exists so the result shape stays forward compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovedLines {
    /// Source range in the original file.
    pub original: LineRange,
    /// Destination range in the modified file.
    pub modified: LineRange,
}

/// Top-level diff result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinesDiff {
    /// Ordered, pairwise disjoint line mappings.
    pub changes: Vec<DetailedLineRangeMapping>,
    /// Always empty; see [`MovedLines`].
    pub moves: Vec<MovedLines>,
    /// True when the wall-clock budget expired and `changes` is a coarse
    /// but still valid description.
    pub hit_timeout: bool,
}

impl LinesDiff {
    /// An empty result.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            changes: Vec::new(),
            moves: Vec::new(),
            hit_timeout: false,
        }
    }

    /// Wraps validated mappings.
    #[must_use]
    pub fn new(changes: Vec<DetailedLineRangeMapping>, hit_timeout: bool) -> Self {
        Self {
            changes: sanitize(changes),
            moves: Vec::new(),
            hit_timeout,
        }
    }

    /// The same diff viewed from the other side: every mapping's original
    /// and modified roles swapped. Renderers use this to drive the
    /// right-to-left direction without recomputing.
    #[must_use]
    pub fn flip(&self) -> Self {
        Self {
            changes: self
                .changes
                .iter()
                .map(DetailedLineRangeMapping::flip)
                .collect(),
            moves: self
                .moves
                .iter()
                .map(|m| MovedLines {
                    original: m.modified,
                    modified: m.original,
                })
                .collect(),
            hit_timeout: self.hit_timeout,
        }
    }
}

/// Enforces the output invariants: mappings sorted and disjoint on both
/// sides, none informationless.
///
/// Violations are impossible given the pipeline; debug builds assert,
/// release builds repair by dropping the offending mapping and
/// continuing.
fn sanitize(changes: Vec<DetailedLineRangeMapping>) -> Vec<DetailedLineRangeMapping> {
    let mut kept: Vec<DetailedLineRangeMapping> = Vec::with_capacity(changes.len());
    for mapping in changes {
        debug_assert!(!mapping.is_informationless(), "informationless mapping");
        if mapping.is_informationless() {
            continue;
        }
        if let Some(last) = kept.last() {
            let ordered = last.original.end_line_exclusive <= mapping.original.start_line
                && last.modified.end_line_exclusive <= mapping.modified.start_line;
            debug_assert!(ordered, "mapping ordering violation");
            if !ordered {
                continue;
            }
        }
        kept.push(mapping);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{CharRange, Position};

    fn mapping(o: (usize, usize), m: (usize, usize)) -> DetailedLineRangeMapping {
        DetailedLineRangeMapping::new(
            LineRange::new(o.0, o.1),
            LineRange::new(m.0, m.1),
            vec![RangeMapping::new(
                CharRange::new(Position::new(o.0, 1), Position::new(o.0, 2)),
                CharRange::new(Position::new(m.0, 1), Position::new(m.0, 2)),
            )],
        )
    }

    #[test]
    fn ordered_mappings_pass_through() {
        let changes = vec![mapping((1, 2), (1, 2)), mapping((4, 5), (4, 5))];
        assert_eq!(LinesDiff::new(changes.clone(), false).changes, changes);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn release_build_drops_out_of_order_mapping() {
        let changes = vec![mapping((4, 5), (4, 5)), mapping((1, 2), (1, 2))];
        let diff = LinesDiff::new(changes, false);
        assert_eq!(diff.changes.len(), 1);
    }

    #[test]
    fn flip_is_an_involution() {
        let diff = LinesDiff::new(vec![mapping((1, 2), (3, 4))], false);
        let flipped = diff.flip();
        assert_eq!(flipped.changes[0].original, LineRange::new(3, 4));
        assert_eq!(flipped.changes[0].modified, LineRange::new(1, 2));
        assert_eq!(flipped.flip(), diff);
    }

    #[test]
    fn serde_round_trip() {
        let diff = LinesDiff::new(vec![mapping((1, 2), (1, 2))], true);
        let json = serde_json::to_string(&diff).expect("serializes");
        let back: LinesDiff = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, diff);
    }
}
