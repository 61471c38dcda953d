//! Top-level diff computation: sequence building, line alignment,
//! refinement fan-out, and assembly.

mod refine;

use crate::engine::{SequenceDiff, Timeout, diff_sequences};
use crate::mapping::{DetailedLineRangeMapping, LinesDiff, RangeMapping};
use crate::optimize::{LINE_JOIN_MAX_GAP, optimize_sequence_diffs};
use crate::range::{CharRange, LineRange, Position};
use crate::sequence::LineSequence;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Options accepted by [`compute_diff`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    /// Hash lines with their leading/trailing whitespace stripped, so
    /// whitespace-only line changes produce no mappings.
    pub ignore_trim_whitespace: bool,
    /// Wall-clock budget in milliseconds; 0 means unlimited.
    pub max_computation_time_ms: u32,
    /// Accepted for forward compatibility; move detection is not
    /// implemented and the flag is ignored.
    pub compute_moves: bool,
    /// Additionally extend character diffs to CamelCase / snake_case
    /// subword boundaries.
    pub extend_to_subwords: bool,
    /// Under `ignore_trim_whitespace`, still emit synthetic mappings for
    /// lines that differ only in leading/trailing whitespace, so a
    /// renderer can mark them.
    pub report_whitespace_changes: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            ignore_trim_whitespace: false,
            max_computation_time_ms: 5000,
            compute_moves: false,
            extend_to_subwords: false,
            report_whitespace_changes: false,
        }
    }
}

/// Computes the detailed diff between two files given as line arrays.
///
/// The call is pure: no I/O, no global state; identical inputs produce
/// identical outputs. It never fails: budget exhaustion surfaces as
/// `hit_timeout` with a coarse but well-formed result.
#[must_use]
pub fn compute_diff(original: &[&str], modified: &[&str], options: &DiffOptions) -> LinesDiff {
    if original == modified {
        // Covers the empty/empty case and keeps identity immune to the
        // budget: equal inputs never report changes or a timeout.
        return LinesDiff::empty();
    }

    let timeout = Timeout::new(options.max_computation_time_ms);
    let seq1 = LineSequence::new(original, options.ignore_trim_whitespace);
    let seq2 = LineSequence::new(modified, options.ignore_trim_whitespace);

    let alignment = diff_sequences(&seq1, &seq2, &timeout);
    if alignment.hit_timeout {
        debug!(
            original_lines = original.len(),
            modified_lines = modified.len(),
            "line alignment timed out; returning the trivial mapping"
        );
        return trivial_diff(original, modified);
    }
    trace!(line_diffs = alignment.diffs.len(), "line alignment complete");

    let line_diffs = optimize_sequence_diffs(&seq1, &seq2, alignment.diffs, LINE_JOIN_MAX_GAP);

    let refined = refine_all(&line_diffs, original, modified, options, &timeout);
    let hit_timeout = refined.iter().any(|(_, timed_out)| *timed_out);

    let mut changes = Vec::with_capacity(line_diffs.len());
    let scan_whitespace = options.ignore_trim_whitespace && options.report_whitespace_changes;
    let mut gap_start = (0usize, 0usize);
    for (diff, (inner_changes, _)) in line_diffs.iter().zip(refined) {
        if scan_whitespace {
            scan_whitespace_gap(
                original,
                modified,
                gap_start,
                (diff.seq1.start, diff.seq2.start),
                &mut changes,
            );
        }
        changes.push(DetailedLineRangeMapping::new(
            LineRange::from_offset_range(&diff.seq1),
            LineRange::from_offset_range(&diff.seq2),
            inner_changes,
        ));
        gap_start = (diff.seq1.end_exclusive, diff.seq2.end_exclusive);
    }
    if scan_whitespace {
        scan_whitespace_gap(
            original,
            modified,
            gap_start,
            (original.len(), modified.len()),
            &mut changes,
        );
    }

    LinesDiff::new(changes, hit_timeout)
}

/// Refines every line diff; each refinement is independent and shares
/// only read-only references, so the fan-out parallelizes behind the
/// opt-in `parallel` feature without changing the output.
fn refine_all(
    line_diffs: &[SequenceDiff],
    original: &[&str],
    modified: &[&str],
    options: &DiffOptions,
    timeout: &Timeout,
) -> Vec<(Vec<RangeMapping>, bool)> {
    #[cfg(feature = "parallel")]
    {
        line_diffs
            .par_iter()
            .map(|diff| refine::refine_diff(diff, original, modified, options, timeout))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        line_diffs
            .iter()
            .map(|diff| refine::refine_diff(diff, original, modified, options, timeout))
            .collect()
    }
}

/// The coarse single-mapping result emitted when the line alignment
/// itself runs out of budget.
fn trivial_diff(original: &[&str], modified: &[&str]) -> LinesDiff {
    let mapping = DetailedLineRangeMapping::new(
        LineRange::new(1, original.len() + 1),
        LineRange::new(1, modified.len() + 1),
        vec![RangeMapping::new(
            full_extent(original),
            full_extent(modified),
        )],
    );
    LinesDiff::new(vec![mapping], true)
}

fn full_extent(lines: &[&str]) -> CharRange {
    let start = Position::new(1, 1);
    let end = match lines.last() {
        None => start,
        Some(last) => Position::new(lines.len(), last.chars().count() + 1),
    };
    CharRange::new(start, end)
}

/// Emits synthetic mappings for unchanged-gap line pairs that differ only
/// in leading/trailing whitespace.
///
/// Inside a gap the two sides pair up one to one, so line `start1 + j`
/// corresponds to line `start2 + j`.
fn scan_whitespace_gap(
    original: &[&str],
    modified: &[&str],
    (start1, start2): (usize, usize),
    (end1, end2): (usize, usize),
    changes: &mut Vec<DetailedLineRangeMapping>,
) {
    debug_assert_eq!(end1 - start1, end2 - start2);
    for j in 0..end1 - start1 {
        let line1 = original[start1 + j];
        let line2 = modified[start2 + j];
        if line1 == line2 {
            continue;
        }
        let inner = refine::whitespace_delta_mapping(line1, line2, start1 + j + 1, start2 + j + 1);
        changes.push(DetailedLineRangeMapping::new(
            LineRange::new(start1 + j + 1, start1 + j + 2),
            LineRange::new(start2 + j + 1, start2 + j + 2),
            vec![inner],
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diff(original: &[&str], modified: &[&str]) -> LinesDiff {
        compute_diff(original, modified, &DiffOptions::default())
    }

    #[test]
    fn identical_inputs_produce_no_changes() {
        let result = diff(&["line 1", "line 2"], &["line 1", "line 2"]);
        assert!(result.changes.is_empty());
        assert!(result.moves.is_empty());
        assert!(!result.hit_timeout);
    }

    #[test]
    fn both_empty_is_empty() {
        assert_eq!(diff(&[], &[]), LinesDiff::empty());
    }

    #[test]
    fn empty_to_nonempty_spans_the_whole_file() {
        let result = diff(&[], &["x", "y"]);
        assert_eq!(result.changes.len(), 1);
        let m = &result.changes[0];
        assert_eq!(m.original, LineRange::new(1, 1));
        assert_eq!(m.modified, LineRange::new(1, 3));
        assert_eq!(m.inner_changes.len(), 1);
        assert_eq!(m.inner_changes[0].modified.start, Position::new(1, 1));
        assert_eq!(m.inner_changes[0].modified.end, Position::new(2, 2));
    }

    #[test]
    fn appended_line_maps_to_insertion_point() {
        let result = diff(&["a"], &["a", "b"]);
        assert_eq!(result.changes.len(), 1);
        let m = &result.changes[0];
        assert_eq!(m.original, LineRange::new(2, 2));
        assert_eq!(m.modified, LineRange::new(2, 3));
        assert_eq!(m.inner_changes.len(), 1);
        let inner = &m.inner_changes[0];
        assert_eq!(inner.original.start, Position::new(2, 1));
        assert_eq!(inner.original.end, Position::new(2, 1));
        assert_eq!(inner.modified.start, Position::new(2, 1));
        assert_eq!(inner.modified.end, Position::new(2, 2));
    }

    #[test]
    fn whitespace_only_change_is_invisible_when_ignored() {
        let options = DiffOptions {
            ignore_trim_whitespace: true,
            ..DiffOptions::default()
        };
        let result = compute_diff(&["  foo();"], &["    foo();"], &options);
        assert!(result.changes.is_empty());
    }

    #[test]
    fn whitespace_scan_reports_the_delta_when_requested() {
        let options = DiffOptions {
            ignore_trim_whitespace: true,
            report_whitespace_changes: true,
            ..DiffOptions::default()
        };
        let result = compute_diff(
            &["a", "  foo();", "b"],
            &["a", "    foo();", "b"],
            &options,
        );
        assert_eq!(result.changes.len(), 1);
        let m = &result.changes[0];
        assert_eq!(m.original, LineRange::new(2, 3));
        assert_eq!(m.modified, LineRange::new(2, 3));
        assert_eq!(m.inner_changes.len(), 1);
        let inner = &m.inner_changes[0];
        assert_eq!(inner.modified.start, Position::new(2, 3));
        assert_eq!(inner.modified.end, Position::new(2, 5));
    }

    #[test]
    fn mappings_are_sorted_and_separated() {
        let original = ["a", "keep", "b", "keep", "keep", "keep", "c"];
        let modified = ["x", "keep", "y", "keep", "keep", "keep", "z"];
        let result = diff(&original, &modified);
        assert!(result.changes.len() >= 2);
        for pair in result.changes.windows(2) {
            assert!(
                pair[0].original.end_line_exclusive <= pair[1].original.start_line,
                "original ranges overlap"
            );
            assert!(
                pair[0].modified.end_line_exclusive <= pair[1].modified.start_line,
                "modified ranges overlap"
            );
        }
    }

    #[test]
    fn compute_moves_is_accepted_and_ignored() {
        let options = DiffOptions {
            compute_moves: true,
            ..DiffOptions::default()
        };
        let result = compute_diff(&["a"], &["b"], &options);
        assert!(result.moves.is_empty());
        assert_eq!(result.changes.len(), 1);
    }
}
