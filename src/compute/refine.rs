//! Character-level refinement of one line diff.

use super::DiffOptions;
use crate::engine::{SequenceDiff, Timeout, diff_sequences};
use crate::mapping::RangeMapping;
use crate::optimize::{
    extend_diffs_to_entire_unit, optimize_sequence_diffs, remove_short_matches,
    remove_very_short_matching_text_between_long_diffs,
};
use crate::sequence::{DiffSequence, LinesSliceCharSequence};

/// Refines one line diff into character-level inner changes.
///
/// The step order is load-bearing: optimize, word extension, optional
/// subword extension, short-match removal, long-diff gap pruning,
/// translation. On budget expiry the single fallback mapping covering
/// both slices is translated and returned; no further steps run.
pub(super) fn refine_diff(
    diff: &SequenceDiff,
    original: &[&str],
    modified: &[&str],
    options: &DiffOptions,
    timeout: &Timeout,
) -> (Vec<RangeMapping>, bool) {
    let consider_whitespace = !options.ignore_trim_whitespace;
    let slice1 = LinesSliceCharSequence::new(original, &diff.seq1, consider_whitespace);
    let slice2 = LinesSliceCharSequence::new(modified, &diff.seq2, consider_whitespace);

    let result = diff_sequences(&slice1, &slice2, timeout);
    if result.hit_timeout {
        let full = SequenceDiff::trivial(slice1.len(), slice2.len());
        return (vec![translate(&slice1, &slice2, &full)], true);
    }

    let diffs = optimize_sequence_diffs(&slice1, &slice2, result.diffs, 0);
    let diffs = extend_diffs_to_entire_unit(&slice1, &slice2, diffs, |seq, offset| {
        seq.find_word_containing(offset)
    });
    let diffs = if options.extend_to_subwords {
        extend_diffs_to_entire_unit(&slice1, &slice2, diffs, |seq, offset| {
            seq.find_subword_containing(offset)
        })
    } else {
        diffs
    };
    let diffs = remove_short_matches(diffs);
    let diffs = remove_very_short_matching_text_between_long_diffs(diffs);

    let mappings = diffs
        .iter()
        .map(|d| translate(&slice1, &slice2, d))
        .collect();
    (mappings, false)
}

fn translate(
    slice1: &LinesSliceCharSequence,
    slice2: &LinesSliceCharSequence,
    diff: &SequenceDiff,
) -> RangeMapping {
    RangeMapping::new(slice1.translate(&diff.seq1), slice2.translate(&diff.seq2))
}

/// Inner change covering the leading/trailing whitespace delta of two
/// lines whose trimmed bodies are equal. Used by the whitespace-gap scan.
pub(super) fn whitespace_delta_mapping(
    original_line: &str,
    modified_line: &str,
    original_line_number: usize,
    modified_line_number: usize,
) -> RangeMapping {
    use crate::range::{CharRange, Position};

    let a: Vec<char> = original_line.chars().collect();
    let b: Vec<char> = modified_line.chars().collect();
    let mut prefix = 0;
    while prefix < a.len() && prefix < b.len() && a[prefix] == b[prefix] {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < a.len().min(b.len()) - prefix
        && a[a.len() - 1 - suffix] == b[b.len() - 1 - suffix]
    {
        suffix += 1;
    }

    RangeMapping::new(
        CharRange::new(
            Position::new(original_line_number, prefix + 1),
            Position::new(original_line_number, a.len() - suffix + 1),
        ),
        CharRange::new(
            Position::new(modified_line_number, prefix + 1),
            Position::new(modified_line_number, b.len() - suffix + 1),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::{OffsetRange, Position};

    fn refine(
        diff: &SequenceDiff,
        original: &[&str],
        modified: &[&str],
    ) -> Vec<RangeMapping> {
        let (mappings, hit_timeout) = refine_diff(
            diff,
            original,
            modified,
            &DiffOptions::default(),
            &Timeout::unlimited(),
        );
        assert!(!hit_timeout);
        mappings
    }

    #[test]
    fn single_character_replacement() {
        let diff = SequenceDiff::new(OffsetRange::new(1, 2), OffsetRange::new(1, 2));
        let mappings = refine(&diff, &["line 1", "line 2"], &["line 1", "line 3"]);
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].original.start, Position::new(2, 6));
        assert_eq!(mappings[0].original.end, Position::new(2, 7));
        assert_eq!(mappings[0].modified.start, Position::new(2, 6));
        assert_eq!(mappings[0].modified.end, Position::new(2, 7));
    }

    #[test]
    fn mid_line_edit_stays_tight() {
        let diff = SequenceDiff::new(OffsetRange::new(0, 1), OffsetRange::new(0, 1));
        let mappings = refine(
            &diff,
            &["const oldValue = 42;"],
            &["const newValue = 42;"],
        );
        // The whole-word gate must not swallow "Value"; everything the
        // mappings cover stays within six characters per side.
        let covered: usize = mappings
            .iter()
            .map(|m| m.original.end.column - m.original.start.column)
            .sum();
        assert!(covered <= 6, "covered {covered} original characters");
        assert!(
            mappings
                .iter()
                .any(|m| m.original.start.column <= 7 && m.original.end.column >= 10)
        );
    }

    #[test]
    fn timeout_produces_single_full_mapping() {
        let timeout = Timeout::new(1);
        std::thread::sleep(std::time::Duration::from_millis(5));
        let diff = SequenceDiff::new(OffsetRange::new(0, 1), OffsetRange::new(0, 1));
        // Joint length must reach the Myers path for the budget to matter.
        let long_a = "a".repeat(400);
        let long_b = "b".repeat(400);
        let (mappings, hit_timeout) = refine_diff(
            &diff,
            &[long_a.as_str()],
            &[long_b.as_str()],
            &DiffOptions::default(),
            &timeout,
        );
        assert!(hit_timeout);
        assert_eq!(mappings.len(), 1);
        assert_eq!(mappings[0].original.start, Position::new(1, 1));
        assert_eq!(mappings[0].original.end, Position::new(1, 401));
    }

    #[test]
    fn whitespace_delta_covers_leading_indent() {
        let mapping = whitespace_delta_mapping("  foo();", "    foo();", 3, 3);
        // Two shared leading spaces, then the two inserted ones.
        assert_eq!(mapping.original.start, Position::new(3, 3));
        assert_eq!(mapping.original.end, Position::new(3, 3));
        assert_eq!(mapping.modified.start, Position::new(3, 3));
        assert_eq!(mapping.modified.end, Position::new(3, 5));
    }
}
