//! Human-readable diagnostic rendering of a [`LinesDiff`].
//!
//! This exact format is the byte-oracle of the golden-diff test harness:
//! a header, then one line per mapping with its inner changes indented
//! underneath. Line ranges print their end *inclusive*, so an empty range
//! prints an end one below its start.

use crate::mapping::LinesDiff;
use crate::range::{CharRange, LineRange};
use std::fmt::Write;

fn write_line_range(out: &mut String, range: &LineRange) {
    write!(out, "Lines {}-{}", range.start_line, range.end_line_inclusive())
        .expect("string write is infallible");
}

fn write_char_range(out: &mut String, range: &CharRange) {
    write!(
        out,
        "L{}:C{}-L{}:C{}",
        range.start.line, range.start.column, range.end.line, range.end.column
    )
    .expect("string write is infallible");
}

/// Renders the diagnostic report.
#[must_use]
pub fn render_report(diff: &LinesDiff) -> String {
    let mut out = String::new();
    writeln!(out, "Number of changes: {}", diff.changes.len())
        .expect("string write is infallible");
    writeln!(
        out,
        "Hit timeout: {}",
        if diff.hit_timeout { "yes" } else { "no" }
    )
    .expect("string write is infallible");

    for (i, mapping) in diff.changes.iter().enumerate() {
        write!(out, "[{i}] ").expect("string write is infallible");
        write_line_range(&mut out, &mapping.original);
        out.push_str(" -> ");
        write_line_range(&mut out, &mapping.modified);
        match mapping.inner_changes.len() {
            0 => out.push_str(" (no inner changes)\n"),
            1 => out.push_str(" (1 inner change)\n"),
            n => {
                writeln!(out, " ({n} inner changes)").expect("string write is infallible");
            }
        }
        for inner in &mapping.inner_changes {
            out.push_str("  Inner: ");
            write_char_range(&mut out, &inner.original);
            out.push_str(" -> ");
            write_char_range(&mut out, &inner.modified);
            out.push('\n');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{DetailedLineRangeMapping, RangeMapping};
    use crate::range::{CharRange, LineRange, Position};

    #[test]
    fn empty_diff_renders_header_only() {
        let report = render_report(&LinesDiff::empty());
        assert_eq!(report, "Number of changes: 0\nHit timeout: no\n");
    }

    #[test]
    fn mapping_with_one_inner_change_uses_singular() {
        let diff = LinesDiff::new(
            vec![DetailedLineRangeMapping::new(
                LineRange::new(2, 3),
                LineRange::new(2, 3),
                vec![RangeMapping::new(
                    CharRange::new(Position::new(2, 6), Position::new(2, 7)),
                    CharRange::new(Position::new(2, 6), Position::new(2, 7)),
                )],
            )],
            false,
        );
        let report = render_report(&diff);
        assert_eq!(
            report,
            "Number of changes: 1\n\
             Hit timeout: no\n\
             [0] Lines 2-2 -> Lines 2-2 (1 inner change)\n\
             \x20 Inner: L2:C6-L2:C7 -> L2:C6-L2:C7\n"
        );
    }

    #[test]
    fn empty_line_range_prints_end_below_start() {
        let diff = LinesDiff::new(
            vec![DetailedLineRangeMapping::new(
                LineRange::new(2, 2),
                LineRange::new(2, 3),
                vec![RangeMapping::new(
                    CharRange::new(Position::new(2, 1), Position::new(2, 1)),
                    CharRange::new(Position::new(2, 1), Position::new(2, 2)),
                )],
            )],
            false,
        );
        let report = render_report(&diff);
        assert!(report.contains("[0] Lines 2-1 -> Lines 2-2 (1 inner change)"));
        assert!(report.contains("  Inner: L2:C1-L2:C1 -> L2:C1-L2:C2"));
    }

    #[test]
    fn zero_inner_changes_render_without_children() {
        let diff = LinesDiff::new(
            vec![DetailedLineRangeMapping::new(
                LineRange::new(1, 2),
                LineRange::new(1, 2),
                Vec::new(),
            )],
            true,
        );
        let report = render_report(&diff);
        assert!(report.contains("Hit timeout: yes"));
        assert!(report.contains("[0] Lines 1-1 -> Lines 1-1 (no inner changes)"));
        assert!(!report.contains("Inner:"));
    }
}
