//! sidediff: diff computation core for side-by-side rendering.
//!
//! Given two files as line arrays, [`compute_diff`] produces a
//! [`LinesDiff`]: ordered line-range mappings with character-level inner
//! changes, computed with the Myers O(ND) algorithm under a wall-clock
//! budget and post-processed toward human-preferred boundaries. The
//! result is the canonical input for a rendering layer; rendering itself
//! lives elsewhere.
//!
//! The core is synchronous, pure and re-entrant: no I/O, no global state,
//! identical inputs produce byte-identical outputs. Budget exhaustion is
//! not an error; it surfaces as [`LinesDiff::hit_timeout`] with a coarse
//! but well-formed result.

pub mod compute;
pub mod engine;
pub mod mapping;
pub mod optimize;
pub mod range;
pub mod report;
pub mod sequence;

pub use compute::{DiffOptions, compute_diff};
pub use mapping::{DetailedLineRangeMapping, LinesDiff, MovedLines, RangeMapping};
pub use range::{CharRange, LineRange, OffsetRange, Position};
pub use report::render_report;

/// Splits file content into lines the way the engine expects.
///
/// Splitting is on `\n` with a per-line trailing `\r` dropped, so CRLF
/// files diff by content. The trailing empty string of newline-terminated
/// content is a real line and is kept.
#[must_use]
pub fn split_lines(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}
