//! Post-processing that turns a raw edit script into the boundary
//! placement a human would choose.
//!
//! All passes are pure transformations over a sorted `Vec<SequenceDiff>`
//! and preserve the engine's output contract: sortedness on both
//! sequences and no entry empty on both sides. The pass order at the
//! character level is load-bearing and is fixed by the refinement
//! pipeline, not here.

use crate::engine::SequenceDiff;
use crate::range::OffsetRange;
use crate::sequence::DiffSequence;

/// Window searched when sliding a one-sided diff toward a better boundary.
pub const MAX_SHIFT_WINDOW: usize = 100;

/// Gap below which two line diffs separated by strongly-equal lines join.
pub const LINE_JOIN_MAX_GAP: usize = 3;

/// Adjacent character diffs separated by at most this many equal
/// characters merge into one highlighted region.
pub const SHORT_MATCH_MAX_GAP: usize = 3;

/// A character diff longer than this counts as "long" for the pruning of
/// tiny matches between long diffs.
pub const LONG_DIFF_MIN_LEN: usize = 25;

/// Equal-run length below which two long diffs merge.
pub const LONG_DIFF_MAX_GAP: usize = 5;

/// Growth cap (characters, both sides combined) for word and subword
/// extension.
pub const MAX_WORD_EXTENSION_GROWTH: usize = 100;

/// Shift-then-join optimization shared by the line and character levels.
///
/// `join_gap_limit` is the strongly-equal gap threshold of the join pass;
/// the character level passes 0 so that only gaps closed by shifting are
/// joined there (its own merge heuristics run later in the refinement
/// pipeline).
pub fn optimize_sequence_diffs<S: DiffSequence>(
    seq1: &S,
    seq2: &S,
    diffs: Vec<SequenceDiff>,
    join_gap_limit: usize,
) -> Vec<SequenceDiff> {
    let diffs = shift_sequence_diffs(seq1, seq2, diffs);
    join_sequence_diffs(seq1, seq2, diffs, join_gap_limit)
}

/// Slides every pure insertion or deletion across its equal surroundings
/// to the rotation with the best summed boundary score.
///
/// A one-sided diff can rotate by `k` iff its content tiles into the
/// surrounding equal run by `k` positions. Ties go to the smallest `|k|`,
/// then to `k >= 0`.
fn shift_sequence_diffs<S: DiffSequence>(
    seq1: &S,
    seq2: &S,
    mut diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    for i in 0..diffs.len() {
        let diff = diffs[i];
        let shifted = if diff.seq1.is_empty() && !diff.seq2.is_empty() {
            shift_one_sided(seq1, seq2, &diffs, i, false)
        } else if diff.seq2.is_empty() && !diff.seq1.is_empty() {
            shift_one_sided(seq2, seq1, &diffs, i, true)
        } else {
            None
        };
        if let Some(best) = shifted {
            diffs[i] = best;
        }
    }
    diffs
}

/// Shifts a single diff whose `other` side is empty and whose content
/// lives on `full`. `swapped` is true when `full` is actually seq1 (a
/// pure deletion).
fn shift_one_sided<S: DiffSequence>(
    other: &S,
    full: &S,
    diffs: &[SequenceDiff],
    i: usize,
    swapped: bool,
) -> Option<SequenceDiff> {
    let oriented = |d: &SequenceDiff| if swapped { d.swapped() } else { *d };
    let diff = oriented(&diffs[i]);
    let point = diff.seq1.start;
    let (start, end) = (diff.seq2.start, diff.seq2.end_exclusive);

    // Neighbor fences on both sequences, plus the bounded search window.
    let (prev1, prev2) = if i > 0 {
        let p = oriented(&diffs[i - 1]);
        (p.seq1.end_exclusive, p.seq2.end_exclusive)
    } else {
        (0, 0)
    };
    let (next1, next2) = if i + 1 < diffs.len() {
        let n = oriented(&diffs[i + 1]);
        (n.seq1.start, n.seq2.start)
    } else {
        (other.len(), full.len())
    };

    let max_left = (point - prev1)
        .min(start - prev2)
        .min(MAX_SHIFT_WINDOW);
    let max_right = (next1 - point)
        .min(next2 - end)
        .min(MAX_SHIFT_WINDOW);

    let mut best: Option<(i32, isize)> = None;
    let mut consider = |k: isize| {
        let score = 2 * other.boundary_score(point.saturating_add_signed(k))
            + full.boundary_score(start.saturating_add_signed(k))
            + full.boundary_score(end.saturating_add_signed(k));
        let better = match best {
            None => true,
            Some((best_score, best_k)) => {
                score > best_score
                    || (score == best_score
                        && (k.abs() < best_k.abs() || (k.abs() == best_k.abs() && k >= 0)))
            }
        };
        if better {
            best = Some((score, k));
        }
    };

    consider(0);
    // Rotation left: element entering from the front must equal the one
    // leaving at the back.
    let mut k = 1usize;
    while k <= max_left && full.hash(start - k) == full.hash(end - k) {
        consider(-(k as isize));
        k += 1;
    }
    // Rotation right, symmetric.
    let mut k = 0usize;
    while k < max_right && full.hash(start + k) == full.hash(end + k) {
        consider(k as isize + 1);
        k += 1;
    }

    let (_, k) = best?;
    if k == 0 {
        return None;
    }
    let shifted = SequenceDiff::new(
        OffsetRange::empty_at(point.saturating_add_signed(k)),
        diff.seq2.delta(k),
    );
    Some(if swapped { shifted.swapped() } else { shifted })
}

/// Joins adjacent diffs whose gap closed during shifting, plus gaps of
/// strongly-equal pairs shorter than `gap_limit`.
fn join_sequence_diffs<S: DiffSequence>(
    seq1: &S,
    seq2: &S,
    diffs: Vec<SequenceDiff>,
    gap_limit: usize,
) -> Vec<SequenceDiff> {
    let mut joined: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for diff in diffs {
        let Some(last) = joined.last() else {
            joined.push(diff);
            continue;
        };
        let gap1 = diff.seq1.start - last.seq1.end_exclusive;
        let gap2 = diff.seq2.start - last.seq2.end_exclusive;
        let should_join = if gap1 == 0 && gap2 == 0 {
            true
        } else if gap1 == gap2 && gap1 < gap_limit {
            (0..gap1).all(|j| {
                seq1.strongly_eq(last.seq1.end_exclusive + j, seq2, last.seq2.end_exclusive + j)
            })
        } else {
            false
        };
        if should_join {
            let merged = last.join(&diff);
            *joined.last_mut().expect("checked non-empty") = merged;
        } else {
            joined.push(diff);
        }
    }
    joined
}

/// Extends diffs whose boundaries fall strictly inside a unit (word or
/// subword) outward to the unit edges.
///
/// An extension is rejected when it would cross a neighboring diff, grow
/// by more than [`MAX_WORD_EXTENSION_GROWTH`] characters, or swallow more
/// equal text than the diff changes (the unit must be mostly changed for
/// whole-unit highlighting to help).
pub fn extend_diffs_to_entire_unit<S, F>(
    seq1: &S,
    seq2: &S,
    mut diffs: Vec<SequenceDiff>,
    find_unit: F,
) -> Vec<SequenceDiff>
where
    S: DiffSequence,
    F: Fn(&S, usize) -> Option<OffsetRange>,
{
    let inward_start = |seq: &S, boundary: usize| -> usize {
        if boundary == 0 || boundary >= seq.len() {
            return 0;
        }
        match find_unit(seq, boundary) {
            Some(unit) if unit.start < boundary => boundary - unit.start,
            _ => 0,
        }
    };
    let inward_end = |seq: &S, boundary: usize| -> usize {
        if boundary == 0 || boundary >= seq.len() {
            return 0;
        }
        match find_unit(seq, boundary) {
            Some(unit) if unit.start < boundary => unit.end_exclusive - boundary,
            _ => 0,
        }
    };

    for i in 0..diffs.len() {
        let diff = diffs[i];
        let left = inward_start(seq1, diff.seq1.start).max(inward_start(seq2, diff.seq2.start));
        let right =
            inward_end(seq1, diff.seq1.end_exclusive).max(inward_end(seq2, diff.seq2.end_exclusive));
        if left == 0 && right == 0 {
            continue;
        }

        let growth = 2 * (left + right);
        let changed = diff.seq1.len() + diff.seq2.len();
        if growth >= changed || growth > MAX_WORD_EXTENSION_GROWTH {
            continue;
        }

        let (fence1, fence2) = if i > 0 {
            (diffs[i - 1].seq1.end_exclusive, diffs[i - 1].seq2.end_exclusive)
        } else {
            (0, 0)
        };
        if diff.seq1.start < fence1 + left || diff.seq2.start < fence2 + left {
            continue;
        }
        let (limit1, limit2) = if i + 1 < diffs.len() {
            (diffs[i + 1].seq1.start, diffs[i + 1].seq2.start)
        } else {
            (seq1.len(), seq2.len())
        };
        if diff.seq1.end_exclusive + right > limit1 || diff.seq2.end_exclusive + right > limit2 {
            continue;
        }

        diffs[i] = SequenceDiff::new(
            OffsetRange::new(diff.seq1.start - left, diff.seq1.end_exclusive + right),
            OffsetRange::new(diff.seq2.start - left, diff.seq2.end_exclusive + right),
        );
    }
    diffs
}

/// Merges adjacent diffs separated by at most [`SHORT_MATCH_MAX_GAP`]
/// equal characters, so a tiny sliver of unchanged text does not split
/// one highlighted region in two.
pub fn remove_short_matches(diffs: Vec<SequenceDiff>) -> Vec<SequenceDiff> {
    merge_by_gap(diffs, |_, _, gap| gap <= SHORT_MATCH_MAX_GAP)
}

/// Merges diffs longer than [`LONG_DIFF_MIN_LEN`] separated by at most
/// [`LONG_DIFF_MAX_GAP`] equal characters. Repeats until stable because a
/// merge can produce a new long diff.
pub fn remove_very_short_matching_text_between_long_diffs(
    mut diffs: Vec<SequenceDiff>,
) -> Vec<SequenceDiff> {
    loop {
        let before = diffs.len();
        diffs = merge_by_gap(diffs, |a, b, gap| {
            gap <= LONG_DIFF_MAX_GAP
                && a.seq1.len().max(a.seq2.len()) > LONG_DIFF_MIN_LEN
                && b.seq1.len().max(b.seq2.len()) > LONG_DIFF_MIN_LEN
        });
        if diffs.len() == before {
            return diffs;
        }
    }
}

fn merge_by_gap(
    diffs: Vec<SequenceDiff>,
    should_merge: impl Fn(&SequenceDiff, &SequenceDiff, usize) -> bool,
) -> Vec<SequenceDiff> {
    let mut merged: Vec<SequenceDiff> = Vec::with_capacity(diffs.len());
    for diff in diffs {
        match merged.last() {
            Some(last)
                if should_merge(last, &diff, diff.seq1.start - last.seq1.end_exclusive) =>
            {
                let joined = last.join(&diff);
                *merged.last_mut().expect("checked non-empty") = joined;
            }
            _ => merged.push(diff),
        }
    }
    merged
}
