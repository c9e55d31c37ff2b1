//! Fuzzy alignment of emitted tokens against a window's tokens.
//!
//! Finds the offset at which a short token sequence best matches a longer
//! one, scored by per-token Levenshtein distance. Offsets may be negative:
//! the sequence then hangs off the left edge of the window, overlapping only
//! with its tail. Right-hanging offsets are deliberately not searched; the
//! emitter sits at or ahead of the current window's beginning, never past
//! its end, and a progress value above 1.0 is the "ahead" signal.

use strsim::levenshtein;

/// Distance charged per token position with no counterpart in the window.
pub const UNCERTAINTY_PENALTY: usize = 5;

/// Returns the offset in `tokens` at which `term` most closely matches.
///
/// The search covers `[-term.len(), tokens.len() - term.len()]`; ties go to
/// the lowest offset. A negative result means only the last `term.len() + i`
/// tokens of `term` overlap the front of `tokens`. For example, searching for
/// `["tampa", "atlanta", "chicago"]` in `["atlanta", "chicago", "newyork"]`
/// returns `-1`. The upper bound is the offset where `term` ends exactly at
/// the end of `tokens`; nothing past it is searched.
pub fn fuzzy_search(term: &[String], tokens: &[String]) -> isize {
    let mut idx = 0isize;
    let mut min_distance = usize::MAX;

    let lo = -(term.len() as isize);
    let hi = tokens.len() as isize - term.len() as isize;

    for i in lo..=hi {
        let mut distance = 0usize;

        for (j, term_token) in term.iter().enumerate() {
            let k = i + j as isize;

            if k < 0 || k >= tokens.len() as isize {
                distance += UNCERTAINTY_PENALTY;
            } else {
                distance += levenshtein(term_token, &tokens[k as usize]);
            }
        }

        if distance < min_distance {
            min_distance = distance;
            idx = i;
        }
    }

    idx
}
