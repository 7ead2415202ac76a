// Copyright (C) 2025 Ryan Daum <ryan.daum@gmail.com> This program is free
// software: you can redistribute it and/or modify it under the terms of the GNU
// General Public License as published by the Free Software Foundation, version
// 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

use itertools::Itertools;
use similar::TextDiff;

pub const DEFAULT_CUTOFF: f64 = 0.72;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;

/// Character-level similarity in `0.0..=1.0`: twice the number of matching characters over the
/// combined length. Case sensitive.
///
/// Matches must keep their order, so a transposition costs a character: `tset` scores 0.75
/// against `test`, where a metric over character counts alone would call them identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    f64::from(TextDiff::from_chars(a, b).ratio())
}

/// Near-miss suggestions for `input` out of `vocabulary`: every entry scoring at least `cutoff`,
/// best first (ties keep vocabulary order), at most `max_count` of them.
pub fn suggest<S: AsRef<str>>(
    input: &str,
    vocabulary: &[S],
    cutoff: f64,
    max_count: usize,
) -> Vec<String> {
    vocabulary
        .iter()
        .map(AsRef::as_ref)
        .unique()
        .map(|word| (similarity(input, word), word))
        .filter(|(score, _)| *score >= cutoff)
        .sorted_by(|(a, _), (b, _)| b.total_cmp(a))
        .take(max_count)
        .map(|(_, word)| word.to_string())
        .collect()
}
