//! Delimiter inference from the first line of a text sample.

use super::encoding::decode_sample;
use crate::types::Separator;

/// Candidates in tie-break order: a tie goes to the earlier entry.
const CANDIDATES: [Separator; 3] = [Separator::Semicolon, Separator::Tab, Separator::Comma];

/// Pick the delimiter occurring most often in the first line of `sample`.
///
/// Ties prefer semicolon, then tab, then comma; a line with none of them is comma-separated.
pub fn detect_separator(sample: &[u8]) -> Separator {
    let (text, _) = decode_sample(sample);
    let first_line = text.lines().next().unwrap_or("");
    separator_for_line(first_line)
}

/// Same as [`detect_separator`] for an already decoded line.
pub fn separator_for_line(line: &str) -> Separator {
    let mut best = Separator::Comma;
    let mut best_count = 0usize;
    for candidate in CANDIDATES {
        let count = line.matches(candidate.as_char()).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}
