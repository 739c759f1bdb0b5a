//! Total row count extrapolated from the line density of a sample.

use super::encoding::decode_sample;

/// Estimate the number of lines in an object of `file_size_bytes` from a leading `sample`.
///
/// Divides the file size by the average byte length of the sample's non-blank lines.
/// The first lines of a file are not guaranteed to be representative, so treat the result
/// as a rough magnitude. Always returns at least 1.
pub fn estimate_row_count(file_size_bytes: u64, sample: &[u8]) -> u64 {
    let (text, _) = decode_sample(sample);
    let lines = text
        .split(['\n', '\r'])
        .filter(|l| !l.trim().is_empty())
        .count() as u64;
    if lines == 0 || sample.is_empty() {
        return 1;
    }
    // file_size / (sample_len / lines), kept in integers so a whole-file sample is exact.
    let estimate = u128::from(file_size_bytes) * u128::from(lines) / sample.len() as u128;
    u64::try_from(estimate).unwrap_or(u64::MAX).max(1)
}
