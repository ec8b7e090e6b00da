//! Session splitting.
//!
//! Partitions an ordered recording into contiguous sub-sessions by
//! percentage weight. Each segment gets `ceil(pct / 100 * total)` rows,
//! boundaries accumulate left to right and are clamped to the input, and
//! the final segment always takes whatever remains. The output therefore
//! covers the input exactly once regardless of rounding.

use std::ops::Range;

use gazemap_common::error::{GazemapError, GazemapResult};

/// Check a caller-supplied percentage list.
///
/// The list must be non-empty, every entry positive, and the sum exactly
/// 100. Nothing is renormalized.
pub fn validate_percentages(percentages: &[u32]) -> GazemapResult<()> {
    if percentages.is_empty() {
        return Err(GazemapError::validation(
            "At least one session percentage is required",
        ));
    }
    if let Some(position) = percentages.iter().position(|&p| p == 0) {
        return Err(GazemapError::validation(format!(
            "Session {} has a percentage of 0; percentages must be positive",
            position + 1
        )));
    }
    let total: u64 = percentages.iter().map(|&p| u64::from(p)).sum();
    if total != 100 {
        return Err(GazemapError::validation(format!(
            "Session percentages must sum to 100 (got {total})"
        )));
    }
    Ok(())
}

/// Row ranges for each segment of a recording with `total` rows.
///
/// An empty percentage list yields a single range covering everything.
pub fn segment_bounds(total: usize, percentages: &[u32]) -> Vec<Range<usize>> {
    if percentages.is_empty() {
        return vec![0..total];
    }

    let last = percentages.len() - 1;
    let mut bounds = Vec::with_capacity(percentages.len());
    let mut start = 0usize;

    for (i, &pct) in percentages.iter().enumerate() {
        let end = if i == last {
            total
        } else {
            (start + segment_len(total, pct)).min(total)
        };
        bounds.push(start..end);
        start = end;
    }

    bounds
}

/// Split `items` into contiguous, order-preserving slices.
pub fn split_by_percentages<'a, T>(items: &'a [T], percentages: &[u32]) -> Vec<&'a [T]> {
    segment_bounds(items.len(), percentages)
        .into_iter()
        .map(|range| &items[range])
        .collect()
}

/// `ceil(pct / 100 * total)` in integer arithmetic.
fn segment_len(total: usize, pct: u32) -> usize {
    let scaled = total as u128 * u128::from(pct);
    scaled.div_ceil(100).min(total as u128) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_accepts_exact_hundred() {
        assert!(validate_percentages(&[100]).is_ok());
        assert!(validate_percentages(&[30, 30, 40]).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_sums() {
        let err = validate_percentages(&[30, 60]).unwrap_err();
        assert!(err.is_client_error());
        assert!(err.to_string().contains("got 90"));
        assert!(validate_percentages(&[60, 60]).is_err());
        assert!(validate_percentages(&[]).is_err());
        assert!(validate_percentages(&[0, 100]).is_err());
    }

    #[test]
    fn test_ceiling_boundaries() {
        // 33% of 10 -> 4, 33% of 10 -> 4, last takes the remaining 2.
        assert_eq!(segment_bounds(10, &[33, 33, 34]), vec![0..4, 4..8, 8..10]);
    }

    #[test]
    fn test_last_segment_absorbs_shortfall() {
        assert_eq!(segment_bounds(7, &[50, 50]), vec![0..4, 4..7]);
    }

    #[test]
    fn test_overrun_is_clamped() {
        // Ceilings would overrun: 3 * ceil(0.34 * 2) = 3 rows for a 2-row input.
        assert_eq!(segment_bounds(2, &[34, 33, 33]), vec![0..1, 1..2, 2..2]);
    }

    #[test]
    fn test_empty_input_yields_empty_segments() {
        let items: Vec<u8> = vec![];
        let parts = split_by_percentages(&items, &[25, 75]);
        assert_eq!(parts.len(), 2);
        assert!(parts.iter().all(|p| p.is_empty()));
    }

    #[test]
    fn test_no_percentages_is_one_segment() {
        let items = [1, 2, 3];
        assert_eq!(split_by_percentages(&items, &[]), vec![&items[..]]);
    }

    fn percentages_summing_to_100() -> impl Strategy<Value = Vec<u32>> {
        prop::collection::vec(1u32..=100, 1..8).prop_filter_map("sum to 100", |parts| {
            let mut remaining = 100u32;
            let mut out = Vec::new();
            let last = parts.len() - 1;
            for (i, &part) in parts.iter().enumerate() {
                if remaining == 0 {
                    break;
                }
                let take = if i == last {
                    remaining
                } else {
                    part.min(remaining)
                };
                out.push(take);
                remaining -= take;
            }
            (remaining == 0 && validate_percentages(&out).is_ok()).then_some(out)
        })
    }

    proptest! {
        #[test]
        fn prop_split_covers_input_exactly_once(
            len in 0usize..500,
            percentages in percentages_summing_to_100(),
        ) {
            let items: Vec<usize> = (0..len).collect();
            let parts = split_by_percentages(&items, &percentages);

            prop_assert_eq!(parts.len(), percentages.len());
            let rejoined: Vec<usize> = parts.iter().flat_map(|p| p.iter().copied()).collect();
            prop_assert_eq!(rejoined, items);
        }

        #[test]
        fn prop_segments_are_contiguous(
            len in 0usize..500,
            percentages in percentages_summing_to_100(),
        ) {
            let bounds = segment_bounds(len, &percentages);
            prop_assert_eq!(bounds.first().map(|r| r.start), Some(0));
            prop_assert_eq!(bounds.last().map(|r| r.end), Some(len));
            for pair in bounds.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
                prop_assert!(pair[0].start <= pair[0].end);
            }
        }
    }
}
